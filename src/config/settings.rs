use std::path::PathBuf;

use crate::cli::Args;

/// Runtime settings shared by every subcommand
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory artifacts are delivered into
    pub output_dir: PathBuf,
    /// Where to look for the PDFium shared library before the working directory
    pub pdfium_library_dir: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            pdfium_library_dir: None,
            log_level: log::LevelFilter::Warn,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Self {
        let pdfium_library_dir = match &args.command {
            crate::cli::Command::Compress { pdfium_dir, .. } => pdfium_dir.clone(),
            _ => None,
        };

        Self {
            output_dir: args.output_dir.clone(),
            pdfium_library_dir,
            log_level: match args.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                _ => log::LevelFilter::Debug,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert!(settings.pdfium_library_dir.is_none());
        assert_eq!(settings.log_level, log::LevelFilter::Warn);
    }

    #[test]
    fn test_from_args() {
        let args = Args::try_parse_from([
            "paperclip",
            "compress",
            "--pdfium-dir",
            "/opt/pdfium",
            "-o",
            "out",
            "-v",
            "a.pdf",
        ])
        .unwrap();
        let settings = Settings::from_args(&args);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(
            settings.pdfium_library_dir,
            Some(PathBuf::from("/opt/pdfium"))
        );
        assert_eq!(settings.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn test_pdfium_dir_only_for_compress() {
        let args = Args::try_parse_from(["paperclip", "zip", "docs", "-vvv"]).unwrap();
        let settings = Settings::from_args(&args);
        assert!(settings.pdfium_library_dir.is_none());
        assert_eq!(settings.log_level, log::LevelFilter::Debug);
    }
}
