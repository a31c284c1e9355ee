use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::{ArchiveLevel, CombineOptions, CompressOptions, QualityTier, ZipOptions};

#[derive(Parser, Debug)]
#[command(name = "paperclip")]
#[command(
    author,
    version,
    about = "Merge PDFs, shrink them by re-rendering pages, and pack files into ZIP archives"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Directory the result is written to
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge two or more PDFs into combined.pdf, in the order given
    Combine {
        /// Input PDF files
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Leave content streams uncompressed
        #[arg(long)]
        no_compress_streams: bool,
    },

    /// Shrink PDFs by rendering every page to a JPEG (text becomes unselectable)
    Compress {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Quality tier
        #[arg(short, long, value_enum, default_value = "small")]
        tier: QualityTier,

        /// Flatten form fields before rendering
        #[arg(long)]
        flatten: bool,

        /// Archive level used when several PDFs are packaged together
        #[arg(long, value_enum, default_value = "default")]
        archive_level: ArchiveLevel,

        /// Directory containing the PDFium shared library
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },

    /// Pack files and folders into a ZIP archive, keeping folder structure
    Zip {
        /// Files or directories to archive
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Compression level
        #[arg(short, long, value_enum, default_value = "default")]
        level: ArchiveLevel,
    },
}

impl Command {
    /// Input paths in the order given
    pub fn inputs(&self) -> &[PathBuf] {
        match self {
            Command::Combine { inputs, .. }
            | Command::Compress { inputs, .. }
            | Command::Zip { inputs, .. } => inputs,
        }
    }

    pub fn combine_options(&self) -> Option<CombineOptions> {
        match self {
            Command::Combine {
                no_compress_streams,
                ..
            } => Some(CombineOptions {
                compress_streams: !no_compress_streams,
            }),
            _ => None,
        }
    }

    pub fn compress_options(&self) -> Option<CompressOptions> {
        match self {
            Command::Compress {
                tier,
                flatten,
                archive_level,
                ..
            } => Some(CompressOptions {
                tier: *tier,
                flatten_forms: *flatten,
                archive_level: *archive_level,
            }),
            _ => None,
        }
    }

    pub fn zip_options(&self) -> Option<ZipOptions> {
        match self {
            Command::Zip { level, .. } => Some(ZipOptions { level: *level }),
            _ => None,
        }
    }
}
