//! Turning command-line paths into selected input files

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::InputFile;

/// Collect input files from the given paths.
///
/// Plain files are taken as they are. Directories are walked recursively and
/// every file records its path relative to the directory's parent, so the
/// chosen folder's own name starts every relative path.
pub fn pick(paths: &[PathBuf]) -> io::Result<Vec<InputFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(pick_directory(path)?);
        } else {
            files.push(InputFile::from_path(path)?);
        }
    }
    Ok(files)
}

fn pick_directory(root: &Path) -> io::Result<Vec<InputFile>> {
    let root = root.canonicalize()?;
    let base = root.parent().unwrap_or(&root);
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(base).unwrap_or(entry.path());
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(InputFile::from_path(entry.path())?.with_relative_path(relative));
    }

    if files.is_empty() {
        log::warn!("No files found under {}", root.display());
    }
    Ok(files)
}
