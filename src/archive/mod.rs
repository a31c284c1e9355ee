//! ZIP assembly and the one-or-many packaging decision

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::WorkflowError;
use crate::model::{ArchiveLevel, Artifact, ProgressSink, ProgressState};

/// Writes named entries into an in-memory ZIP, reporting byte progress
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    names: HashSet<String>,
    total_bytes: u64,
    written_bytes: u64,
}

impl ArchiveWriter {
    /// `total_bytes` is the summed size of everything that will be added,
    /// used only for percent-complete reporting
    pub fn new(level: ArchiveLevel, total_bytes: u64) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(level.method())
            .compression_level(level.deflate_level());

        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            names: HashSet::new(),
            total_bytes,
            written_bytes: 0,
        }
    }

    fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 0;
        }
        (self.written_bytes.saturating_mul(100) / self.total_bytes).min(100) as u8
    }

    /// Add one entry, returning the name it was stored under
    pub fn add(
        &mut self,
        name: &str,
        bytes: &[u8],
        progress: &mut dyn ProgressSink,
    ) -> Result<String, WorkflowError> {
        let name = unique_entry_name(&self.names, &normalize_entry_name(name));
        progress.report(&ProgressState::archiving(self.percent(), Some(&name)));
        log::debug!("Adding archive entry {} ({} bytes)", name, bytes.len());

        self.zip
            .start_file(name.as_str(), self.options.clone())
            .map_err(|e| WorkflowError::Archive(format!("Failed to start {}: {}", name, e)))?;
        self.zip.write_all(bytes)?;

        self.written_bytes += bytes.len() as u64;
        self.names.insert(name.clone());
        Ok(name)
    }

    pub fn entry_count(&self) -> usize {
        self.names.len()
    }

    /// Write the central directory and return the archive bytes
    pub fn finish(self, progress: &mut dyn ProgressSink) -> Result<Vec<u8>, WorkflowError> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| WorkflowError::Archive(format!("Failed to finish archive: {}", e)))?;
        progress.report(&ProgressState::archiving(100, None));
        Ok(cursor.into_inner())
    }
}

/// Deliver one artifact as-is; archive two or more into `archive_name`
pub fn package(
    mut artifacts: Vec<Artifact>,
    archive_name: &str,
    level: ArchiveLevel,
    progress: &mut dyn ProgressSink,
) -> Result<Artifact, WorkflowError> {
    match artifacts.len() {
        0 => Err(WorkflowError::Archive("nothing to package".to_string())),
        1 => Ok(artifacts.remove(0)),
        count => {
            log::info!("Packaging {} files into {}", count, archive_name);
            let total = artifacts.iter().map(|a| a.len() as u64).sum();
            let mut writer = ArchiveWriter::new(level, total);
            for artifact in &artifacts {
                writer.add(&artifact.file_name, &artifact.bytes, progress)?;
            }
            log::debug!("Archived {} entries", writer.entry_count());
            Ok(Artifact::zip(archive_name, writer.finish(progress)?))
        }
    }
}

/// Forward slashes only, no leading slash or `.` / `..` components
fn normalize_entry_name(name: &str) -> String {
    let parts: Vec<&str> = name
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect();
    if parts.is_empty() {
        "unnamed".to_string()
    } else {
        parts.join("/")
    }
}

/// Append ` (2)`, ` (3)`, ... before the extension until the name is free
fn unique_entry_name(taken: &HashSet<String>, name: &str) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let path = Path::new(name);
    let extension = path.extension().and_then(|e| e.to_str());
    let stem = match extension {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    };

    (2..)
        .map(|n| match extension {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
