//! Handing finished artifacts to the user

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DeliveryError;
use crate::model::Artifact;

/// Where finished artifacts go; called once per explicit user action
pub trait DeliverySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError>;
}

/// Writes artifacts into a directory under their suggested file names
pub struct DirectorySink {
    dir: PathBuf,
    delivered: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delivered: Vec::new(),
        }
    }

    /// Paths written so far, in delivery order
    pub fn delivered(&self) -> &[PathBuf] {
        &self.delivered
    }

    fn target(&self, file_name: &str) -> Result<PathBuf, DeliveryError> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| DeliveryError::Refused(format!("invalid file name {:?}", file_name)))?;
        Ok(self.dir.join(name))
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError> {
        let path = self.target(&artifact.file_name)?;
        fs::write(&path, &artifact.bytes).map_err(|source| DeliveryError::Write {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Wrote {} ({} bytes)", path.display(), artifact.len());
        self.delivered.push(path);
        Ok(())
    }
}

/// Keeps delivered artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeliverySink for MemorySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}
