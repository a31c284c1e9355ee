use crate::config::defaults::{PDF_MIME, ZIP_MIME};

/// A finished byte buffer ready for delivery or archiving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl Artifact {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: PDF_MIME,
        }
    }

    pub fn zip(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: ZIP_MIME,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Outcome of the most recent run, kept until superseded or reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Ready(Artifact),
    Failed(String),
}

impl OperationResult {
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            OperationResult::Ready(artifact) => Some(artifact),
            OperationResult::Failed(_) => None,
        }
    }
}
