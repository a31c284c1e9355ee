use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the bytes of an input file live
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Bytes already held in memory
    Memory(Vec<u8>),
    /// A file on disk, read when the content is first needed
    Path(PathBuf),
}

/// A single user-selected file
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Base file name, e.g. `report.pdf`
    pub name: String,
    /// Size in bytes as reported at selection time
    pub len: u64,
    /// Path relative to the chosen root for directory selections,
    /// including the root's own name (`photos/2024/a.jpg`)
    pub relative_path: Option<String>,
    source: ContentSource,
}

impl InputFile {
    /// Create an input from bytes already in memory
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            len: bytes.len() as u64,
            relative_path: None,
            source: ContentSource::Memory(bytes),
        }
    }

    /// Create an input backed by a file on disk
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Not a file: {}", path.display()),
                )
            })?;

        Ok(Self {
            name,
            len: metadata.len(),
            relative_path: None,
            source: ContentSource::Path(path.to_path_buf()),
        })
    }

    /// Attach the path relative to a selected directory root
    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    /// Key used to detect duplicate selections
    pub fn selection_key(&self) -> &str {
        self.relative_path.as_deref().unwrap_or(&self.name)
    }

    /// Entry name inside an archive, preserving any directory structure
    pub fn archive_entry_name(&self) -> &str {
        self.selection_key()
    }

    /// File name without its final extension
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Read the file content
    pub fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            ContentSource::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
            ContentSource::Path(path) => fs::read(path).map(Cow::Owned),
        }
    }
}
