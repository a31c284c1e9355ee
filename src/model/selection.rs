use std::collections::HashSet;

use super::input::InputFile;

/// Ordered set of selected files, unique by selection key.
///
/// Later duplicates are dropped rather than replacing the earlier entry, so
/// the order of first occurrence is what every operation sees.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    files: Vec<InputFile>,
    keys: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a newly picked or dropped batch, returning how many files were added
    pub fn extend<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = InputFile>,
    {
        let before = self.files.len();
        for file in batch {
            if self.keys.insert(file.selection_key().to_string()) {
                self.files.push(file);
            } else {
                log::debug!("Skipping duplicate selection: {}", file.selection_key());
            }
        }
        self.files.len() - before
    }

    /// Remove one file by its selection key
    pub fn remove(&mut self, key: &str) -> bool {
        if !self.keys.remove(key) {
            return false;
        }
        self.files.retain(|f| f.selection_key() != key);
        true
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputFile> {
        self.files.iter()
    }

    pub fn files(&self) -> &[InputFile] {
        &self.files
    }

    /// Selection keys in selection order
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(InputFile::selection_key).collect()
    }
}
