//! In-memory template source.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, PoisonError, RwLock};

use super::{FileSystem, TemplateFile};

/// A [`FileSystem`] backed by an in-memory map of name to bytes.
///
/// Useful for templates embedded into a binary with `include_str!` and as a test
/// double. Cloning is cheap and clones share the same contents, so a template added
/// through one handle is visible through all of them.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<RwLock<HashMap<String, Arc<[u8]>>>>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryFs::insert`].
    #[must_use]
    pub fn with(self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    /// Builder form of [`MemoryFs::insert_bytes`].
    #[must_use]
    pub fn with_bytes(self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert_bytes(name, contents);
        self
    }

    /// Add or replace a text template.
    pub fn insert(&self, name: impl Into<String>, contents: impl Into<String>) {
        self.insert_bytes(name, contents.into().into_bytes());
    }

    /// Add or replace a template from raw bytes.
    pub fn insert_bytes(&self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        let contents: Vec<u8> = contents.into();
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::from(contents));
    }

    /// Whether a template called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.files.read().unwrap_or_else(PoisonError::into_inner).contains_key(name)
    }

    /// Names of all stored templates, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.files.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        names.sort();
        names
    }
}

impl FileSystem for MemoryFs {
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>> {
        let contents = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("template '{name}' not found"))
            })?;
        Ok(Box::new(io::Cursor::new(contents)))
    }
}
