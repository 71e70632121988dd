//! A [`FileSystem`] wrapper that records how often each template is opened.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::fs::{FileSystem, TemplateFile};

/// Counts opens per name while delegating to an inner filesystem.
///
/// Clones share their counters, so a test can keep one handle and give the other to
/// an engine.
pub struct CountingFs<F> {
    inner: Arc<F>,
    total: Arc<AtomicUsize>,
    per_name: Arc<Mutex<HashMap<String, usize>>>,
}

impl<F> Clone for CountingFs<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            total: Arc::clone(&self.total),
            per_name: Arc::clone(&self.per_name),
        }
    }
}

impl<F: FileSystem> CountingFs<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner: Arc::new(inner),
            total: Arc::new(AtomicUsize::new(0)),
            per_name: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Opens of any name, including failed ones.
    pub fn total_opens(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Opens of `name`, including failed ones.
    pub fn opens(&self, name: &str) -> usize {
        self.per_name.lock().unwrap_or_else(PoisonError::into_inner).get(name).copied().unwrap_or(0)
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::SeqCst);
        self.per_name.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<F: FileSystem> FileSystem for CountingFs<F> {
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .per_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default() += 1;
        self.inner.open(name)
    }
}
