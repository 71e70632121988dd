//! Template source access.
//!
//! The engine never touches the disk directly. Everything it reads goes through the
//! [`FileSystem`] capability, which opens a named template and hands back a readable,
//! closable stream. Any backing store can implement it:
//!
//! - [`Dir`] - a directory on the native filesystem
//! - [`MemoryFs`] - an in-memory bundle (embedded templates, test doubles)
//! - [`Layered`] - a composite that consults several filesystems in order
//!
//! # Handle ownership
//!
//! A handle returned by [`FileSystem::open`] is owned exclusively by the caller for the
//! duration of one read. [`OpenedTemplate`] wraps the handle so it is closed on every
//! exit path, including early returns on read failures. Close failures are logged and
//! swallowed; they never replace the error (or success) of the operation that opened
//! the file.

mod dir;
mod layered;
mod memory;

pub use dir::Dir;
pub use layered::Layered;
pub use memory::MemoryFs;

use std::io::{self, Read};

/// A readable, closable template source handle.
pub trait TemplateFile: Read + Send {
    /// Release the handle.
    ///
    /// The default implementation simply drops it, which is correct for any handle
    /// whose resources are released by `Drop` (files, buffers).
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

impl TemplateFile for std::fs::File {}

impl<T: AsRef<[u8]> + Send> TemplateFile for io::Cursor<T> {}

/// Opens template sources by name.
///
/// Implementations must be safe to call from several threads at once.
pub trait FileSystem: Send + Sync {
    /// Open the template called `name` for reading.
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>>;
}

impl<F: FileSystem + ?Sized> FileSystem for std::sync::Arc<F> {
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>> {
        (**self).open(name)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for Box<F> {
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>> {
        (**self).open(name)
    }
}

/// Scoped owner of an open template handle.
///
/// The handle is closed when the guard is dropped. A failing close is reported with
/// `tracing::warn!` and otherwise ignored.
pub struct OpenedTemplate {
    name: String,
    file: Option<Box<dyn TemplateFile>>,
}

impl OpenedTemplate {
    /// Open `name` through `fs` and take ownership of the handle.
    pub fn open(fs: &dyn FileSystem, name: &str) -> io::Result<Self> {
        let file = fs.open(name)?;
        Ok(Self {
            name: name.to_string(),
            file: Some(file),
        })
    }

    /// Read the whole source as UTF-8 text.
    ///
    /// Invalid UTF-8 is reported as [`io::ErrorKind::InvalidData`].
    pub fn read_to_string(&mut self) -> io::Result<String> {
        let mut contents = String::new();
        if let Some(file) = self.file.as_mut() {
            file.read_to_string(&mut contents)?;
        }
        Ok(contents)
    }
}

impl Drop for OpenedTemplate {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        if let Err(e) = file.close() {
            tracing::warn!(
                template = %self.name,
                "failed to close template source after reading: {}",
                e
            );
        }
    }
}
