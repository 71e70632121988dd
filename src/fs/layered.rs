//! Composite template source.

use std::io;

use super::{FileSystem, TemplateFile};

/// A [`FileSystem`] that consults several filesystems in order.
///
/// The first layer that opens the name wins. Only [`io::ErrorKind::NotFound`] falls
/// through to the next layer; any other error is returned as-is so that permission
/// problems in an override directory are not silently masked by a fallback.
///
/// # Examples
///
/// ```rust,no_run
/// use tessera::fs::{Dir, Layered, MemoryFs};
///
/// let builtin = MemoryFs::new().with("layout.html", "{% block body %}{% endblock body %}");
/// let fs = Layered::new()
///     .with_layer(Dir::new("overrides"))
///     .with_layer(builtin);
/// ```
#[derive(Default)]
pub struct Layered {
    layers: Vec<Box<dyn FileSystem>>,
}

impl Layered {
    /// Create a composite with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer consulted after all existing ones.
    #[must_use]
    pub fn with_layer(mut self, layer: impl FileSystem + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layers have been added.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl FileSystem for Layered {
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>> {
        for layer in &self.layers {
            match layer.open(name) {
                Ok(file) => return Ok(file),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("template '{name}' not found in any of {} layer(s)", self.layers.len()),
        ))
    }
}
