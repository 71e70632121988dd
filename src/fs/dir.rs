//! Native directory-backed template source.

use std::io;
use std::path::{Component, Path, PathBuf};

use super::{FileSystem, TemplateFile};

/// A [`FileSystem`] rooted at a directory on disk.
///
/// Template names are `/`-separated paths relative to the root. Names that are
/// absolute or that climb above the root with `..` are refused with
/// [`io::ErrorKind::InvalidInput`] before any disk access happens.
///
/// # Examples
///
/// ```rust,no_run
/// use tessera::fs::{Dir, FileSystem};
///
/// let dir = Dir::new("templates");
/// let file = dir.open("pages/index.html")?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dir {
    root: PathBuf,
}

impl Dir {
    /// Create a filesystem rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// The directory templates are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a template name to a path under the root.
    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let relative = Path::new(name);
        if relative.is_absolute() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("template name '{name}' must be relative to the template directory"),
            ));
        }

        let mut depth: i32 = 0;
        for component in relative.components() {
            match component {
                Component::Normal(_) => depth += 1,
                Component::CurDir => {}
                Component::ParentDir => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("template name '{name}' escapes the template directory"),
                        ));
                    }
                }
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("invalid path component in template name '{name}'"),
                    ));
                }
            }
        }

        Ok(self.root.join(relative))
    }
}

impl FileSystem for Dir {
    fn open(&self, name: &str) -> io::Result<Box<dyn TemplateFile>> {
        let path = self.resolve(name)?;
        let file = std::fs::File::open(&path)?;
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is a directory, not a template", path.display()),
            ));
        }
        Ok(Box::new(file))
    }
}
