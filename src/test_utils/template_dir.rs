//! Templates on disk for tests that exercise [`Dir`] or the command line.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fs::Dir;

/// A temporary directory holding a `templates/` tree and, optionally, a
/// `tessera.toml` next to it.
///
/// Everything is removed when the value is dropped.
pub struct TemplateDir {
    temp_dir: TempDir,
    templates: PathBuf,
}

impl TemplateDir {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let templates = temp_dir.path().join("templates");
        std::fs::create_dir_all(&templates)
            .with_context(|| format!("Failed to create {}", templates.display()))?;
        Ok(Self {
            temp_dir,
            templates,
        })
    }

    /// Write a template, creating parent directories as needed.
    pub fn with_template(self, name: &str, content: impl AsRef<str>) -> Result<Self> {
        self.write_template(name, content)?;
        Ok(self)
    }

    /// Write a template, creating parent directories as needed.
    pub fn write_template(&self, name: &str, content: impl AsRef<str>) -> Result<PathBuf> {
        write_file(&self.templates.join(name), content.as_ref())
    }

    /// Write a file relative to the root of the temporary directory.
    pub fn write_file(&self, path: impl AsRef<Path>, content: impl AsRef<str>) -> Result<PathBuf> {
        write_file(&self.temp_dir.path().join(path), content.as_ref())
    }

    /// Write `tessera.toml` at the root of the temporary directory.
    pub fn write_config(&self, content: impl AsRef<str>) -> Result<PathBuf> {
        self.write_file("tessera.toml", content)
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A [`Dir`] filesystem over `templates/`.
    pub fn fs(&self) -> Dir {
        Dir::new(&self.templates)
    }
}

fn write_file(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
