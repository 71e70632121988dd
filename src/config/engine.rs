//! The `tessera.toml` engine configuration.
//!
//! ```toml
//! # Directory holding the templates, relative to this file
//! template_dir = "templates"
//!
//! # "permanent" compiles each template once, "none" recompiles on every render
//! cache = "permanent"
//!
//! # Loaded into every template so they can be pulled in with {% include %}
//! partials = ["partials/header.html", "partials/footer.html"]
//!
//! # Files `tessera check` compiles
//! extensions = ["html", "txt"]
//! ```
//!
//! Every key is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::TesseraError;
use crate::fs::Dir;
use crate::templating::{CachePolicy, Engine};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "TESSERA_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tessera.toml";

/// Engine settings read from `tessera.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory template names are resolved against.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Cache policy of the engine.
    #[serde(default)]
    pub cache: CachePolicy,

    /// Partial templates loaded into every compiled template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partials: Vec<String>,

    /// File extensions (without the dot) treated as templates by `tessera check`.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_extensions() -> Vec<String> {
    ["html", "htm", "txt", "md", "xml"].into_iter().map(String::from).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            cache: CachePolicy::default(),
            partials: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the first place that has one.
    ///
    /// 1. `path`, when given. It must exist.
    /// 2. The file named by `TESSERA_CONFIG`. It must exist.
    /// 3. `./tessera.toml`, if present.
    /// 4. Built-in defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        match config_source(path, std::env::var_os(CONFIG_ENV), local.exists()) {
            Some(ConfigSource::Required(path)) => {
                if !path.exists() {
                    return Err(TesseraError::ConfigNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Self::load_from(&path).await
            }
            Some(ConfigSource::Local) => Self::load_from(&local).await,
            None => {
                tracing::debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from `path`.
    ///
    /// A relative `template_dir` is taken relative to the directory holding `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| TesseraError::ConfigParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if config.template_dir.is_relative() {
            if let Some(base) = path.parent() {
                config.template_dir = base.join(&config.template_dir);
            }
        }

        tracing::debug!(
            path = %path.display(),
            template_dir = %config.template_dir.display(),
            cache = %config.cache,
            "loaded configuration"
        );
        Ok(config)
    }

    /// Whether `path` has one of the configured template extensions.
    pub fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Build an engine reading from `template_dir` with the configured cache policy and
    /// partials.
    pub fn build_engine(&self) -> Result<Engine> {
        if !self.template_dir.is_dir() {
            return Err(TesseraError::TemplateDirNotFound {
                path: self.template_dir.display().to_string(),
            }
            .into());
        }

        Ok(Engine::new(Dir::new(&self.template_dir))
            .with_cache(self.cache.build())
            .with_partials(self.partials.iter().cloned()))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ConfigSource {
    Required(PathBuf),
    Local,
}

fn config_source(
    explicit: Option<PathBuf>,
    env: Option<OsString>,
    local_exists: bool,
) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource::Required(path));
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Some(ConfigSource::Required(PathBuf::from(path)));
    }
    local_exists.then_some(ConfigSource::Local)
}
