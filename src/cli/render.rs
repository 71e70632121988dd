//! `tessera render` - render one template.
//!
//! Template data comes from an optional JSON or TOML file whose top level must be an
//! object (a table, in TOML). Without `--data` the template is rendered against an
//! empty context.

use anyhow::{Context as _, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use tera::Context;

use crate::config::EngineConfig;
use crate::core::TesseraError;
use crate::templating::CachePolicy;

#[derive(Args)]
pub struct RenderCommand {
    /// Template to render, relative to the template directory
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Template directory (overrides template_dir from the configuration)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// JSON or TOML file providing template variables
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Write the output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Recompile templates instead of caching them
    #[arg(long)]
    pub no_cache: bool,
}

impl RenderCommand {
    pub async fn execute(self, mut config: EngineConfig) -> Result<()> {
        if let Some(dir) = self.dir {
            config.template_dir = dir;
        }
        if self.no_cache {
            config.cache = CachePolicy::Disabled;
        }

        let context = match &self.data {
            Some(path) => load_context(path).await?,
            None => Context::new(),
        };

        let engine = config.build_engine()?;
        let name = self.name;
        let rendered = tokio::task::spawn_blocking(move || engine.render_to_string(&name, &context))
            .await
            .context("render task failed")??;

        match self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("Failed to create output directory {}", parent.display())
                    })?;
                }
                tokio::fs::write(&path, rendered)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(output = %path.display(), "rendered");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes()).context("Failed to write to stdout")?;
                stdout.flush().context("Failed to write to stdout")?;
            }
        }

        Ok(())
    }
}

/// Read a JSON or TOML data file into a template context, choosing the format by
/// extension.
pub(crate) async fn load_context(path: &Path) -> Result<Context> {
    let file = path.display().to_string();
    let format = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);

    let content = tokio::fs::read_to_string(path).await.map_err(|e| TesseraError::DataFileError {
        file: file.clone(),
        reason: e.to_string(),
    })?;

    let data_error = |reason: String| TesseraError::DataFileError {
        file: file.clone(),
        reason,
    };

    let context = match format.as_deref() {
        Some("json") => {
            let value: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| data_error(e.to_string()))?;
            Context::from_value(value)
        }
        Some("toml") => {
            let value: toml::Table = toml::from_str(&content).map_err(|e| data_error(e.to_string()))?;
            Context::from_serialize(value)
        }
        _ => {
            return Err(TesseraError::UnsupportedDataFormat {
                file: file.clone(),
            }
            .into());
        }
    };

    Ok(context.map_err(|e| data_error(e.to_string()))?)
}
