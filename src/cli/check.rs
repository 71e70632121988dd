//! `tessera check` - compile every template in a directory.
//!
//! Walks the template directory, compiles each file whose extension is listed in the
//! configuration (`extensions`), and prints one line per template. Parents are
//! compiled once and shared by all of their children when the configured cache policy
//! is `permanent`.
//!
//! Exits with a non-zero status if any template fails to compile.

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::EngineConfig;
use crate::core::TesseraError;
use crate::templating::Engine;

#[derive(Args)]
pub struct CheckCommand {
    /// Template directory (overrides template_dir from the configuration)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// How `check` reports its results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One coloured line per template.
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    passed: usize,
    failed: usize,
    templates: Vec<TemplateStatus>,
}

#[derive(Debug, Serialize)]
struct TemplateStatus {
    name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CheckCommand {
    pub async fn execute(self, mut config: EngineConfig) -> Result<()> {
        if let Some(dir) = self.dir {
            config.template_dir = dir;
        }

        let engine = config.build_engine()?;
        let names = template_names(&config)?;
        tracing::debug!(count = names.len(), dir = %config.template_dir.display(), "checking templates");

        let report = tokio::task::spawn_blocking(move || compile_all(&engine, names))
            .await
            .context("check task failed")?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => print_text(&report, &config.template_dir),
        }

        if report.failed > 0 {
            return Err(TesseraError::CheckFailed {
                failed: report.failed,
                total: report.passed + report.failed,
            }
            .into());
        }
        Ok(())
    }
}

/// Template names under `config.template_dir`, `/`-separated and sorted.
fn template_names(config: &EngineConfig) -> Result<Vec<String>> {
    let root = &config.template_dir;
    let mut names = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk template directory {}", root.display()))?;
        if !entry.file_type().is_file() || !config.is_template(entry.path()) {
            continue;
        }
        if let Some(name) = template_name(root, entry.path()) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

fn template_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> =
        relative.components().map(|c| c.as_os_str().to_str()).collect::<Option<_>>()?;
    Some(parts.join("/"))
}

fn compile_all(engine: &Engine, names: Vec<String>) -> CheckReport {
    let mut templates = Vec::with_capacity(names.len());
    for name in names {
        let error = engine.prepare(&name).err().map(|e| e.format_chain());
        templates.push(TemplateStatus {
            ok: error.is_none(),
            name,
            error,
        });
    }

    let passed = templates.iter().filter(|t| t.ok).count();
    CheckReport {
        passed,
        failed: templates.len() - passed,
        templates,
    }
}

fn print_text(report: &CheckReport, dir: &Path) {
    if report.templates.is_empty() {
        println!("{} No templates found in {}", "⚠".yellow(), dir.display());
        return;
    }

    for template in &report.templates {
        match &template.error {
            None => println!("{} {}", "✓".green(), template.name),
            Some(error) => {
                println!("{} {}", "✗".red(), template.name);
                for line in error.lines() {
                    println!("    {}", line.trim_start());
                }
            }
        }
    }

    let total = report.passed + report.failed;
    if report.failed == 0 {
        println!("\n{} {} template(s) compiled", "✓".green(), total);
    } else {
        println!("\n{} {} of {} template(s) failed", "✗".red(), report.failed, total);
    }
}
