//! Command-line interface for tessera.
//!
//! # Commands
//!
//! - `render` - render one template to stdout or a file
//! - `check` - compile every template in a directory and report failures
//!
//! # Global options
//!
//! - `--verbose` / `-v` - debug logging (compile steps, cache hits)
//! - `--quiet` / `-q` - only errors
//! - `--config` / `-c` - path to a `tessera.toml`
//!
//! Without `--verbose` or `--quiet` the log filter comes from `RUST_LOG`, falling back
//! to warnings only.
//!
//! # Examples
//!
//! ```bash
//! tessera render article.html --data article.json --output out/article.html
//! tessera --config site/tessera.toml check
//! tessera check --dir templates --format json
//! ```

mod check;
mod render;

pub use check::{CheckCommand, OutputFormat};
pub use render::RenderCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EngineConfig;

#[derive(Parser)]
#[command(
    name = "tessera",
    about = "Render templates with inheritance and compile-once caching",
    version,
    long_about = "Tessera renders Tera templates that inherit from a parent named on their first \
                  line with {{ extends \"parent\" }}. Compiled templates are cached for the \
                  lifetime of the process unless --no-cache is given."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a tessera.toml configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template
    Render(RenderCommand),

    /// Compile every template in a directory
    Check(CheckCommand),
}

impl Cli {
    /// Log filter requested by `--verbose` or `--quiet`, if either was given.
    #[must_use]
    pub const fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Load the configuration and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = EngineConfig::load_with_optional(self.config).await?;

        match self.command {
            Commands::Render(cmd) => cmd.execute(config).await,
            Commands::Check(cmd) => cmd.execute(config).await,
        }
    }
}
