//! Configuration for the `tessera` command line.
//!
//! The library itself takes every collaborator explicitly (see
//! [`crate::templating::Engine::configure`]). The binary reads them from a
//! `tessera.toml` file instead, located in this order:
//!
//! 1. `--config <FILE>`
//! 2. the `TESSERA_CONFIG` environment variable
//! 3. `./tessera.toml`
//! 4. built-in defaults (`templates/`, permanent cache, no partials)

mod engine;

pub use engine::{CONFIG_ENV, DEFAULT_CONFIG_FILE, EngineConfig};
