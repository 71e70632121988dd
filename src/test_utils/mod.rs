//! Test utilities for tessera.
//!
//! Available to unit tests and, through the `test-utils` feature, to the integration
//! suite.
//!
//! - [`init_test_logging`] - once-only tracing subscriber that writes through the test
//!   harness
//! - [`CountingFs`] - a [`FileSystem`] wrapper that counts every open
//! - [`TemplateDir`] - templates written to a temporary directory
//!
//! # Example
//!
//! ```rust,no_run
//! use tessera::test_utils::CountingFs;
//! use tessera::{Engine, MemoryFs};
//!
//! let fs = CountingFs::new(MemoryFs::new().with("a", "A"));
//! let engine = Engine::new(fs.clone());
//! engine.render_to_string("a", &tera::Context::new()).unwrap();
//! assert_eq!(fs.opens("a"), 1);
//! ```

mod counting;
mod template_dir;

pub use counting::CountingFs;
pub use template_dir::TemplateDir;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honoured if present and logging stays off if not.
///
/// ```bash
/// RUST_LOG=tessera=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(true)
            .try_init();
    });
}
