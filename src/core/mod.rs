//! Error reporting shared by the library and the `tessera` binary.
//!
//! - [`TesseraError`] - application-level failures (configuration, data files, checks)
//! - [`ErrorContext`] - an error plus details and a suggestion, printed in colour
//! - [`user_friendly_error`] - turn any `anyhow::Error` into an [`ErrorContext`]
//!
//! Template failures themselves are [`crate::templating::TemplateError`];
//! [`user_friendly_error`] finds them anywhere in a cause chain.

pub mod error;

pub use error::{ErrorContext, TesseraError, user_friendly_error};
