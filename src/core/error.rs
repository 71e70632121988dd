//! User-facing error reporting for the `tessera` command line.
//!
//! Library code reports failures as [`TemplateError`] (see [`crate::templating`]).
//! Application code (configuration loading, data files, the CLI) uses `anyhow` and the
//! [`TesseraError`] variants below. At the top of the binary, [`user_friendly_error`]
//! turns whatever came back into an [`ErrorContext`] with details and a suggestion,
//! which is printed in colour to stderr.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tessera::core::{ErrorContext, TesseraError, user_friendly_error};
//!
//! let ctx = ErrorContext::new(TesseraError::ConfigNotFound {
//!     path: "tessera.toml".to_string(),
//! })
//! .with_suggestion("Create a tessera.toml or pass --config");
//! ctx.display();
//!
//! let ctx = user_friendly_error(anyhow::anyhow!("something broke"));
//! println!("{ctx}");
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::TemplateError;

/// Application-level failures of the `tessera` binary.
#[derive(Error, Debug, Clone)]
pub enum TesseraError {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: String,
    },

    #[error("Invalid configuration in {file}: {reason}")]
    ConfigParseError {
        file: String,
        reason: String,
    },

    #[error("Template directory not found: {path}")]
    TemplateDirNotFound {
        path: String,
    },

    #[error("Failed to load data file {file}: {reason}")]
    DataFileError {
        file: String,
        reason: String,
    },

    #[error("Unsupported data file format: {file} (expected .json or .toml)")]
    UnsupportedDataFormat {
        file: String,
    },

    #[error("{failed} of {total} template(s) failed to compile")]
    CheckFailed {
        failed: usize,
        total: usize,
    },

    #[error("{message}")]
    Template {
        /// Template being resolved or rendered.
        name: String,
        /// The full cause chain, one cause per line.
        message: String,
        /// Whether the innermost failure was a missing template.
        not_found: bool,
        /// Whether the failure was an inheritance cycle.
        cyclic: bool,
    },

    #[error("{message}")]
    Other {
        message: String,
    },
}

impl From<&TemplateError> for TesseraError {
    fn from(error: &TemplateError) -> Self {
        TesseraError::Template {
            name: error.template_name().to_string(),
            message: error.format_chain(),
            not_found: error.is_not_found(),
            cyclic: error.is_cyclic(),
        }
    }
}

/// An error together with optional details and a suggested fix.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: TesseraError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap `error` with no suggestion or details.
    #[must_use]
    pub const fn new(error: TesseraError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion, printed in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details, printed in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for showing to a user.
///
/// Recognises, anywhere in the cause chain:
/// - [`TemplateError`] - missing templates, cycles, syntax and render failures
/// - [`TesseraError`] - configuration and data file problems
/// - [`toml::de::Error`] and [`serde_json::Error`] - malformed input files
///
/// Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(template_error) = cause.downcast_ref::<TemplateError>() {
            return create_error_context(TesseraError::from(template_error));
        }
        if let Some(tessera_error) = cause.downcast_ref::<TesseraError>() {
            return create_error_context(tessera_error.clone());
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(TesseraError::ConfigParseError {
            file: "tessera.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax: quotes around strings, matching brackets, one key per line")
        .with_details("Valid keys are template_dir, cache, partials and extensions");
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(TesseraError::DataFileError {
            file: "data".to_string(),
            reason: json_error.to_string(),
        })
        .with_suggestion("Check the JSON syntax of the data file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(TesseraError::Other {
        message,
    })
}

fn create_error_context(error: TesseraError) -> ErrorContext {
    let (suggestion, details): (String, Option<&'static str>) = match &error {
        TesseraError::ConfigNotFound {
            path,
        } => (
            format!("Create {path} or point --config at an existing file"),
            Some("Without --config, tessera reads TESSERA_CONFIG, then ./tessera.toml, then built-in defaults"),
        ),
        TesseraError::ConfigParseError {
            ..
        } => (
            "Check the TOML syntax and the value of `cache` (\"none\" or \"permanent\")".to_string(),
            None,
        ),
        TesseraError::TemplateDirNotFound {
            ..
        } => ("Pass --dir or set template_dir in tessera.toml".to_string(), None),
        TesseraError::DataFileError {
            ..
        } => ("Check that the data file exists and is valid".to_string(), None),
        TesseraError::UnsupportedDataFormat {
            ..
        } => ("Use a .json or .toml data file".to_string(), None),
        TesseraError::CheckFailed {
            ..
        } => ("Fix the templates marked ✗ above and run check again".to_string(), None),
        TesseraError::Template {
            cyclic: true,
            ..
        } => (
            "Remove the {{ extends }} line that points back into the chain".to_string(),
            Some("A template cannot inherit from itself, directly or through its parents"),
        ),
        TesseraError::Template {
            name,
            not_found: true,
            ..
        } => (
            format!("Check the spelling of '{name}' and of any parent named in its {{{{ extends }}}} line"),
            Some("Template names are relative to the template directory"),
        ),
        TesseraError::Template {
            ..
        } => (
            "Check template syntax: blocks use {% block name %}...{% endblock name %}, variables use {{ var }}"
                .to_string(),
            Some("Only the first line of a template may hold the {{ extends \"parent\" }} directive"),
        ),
        TesseraError::Other {
            ..
        } => (String::new(), None),
    };

    let mut ctx = ErrorContext::new(error);
    if !suggestion.is_empty() {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}
