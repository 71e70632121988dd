//! Errors raised while resolving and rendering templates.
//!
//! Every variant names the template that was being resolved or rendered when the
//! failure happened and keeps the originating cause reachable through
//! [`std::error::Error::source`]. Failures while resolving a parent are wrapped once
//! per inheritance level, so the chain reads from the requested template down to the
//! one that actually broke.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use super::backend::BackendError;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to open template '{name}'")]
    FileOpen {
        name: String,
        source: io::Error,
    },

    #[error("failed to read template '{name}' contents")]
    FileRead {
        name: String,
        source: io::Error,
    },

    #[error("failed to resolve parent template '{parent}' for '{name}'")]
    ParentResolution {
        name: String,
        parent: String,
        source: Box<TemplateError>,
    },

    #[error("failed to clone parent template '{parent}' for '{name}'")]
    ParentClone {
        name: String,
        parent: String,
        source: BackendError,
    },

    #[error("failed to parse template '{name}'")]
    Parse {
        name: String,
        source: BackendError,
    },

    #[error("failed to execute template '{name}'")]
    Execution {
        name: String,
        source: BackendError,
    },

    #[error("failed to load partial '{partial}' for '{name}'")]
    PartialLoad {
        name: String,
        partial: String,
        source: Box<TemplateError>,
    },

    #[error("cyclic template inheritance: {}", chain.join(" -> "))]
    CyclicInheritance {
        /// Names in resolution order, ending with the name that repeated.
        chain: Vec<String>,
    },
}

impl TemplateError {
    /// The template being resolved or rendered when this error was raised.
    pub fn template_name(&self) -> &str {
        match self {
            TemplateError::FileOpen {
                name,
                ..
            }
            | TemplateError::FileRead {
                name,
                ..
            }
            | TemplateError::ParentResolution {
                name,
                ..
            }
            | TemplateError::ParentClone {
                name,
                ..
            }
            | TemplateError::Parse {
                name,
                ..
            }
            | TemplateError::Execution {
                name,
                ..
            }
            | TemplateError::PartialLoad {
                name,
                ..
            } => name,
            TemplateError::CyclicInheritance {
                chain,
            } => chain.last().map(String::as_str).unwrap_or_default(),
        }
    }

    /// The innermost engine error, looking through parent and partial wrappers.
    ///
    /// For a child whose grandparent is missing this is the grandparent's
    /// [`TemplateError::FileOpen`].
    pub fn root_cause(&self) -> &TemplateError {
        let mut current = self;
        loop {
            match current {
                TemplateError::ParentResolution {
                    source,
                    ..
                }
                | TemplateError::PartialLoad {
                    source,
                    ..
                } => current = source.as_ref(),
                _ => return current,
            }
        }
    }

    /// Whether the failure was caused by an inheritance cycle.
    pub fn is_cyclic(&self) -> bool {
        matches!(self.root_cause(), TemplateError::CyclicInheritance { .. })
    }

    /// Whether the failure was caused by a template that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root_cause(),
            TemplateError::FileOpen { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }

    /// Render this error and all of its causes on one line each.
    pub fn format_chain(&self) -> String {
        let mut msg = self.to_string();
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            msg.push_str("\n  caused by: ");
            msg.push_str(&err.to_string());
            cause = err.source();
        }
        msg
    }
}
