//! Template inheritance and compile-once caching.
//!
//! This module layers two things on top of a template language (Tera by default):
//!
//! - **Inheritance by directive.** A template whose first line is
//!   `{{ extends "parent.html" }}` is compiled by cloning its parent's compiled form and
//!   parsing the rest of its source on top, so its `{% block %}` definitions override
//!   the parent's. Chains may be arbitrarily deep; cycles are reported as errors.
//! - **Pluggable caching.** Compiled templates are stored in an injected
//!   [`TemplateCache`]. [`PermanentCache`] compiles each name once per cache instance,
//!   [`NoCache`] recompiles on every render.
//!
//! # Example
//!
//! `layout.html`:
//!
//! ```text
//! <html><body>{% block content %}default{% endblock content %}</body></html>
//! ```
//!
//! `article.html`:
//!
//! ```text
//! {{ extends "layout.html" }}
//! {% block content %}<article>{{ title }}</article>{% endblock content %}
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tessera::fs::Dir;
//! use tessera::templating::{Engine, PermanentCache};
//!
//! let engine = Engine::new(Dir::new("templates")).with_cache(Arc::new(PermanentCache::new()));
//!
//! let mut context = tera::Context::new();
//! context.insert("title", "Hello");
//! engine.render("article.html", &context, &mut std::io::stdout())?;
//! # Ok::<(), tessera::templating::TemplateError>(())
//! ```
//!
//! # Syntax notes
//!
//! The `{{ extends }}` line is consumed by the engine and never reaches Tera. Tera's
//! own `{% extends %}` tag should not be used in templates loaded through the engine.
//! Partials configured with [`Engine::set_partials`] can be pulled in with
//! `{% include "name" %}` from any template.

pub mod backend;
pub mod cache;
mod engine;
pub mod error;
pub mod extends;

pub use backend::{BackendError, FunctionTable, TemplateBackend, TeraArtifact, TeraBackend};
pub use cache::{CachePolicy, NoCache, PermanentCache, TemplateCache};
pub use engine::{Engine, SharedCache};
pub use error::TemplateError;
pub use extends::{ExtendsDirective, parse_extends};
