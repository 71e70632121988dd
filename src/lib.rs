//! Tessera - template inheritance and compile-once caching on top of Tera.
//!
//! A template may name a parent on its first line:
//!
//! ```text
//! {{ extends "layout.html" }}
//! {% block content %}Hello {{ name }}{% endblock content %}
//! ```
//!
//! The engine resolves the parent first (recursively), clones its compiled form and
//! parses the child on top, so the child's blocks replace the parent's. Compiled
//! templates are kept in a pluggable cache: [`templating::NoCache`] recompiles on every
//! render, [`templating::PermanentCache`] compiles each name once.
//!
//! # Modules
//!
//! - [`templating`] - the [`Engine`], caches, the `{{ extends }}` scanner and the
//!   backend seam with its Tera implementation
//! - [`fs`] - where template sources come from: directories, memory, layered stacks
//! - [`config`] - `tessera.toml` loading for the command line
//! - [`cli`] - the `tessera render` and `tessera check` commands
//! - [`core`] - user-facing error reporting
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera::{Engine, MemoryFs, PermanentCache};
//!
//! let fs = MemoryFs::new()
//!     .with("layout", "<main>{% block content %}{% endblock content %}</main>")
//!     .with("hello", "{{ extends \"layout\" }}\n{% block content %}Hi {{ who }}{% endblock content %}");
//!
//! let engine = Engine::new(fs).with_cache(Arc::new(PermanentCache::new()));
//!
//! let mut context = tera::Context::new();
//! context.insert("who", "there");
//! assert_eq!(engine.render_to_string("hello", &context)?, "<main>Hi there</main>");
//! # Ok::<(), tessera::TemplateError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod fs;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::EngineConfig;
pub use fs::{Dir, FileSystem, Layered, MemoryFs, TemplateFile};
pub use templating::{
    CachePolicy, Engine, FunctionTable, NoCache, PermanentCache, TemplateBackend, TemplateCache,
    TemplateError, TeraBackend,
};
