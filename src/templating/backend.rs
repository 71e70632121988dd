//! The template language underneath the engine.
//!
//! The engine owns inheritance resolution and caching, but knows nothing about tag
//! syntax, expressions or escaping. Those belong to a [`TemplateBackend`], which turns
//! source text into compiled artifacts, clones them, and executes them. [`TeraBackend`]
//! is the stock implementation on top of Tera.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tera::{Context as TeraContext, Tera};

/// Error type produced by backends.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Compiles, clones and executes templates for the engine.
///
/// # Contract
///
/// - [`empty`](TemplateBackend::empty) creates an artifact bound to a snapshot of the
///   given function table. Later changes to the table never reach it.
/// - [`parse`](TemplateBackend::parse) on a fresh artifact is a first parse. On an
///   artifact obtained from [`clone_artifact`](TemplateBackend::clone_artifact) it layers
///   the new source on top of what is already there, so block definitions in the new
///   source override the parent's.
/// - [`clone_artifact`](TemplateBackend::clone_artifact) must produce an independent
///   copy: parsing into the clone never changes the original.
/// - Artifacts are immutable once handed to the cache and must be safe to execute from
///   several threads at once.
pub trait TemplateBackend: Send + Sync + 'static {
    /// Compiled template representation.
    type Artifact: Send + Sync + 'static;
    /// Table of functions callable from templates.
    type Functions: Clone + Default + Send + Sync + 'static;
    /// Data the template is executed against.
    type Context;

    /// Create an empty artifact bound to `functions`.
    fn empty(&self, functions: &Self::Functions) -> Self::Artifact;

    /// Register `source` under `name` as a helper template without changing which
    /// template the artifact executes.
    fn define(
        &self,
        artifact: &mut Self::Artifact,
        name: &str,
        source: &str,
    ) -> Result<(), BackendError>;

    /// Parse `source` as the template `name` and make it the artifact's entry point.
    fn parse(
        &self,
        artifact: &mut Self::Artifact,
        name: &str,
        source: &str,
    ) -> Result<(), BackendError>;

    /// Produce an independent copy of `artifact`.
    fn clone_artifact(&self, artifact: &Self::Artifact) -> Result<Self::Artifact, BackendError>;

    /// Execute the artifact's entry point against `context`, streaming into `out`.
    fn execute(
        &self,
        artifact: &Self::Artifact,
        context: &Self::Context,
        out: &mut dyn Write,
    ) -> Result<(), BackendError>;
}

/// Named functions made available to templates.
///
/// The table is cheap to clone; functions are shared behind `Arc`.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use tessera::templating::FunctionTable;
///
/// let functions = FunctionTable::new().with(
///     "shout",
///     |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
///         let text = args.get("text").and_then(|v| v.as_str()).unwrap_or_default();
///         Ok(tera::Value::String(text.to_uppercase()))
///     },
/// );
/// assert!(functions.contains("shout"));
/// ```
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<String, Arc<dyn tera::Function>>,
}

impl FunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FunctionTable::insert`].
    #[must_use]
    pub fn with<F: tera::Function + 'static>(mut self, name: impl Into<String>, function: F) -> Self {
        self.insert(name, function);
        self
    }

    /// Add or replace the function called `name`.
    pub fn insert<F: tera::Function + 'static>(&mut self, name: impl Into<String>, function: F) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Whether a function called `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Function names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Adapter registering a shared function into a Tera instance.
struct SharedFunction(Arc<dyn tera::Function>);

impl tera::Function for SharedFunction {
    fn call(&self, args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        self.0.call(args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

/// A compiled template set produced by [`TeraBackend`].
///
/// Holds one Tera instance containing the entry template, every ancestor it inherits
/// from, and any partials registered when the root of the chain was created.
#[derive(Clone)]
pub struct TeraArtifact {
    tera: Tera,
    entry: Option<String>,
}

impl TeraArtifact {
    /// Name of the template executed by this artifact.
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// Whether the artifact contains a template called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

impl fmt::Debug for TeraArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        f.debug_struct("TeraArtifact").field("entry", &self.entry).field("templates", &names).finish()
    }
}

/// [`TemplateBackend`] implemented with Tera.
///
/// Inheritance is expressed with Tera's own block mechanism: a layered parse registers
/// the child as `{% extends "<parent>" %}` followed by the child body, so `{% block %}`
/// definitions in the child replace the parent's. Autoescaping follows Tera defaults,
/// which escape templates whose names end in `.html`, `.htm` or `.xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraBackend;

impl TemplateBackend for TeraBackend {
    type Artifact = TeraArtifact;
    type Functions = FunctionTable;
    type Context = TeraContext;

    fn empty(&self, functions: &FunctionTable) -> TeraArtifact {
        let mut tera = Tera::default();
        for (name, function) in &functions.functions {
            tera.register_function(name, SharedFunction(function.clone()));
        }
        TeraArtifact {
            tera,
            entry: None,
        }
    }

    fn define(&self, artifact: &mut TeraArtifact, name: &str, source: &str) -> Result<(), BackendError> {
        artifact.tera.add_raw_template(name, source)?;
        Ok(())
    }

    fn parse(&self, artifact: &mut TeraArtifact, name: &str, source: &str) -> Result<(), BackendError> {
        match artifact.entry.as_deref() {
            Some(parent) => {
                // Kept on the same line so Tera's line numbers match the child source.
                let layered = format!("{{% extends \"{parent}\" %}}{source}");
                artifact.tera.add_raw_template(name, &layered)?;
            }
            None => artifact.tera.add_raw_template(name, source)?,
        }
        artifact.entry = Some(name.to_string());
        Ok(())
    }

    fn clone_artifact(&self, artifact: &TeraArtifact) -> Result<TeraArtifact, BackendError> {
        Ok(artifact.clone())
    }

    fn execute(
        &self,
        artifact: &TeraArtifact,
        context: &TeraContext,
        out: &mut dyn Write,
    ) -> Result<(), BackendError> {
        let entry = artifact.entry.as_deref().ok_or("artifact has no entry template to execute")?;
        artifact.tera.render_to(entry, context, out)?;
        Ok(())
    }
}
