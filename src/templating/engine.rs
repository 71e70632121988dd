//! Inheritance resolution, caching and rendering.
//!
//! [`Engine`] turns a template name into a compiled artifact and executes it. The
//! steps for a name that is not cached yet:
//!
//! 1. Look the name up in the cache without locking. A hit is executed immediately.
//! 2. Take the engine-wide compile lock and look again, since another thread may have
//!    finished the same compilation while this one waited.
//! 3. Open and read the source through the [`FileSystem`].
//! 4. If the first line is an `{{ extends "parent" }}` directive, resolve the parent
//!    with these same steps (still under the lock), clone its artifact and parse the
//!    rest of the source on top of it. Otherwise start from an empty artifact bound to
//!    the current function table, with the configured partials loaded into it.
//! 5. Store the result in the cache.
//!
//! # Concurrency
//!
//! One lock serialises every compilation across all names. That gives two guarantees:
//! a name is compiled at most once per cache instance, and no reader ever sees a
//! half-built inheritance chain. Compiling unrelated templates concurrently is not
//! possible, but executing cached templates never touches the lock.
//!
//! [`Engine::set_functions`], [`Engine::set_cache`] and [`Engine::set_partials`]
//! take the same lock, so reconfiguring never races with a resolution in progress.
//!
//! # Function table binding
//!
//! A root template (one without a parent) captures the function table configured at
//! the moment it is compiled. Children clone their parent and therefore keep the
//! parent's table. Changing the table later affects only templates compiled after the
//! change; cached artifacts keep the table they were built with.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::backend::{FunctionTable, TemplateBackend, TeraBackend};
use super::cache::{NoCache, TemplateCache};
use super::error::TemplateError;
use super::extends::parse_extends;
use crate::fs::{FileSystem, OpenedTemplate};

/// Shared handle to a cache of `B`'s artifacts.
pub type SharedCache<B> = Arc<dyn TemplateCache<<B as TemplateBackend>::Artifact>>;

/// Configuration read while compiling. Guarded by the compile lock.
struct CompileSettings<F> {
    functions: F,
    partials: Vec<String>,
}

/// Template engine with inheritance and pluggable caching.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use tessera::fs::MemoryFs;
/// use tessera::templating::{Engine, PermanentCache};
///
/// let fs = MemoryFs::new()
///     .with("base.txt", "<{% block body %}base{% endblock body %}>")
///     .with("page.txt", "{{ extends \"base.txt\" }}\n{% block body %}page{% endblock body %}");
///
/// let engine = Engine::new(fs).with_cache(Arc::new(PermanentCache::new()));
/// let out = engine.render_to_string("page.txt", &tera::Context::new())?;
/// assert_eq!(out, "<page>");
/// # Ok::<(), tessera::templating::TemplateError>(())
/// ```
pub struct Engine<B: TemplateBackend = TeraBackend> {
    fs: Box<dyn FileSystem>,
    backend: B,
    compile: Mutex<CompileSettings<B::Functions>>,
    cache: RwLock<SharedCache<B>>,
}

impl Engine<TeraBackend> {
    /// Create a Tera-backed engine reading from `fs`.
    ///
    /// The engine starts with an empty function table, no partials and [`NoCache`],
    /// so nothing is shared with other engines until a cache is configured.
    pub fn new(fs: impl FileSystem + 'static) -> Self {
        Self::configure(fs, TeraBackend, FunctionTable::new(), Arc::new(NoCache))
    }
}

impl<B: TemplateBackend> Engine<B> {
    /// Create an engine with every collaborator supplied explicitly.
    pub fn configure(
        fs: impl FileSystem + 'static,
        backend: B,
        functions: B::Functions,
        cache: SharedCache<B>,
    ) -> Self {
        Self {
            fs: Box::new(fs),
            backend,
            compile: Mutex::new(CompileSettings {
                functions,
                partials: Vec::new(),
            }),
            cache: RwLock::new(cache),
        }
    }

    /// Builder form of [`Engine::set_cache`].
    #[must_use]
    pub fn with_cache(self, cache: SharedCache<B>) -> Self {
        self.set_cache(cache);
        self
    }

    /// Builder form of [`Engine::set_functions`].
    #[must_use]
    pub fn with_functions(self, functions: B::Functions) -> Self {
        self.set_functions(functions);
        self
    }

    /// Builder form of [`Engine::set_partials`].
    #[must_use]
    pub fn with_partials<I, S>(self, partials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_partials(partials);
        self
    }

    /// Replace the function table used for templates compiled from now on.
    ///
    /// Already compiled templates, and children later cloned from them, keep the
    /// table that was active when their root was compiled.
    pub fn set_functions(&self, functions: B::Functions) {
        let mut settings = self.lock_compile();
        settings.functions = functions;
        tracing::debug!("function table replaced");
    }

    /// Replace the cache policy.
    ///
    /// Waits for any compilation in progress to finish. Renders already past their
    /// cache lookup complete against the artifact they found.
    pub fn set_cache(&self, cache: SharedCache<B>) {
        let _settings = self.lock_compile();
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = cache;
        tracing::debug!("cache policy replaced");
    }

    /// Replace the partial templates loaded into every root template compiled from
    /// now on.
    ///
    /// Partials are read through the engine's [`FileSystem`] and registered under
    /// their own names, so templates can include them.
    pub fn set_partials<I, S>(&self, partials: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut settings = self.lock_compile();
        settings.partials = partials.into_iter().map(Into::into).collect();
        tracing::debug!(count = settings.partials.len(), "partials replaced");
    }

    /// Resolve the compiled artifact for `name`, compiling it if necessary.
    pub fn prepare(&self, name: &str) -> Result<Arc<B::Artifact>, TemplateError> {
        if let Some(artifact) = self.current_cache().get(name) {
            tracing::trace!(template = name, "cache hit");
            return Ok(artifact);
        }

        let settings = self.lock_compile();
        // Re-read under the lock: the policy may have been swapped while we waited.
        let cache = self.current_cache();
        let mut chain = Vec::new();
        self.resolve_locked(name, &settings, cache.as_ref(), &mut chain)
    }

    /// Render `name` against `data`, streaming the output into `out`.
    ///
    /// On an execution failure, output written before the failure stays in `out`.
    pub fn render(
        &self,
        name: &str,
        data: &B::Context,
        out: &mut dyn Write,
    ) -> Result<(), TemplateError> {
        let artifact = self.prepare(name)?;
        self.backend.execute(&artifact, data, out).map_err(|source| TemplateError::Execution {
            name: name.to_string(),
            source,
        })
    }

    /// Render `name` into a `String`.
    pub fn render_to_string(&self, name: &str, data: &B::Context) -> Result<String, TemplateError> {
        let mut out = Vec::new();
        self.render(name, data, &mut out)?;
        String::from_utf8(out).map_err(|e| TemplateError::Execution {
            name: name.to_string(),
            source: Box::new(e),
        })
    }

    fn lock_compile(&self) -> MutexGuard<'_, CompileSettings<B::Functions>> {
        self.compile.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_cache(&self) -> SharedCache<B> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Steps 2-5 of the resolution. The caller holds the compile lock.
    ///
    /// `chain` holds the names whose resolution is in progress on this call path.
    fn resolve_locked(
        &self,
        name: &str,
        settings: &CompileSettings<B::Functions>,
        cache: &dyn TemplateCache<B::Artifact>,
        chain: &mut Vec<String>,
    ) -> Result<Arc<B::Artifact>, TemplateError> {
        if let Some(artifact) = cache.get(name) {
            tracing::trace!(template = name, "cache hit after waiting for compile lock");
            return Ok(artifact);
        }

        if chain.iter().any(|n| n == name) {
            let mut cycle = chain.clone();
            cycle.push(name.to_string());
            return Err(TemplateError::CyclicInheritance {
                chain: cycle,
            });
        }

        let source = self.read_source(name)?;

        chain.push(name.to_string());
        let compiled = self.compile_source(name, &source, settings, cache, chain);
        chain.pop();

        let artifact = Arc::new(compiled?);
        cache.put(name, artifact.clone());
        tracing::debug!(template = name, "compiled template");
        Ok(artifact)
    }

    fn compile_source(
        &self,
        name: &str,
        source: &str,
        settings: &CompileSettings<B::Functions>,
        cache: &dyn TemplateCache<B::Artifact>,
        chain: &mut Vec<String>,
    ) -> Result<B::Artifact, TemplateError> {
        let (mut artifact, body) = match parse_extends(source) {
            Some(directive) => {
                tracing::debug!(template = name, parent = directive.parent, "resolving parent");
                let parent = self
                    .resolve_locked(directive.parent, settings, cache, chain)
                    .map_err(|e| TemplateError::ParentResolution {
                        name: name.to_string(),
                        parent: directive.parent.to_string(),
                        source: Box::new(e),
                    })?;
                let artifact = self.backend.clone_artifact(&parent).map_err(|source| {
                    TemplateError::ParentClone {
                        name: name.to_string(),
                        parent: directive.parent.to_string(),
                        source,
                    }
                })?;
                (artifact, directive.body)
            }
            None => {
                let mut artifact = self.backend.empty(&settings.functions);
                self.load_partials(name, &mut artifact, &settings.partials)?;
                (artifact, source)
            }
        };

        self.backend.parse(&mut artifact, name, body).map_err(|source| TemplateError::Parse {
            name: name.to_string(),
            source,
        })?;
        Ok(artifact)
    }

    fn load_partials(
        &self,
        name: &str,
        artifact: &mut B::Artifact,
        partials: &[String],
    ) -> Result<(), TemplateError> {
        for partial in partials {
            let wrap = |e: TemplateError| TemplateError::PartialLoad {
                name: name.to_string(),
                partial: partial.clone(),
                source: Box::new(e),
            };

            let source = self.read_source(partial).map_err(wrap)?;
            self.backend
                .define(artifact, partial, &source)
                .map_err(|source| TemplateError::Parse {
                    name: partial.clone(),
                    source,
                })
                .map_err(wrap)?;
        }
        Ok(())
    }

    fn read_source(&self, name: &str) -> Result<String, TemplateError> {
        let mut opened =
            OpenedTemplate::open(self.fs.as_ref(), name).map_err(|source| TemplateError::FileOpen {
                name: name.to_string(),
                source,
            })?;
        opened.read_to_string().map_err(|source| TemplateError::FileRead {
            name: name.to_string(),
            source,
        })
    }
}
