//! Compiled template caches.
//!
//! The engine stores every artifact it compiles in a [`TemplateCache`] and consults it
//! before compiling. The cache is injected into the engine rather than shared through
//! global state, so two engines never see each other's templates unless they are
//! handed the same cache instance.
//!
//! Two policies are provided:
//!
//! - [`NoCache`] remembers nothing. Every render resolves the full inheritance chain
//!   again, which is what you want while editing templates.
//! - [`PermanentCache`] keeps every artifact for the lifetime of the cache instance.
//!   There is no eviction or invalidation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Name to artifact store used by the engine.
///
/// Implementations synchronise internally; the engine calls both methods from many
/// threads without holding any lock of its own on the fast path.
pub trait TemplateCache<A>: Send + Sync {
    /// Look up the artifact stored under `name`.
    fn get(&self, name: &str) -> Option<Arc<A>>;

    /// Store `artifact` under `name`, replacing any previous entry.
    fn put(&self, name: &str, artifact: Arc<A>);
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<A> TemplateCache<A> for NoCache {
    fn get(&self, _name: &str) -> Option<Arc<A>> {
        None
    }

    fn put(&self, _name: &str, _artifact: Arc<A>) {}
}

/// A cache that keeps every artifact until it is dropped.
///
/// Reads take a shared lock and writes an exclusive one, so cache hits from different
/// threads never block each other.
pub struct PermanentCache<A> {
    templates: RwLock<HashMap<String, Arc<A>>>,
}

impl<A> PermanentCache<A> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.templates.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a template called `name` has been cached.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.read().unwrap_or_else(PoisonError::into_inner).contains_key(name)
    }

    /// Cached template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.templates.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        names.sort();
        names
    }
}

impl<A> Default for PermanentCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for PermanentCache<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermanentCache").field("templates", &self.names()).finish()
    }
}

impl<A: Send + Sync> TemplateCache<A> for PermanentCache<A> {
    fn get(&self, name: &str) -> Option<Arc<A>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
    }

    fn put(&self, name: &str, artifact: Arc<A>) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), artifact);
    }
}

/// Cache policy selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Recompile on every render.
    #[serde(rename = "none", alias = "no-op", alias = "noop", alias = "off")]
    Disabled,
    /// Compile each template once.
    #[default]
    Permanent,
}

impl CachePolicy {
    /// Build a fresh cache instance implementing this policy.
    pub fn build<A: Send + Sync + 'static>(self) -> Arc<dyn TemplateCache<A>> {
        match self {
            CachePolicy::Disabled => Arc::new(NoCache),
            CachePolicy::Permanent => Arc::new(PermanentCache::new()),
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::Disabled => f.write_str("none"),
            CachePolicy::Permanent => f.write_str("permanent"),
        }
    }
}
