//! Common helpers for the tessera integration tests.

// Not every helper is used by every test module
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use assert_cmd::Command;
use tessera::test_utils::CountingFs;
use tessera::{Engine, MemoryFs, PermanentCache, TeraBackend};

pub type Artifact = <TeraBackend as tessera::TemplateBackend>::Artifact;

/// A child extending a parent, the smallest inheritance chain.
pub fn parent_and_child() -> MemoryFs {
    MemoryFs::new()
        .with("parent.txt", "<{% block body %}parent{% endblock body %}>")
        .with("child.txt", "{{ extends \"parent.txt\" }}\n{% block body %}child{% endblock body %}")
}

/// An engine over `fs` with open counting and a permanent cache it shares with the
/// caller.
pub fn counted_permanent(
    fs: MemoryFs,
) -> (Engine, CountingFs<MemoryFs>, Arc<PermanentCache<Artifact>>) {
    let counting = CountingFs::new(fs);
    let cache = Arc::new(PermanentCache::new());
    let engine = Engine::new(counting.clone()).with_cache(cache.clone());
    (engine, counting, cache)
}

pub fn context(pairs: &[(&str, &str)]) -> tera::Context {
    let mut context = tera::Context::new();
    for (key, value) in pairs {
        context.insert(*key, value);
    }
    context
}

/// The `tessera` binary running in `dir`, isolated from any outside configuration.
pub fn tessera(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.current_dir(dir)
        .env_remove("TESSERA_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}
