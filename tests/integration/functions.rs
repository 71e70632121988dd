use std::collections::HashMap;
use std::sync::Arc;

use tessera::{Engine, FunctionTable, MemoryFs, NoCache, PermanentCache};

use crate::common::context;

fn constant(value: &'static str) -> impl tera::Function {
    move |_: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> { Ok(value.into()) }
}

fn table(value: &'static str) -> FunctionTable {
    FunctionTable::new().with("version", constant(value))
}

fn templates() -> MemoryFs {
    MemoryFs::new()
        .with("base", "[{% block body %}{{ version() }}{% endblock body %}]")
        .with("child", "{{ extends \"base\" }}\n{% block body %}child {{ version() }}{% endblock body %}")
        .with("other", "other {{ version() }}")
}

/// A child compiled after the table changed still sees the table its cached parent
/// was built with
#[test]
fn test_child_of_cached_parent_keeps_parent_table() {
    let engine = Engine::new(templates())
        .with_cache(Arc::new(PermanentCache::new()))
        .with_functions(table("v1"));

    assert_eq!(engine.render_to_string("base", &context(&[])).unwrap(), "[v1]");

    engine.set_functions(table("v2"));

    assert_eq!(engine.render_to_string("child", &context(&[])).unwrap(), "[child v1]");
    assert_eq!(engine.render_to_string("other", &context(&[])).unwrap(), "other v2");
}

/// Without a cache the parent is rebuilt, so the new table applies everywhere
#[test]
fn test_uncached_chain_sees_new_table() {
    let engine = Engine::new(templates()).with_cache(Arc::new(NoCache)).with_functions(table("v1"));

    assert_eq!(engine.render_to_string("child", &context(&[])).unwrap(), "[child v1]");
    engine.set_functions(table("v2"));
    assert_eq!(engine.render_to_string("child", &context(&[])).unwrap(), "[child v2]");
}

#[test]
fn test_unknown_function_fails_at_render() {
    let engine = Engine::new(templates());

    let err = engine.render_to_string("other", &context(&[])).unwrap_err();
    assert_eq!(err.template_name(), "other");
}
