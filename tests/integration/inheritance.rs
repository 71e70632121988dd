use anyhow::Result;
use tessera::test_utils::{CountingFs, TemplateDir};
use tessera::{Engine, MemoryFs, TemplateError};

use crate::common::{context, counted_permanent};

#[test]
fn test_render_from_directory() -> Result<()> {
    let dir = TemplateDir::new()?
        .with_template(
            "layout.html",
            "<title>{% block title %}Site{% endblock title %}</title>\
             <main>{% block content %}{% endblock content %}</main>",
        )?
        .with_template(
            "blog/post.html",
            "{{ extends \"layout.html\" }}\n\
             {% block title %}{{ title }}{% endblock title %}\
             {% block content %}<p>{{ body }}</p>{% endblock content %}",
        )?;
    let engine = Engine::new(dir.fs());

    let out = engine.render_to_string("blog/post.html", &context(&[("title", "Hi"), ("body", "text")]))?;
    assert_eq!(out, "<title>Hi</title><main><p>text</p></main>");
    Ok(())
}

#[test]
fn test_crlf_directive_line() -> Result<()> {
    let fs = MemoryFs::new()
        .with("base", "({% block b %}base{% endblock b %})")
        .with("page", "{{ extends \"base\" }}  \r\n{% block b %}page{% endblock b %}");
    let engine = Engine::new(fs);

    assert_eq!(engine.render_to_string("page", &context(&[]))?, "(page)");
    Ok(())
}

#[test]
fn test_compact_directive() -> Result<()> {
    let fs = MemoryFs::new()
        .with("base", "({% block b %}base{% endblock b %})")
        .with("page", "{{extends \"base\"}}\n{% block b %}page{% endblock b %}");
    let engine = Engine::new(fs);

    assert_eq!(engine.render_to_string("page", &context(&[]))?, "(page)");
    Ok(())
}

/// Only the first line can name a parent; elsewhere the text is ordinary template
/// content and the template compiles on its own
#[test]
fn test_directive_off_first_line_is_not_inheritance() -> Result<()> {
    let fs = CountingFs::new(
        MemoryFs::new()
            .with("x", "{% block b %}parent{% endblock b %}")
            .with(
                "late",
                "first line\n{% raw %}{{ extends \"x\" }}{% endraw %}\n{% block b %}late{% endblock b %}",
            ),
    );
    let engine = Engine::new(fs.clone());

    let out = engine.render_to_string("late", &context(&[]))?;
    assert_eq!(out, "first line\n{{ extends \"x\" }}\nlate");
    assert_eq!(fs.opens("x"), 0);
    Ok(())
}

/// Outside `raw`, a late directive reaches Tera as-is. It is not valid Tera expression
/// syntax, so compiling fails without ever looking for the parent
#[test]
fn test_unescaped_late_directive_fails_in_template() {
    let fs = CountingFs::new(
        MemoryFs::new()
            .with("x", "{% block b %}parent{% endblock b %}")
            .with("late", "first line\n{{ extends \"x\" }}\n{% block b %}late{% endblock b %}"),
    );
    let engine = Engine::new(fs.clone());

    let err = engine.render_to_string("late", &context(&[])).unwrap_err();
    assert!(!matches!(err, TemplateError::ParentResolution { .. }));
    assert_eq!(err.template_name(), "late");
    assert_eq!(fs.opens("x"), 0);
}

/// A first line with no line break after it is not a directive
#[test]
fn test_unterminated_directive_is_not_inheritance() {
    let fs = CountingFs::new(MemoryFs::new().with("only", "{{ extends \"x\" }}"));
    let engine = Engine::new(fs.clone());

    assert!(engine.prepare("only").is_err());
    assert_eq!(fs.opens("x"), 0);
}

#[test]
fn test_deep_chain_uses_nearest_override() -> Result<()> {
    let mut fs = MemoryFs::new().with("level0", "{% block a %}0{% endblock a %}");
    for i in 1..=8 {
        fs = fs.with(
            format!("level{i}"),
            format!("{{{{ extends \"level{}\" }}}}\n{{% block a %}}{i}{{% endblock a %}}", i - 1),
        );
    }
    let (engine, counting, cache) = counted_permanent(fs);

    assert_eq!(engine.render_to_string("level8", &context(&[]))?, "8");
    assert_eq!(counting.total_opens(), 9);
    assert_eq!(cache.len(), 9);

    assert_eq!(engine.render_to_string("level3", &context(&[]))?, "3");
    assert_eq!(counting.total_opens(), 9);
    Ok(())
}

#[test]
fn test_child_inherits_unoverridden_blocks() -> Result<()> {
    let fs = MemoryFs::new()
        .with("base", "{% block a %}A{% endblock a %}-{% block b %}B{% endblock b %}")
        .with("child", "{{ extends \"base\" }}\n{% block b %}b{{ super() }}{% endblock b %}");
    let engine = Engine::new(fs);

    assert_eq!(engine.render_to_string("child", &context(&[]))?, "A-bB");
    Ok(())
}

#[test]
fn test_missing_grandparent_error_chain() {
    let fs = MemoryFs::new()
        .with("child", "{{ extends \"parent\" }}\n")
        .with("parent", "{{ extends \"grandparent\" }}\n");
    let engine = Engine::new(fs);

    let err = engine.prepare("child").unwrap_err();
    assert_eq!(err.template_name(), "child");
    assert_eq!(err.root_cause().template_name(), "grandparent");
    assert!(err.is_not_found());

    let text = err.format_chain();
    assert!(text.contains("failed to resolve parent template 'parent' for 'child'"));
    assert!(text.contains("failed to resolve parent template 'grandparent' for 'parent'"));
    assert!(text.contains("failed to open template 'grandparent'"));
}

#[test]
fn test_empty_parent_name_fails_resolution() {
    let fs = MemoryFs::new().with("page", "{{ extends \"\" }}\nbody");
    let engine = Engine::new(fs);

    match engine.prepare("page").unwrap_err() {
        TemplateError::ParentResolution {
            parent,
            ..
        } => assert_eq!(parent, ""),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_three_template_cycle() {
    let fs = MemoryFs::new()
        .with("a", "{{ extends \"b\" }}\n")
        .with("b", "{{ extends \"c\" }}\n")
        .with("c", "{{ extends \"a\" }}\n");
    let (engine, _counting, cache) = counted_permanent(fs);

    let err = engine.prepare("b").unwrap_err();
    match err.root_cause() {
        TemplateError::CyclicInheritance {
            chain,
        } => assert_eq!(chain, &["b", "c", "a", "b"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn test_directory_escape_is_rejected() -> Result<()> {
    let dir = TemplateDir::new()?.with_template("page.html", "{{ extends \"../secret.html\" }}\n")?;
    dir.write_file("secret.html", "secret")?;
    let engine = Engine::new(dir.fs());

    let err = engine.prepare("page.html").unwrap_err();
    assert!(matches!(err.root_cause(), TemplateError::FileOpen { name, .. } if name == "../secret.html"));
    Ok(())
}

#[test]
fn test_html_is_escaped_by_extension() -> Result<()> {
    let fs = MemoryFs::new().with("a.html", "{{ v }}").with("a.txt", "{{ v }}");
    let engine = Engine::new(fs);
    let data = context(&[("v", "<b>")]);

    assert_eq!(engine.render_to_string("a.html", &data)?, "&lt;b&gt;");
    assert_eq!(engine.render_to_string("a.txt", &data)?, "<b>");
    Ok(())
}
