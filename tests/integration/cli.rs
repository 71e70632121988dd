use anyhow::Result;
use predicates::prelude::*;
use tessera::test_utils::TemplateDir;

use crate::common::tessera;

fn site() -> Result<TemplateDir> {
    TemplateDir::new()?
        .with_template("layout.txt", "== {% block title %}Untitled{% endblock title %} ==")?
        .with_template(
            "page.txt",
            "{{ extends \"layout.txt\" }}\n{% block title %}{{ title }}{% endblock title %}",
        )
}

#[test]
fn test_render_to_stdout_with_json_data() -> Result<()> {
    let dir = site()?;
    dir.write_file("data.json", r#"{"title": "Welcome"}"#)?;

    tessera(dir.path())
        .args(["render", "page.txt", "--dir", "templates", "--data", "data.json"])
        .assert()
        .success()
        .stdout("== Welcome ==");
    Ok(())
}

#[test]
fn test_render_to_file_with_toml_data() -> Result<()> {
    let dir = site()?;
    dir.write_file("data.toml", "title = \"From TOML\"\n")?;

    tessera(dir.path())
        .args(["render", "page.txt", "--data", "data.toml", "--output", "out/page.txt", "--no-cache"])
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(dir.path().join("out/page.txt"))?;
    assert_eq!(written, "== From TOML ==");
    Ok(())
}

#[test]
fn test_render_missing_template() -> Result<()> {
    let dir = site()?;

    tessera(dir.path())
        .args(["render", "nope.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nope.txt"))
        .stderr(predicate::str::contains("suggestion"));
    Ok(())
}

#[test]
fn test_render_missing_template_dir() -> Result<()> {
    let dir = TemplateDir::new()?;

    tessera(dir.path())
        .args(["render", "page.txt", "--dir", "elsewhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template directory not found"));
    Ok(())
}

#[test]
fn test_render_rejects_unknown_data_format() -> Result<()> {
    let dir = site()?;
    dir.write_file("data.yaml", "title: x")?;

    tessera(dir.path())
        .args(["render", "page.txt", "--data", "data.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported data file format"));
    Ok(())
}

#[test]
fn test_config_file_supplies_dir_and_partials() -> Result<()> {
    let dir = TemplateDir::new()?
        .with_template("partials/sig.txt", "-- {{ author }}")?
        .with_template("note.txt", "Note{% include \"partials/sig.txt\" %}")?;
    dir.write_config("template_dir = \"templates\"\npartials = [\"partials/sig.txt\"]\n")?;
    dir.write_file("data.json", r#"{"author": "Robin"}"#)?;

    // Picked up from the working directory
    tessera(dir.path())
        .args(["render", "note.txt", "--data", "data.json"])
        .assert()
        .success()
        .stdout("Note-- Robin");

    // Named explicitly from elsewhere
    let config = dir.path().join("tessera.toml");
    let data = dir.path().join("data.json");
    tessera(&std::env::temp_dir())
        .arg("--config")
        .arg(&config)
        .args(["render", "note.txt", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout("Note-- Robin");
    Ok(())
}

#[test]
fn test_config_from_environment() -> Result<()> {
    let dir = site()?;
    let config = dir.write_file("conf/site.toml", "template_dir = \"../templates\"\n")?;

    tessera(dir.path())
        .env("TESSERA_CONFIG", &config)
        .args(["render", "layout.txt"])
        .assert()
        .success()
        .stdout("== Untitled ==");
    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
    let dir = site()?;
    dir.write_config("cache = \"sometimes\"\n")?;

    tessera(dir.path())
        .args(["render", "page.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn test_check_passes() -> Result<()> {
    let dir = site()?;
    dir.write_template("notes.css", "not a template {{")?;

    tessera(dir.path())
        .args(["check", "--dir", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ layout.txt"))
        .stdout(predicate::str::contains("✓ page.txt"))
        .stdout(predicate::str::contains("notes.css").not())
        .stdout(predicate::str::contains("2 template(s) compiled"));
    Ok(())
}

#[test]
fn test_check_reports_failures() -> Result<()> {
    let dir = site()?
        .with_template("broken.txt", "{% if %}")?
        .with_template("loop/a.txt", "{{ extends \"loop/b.txt\" }}\n")?
        .with_template("loop/b.txt", "{{ extends \"loop/a.txt\" }}\n")?;

    tessera(dir.path())
        .args(["check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ broken.txt"))
        .stdout(predicate::str::contains("✗ loop/a.txt"))
        .stdout(predicate::str::contains("cyclic template inheritance"))
        .stdout(predicate::str::contains("✓ page.txt"))
        .stderr(predicate::str::contains("3 of 5 template(s) failed to compile"));
    Ok(())
}

#[test]
fn test_check_json_output() -> Result<()> {
    let dir = site()?.with_template("broken.txt", "{% if %}")?;

    let output = tessera(dir.path()).args(["check", "--format", "json"]).output()?;
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["passed"], 2);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["templates"][0]["name"], "broken.txt");
    assert_eq!(report["templates"][0]["ok"], false);
    Ok(())
}

#[test]
fn test_version_flag() {
    tessera(&std::env::temp_dir())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tessera"));
}
