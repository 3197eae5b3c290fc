use std::path::Path;
use std::process::{Command, Output};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn doclinks(project: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_doclinks"));
    cmd.args(args)
        .arg(project.join("dist"))
        .env("DOCS_LOCALES", "en,es")
        .env_remove("RUST_LOG");
    cmd.output().unwrap()
}

fn link(href: &str) -> String {
    format!("<LocalizedLink href=\"{href}\">text</LocalizedLink>\n")
}

#[test]
fn link_in_any_locale_passes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/en/a/b.md", "# B\n");
    write(dir.path(), "docs/en/index.md", &link("/a/b"));
    write(dir.path(), "docs/es/index.md", &link("/a/b"));

    let out = doclinks(dir.path(), &["links"]);
    assert!(out.status.success(), "links failed: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("0 broken of 1 targets (2 links in 3 files)"));
}

#[test]
fn broken_links_fail_the_build_with_their_count() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/en/cli/[command]/options/index.md", "");
    write(
        dir.path(),
        "docs/en/index.md",
        &[link("/cli/[name]/options"), link("/missing"), link("/old/path#setup")].concat(),
    );
    write(dir.path(), ".doclinks.toml", "[suggestions]\n\"old/path\" = \"new/path\"\n");

    let out = doclinks(dir.path(), &["links"]);
    assert!(!out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("`missing`"), "stdout: {stdout}");
    assert!(stdout.contains("- en: index.md:2"));
    assert!(stdout.contains("Did you mean `new/path#setup`?"));
    assert!(!stdout.contains("`cli/[name]/options`"));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("2 `LocalizedLink` target(s) resolve in no locale"), "stderr: {stderr}");
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/en/index.md", &[link("/x"), link("/y"), link("/x")].concat());
    write(dir.path(), "docs/es/index.md", &[link("/y"), link("/z")].concat());

    let first = doclinks(dir.path(), &["links", "--format", "json"]);
    let second = doclinks(dir.path(), &["links", "--format", "json"]);
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.status.code(), second.status.code());

    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    let targets: Vec<_> = json["broken"].as_array().unwrap().iter().map(|b| b["target"].clone()).collect();
    assert_eq!(targets, vec!["x", "y", "z"]);
    assert_eq!(json["broken"][0]["occurrences"].as_array().unwrap().len(), 2);
}

#[test]
fn all_reports_each_failed_gate() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/en/index.md", "::: tip\n:::\n");
    write(dir.path(), "docs/en/guides/install.md", "::: caution\n:::\n");
    write(dir.path(), "docs/es/index.md", &link("/guides/install"));

    let out = doclinks(dir.path(), &["all"]);
    assert!(!out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("guides/install.md"));
    assert!(stdout.contains("`::: caution`"));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("- locales"), "stderr: {stderr}");
    assert!(stderr.contains("- admonitions"));
    assert!(!stderr.contains("- links"));
}

#[test]
fn all_emits_one_json_document() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/en/index.md", "::: caution\n:::\n");
    write(dir.path(), "docs/en/cli/[command].md", "");
    write(dir.path(), "docs/en/cli/[command].paths.mjs", "");
    write(dir.path(), "docs/es/index.md", &[link("/cli/[command]"), link("/gone")].concat());

    let out = doclinks(dir.path(), &["all", "--format", "json"]);
    assert!(!out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["failed"], serde_json::json!(["links", "locales", "admonitions"]));
    assert_eq!(json["links"]["targets"], 2);
    assert_eq!(json["links"]["broken"][0]["target"], "gone");
    assert_eq!(json["locales"]["missing"][0]["locale"], "es");
    assert_eq!(json["admonitions"]["invalid"][0]["keyword"], "caution");
}

#[test]
fn unknown_locale_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/en/index.md", "");

    let out = Command::new(env!("CARGO_BIN_EXE_doclinks"))
        .arg("links")
        .arg(dir.path().join("dist"))
        .env("DOCS_LOCALES", "en,xx")
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown Locale"));
}
