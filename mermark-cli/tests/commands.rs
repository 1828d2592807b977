use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn check_passes_for_canonical_markdown() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "# Title\n\n- a\n  - b\n\n```mermaid\nA --> B\n```\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("check").arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stable"));
}

#[test]
fn check_reports_drift() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    // `*` bullets come back as `-`
    fs::write(&input, "* a\n* b\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("check").arg(&input);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("line 1:").and(predicate::str::contains("+ - a")));
}

#[test]
fn slug_prints_heading_anchor() {
    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("slug").arg("Getting Started!");
    cmd.assert().success().stdout("getting-started\n");

    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("slug").arg("Two").arg("Words");
    cmd.assert().success().stdout("two-words\n");
}

#[test]
fn line_ending_detection() {
    let dir = tempdir().unwrap();
    let crlf = dir.path().join("crlf.md");
    let lf = dir.path().join("lf.md");
    fs::write(&crlf, "a\r\nb\r\n").unwrap();
    fs::write(&lf, "a\nb\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("line-ending").arg(&crlf);
    cmd.assert().success().stdout("crlf\n");

    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("line-ending").arg(&lf);
    cmd.assert().success().stdout("lf\n");
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.arg("--list-formats");

    cmd.assert().success().stdout(
        predicate::str::contains("html")
            .and(predicate::str::contains("markdown"))
            .and(predicate::str::contains("ir-outline")),
    );
}

#[test]
fn no_arguments_prints_help() {
    let mut cmd = cargo_bin_cmd!("mermark");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
