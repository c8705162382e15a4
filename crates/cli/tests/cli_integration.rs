//! CLI integration tests for the `llmstxt` binary.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to `fixtures/` resolve.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn llmstxt() -> Command {
    let mut cmd = cargo_bin_cmd!("llmstxt");
    cmd.current_dir(workspace_root());
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.output().expect("run llmstxt");
    serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&out.stdout)
        )
    })
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    llmstxt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("llms.txt parser and validator"));
}

#[test]
fn version_exits_0() {
    llmstxt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("llmstxt"));
}

#[test]
fn unknown_subcommand_fails() {
    llmstxt().arg("lint").assert().failure();
}

// ──────────────────────────────────────────────
// 2. parse
// ──────────────────────────────────────────────

#[test]
fn parse_clean_fixture_succeeds() {
    llmstxt()
        .args(["parse", "fixtures/demo.llms.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Index document, 3 section(s), 5 entries"))
        .stdout(predicate::str::contains("## Optional (optional)"));
}

#[test]
fn parse_broken_fixture_lists_diagnostics_and_fails() {
    llmstxt()
        .args(["parse", "fixtures/broken.llms.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[E004]"))
        .stdout(predicate::str::contains("[W002]"));
}

#[test]
fn parse_json_emits_document_tree() {
    let v = json_stdout(llmstxt().args(["--output", "json", "parse", "fixtures/demo.llms.txt"]));
    assert_eq!(v["title"], "Acme SDK");
    assert_eq!(v["document_type"], "index");
    assert_eq!(v["sections"].as_array().unwrap().len(), 3);
    assert_eq!(v["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn parse_missing_file_reports_error() {
    llmstxt()
        .args(["parse", "fixtures/nope.llms.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn json_errors_are_objects_on_stderr() {
    let out = llmstxt()
        .args(["--output", "json", "parse", "fixtures/nope.llms.txt"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let err: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert!(err["error"].as_str().unwrap().contains("nope.llms.txt"));
}

#[test]
fn quiet_suppresses_error_text() {
    llmstxt()
        .args(["--quiet", "parse", "fixtures/nope.llms.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. validate
// ──────────────────────────────────────────────

#[test]
fn validate_demo_with_schema_at_level_four() {
    llmstxt()
        .args([
            "validate",
            "fixtures/demo.llms.txt",
            "--schema",
            "fixtures/demo.schema.json",
            "--level",
            "4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid at L4 (extended)"));
}

#[test]
fn validate_reports_referential_errors() {
    llmstxt()
        .args([
            "validate",
            "fixtures/demo.llms.txt",
            "--schema",
            "fixtures/broken.schema.json",
            "--level",
            "3",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("ledger"))
        .stdout(predicate::str::contains("invalid at L3"));
}

#[test]
fn validate_json_output_has_result_shape() {
    let v = json_stdout(llmstxt().args([
        "--output",
        "json",
        "validate",
        "fixtures/demo.llms.txt",
        "--schema",
        "fixtures/broken.schema.json",
        "--level",
        "3",
        "--mode",
        "collect-all",
    ]));
    assert_eq!(v["valid"], false);
    assert_eq!(v["level"], 3);
    assert_eq!(v["mode"], "collect-all");
    assert!(v["model"].is_null());
    let kinds: Vec<&str> = v["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["self_reference", "unresolved_reference"]);
}

#[test]
fn fail_fast_reports_one_error() {
    let v = json_stdout(llmstxt().args([
        "--output",
        "json",
        "validate",
        "fixtures/broken.llms.txt",
        "--level",
        "2",
        "--mode",
        "fail-fast",
    ]));
    assert_eq!(v["errors"].as_array().unwrap().len(), 1);
    assert_eq!(v["errors"][0]["code"], "E004");
}

#[test]
fn warn_only_turns_parse_errors_into_warnings() {
    llmstxt()
        .args([
            "validate",
            "fixtures/broken.llms.txt",
            "--level",
            "2",
            "--mode",
            "warn-only",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: line 1: [E004]"));
}

#[test]
fn unsupported_schema_version_fails_even_in_warn_only() {
    llmstxt()
        .args([
            "validate",
            "fixtures/demo.llms.txt",
            "--schema",
            "fixtures/unsupported.schema.json",
            "--mode",
            "warn-only",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("2.0.0"));
}

#[test]
fn level_out_of_range_is_rejected() {
    llmstxt()
        .args(["validate", "fixtures/demo.llms.txt", "--level", "5"])
        .assert()
        .failure();
}

#[test]
fn unknown_mode_is_rejected() {
    llmstxt()
        .args(["validate", "fixtures/demo.llms.txt", "--mode", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'sometimes'"))
        .stderr(predicate::str::contains("warn-only"));
}

#[test]
fn schema_that_is_not_json_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    llmstxt()
        .args(["validate", "fixtures/demo.llms.txt", "--schema"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

// ──────────────────────────────────────────────
// 4. Configuration
// ──────────────────────────────────────────────

#[test]
fn config_file_sets_level() {
    let v = json_stdout(llmstxt().args([
        "--output",
        "json",
        "validate",
        "fixtures/demo.llms.txt",
        "--config",
        "fixtures/llmstxt.toml",
    ]));
    assert_eq!(v["level"], 3);
    assert_eq!(v["mode"], "collect-all");
}

#[test]
fn flags_override_config_file() {
    let v = json_stdout(llmstxt().args([
        "--output",
        "json",
        "validate",
        "fixtures/demo.llms.txt",
        "--config",
        "fixtures/llmstxt.toml",
        "--level",
        "1",
        "--mode",
        "warn-only",
    ]));
    assert_eq!(v["level"], 1);
    assert_eq!(v["mode"], "warn-only");
}

#[test]
fn config_in_working_directory_is_picked_up() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("llmstxt.toml"), "level = 0\nmode = \"fail-fast\"\n").unwrap();
    let doc = workspace_root().join("fixtures/demo.llms.txt");
    let mut cmd = cargo_bin_cmd!("llmstxt");
    cmd.current_dir(tmp.path())
        .args(["--output", "json", "validate"])
        .arg(&doc);
    let v = json_stdout(&mut cmd);
    assert_eq!(v["level"], 0);
    assert_eq!(v["mode"], "fail-fast");
}

#[test]
fn every_parsing_command_reads_the_working_directory_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("llmstxt.toml"), "level = 9\n").unwrap();
    let doc = workspace_root().join("fixtures/demo.llms.txt");
    for command in ["parse", "classify", "render"] {
        let mut cmd = cargo_bin_cmd!("llmstxt");
        cmd.current_dir(tmp.path())
            .arg(command)
            .arg(&doc)
            .assert()
            .failure()
            .stderr(predicate::str::contains("error in config"));
    }
}

#[test]
fn render_uses_configured_line_limit() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("llmstxt.toml"),
        "[parse]\nmax_line_chars = 30\n",
    )
    .unwrap();
    let doc = tmp.path().join("notes.llms.txt");
    fs::write(
        &doc,
        "# T\n> d\n## S\n- [a](https://a.io):    short\n- [b](https://b.io):    a note that runs past the limit\n",
    )
    .unwrap();
    let mut cmd = cargo_bin_cmd!("llmstxt");
    cmd.current_dir(tmp.path())
        .arg("render")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("- [a](https://a.io): short\n"))
        .stdout(predicate::str::contains(
            "- [b](https://b.io):    a note that runs past the limit",
        ));
}

#[test]
fn invalid_config_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("llmstxt.toml");
    fs::write(&path, "level = 9\n").unwrap();
    llmstxt()
        .args(["validate", "fixtures/demo.llms.txt", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error in config"));
}

// ──────────────────────────────────────────────
// 5. classify, render, codes, schema
// ──────────────────────────────────────────────

#[test]
fn classify_reports_full_with_reason() {
    llmstxt()
        .args(["classify", "fixtures/full.llms.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Full (3 top-level H1 headers)"));
}

#[test]
fn classify_json_for_index() {
    let v = json_stdout(llmstxt().args(["--output", "json", "classify", "fixtures/demo.llms.txt"]));
    assert_eq!(v["document_type"], "index");
    assert!(v["reason"].is_null());
    assert_eq!(v["h1_count"], 1);
}

#[test]
fn render_output_reparses_to_same_sections() {
    let out = llmstxt()
        .args(["render", "fixtures/demo.llms.txt"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.starts_with("# Acme SDK\n"));

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rendered.llms.txt");
    fs::write(&path, &text).unwrap();
    let v = json_stdout(llmstxt().args(["--output", "json", "parse"]).arg(&path));
    let names: Vec<&str> = v["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Getting Started", "API Reference", "Optional"]);
}

#[test]
fn render_empty_file_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.txt");
    fs::write(&path, "").unwrap();
    llmstxt()
        .arg("render")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no document title"));
}

#[test]
fn codes_lists_full_catalog() {
    let v = json_stdout(llmstxt().args(["--output", "json", "codes"]));
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 26);
    assert_eq!(rows[0]["code"], "E001");
    assert_eq!(rows[0]["severity"], "error");
    assert!(rows.iter().all(|r| !r["remediation"].as_str().unwrap().is_empty()));
}

#[test]
fn schema_prints_result_json_schema() {
    let v = json_stdout(llmstxt().arg("schema"));
    assert_eq!(v["title"], "llms.txt ValidationResult");
}
