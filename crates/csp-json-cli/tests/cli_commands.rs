// crates/csp-json-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests that run the csp-json binary end to end.
// Purpose: Pin stdout contents and exit codes for every subcommand.
// Dependencies: csp-json-cli binary, tempfile
// ============================================================================

//! ## Overview
//! Runs the `csp-json` binary against fixture documents and checks the exact
//! stdout and exit status of each command, including the failure paths that
//! must leave stdout empty.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn csp_json_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_csp-json"))
}

fn core_tests_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("csp-json-core").join("tests")
}

fn fixture(relative: &str) -> PathBuf {
    core_tests_dir().join("data").join(relative)
}

fn fixtures_in(dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).expect("read fixture dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            paths.extend(fixtures_in(&path));
        } else if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    paths
}

/// Runs the binary from an empty directory so no stray config is picked up.
fn run(args: &[&str]) -> Output {
    let cwd = tempfile::tempdir().expect("tempdir");
    run_in(cwd.path(), args)
}

/// Runs the binary with `cwd` as its working directory.
fn run_in(cwd: &Path, args: &[&str]) -> Output {
    Command::new(csp_json_bin())
        .args(args)
        .current_dir(cwd)
        .env_remove("CSP_JSON_CONFIG")
        .output()
        .expect("run csp-json")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn is_solved(solution: &str) -> Output {
    let csp = path_arg(&fixture("human/color-australia.json"));
    run(&["is-solved", "--csp", &csp, "--solution", solution])
}

// ============================================================================
// SECTION: Echo
// ============================================================================

#[test]
fn echo_round_trips_positive_fixtures() {
    let fixtures = fixtures_in(&core_tests_dir().join("data"));
    assert!(!fixtures.is_empty());
    for path in fixtures {
        let output = run(&["echo", "--csp", &path_arg(&path)]);
        assert!(output.status.success(), "echo failed for {}", path.display());
        assert_eq!(output.stdout, fs::read(&path).expect("read fixture"), "{}", path.display());
    }
}

#[test]
fn echo_fails_on_missing_file() {
    let output = run(&["echo", "--csp", "/nonexistent/csp.json"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read CSP document"), "unexpected stderr: {stderr}");
}

#[test]
fn echo_fails_on_invalid_document() {
    let path = core_tests_dir().join("data-invalid").join("dangling-relation.json");
    let output = run(&["echo", "--csp", &path_arg(&path)]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

// ============================================================================
// SECTION: Validate
// ============================================================================

#[test]
fn validate_accepts_positive_fixtures() {
    for path in fixtures_in(&core_tests_dir().join("data")) {
        let output = run(&["validate", "--csp", &path_arg(&path)]);
        assert!(output.status.success(), "validate failed for {}", path.display());
        assert_eq!(output.stdout, b"OK\n");
    }
}

#[test]
fn validate_rejects_negative_fixtures() {
    let fixtures = fixtures_in(&core_tests_dir().join("data-invalid"));
    assert!(!fixtures.is_empty());
    for path in fixtures {
        let output = run(&["validate", "--csp", &path_arg(&path)]);
        assert_eq!(output.status.code(), Some(1), "{}", path.display());
        assert_eq!(output.stdout, b"Invalid\n", "{}", path.display());
    }
}

#[test]
fn validate_reports_missing_file_as_invalid() {
    let output = run(&["validate", "--csp", "/nonexistent/csp.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"Invalid\n");
}

// ============================================================================
// SECTION: Is-Solved
// ============================================================================

#[test]
fn is_solved_prints_booleans() {
    let solved = is_solved("[0, 1, 2, 0, 1, 0, 0]");
    assert!(solved.status.success());
    assert_eq!(solved.stdout, b"true\n");

    let unsolved = is_solved("[0,0,0,0,0,0,0]");
    assert!(unsolved.status.success());
    assert_eq!(unsolved.stdout, b"false\n");
}

#[test]
fn is_solved_rejects_wrong_arity_with_empty_stdout() {
    for solution in ["[0,1,2,0,1,0]", "[0,1,2,0,1,0,0,0]"] {
        let output = is_solved(solution);
        assert!(!output.status.success(), "{solution}");
        assert!(output.stdout.is_empty(), "{solution}");
    }
}

#[test]
fn is_solved_rejects_out_of_range_index() {
    let output = is_solved("[0,1,2,0,1,0,3]");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn is_solved_fails_on_missing_file() {
    let output =
        run(&["is-solved", "--csp", "/nonexistent/csp.json", "--solution", "[0,1,2,0,1,0,0]"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

// ============================================================================
// SECTION: Generate, Schema, Version
// ============================================================================

#[test]
fn generate_output_validates_and_is_reproducible() {
    let args = [
        "generate",
        "--vars",
        "6",
        "--vals",
        "3",
        "--constraints",
        "5",
        "--nogoods",
        "2",
        "--seed",
        "-11",
        "--instance",
        "2",
    ];
    let first = run(&args);
    let second = run(&args);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(first.stdout, second.stdout);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("generated.json");
    fs::write(&path, &first.stdout).expect("write generated");
    let validated = run(&["validate", "--csp", &path_arg(&path)]);
    assert_eq!(validated.stdout, b"OK\n");
    let echoed = run(&["echo", "--csp", &path_arg(&path)]);
    assert_eq!(echoed.stdout, first.stdout);
}

#[test]
fn generate_rejects_illegal_parameters() {
    let output = run(&[
        "generate",
        "--vars",
        "1",
        "--vals",
        "3",
        "--constraints",
        "0",
        "--nogoods",
        "1",
        "--seed",
        "1",
    ]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn schema_prints_json() {
    let output = run(&["schema"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("schema json");
    assert_eq!(value["$schema"], "https://json-schema.org/draft/2020-12/schema");
}

#[test]
fn version_flag_prints_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), format!("csp-json {}", env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// SECTION: Configuration and Audit
// ============================================================================

#[test]
fn config_limit_rejects_large_documents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("csp-json.toml");
    fs::write(&config, "[limits]\nmax_document_bytes = 16\n").expect("write config");
    let csp = path_arg(&fixture("human/color-australia.json"));

    let output = run(&["echo", "--csp", &csp, "--config", &path_arg(&config)]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("byte limit"), "unexpected stderr: {stderr}");
}

#[test]
fn invalid_config_fails_closed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("csp-json.toml");
    fs::write(&config, "[limits]\nmax_document_bytes = 0\n").expect("write config");

    let output = run(&["schema", "--config", &path_arg(&config)]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn file_audit_sink_records_each_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("audit.jsonl");
    let config = dir.path().join("csp-json.toml");
    let contents = format!("[audit]\nsink = \"file\"\npath = {:?}\n", path_arg(&log));
    fs::write(&config, contents).expect("write config");
    let config = path_arg(&config);
    let csp = path_arg(&fixture("human/color-australia.json"));

    assert!(run(&["validate", "--csp", &csp, "--config", &config]).status.success());
    let unsolved = run(&[
        "is-solved",
        "--csp",
        &csp,
        "--solution",
        "[1,1,2,0,1,0,0]",
        "--config",
        &config,
    ]);
    assert_eq!(unsolved.stdout, b"false\n");

    let lines: Vec<serde_json::Value> = fs::read_to_string(&log)
        .expect("read audit log")
        .lines()
        .map(|line| serde_json::from_str(line).expect("audit line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["command"], "validate");
    assert_eq!(lines[0]["outcome"], "ok");
    assert_eq!(lines[1]["command"], "is_solved");
    assert_eq!(lines[1]["outcome"], "unsolved");
    assert_eq!(lines[1]["violated_constraints"], serde_json::json!([0]));
}

#[test]
fn validate_prints_invalid_when_default_config_is_malformed() {
    let cwd = tempfile::tempdir().expect("tempdir");
    fs::write(cwd.path().join("csp-json.toml"), "bogus = 1\n").expect("write config");

    for path in [
        fixture("human/color-australia.json"),
        core_tests_dir().join("data-invalid").join("empty-domain.json"),
    ] {
        let output = run_in(cwd.path(), &["validate", "--csp", &path_arg(&path)]);
        assert_eq!(output.status.code(), Some(1), "{}", path.display());
        assert_eq!(output.stdout, b"Invalid\n", "{}", path.display());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Failed to load configuration"), "unexpected stderr: {stderr}");
    }
}

#[test]
fn validate_prints_invalid_when_audit_log_cannot_open() {
    let cwd = tempfile::tempdir().expect("tempdir");
    let log = cwd.path().join("missing-dir").join("audit.jsonl");
    let contents = format!("[audit]\nsink = \"file\"\npath = {:?}\n", path_arg(&log));
    fs::write(cwd.path().join("csp-json.toml"), contents).expect("write config");
    let csp = path_arg(&fixture("human/color-australia.json"));

    let output = run_in(cwd.path(), &["validate", "--csp", &csp]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"Invalid\n");

    let solved = run_in(cwd.path(), &["is-solved", "--csp", &csp, "--solution", "[0,1,2,0,1,0,0]"]);
    assert!(!solved.status.success());
    assert!(solved.stdout.is_empty());
}
