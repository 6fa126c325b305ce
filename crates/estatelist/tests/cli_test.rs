//! Integration tests for the `estatelist` CLI binary.
//!
//! These validate argument parsing, help output, and error handling --
//! all without requiring a live backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `estatelist` binary with env isolation.
///
/// Clears all `ESTATELIST_*` env vars and points config directories at
/// a nonexistent path so tests never touch the user's real
/// configuration.
fn estatelist_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("estatelist");
    cmd.env("HOME", "/tmp/estatelist-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/estatelist-cli-test-nonexistent")
        .env_remove("ESTATELIST_PROFILE")
        .env_remove("ESTATELIST_PROJECT_URL")
        .env_remove("ESTATELIST_ANON_KEY")
        .env_remove("ESTATELIST_OUTPUT")
        .env_remove("ESTATELIST_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = estatelist_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_command_groups() {
    estatelist_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("listings"))
        .stdout(predicate::str::contains("contact"))
        .stdout(predicate::str::contains("pay"));
}

#[test]
fn test_version_flag() {
    estatelist_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("estatelist"));
}

#[test]
fn test_listings_list_help_shows_filters() {
    estatelist_cmd()
        .args(["listings", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--type"))
        .stdout(predicate::str::contains("--min-price"))
        .stdout(predicate::str::contains("--max-price"))
        .stdout(predicate::str::contains("--location"))
        .stdout(predicate::str::contains("--page"));
}

#[test]
fn test_invalid_type_filter_is_rejected() {
    let output = estatelist_cmd()
        .args(["listings", "list", "--type", "castle"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("castle"),
        "Expected offending value in output:\n{text}"
    );
}

// ── Unconfigured runs fail cleanly ──────────────────────────────────

#[test]
fn test_listings_without_config_reports_config_error() {
    let output = estatelist_cmd().args(["listings", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.to_lowercase().contains("profile") || text.to_lowercase().contains("config"),
        "Expected a configuration hint:\n{text}"
    );
}

#[test]
fn test_project_url_without_anon_key_is_rejected() {
    let output = estatelist_cmd()
        .args([
            "listings",
            "list",
            "--project-url",
            "https://example.supabase.co",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("anon-key"),
        "Expected anon-key requirement in output:\n{text}"
    );
}

#[test]
fn test_config_path_prints_a_path() {
    estatelist_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_bad_listing_id_is_validation_error() {
    let output = estatelist_cmd()
        .args([
            "--project-url",
            "https://example.supabase.co",
            "--anon-key",
            "k",
            "listings",
            "get",
            "not-a-uuid",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("not-a-uuid"),
        "Expected offending id in output:\n{text}"
    );
}
