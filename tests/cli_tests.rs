//! Integration tests for the Weft CLI
//!
//! These tests run the actual binary against temp catalog and context files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn weft_cmd() -> Command {
    Command::cargo_bin("weft").unwrap()
}

const CATALOG: &str = r#"[
    {
        "integration": "slack",
        "action": "Send Message",
        "definition": [],
        "inputs_schema": [
            {"name": "channel", "interface": "short_text", "label": "Channel", "required": true},
            {"name": "message", "interface": "long_text", "label": "Message", "required": true}
        ]
    },
    {
        "integration": "wordpress",
        "action": "Create Post",
        "definition": [],
        "inputs_schema": [
            {"name": "title", "interface": "short_text", "label": "Title", "required": true}
        ]
    }
]"#;

fn write_catalog(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("catalog.json");
    fs::write(&path, CATALOG).unwrap();
    path
}

#[test]
fn test_help_flag() {
    weft_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "turn natural-language requests into integration workflows",
        ));
}

#[test]
fn test_run_help() {
    weft_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--catalog"))
        .stdout(predicate::str::contains("--parser"));
}

#[test]
fn test_actions_lists_catalog() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    weft_cmd()
        .args(["actions", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("slack"))
        .stdout(predicate::str::contains("Send Message (requires: channel, message)"))
        .stdout(predicate::str::contains("Create Post (requires: title)"));
}

#[test]
fn test_run_produces_workflow_json() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);
    let context = dir.path().join("context.json");
    fs::write(
        &context,
        r##"{"step_1.output.channel_name": "#general", "step_1.output.message_text": "hello"}"##,
    )
    .unwrap();

    weft_cmd()
        .args(["run", "Send a slack message about the launch", "--catalog"])
        .arg(&catalog)
        .arg("--context")
        .arg(&context)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"success\""))
        .stdout(predicate::str::contains("slack_send_message"))
        .stdout(predicate::str::contains("{{slack_integration}}"));
}

#[test]
fn test_run_without_context_needs_review() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    weft_cmd()
        .args(["run", "Send a slack message", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"needs_review\""))
        .stdout(predicate::str::contains("{{channel}}"));
}

#[test]
fn test_quoted_title_reaches_workflow() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    weft_cmd()
        .args([
            "run",
            r#"Create a wordpress post with the title "Best Pages of 2026""#,
            "--catalog",
        ])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"success\""))
        .stdout(predicate::str::contains("Best Pages of 2026"));
}

#[test]
fn test_missing_catalog_file_errors() {
    weft_cmd()
        .args(["run", "anything", "--catalog", "/nonexistent/catalog.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_malformed_catalog_errors_with_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "{}").unwrap();

    weft_cmd()
        .args(["actions", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WEFT-010"));
}

#[test]
fn test_unknown_parser_errors_with_code() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    weft_cmd()
        .args(["run", "anything", "--parser", "clairvoyant", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WEFT-021"))
        .stderr(predicate::str::contains("keyword, openai, mock"));
}

#[test]
fn test_non_object_context_errors() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);
    let context = dir.path().join("context.json");
    fs::write(&context, "[1, 2, 3]").unwrap();

    weft_cmd()
        .args(["run", "Send a slack message", "--catalog"])
        .arg(&catalog)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WEFT-012"));
}
