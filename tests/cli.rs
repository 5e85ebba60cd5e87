//! Integration tests: `node-labels` command-line behavior

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

const INVENTORY: &str = r#"
[[node]]
name = "build-linux"
labels = "linux docker"
priority = 5

[[node]]
name = "build-mac"
labels = "macos"

[[job]]
name = "containers"
assigned_node = "linux&&docker"

[[job]]
name = "anywhere"
"#;

fn node_labels(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_node-labels"))
        .args(args)
        .env_remove("NODE_LABELS_INVENTORY")
        .env_remove("NODE_LABELS_LOG")
        .output()
        .expect("failed to run node-labels")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn inventory_file() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.toml");
    fs::write(&path, INVENTORY).unwrap();
    let path = path.to_string_lossy().into_owned();
    (dir, path)
}

#[test]
fn test_match_true_exits_zero() {
    let output = node_labels(&["match", "linux&&!arm64", "linux", "x86_64"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_match_false_exits_one() {
    let output = node_labels(&["match", "linux->docker", "linux"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output).trim(), "false");
}

#[test]
fn test_match_accepts_space_separated_label_string() {
    let output = node_labels(&["match", "a&&b", "a b"]);
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_match_rejects_malformed_expression() {
    let output = node_labels(&["match", "linux&&", "linux"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing operand"));
}

#[test]
fn test_tokens_json() {
    let output = node_labels(&["tokens", "!(a||b)", "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["type"], "NOT");
    assert_eq!(json[1]["type"], "GROUP");
    assert_eq!(json[1]["value"][1]["type"], "OR");
}

#[test]
fn test_tokens_tree() {
    let output = node_labels(&["tokens", "a&&(b)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ID a\nAND &&\nGROUP\n  ID b\n");
}

#[test]
fn test_nodes_json_report() {
    let (_dir, path) = inventory_file();
    let output = node_labels(&["nodes", "linux||macos", "--inventory", &path, "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["candidates"], serde_json::json!(["build-linux", "build-mac"]));
    assert_eq!(json["selected"], "build-linux");
}

#[test]
fn test_nodes_no_match_exits_one() {
    let (_dir, path) = inventory_file();
    let output = node_labels(&["nodes", "windows", "--inventory", &path]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_jobs_for_node() {
    let (_dir, path) = inventory_file();
    let output = node_labels(&["jobs", "build-mac", "--inventory", &path, "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "anywhere");
}

#[test]
fn test_label_usage() {
    let (_dir, path) = inventory_file();
    let output = node_labels(&["label", "docker", "--inventory", &path, "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["nodes"], serde_json::json!(["build-linux"]));
    assert_eq!(json["jobs"], serde_json::json!(["containers"]));
}

#[test]
fn test_missing_inventory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let output = node_labels(&["label", "x", "--inventory", &path.to_string_lossy()]);
    assert_eq!(output.status.code(), Some(2));
}
