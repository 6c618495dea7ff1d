//! E2E tests for `kith focus`, `kith estimate`, `kith stats`, and
//! `kith completions`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "nodes": [
    { "id": "ana", "label": "Ana", "attributes": { "company": "Acme", "tags": ["rust"] } },
    { "id": "ben", "label": "Ben", "attributes": { "introducedBy": "ana" } },
    { "id": "cy",  "label": "Cy" },
    { "id": "dee", "label": "Dee", "attributes": { "company": "ACME", "tags": ["rust"] } }
  ],
  "edges": [
    { "id": "e1", "from": "ana", "to": "ben", "strength": 5.0 },
    { "id": "e2", "from": "ben", "to": "cy",  "strength": 5.0 }
  ]
}"#;

fn kith_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kith"));
    cmd.current_dir(dir);
    cmd.env("KITH_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("config"));
    cmd.env_remove("FORMAT");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("snapshot.json"), SNAPSHOT).expect("write snapshot");
    dir
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = kith_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn ids(nodes: &Value) -> Vec<String> {
    let mut ids: Vec<String> = nodes
        .as_array()
        .expect("array")
        .iter()
        .map(|n| n["id"].as_str().expect("id").to_string())
        .collect();
    ids.sort();
    ids
}

// --- focus ---------------------------------------------------------------

#[test]
fn focus_depth_one_keeps_direct_ties() {
    let dir = setup();
    let json = run_json(dir.path(), &["focus", "snapshot.json", "ana", "--depth", "1"]);

    assert_eq!(json["focus"], "ana");
    assert_eq!(json["depth"], 1);
    assert_eq!(ids(&json["nodes"]), vec!["ana", "ben"]);

    let edges = json["edges"].as_array().expect("edges");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["id"], "e1");
}

#[test]
fn focus_reports_hops_and_metrics() {
    let dir = setup();
    let json = run_json(dir.path(), &["focus", "snapshot.json", "ana"]);

    assert_eq!(ids(&json["nodes"]), vec!["ana", "ben", "cy"]);
    for node in json["nodes"].as_array().expect("nodes") {
        let expected = match node["id"].as_str() {
            Some("ana") => 0,
            Some("ben") => 1,
            _ => 2,
        };
        assert_eq!(node["hops"], expected);
        assert!(node["metrics"]["networkValue"].is_number());
    }
}

#[test]
fn focus_on_isolated_contact_is_alone() {
    let dir = setup();
    let json = run_json(dir.path(), &["focus", "snapshot.json", "dee"]);
    assert_eq!(ids(&json["nodes"]), vec!["dee"]);
    assert!(json["edges"].as_array().expect("edges").is_empty());
}

#[test]
fn focus_unknown_contact_fails_with_code() {
    let dir = setup();
    kith_cmd(dir.path())
        .args(["focus", "snapshot.json", "zed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2003"))
        .stderr(predicate::str::contains("zed"));
}

#[test]
fn focus_text_lists_hops() {
    let dir = setup();
    let output = kith_cmd(dir.path())
        .args(["focus", "snapshot.json", "ben", "-d", "1", "--format", "text"])
        .output()
        .expect("focus should not crash");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.starts_with("hops\tid\tnetwork_value\n"));
    assert!(stdout.contains("0\tben\t"));
    assert!(stdout.contains("edge\te2\tben\tcy\t"));
}

// --- estimate ------------------------------------------------------------

#[test]
fn estimate_shared_company_and_tag() {
    let dir = setup();
    let json = run_json(dir.path(), &["estimate", "snapshot.json", "ana", "dee"]);

    assert_eq!(json["score"].as_f64(), Some(35.0));
    assert_eq!(json["threshold"].as_f64(), Some(20.0));
    assert_eq!(json["wouldCreate"], true);
    assert!(json.get("explicitEdge").is_none());
}

#[test]
fn estimate_existing_edge_is_not_created() {
    let dir = setup();
    let json = run_json(dir.path(), &["estimate", "snapshot.json", "ben", "ana"]);

    assert_eq!(json["score"].as_f64(), Some(40.0));
    assert_eq!(json["wouldCreate"], false);
    assert_eq!(json["explicitEdge"], "e1");
}

#[test]
fn estimate_strangers_score_zero() {
    let dir = setup();
    kith_cmd(dir.path())
        .args(["estimate", "snapshot.json", "cy", "dee", "--format", "text"])
        .assert()
        .success()
        .stdout("cy\tdee\t0.0\tskip\n");
}

#[test]
fn estimate_unknown_contact_fails() {
    let dir = setup();
    kith_cmd(dir.path())
        .args(["estimate", "snapshot.json", "ana", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2003"));
}

// --- stats ---------------------------------------------------------------

#[test]
fn stats_summarizes_explicit_graph() {
    let dir = setup();
    let json = run_json(dir.path(), &["stats", "snapshot.json"]);

    assert_eq!(json["nodeCount"], 4);
    assert_eq!(json["edgeCount"], 2);
    assert_eq!(json["componentCount"], 2);
    assert_eq!(json["isolatedNodeCount"], 1);
    assert_eq!(json["maxDegree"], 2);
    assert_eq!(json["isolated"], serde_json::json!(["dee"]));
    assert!(
        json["contentHash"]
            .as_str()
            .is_some_and(|h| h.starts_with("blake3:"))
    );
}

#[test]
fn stats_hash_is_stable_across_runs() {
    let dir = setup();
    let first = run_json(dir.path(), &["stats", "snapshot.json"]);
    let second = run_json(dir.path(), &["stats", "snapshot.json"]);
    assert_eq!(first["contentHash"], second["contentHash"]);
}

#[test]
fn stats_text_has_hash_line() {
    let dir = setup();
    kith_cmd(dir.path())
        .args(["stats", "snapshot.json", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nodes\t4\n"))
        .stdout(predicate::str::contains("hash\t"));
}

// --- completions ---------------------------------------------------------

#[test]
fn completions_bash_mentions_binary() {
    let dir = TempDir::new().expect("tempdir");
    kith_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kith"));
}

#[test]
fn completions_ignore_broken_config() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("bad.toml"), "not = [valid").expect("write config");
    kith_cmd(dir.path())
        .args(["completions", "zsh", "--config", "bad.toml"])
        .assert()
        .success();
}
