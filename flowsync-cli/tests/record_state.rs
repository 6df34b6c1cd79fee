//! `flowsync record` writes the sync-state store that `check` and `status` read.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

use flowsync_core::{CommitSha, ContentHash};
use flowsync_local::state;

fn flowsync_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("flowsync"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Remote with `graphs/main.json`, `components/add.js` and `spec/add.yaml`.
fn write_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("snapshot.json");
    let snapshot = serde_json::json!({
        "commits": { "c1": { "tree": { "sha": "root" } } },
        "trees": {
            "root": { "tree": [
                { "path": "graphs", "type": "tree", "sha": "g" },
                { "path": "components", "type": "tree", "sha": "c" },
                { "path": "spec", "type": "tree", "sha": "s" }
            ] },
            "g": { "tree": [ { "path": "main.json", "type": "blob", "sha": "g1" } ] },
            "c": { "tree": [ { "path": "add.js", "type": "blob", "sha": "h1" } ] },
            "s": { "tree": [ { "path": "add.yaml", "type": "blob", "sha": "y1" } ] }
        }
    });
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).expect("write snapshot");
    path
}

fn run_json(home: &TempDir, args: &[&str]) -> Value {
    let assert = flowsync_cmd(home.path())
        .args(args)
        .arg("--json")
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON")
}

#[test]
fn record_then_check_is_in_sync() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let snapshot = write_snapshot(work.path());
    let project = work.path().join("project");
    write(&project, "graphs/main.json", "{}\n");
    write(&project, "components/add.js", "exports.add = 1;\n");

    let dir = project.to_str().unwrap();
    let snap = snapshot.to_str().unwrap();

    // Untracked files against a remote that has them: conflicts.
    let before = run_json(&home, &["check", "noflo/example", "c1", "--dir", dir, "--snapshot", snap]);
    assert_eq!(before["outcome"], "mixed");

    let recorded = run_json(
        &home,
        &["record", "noflo/example", "c1", "--dir", dir, "--snapshot", snap],
    );
    assert_eq!(
        recorded["recorded"],
        serde_json::json!(["graphs/main.json", "components/add.js"])
    );
    assert_eq!(recorded["missing"], serde_json::json!(["spec/add.yaml"]));

    let sync = state::load(&project).expect("state");
    assert_eq!(sync.commit, Some(CommitSha::from("c1")));
    assert_eq!(sync.files["components/add.js"].sha, ContentHash::from("h1"));

    // spec/add.yaml is still missing locally, so it is the only pull.
    let after = run_json(&home, &["check", "noflo/example", "c1", "--dir", dir, "--snapshot", snap]);
    assert_eq!(after["outcome"], "remote_ahead");
    let pulls: Vec<&str> = after["result"]["pull"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["path"].as_str().unwrap())
        .collect();
    assert_eq!(pulls, ["spec/add.yaml"]);

    let status = run_json(&home, &["status", "--dir", dir]);
    let states: Vec<&str> = status["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["state"].as_str().unwrap())
        .collect();
    assert_eq!(states, ["unmodified", "unmodified"]);
}

#[test]
fn record_named_paths_only() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let snapshot = write_snapshot(work.path());
    let project = work.path().join("project");
    write(&project, "graphs/main.json", "{}\n");
    write(&project, "components/add.js", "exports.add = 1;\n");

    flowsync_cmd(home.path())
        .args(["record", "noflo/example", "c1", "components/add.js", "--dir"])
        .arg(&project)
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(contains("recorded 1 file(s) at noflo/example@c1"));

    let sync = state::load(&project).expect("state");
    let paths: Vec<&str> = sync.files.keys().map(String::as_str).collect();
    assert_eq!(paths, ["components/add.js"]);
}

#[test]
fn record_unknown_path_fails_without_writing() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let snapshot = write_snapshot(work.path());
    let project = work.path().join("project");
    write(&project, "components/add.js", "exports.add = 1;\n");

    flowsync_cmd(home.path())
        .args(["record", "noflo/example", "c1", "components/mul.js", "--dir"])
        .arg(&project)
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(contains("components/mul.js is not an artifact"));

    assert!(!state::state_path(&project).exists());
}
