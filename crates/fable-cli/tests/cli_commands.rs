#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fable() -> Command {
    let mut cmd = Command::cargo_bin("fable").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn scenes_lists_all_six() {
    fable()
        .arg("scenes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scene 1: The First Meeting"))
        .stdout(predicate::str::contains("nap-choice"))
        .stdout(predicate::str::contains("6 scenes"));
}

#[test]
fn show_prints_the_scene_tree() {
    fable()
        .args(["show", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scene 1: The First Meeting"))
        .stdout(predicate::str::contains("tortoise"))
        .stdout(predicate::str::contains("hare"));
}

#[test]
fn show_after_narration_has_the_talk_button() {
    fable()
        .args(["show", "0", "--at", "8100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Talk]"));
}

#[test]
fn show_json_is_valid() {
    let output = fable()
        .args(["show", "4", "--json", "--fallback"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "fallback-content");
    let children = value["children"].as_array().unwrap();
    assert!(children.iter().any(|c| c["name"] == "finishFlag"));
}

#[test]
fn show_rejects_out_of_range_index() {
    fable()
        .args(["show", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));

    fable()
        .args(["show", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

#[test]
fn play_runs_to_the_moral() {
    fable()
        .args(["play", "--nap", "sleep,cheer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fallback mode"))
        .stdout(predicate::str::contains("Scene 6"))
        .stdout(predicate::str::contains("tapped Let Hare Sleep"))
        .stdout(predicate::str::contains("tapped Cheer for Tortoise"))
        .stdout(predicate::str::contains("[Play Again]"))
        .stdout(predicate::str::contains("6 scenes, 8 taps"));
}

#[test]
fn play_in_ar_mode() {
    fable()
        .args(["play", "--ar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AR mode"))
        .stdout(predicate::str::contains("6 scenes, 7 taps"));
}

#[test]
fn play_rejects_unknown_nap_choice() {
    fable()
        .args(["play", "--nap", "dance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown nap choice"));
}

#[test]
fn config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stage.json");
    fs::write(&path, r#"{ "frame_ms": 50, "missing_nodes": "ignore" }"#).unwrap();

    fable()
        .args(["--config", path.to_str().unwrap(), "show", "1", "--at", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(at 0:01.000)"));
}

#[test]
fn debug_logging_reports_the_config_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stage.json");
    fs::write(&path, r#"{ "frame_ms": 20 }"#).unwrap();

    fable()
        .env("RUST_LOG", "debug")
        .args(["--config", path.to_str().unwrap(), "show", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded stage config from"))
        .stderr(predicate::str::contains("showing scene 0"));

    fable()
        .env("RUST_LOG", "debug")
        .arg("scenes")
        .assert()
        .success()
        .stderr(predicate::str::contains("using default stage config"));
}

#[test]
fn bad_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stage.json");
    fs::write(&path, "{ not json").unwrap();

    fable()
        .args(["--config", path.to_str().unwrap(), "scenes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
