#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
resource-group "rg-cli" {
    region "eastus"
    subscription "00000000-0000-0000-0000-000000000000"
}
state-dir ".landingzone"
"#;

fn lz() -> Command {
    let mut cmd = Command::cargo_bin("lz").unwrap();
    cmd.env_remove("LZ_CONFIG_PATH")
        .env_remove("LZ_RESOURCE_GROUP")
        .env_remove("LZ_REGION")
        .env_remove("LZ_SUBSCRIPTION_ID")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn configured() -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("landingzone.kdl"), CONFIG).unwrap();
    temp_dir
}

fn deploy(dir: &Path, id: &str) {
    lz().current_dir(dir)
        .args(["deploy", "--id", id, "--factory", "managed-network", "--version", "v2"])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    lz().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tag-driven landing zones"))
        .stdout(predicate::str::contains("factories"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_cli_version() {
    lz().arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("landingzone"));
}

#[test]
fn test_factories_without_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    lz().current_dir(temp_dir.path())
        .arg("factories")
        .assert()
        .success()
        .stdout(predicate::str::contains("managed-network"))
        .stdout(predicate::str::contains("kubernetes-workspace"));
}

#[test]
fn test_plan_is_deterministic_and_creates_nothing() {
    let dir = configured();
    let run = || {
        lz().current_dir(dir.path())
            .args(["plan", "--id", "lz-cli", "--factory", "managed-network", "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };

    assert_eq!(run(), run());
    assert!(!dir.path().join(".landingzone").join("resources.json").exists());
}

#[test]
fn test_plan_unknown_factory_fails() {
    let dir = configured();
    lz().current_dir(dir.path())
        .args(["plan", "--id", "lz-cli", "--factory", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown landing zone factory"));
}

#[test]
fn test_deploy_blank_id_fails() {
    let dir = configured();
    lz().current_dir(dir.path())
        .args(["deploy", "--id", " ", "--factory", "managed-network"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_deploy_then_show() {
    let dir = configured();
    deploy(dir.path(), "lz-cli");
    assert!(dir.path().join(".landingzone").join("resources.json").exists());

    lz().current_dir(dir.path())
        .args(["show", "--purpose", "shared-resource"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[lz-cli]"))
        .stdout(predicate::str::contains("SHARED_RESOURCE"));

    lz().current_dir(dir.path())
        .args(["show", "--subnet-purpose", "WORKSPACE_BATCH_SUBNET"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKSPACE_COMPUTE_SUBNET: compute"))
        .stdout(predicate::str::contains("WORKSPACE_BATCH_SUBNET: batch"));
}

#[test]
fn test_redeploy_converges() {
    let dir = configured();
    deploy(dir.path(), "lz-again");
    deploy(dir.path(), "lz-again");

    let state = std::fs::read_to_string(dir.path().join(".landingzone").join("resources.json"))
        .unwrap();
    let state: serde_json::Value = serde_json::from_str(&state).unwrap();
    assert_eq!(state["resources"].as_array().unwrap().len(), 3);
}

#[test]
fn test_show_scoped_to_other_landing_zone_is_empty() {
    let dir = configured();
    deploy(dir.path(), "lz-one");

    lz().current_dir(dir.path())
        .args(["show", "--id", "lz-two"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No landing zone resources found"));
}

#[test]
fn test_config_flag_and_env_override() {
    let dir = configured();
    let elsewhere = tempfile::tempdir().unwrap();

    lz().current_dir(elsewhere.path())
        .env("LZ_RESOURCE_GROUP", "rg-override")
        .args(["plan", "--id", "lz-cli", "--factory", "managed-network", "--config"])
        .arg(dir.path().join("landingzone.kdl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("rg-override"));
}
