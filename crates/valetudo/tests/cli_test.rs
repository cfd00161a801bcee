//! Integration tests for the `valetudo` CLI binary.
//!
//! Argument parsing, completions, and config handling run offline; device
//! commands run against a wiremock server standing in for the vacuum.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `valetudo` binary with env isolation.
///
/// Clears all `VALETUDO_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn valetudo_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("valetudo");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("VALETUDO_PROFILE")
        .env_remove("VALETUDO_ADDRESS")
        .env_remove("VALETUDO_OUTPUT")
        .env_remove("VALETUDO_INSECURE")
        .env_remove("VALETUDO_TIMEOUT")
        .env_remove("VALETUDO_DEFAULT_PROFILE");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn vacuum(state: u8, battery: u8) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/current_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": state,
            "battery": battery,
            "fan_power": 102,
            "clean_time": 1840
        })))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(home: &Path, args: Vec<String>) -> std::process::Output {
    let home = home.to_path_buf();
    tokio::task::spawn_blocking(move || valetudo_cmd(&home).args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = valetudo_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    valetudo_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Valetudo")
                .and(predicate::str::contains("status"))
                .and(predicate::str::contains("clean"))
                .and(predicate::str::contains("watch")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    valetudo_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("valetudo"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    valetudo_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    valetudo_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_unknown_fan_preset_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = valetudo_cmd(home.path())
        .args(["fan", "hurricane"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("hurricane"));
}

#[test]
fn test_volume_out_of_range_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = valetudo_cmd(home.path())
        .args(["volume", "set", "150"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_status_without_config_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = valetudo_cmd(home.path()).arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("No vacuum configured"));
}

#[test]
fn test_unknown_profile_lists_alternatives() {
    let home = tempfile::tempdir().unwrap();
    let output = valetudo_cmd(home.path())
        .args(["--profile", "garage", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("garage"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    let home = tempfile::tempdir().unwrap();
    valetudo_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("idle_interval = 120"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    valetudo_cmd(home.path())
        .args(["config", "init", "192.168.1.50", "--name", "Rocky"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved profile 'default'"));

    valetudo_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.1.50").and(predicate::str::contains("Rocky")));

    // A second init without --force keeps the existing profile.
    valetudo_cmd(home.path())
        .args(["config", "init", "10.0.0.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_init_rejects_bad_scheme() {
    let home = tempfile::tempdir().unwrap();
    let output = valetudo_cmd(home.path())
        .args(["config", "init", "ftp://robot.lan"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_from_device() {
    let server = vacuum(8, 100).await;
    let home = tempfile::tempdir().unwrap();

    let output = run(
        home.path(),
        args(&["--address", &server.uri(), "-o", "json", "status"]),
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["state"], "charging");
    assert_eq!(body["battery"], 100);
    assert!(body.get("extra").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_battery_plain() {
    let server = vacuum(5, 64).await;
    let home = tempfile::tempdir().unwrap();

    let output = run(
        home.path(),
        args(&["--address", &server.uri(), "-o", "plain", "battery"]),
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "64");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_while_idle_is_refused() {
    let server = vacuum(3, 100).await;
    Mock::given(method("PUT"))
        .and(path("/api/stop_cleaning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
        .expect(0)
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run(
        home.path(),
        args(&["--address", &server.uri(), "clean", "stop"]),
    )
    .await;
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("while the vacuum is idle"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_spot_exits_not_found() {
    let server = vacuum(8, 100).await;
    let home = tempfile::tempdir().unwrap();

    let output = run(
        home.path(),
        args(&["--address", &server.uri(), "spot", "Attic"]),
    )
    .await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Attic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_high_speed_without_power_control_is_unsupported() {
    let server = vacuum(8, 100).await;
    let home = tempfile::tempdir().unwrap();

    let output = run(
        home.path(),
        args(&["--address", &server.uri(), "high-speed", "get"]),
    )
    .await;
    assert_eq!(output.status.code(), Some(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_vacuum_exits_with_connection_code() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    let home = tempfile::tempdir().unwrap();

    let output = run(home.path(), args(&["--address", &uri, "status"])).await;
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
