//! Integration tests for the `hotify` CLI binary.
//!
//! Argument parsing, help output and completions run without a server.
//! Service commands run against a wiremock server standing in for hotify.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `hotify` binary with env isolation.
///
/// Clears all `HOTIFY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn hotify_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hotify");
    cmd.env("HOME", "/tmp/hotify-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/hotify-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("HOTIFY_CONFIG")
        .env_remove("HOTIFY_ADDRESS")
        .env_remove("HOTIFY_SECRET")
        .env_remove("HOTIFY_SECRET_ENV")
        .env_remove("HOTIFY_OUTPUT")
        .env_remove("HOTIFY_INSECURE")
        .env_remove("HOTIFY_TIMEOUT")
        .env_remove("HOTIFY_CA_CERT")
        .env_remove("RUST_LOG")
        .env_remove("COMPLETE");
    cmd
}

/// `hotify` pointed at `server` with a throwaway config file.
fn server_cmd(server_uri: &str, config: &Path) -> assert_cmd::Command {
    let mut cmd = hotify_cmd();
    cmd.arg("--config")
        .arg(config)
        .args(["--address", server_uri, "--secret", "secret"]);
    cmd
}

/// Run a blocking CLI invocation off the async runtime.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn service_json(name: &str, status: u8, logs: &[&str]) -> serde_json::Value {
    json!({
        "config": {
            "name": name,
            "repo": format!("https://git.example.com/{name}.git"),
            "exec": "./run",
            "build": "make",
            "restart": false,
            "maxRestarts": 0,
            "secret": "hook-secret",
            "proxy": { "match": "", "upstream": "" }
        },
        "path": format!("/srv/{name}"),
        "status": status,
        "restarts": 0,
        "logs": logs
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hotify_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    hotify_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("start"))
            .and(predicate::str::contains("logs"))
            .and(predicate::str::contains("server-config")),
    );
}

#[test]
fn test_version_flag() {
    hotify_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hotify"));
}

#[test]
fn test_invalid_subcommand() {
    hotify_cmd().arg("explode").assert().failure().code(2);
}

#[test]
fn test_invalid_output_format() {
    hotify_cmd()
        .args(["list", "--output", "xml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_get_requires_name() {
    hotify_cmd().arg("get").assert().failure().code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    hotify_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_dynamic_completion_registration() {
    hotify_cmd()
        .env("COMPLETE", "bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("hotify"));
}

#[test]
fn test_completions_zsh() {
    hotify_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hotify"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");

    hotify_cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_masks_plaintext_secret() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "address = \"http://10.0.0.5:1234\"\nsecret = \"hunter2\"\ntimeout = 5\n",
    )
    .unwrap();

    hotify_cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("http://10.0.0.5:1234")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "timeout = \"soon\"\n").unwrap();

    hotify_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--secret", "s"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_bad_address_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    hotify_cmd()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["list", "--secret", "s", "--address", "not a url"])
        .assert()
        .failure()
        .code(2);
}

// ── Service commands ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_prints_sorted_names() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services"))
        .and(header_exists("X-Signature-256"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            service_json("web", 0, &[]),
            service_json("api", 1, &[]),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["list", "-o", "plain"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "api\nweb\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_table_shows_status() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([service_json("web", 0, &[])])),
        )
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.arg("list");
    let output = run(cmd).await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Name") && stdout.contains("Status") && stdout.contains("Restarts"));
    assert!(stdout.contains("web") && stdout.contains("running"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_missing_service_exits_not_found() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("service not found"))
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["get", "ghost"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_stop_reports_server_body() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services/web/stop"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["stop", "web"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("boom"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_resyncs_and_reports_status() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services/web/start"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([service_json("web", 0, &[])])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["start", "web"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Service 'web' started (running)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused_non_interactively() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/services/web"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["delete", "web"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/services/web"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["delete", "web", "--yes"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Service 'web' deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_from_file_posts_definition() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let definition = service_json("web", 0, &[])["config"].clone();
    let file = dir.path().join("web.json");
    std::fs::write(&file, serde_json::to_string_pretty(&definition).unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/services"))
        .and(body_json(&definition))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([service_json("web", 1, &[])])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["create", "--from-file"]).arg(&file);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Service 'web' created (stopped)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_are_printed_verbatim() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services/web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_json(
            "web",
            0,
            &["building\n", "listening on :8080\n"],
        )))
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["logs", "web"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "building\nlistening on :8080\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_config_masks_secrets() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": { "web": service_json("web", 0, &[])["config"] },
            "address": ":1234",
            "servicesPath": "/srv",
            "secret": "server-secret"
        })))
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.args(["server-config", "-o", "json"]);
    let output = run(cmd).await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(stdout.contains("/srv"));
    assert!(!stdout.contains("server-secret"));
    assert!(!stdout.contains("hook-secret"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_signature_exits_auth() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid signature"))
        .mount(&server)
        .await;

    let mut cmd = server_cmd(&server.uri(), &dir.path().join("config.toml"));
    cmd.arg("list");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unreachable_server_exits_connection() {
    let dir = tempfile::tempdir().unwrap();

    // Port 9 (discard) on localhost is closed in test environments.
    hotify_cmd()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["list", "--secret", "s", "--address", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(7);
}
