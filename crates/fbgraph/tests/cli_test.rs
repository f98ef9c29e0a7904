//! Integration tests for the `fbgraph` CLI binary.
//!
//! Argument parsing, help output, completions, and exit codes run offline;
//! Graph calls run against a wiremock server via `--base-url`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fbgraph` binary with env isolation.
///
/// Clears all `FBGRAPH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn fbgraph_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fbgraph");
    cmd.env("HOME", "/tmp/fbgraph-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/fbgraph-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("FBGRAPH_PROFILE")
        .env_remove("FBGRAPH_ACCESS_TOKEN")
        .env_remove("FBGRAPH_APP_SECRET")
        .env_remove("FBGRAPH_API_VERSION")
        .env_remove("FBGRAPH_BASE_URL")
        .env_remove("FBGRAPH_OUTPUT")
        .env_remove("FBGRAPH_INSECURE")
        .env_remove("FBGRAPH_TIMEOUT");
    cmd
}

/// A command pointed at `server` with a token and a pinned version.
fn graph_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = fbgraph_cmd();
    cmd.args([
        "--base-url",
        &server.uri(),
        "--api-version",
        "v19.0",
        "--access-token",
        "tok",
    ]);
    cmd
}

/// Run a command off the async runtime so the mock server keeps serving.
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

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = fbgraph_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    fbgraph_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Graph API")
            .and(predicate::str::contains("object"))
            .and(predicate::str::contains("connection"))
            .and(predicate::str::contains("insights")),
    );
}

#[test]
fn test_version_flag() {
    fbgraph_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fbgraph"));
}

#[test]
fn test_completions_bash() {
    fbgraph_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fbgraph"));
}

#[test]
fn test_invalid_output_format_is_usage_error() {
    fbgraph_cmd()
        .args(["-o", "xml", "object", "4"])
        .assert()
        .code(2);
}

#[test]
fn test_image_width_requires_height() {
    fbgraph_cmd()
        .args(["image", "me", "--width", "50", "-O", "/tmp/never-written.jpg"])
        .assert()
        .code(2);
}

#[test]
fn test_page_url_conflicts_with_window_flags() {
    fbgraph_cmd()
        .args([
            "connection",
            "me",
            "feed",
            "--limit",
            "5",
            "--page-url",
            "https://graph.facebook.com/v19.0/me/feed?after=x",
        ])
        .assert()
        .code(2);
}

// ── Offline command behavior ────────────────────────────────────────

#[test]
fn test_me_without_token_fails_locally() {
    fbgraph_cmd()
        .args(["object", "me"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authorization required"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    fbgraph_cmd()
        .args(["--profile", "nope", "object", "4"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_proof_prints_hmac() {
    fbgraph_cmd()
        .args(["--access-token", "token", "--app-secret", "secret", "-o", "plain", "proof"])
        .assert()
        .success()
        .stdout("e941110e3d2bfe82621f0e3e1434730d7305d106c5f68c87165d0b27a4611a4a\n");
}

#[test]
fn test_proof_without_secret_is_auth_error() {
    fbgraph_cmd()
        .args(["--access-token", "token", "proof"])
        .assert()
        .code(3);
}

#[test]
fn test_delete_needs_yes_without_terminal() {
    fbgraph_cmd()
        .args(["--access-token", "token", "delete", "123_456"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

// ── Against a mock Graph API ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_object_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v19.0/4"))
        .and(query_param("fields", "id,name"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "4", "name": "Mark"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = graph_cmd(&server);
    cmd.args(["-o", "json-compact", "object", "4", "-f", "id,name"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"id\":\"4\",\"name\":\"Mark\"}\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v19.0/404404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "message": "(#803) Some of the aliases you requested do not exist: 404404",
                "type": "OAuthException",
                "code": 803
            }
        })))
        .mount(&server)
        .await;

    let mut cmd = graph_cmd(&server);
    cmd.args(["object", "404404"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_feed_plain_lists_post_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v19.0/me/feed"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "1_1", "type": "status", "message": "hello"},
                {"id": "1_2", "type": "link", "link": "https://example.com"}
            ],
            "paging": {"cursors": {"before": "A", "after": "B"}}
        })))
        .mount(&server)
        .await;

    let mut cmd = graph_cmd(&server);
    cmd.args(["-o", "plain", "feed", "--limit", "2"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1_1\n1_2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_publish_prints_new_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v19.0/me/feed"))
        .and(body_string_contains("message=hi+there"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "123_456"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = graph_cmd(&server);
    cmd.args(["-o", "plain", "publish", "me", "feed", "message=hi there"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "123_456\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v19.0/123_456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = graph_cmd(&server);
    cmd.args(["-y", "delete", "123_456"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Deleted 123_456"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_image_download_writes_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v19.0/4/picture"))
        .and(query_param("type", "large"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pic.jpg");

    let mut cmd = graph_cmd(&server);
    cmd.args(["image", "4", "--type", "large", "-O"]).arg(&out);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read(&out).unwrap(), vec![0xFF, 0xD8, 0xFF]);
}
