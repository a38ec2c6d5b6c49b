//! Integration tests for the `staybook` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes run
//! without any store; the end-to-end cases point the binary at a wiremock
//! document store through `--database-url`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `staybook` binary with env isolation.
///
/// Clears all `STAYBOOK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn staybook_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("staybook");
    cmd.env("HOME", "/tmp/staybook-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/staybook-cli-test-nonexistent")
        .env_remove("STAYBOOK_PROFILE")
        .env_remove("STAYBOOK_DATABASE_URL")
        .env_remove("STAYBOOK_USER_ID")
        .env_remove("STAYBOOK_TOKEN")
        .env_remove("STAYBOOK_OUTPUT")
        .env_remove("STAYBOOK_INSECURE")
        .env_remove("STAYBOOK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server` as user `u1`.
fn store_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = staybook_cmd();
    cmd.args(["--database-url", &server.uri(), "--user-id", "u1", "--token", "tok"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn place(title: &str, owner: &str) -> Value {
    json!({
        "title": title,
        "description": "A place",
        "imageUrl": "https://img.example.com/p.jpg",
        "price": 149.99,
        "availableFrom": "2019-01-01T00:00:00Z",
        "availableTill": "2019-12-31T00:00:00Z",
        "userID": owner
    })
}

async fn mount_places(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/offered-places.json"))
        .and(query_param("auth", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Np1": place("Manhattan Mansion", "abc"),
            "-Np2": place("L'Amour Toujours", "u1"),
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = staybook_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    staybook_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("places")
            .and(predicate::str::contains("bookings"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    staybook_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("staybook"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    staybook_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    staybook_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases without a store ─────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = staybook_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_places_list_without_config() {
    staybook_cmd()
        .args(["places", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_missing_token_is_auth_exit_code() {
    staybook_cmd()
        .args(["--database-url", "http://127.0.0.1:9", "--user-id", "u1"])
        .args(["places", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_config_show_no_config() {
    staybook_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_invalid_output_format() {
    let output = staybook_cmd()
        .args(["--output", "invalid", "places", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected output-format error:\n{text}"
    );
}

#[test]
fn test_bad_date_is_usage_error() {
    staybook_cmd()
        .args(["--database-url", "http://127.0.0.1:9", "--user-id", "u1", "--token", "t"])
        .args(["bookings", "create", "--place", "-Np1", "--first-name", "Ada"])
        .args(["--last-name", "Lovelace", "--from", "soon", "--till", "2019-03-04"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("from"));
}

#[test]
fn test_unreachable_store_is_connection_error() {
    staybook_cmd()
        .args(["--database-url", "http://127.0.0.1:9", "--user-id", "u1", "--token", "t"])
        .args(["places", "list"])
        .assert()
        .code(7)
        .stderr(
            predicate::str::contains("Could not reach")
                .and(predicate::str::contains("auth=").not()),
        );
}

// ── End-to-end against a mock store ─────────────────────────────────

#[tokio::test]
async fn test_places_list_json() {
    let server = MockServer::start().await;
    mount_places(&server).await;

    let output = store_cmd(&server)
        .args(["--output", "json", "places", "list"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["-Np1", "-Np2"]);
    assert_eq!(rows[0]["userID"], "abc");
}

#[tokio::test]
async fn test_places_list_bookable_hides_own_offers() {
    let server = MockServer::start().await;
    mount_places(&server).await;

    store_cmd(&server)
        .args(["--output", "plain", "places", "list", "--bookable"])
        .assert()
        .success()
        .stdout(predicate::str::diff("-Np1\n"));
}

#[tokio::test]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offered-places.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Permission denied"))
        .mount(&server)
        .await;

    store_cmd(&server)
        .args(["places", "list"])
        .assert()
        .code(3)
        .stderr(
            predicate::str::contains("rejected")
                .and(predicate::str::contains("--profile default")),
        );
}

#[tokio::test]
async fn test_places_get_missing_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offered-places/-Nx.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .mount(&server)
        .await;

    store_cmd(&server)
        .args(["places", "get", "-Nx"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("places list"));
}

#[tokio::test]
async fn test_places_update_refetches_then_replaces() {
    let server = MockServer::start().await;
    mount_places(&server).await;
    Mock::given(method("PUT"))
        .and(path("/offered-places/-Np2.json"))
        .and(query_param("auth", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let output = store_cmd(&server)
        .args(["--output", "json", "places", "update", "-Np2", "--title", "New title"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let updated: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(updated["title"], "New title");
    assert_eq!(updated["description"], "A place");
}

#[tokio::test]
async fn test_bookings_list_is_filtered_by_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-bookings.json"))
        .and(query_param("orderBy", "\"userId\""))
        .and(query_param("equalTo", "\"u1\""))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    store_cmd(&server)
        .args(["--output", "plain", "bookings", "list"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_bookings_create_copies_place_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offered-places/-Np1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(place("Manhattan Mansion", "abc")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/my-bookings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-Nb1" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = store_cmd(&server)
        .args(["--output", "json", "bookings", "create", "--place", "-Np1"])
        .args(["--first-name", "Ada", "--last-name", "Lovelace", "--guests", "2"])
        .args(["--from", "2019-03-01", "--till", "2019-03-04"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let booking: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(booking["id"], "-Nb1");
    assert_eq!(booking["placeTitle"], "Manhattan Mansion");
    assert_eq!(booking["userId"], "u1");
    assert_eq!(booking["guestNumber"], 2);
}

#[tokio::test]
async fn test_bookings_cancel_requires_yes_when_not_interactive() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    store_cmd(&server)
        .args(["bookings", "cancel", "-Nb1"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test]
async fn test_bookings_cancel_with_yes_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/my-bookings/-Nb1.json"))
        .and(query_param("auth", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    store_cmd(&server)
        .args(["-y", "bookings", "cancel", "-Nb1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("cancelled"));
}
