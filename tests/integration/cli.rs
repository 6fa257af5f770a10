//! End-to-end tests of the compiled binary
//!
//! These drive `skywalk` as a child process with `assert_cmd`, pointing it at
//! stub services through the `SKYWALK_DIRECTORY_URL` and `SKYWALK_APPVIEW_URL`
//! environment of the child. The stubs run on their own background runtime
//! (`StubServer::start_blocking`) so they keep serving while the test thread
//! blocks on the child process.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use crate::common::{StubServer, batch_entry, direct_record, embedded_record, post_record};

/// Mount a populated account: alice.test with two posts, three likes over
/// two authors, one repost, one follow, one block, and a batch response
/// covering every referenced identifier.
fn mount_account_fixture(directory: &StubServer, appview: &StubServer) {
    directory.mount("GET", "/alice.test", 200, r#"{"did":"did:plc:alice"}"#);
    appview.mount(
        "GET",
        "/repo/did:plc:alice",
        200,
        json!({
            "profile": {
                "uri": "at://did:plc:alice/app.bsky.actor.profile/self",
                "content": {"displayName": "Alice", "description": "test account"}
            },
            "posts": [
                post_record("p1", "first post", "2023-05-01T10:00:00Z"),
                post_record("p2", "second post", "2023-05-02T10:00:00Z"),
            ],
            "likes": [
                embedded_record("did:plc:bob", "l1", "2023-05-03T10:00:00Z"),
                embedded_record("did:plc:bob", "l2", "2023-05-03T11:00:00Z"),
                embedded_record("did:plc:carol", "l3", "2023-05-03T12:00:00Z"),
            ],
            "reposts": [embedded_record("did:plc:bob", "r1", "2023-05-04T10:00:00Z")],
            "follows": [direct_record("did:plc:dave", "f1", "2023-05-05T10:00:00Z")],
            "blocks": [direct_record("did:plc:eve", "b1", "2023-05-06T10:00:00Z")],
        })
        .to_string(),
    );
    directory.mount(
        "GET",
        "/batch/by_did",
        200,
        json!([
            batch_entry("did:plc:alice", "alice.test"),
            batch_entry("did:plc:bob", "bob.test"),
            batch_entry("did:plc:carol", "carol.test"),
            batch_entry("did:plc:dave", "dave.test"),
            batch_entry("did:plc:eve", "eve.test"),
        ])
        .to_string(),
    );
}

/// Binary pointed at the given stubs, with ambient config neutralized.
fn skywalk_cmd(directory: &StubServer, appview: &StubServer) -> Command {
    let mut cmd = Command::cargo_bin("skywalk").unwrap();
    cmd.env("SKYWALK_DIRECTORY_URL", directory.url())
        .env("SKYWALK_APPVIEW_URL", appview.url())
        .env_remove("SKYWALK_CONFIG_PATH");
    cmd
}

#[test]
fn test_walk_text_output() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    mount_account_fixture(&directory, &appview);

    skywalk_cmd(&directory, &appview)
        .args(["walk", "alice.test", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice.test"))
        .stdout(predicate::str::contains("did:plc:alice"))
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains(
            "2 posts · 1 reposts · 3 likes · 1 follows · 1 blocks",
        ))
        .stdout(predicate::str::contains(
            "5 referenced accounts, 5 resolved this walk",
        ))
        .stdout(predicate::str::contains("Likes (3)"))
        .stdout(predicate::str::contains("Blocks (1)"))
        .stdout(predicate::str::contains("bob.test"))
        .stdout(predicate::str::contains("eve.test"))
        .stdout(predicate::str::contains(
            "https://bsky.app/profile/did:plc:bob/post/l1",
        ));
}

#[test]
fn test_walk_json_output() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    mount_account_fixture(&directory, &appview);

    let assert = skywalk_cmd(&directory, &appview)
        .args(["walk", "alice.test", "--format", "json", "--no-progress"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(v["did"], "did:plc:alice");
    assert_eq!(v["handle"], "alice.test");
    assert_eq!(v["counts"]["posts"], 2);
    assert_eq!(v["counts"]["likes"], 3);
    assert_eq!(v["references"], 5);
    assert_eq!(v["resolved"], 5);
    assert!(v["degraded"].is_null());
    assert_eq!(v["handles"]["did:plc:bob"], "bob.test");
    assert_eq!(v["snapshot"]["posts"].as_array().unwrap().len(), 2);
}

#[test]
fn test_walk_text_limit_clips_sections() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    mount_account_fixture(&directory, &appview);

    skywalk_cmd(&directory, &appview)
        .args(["walk", "alice.test", "--limit", "1", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Likes (3)"))
        .stdout(predicate::str::contains("... and 2 more"));
}

#[test]
fn test_walk_rejects_unknown_format() {
    Command::cargo_bin("skywalk")
        .unwrap()
        .args(["walk", "whoever.test", "--format", "yaml", "--no-progress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid format 'yaml'"));
}

#[test]
fn test_walk_unknown_handle_reports_and_fails() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    directory.mount("GET", "/ghost.test", 404, r#"{"error":"redis: nil"}"#);

    skywalk_cmd(&directory, &appview)
        .args(["walk", "ghost.test", "--no-progress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Handle not found."))
        .stderr(predicate::str::contains("Check the spelling of 'ghost.test'"));
}

#[test]
fn test_walk_verbose_logs_phase_transitions() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    appview.mount("GET", "/repo/did:plc:alice", 200, "{}");
    directory.mount("GET", "/batch/by_did", 200, "[]");

    skywalk_cmd(&directory, &appview)
        .args(["walk", "did:plc:alice", "-v", "--no-progress"])
        .assert()
        .success()
        .stderr(predicate::str::contains("walk phase transition"));
}

#[test]
fn test_resolve_prints_identifier() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    directory.mount("GET", "/alice.test", 200, r#"{"did":"did:plc:alice"}"#);

    skywalk_cmd(&directory, &appview)
        .args(["resolve", "alice.test"])
        .assert()
        .success()
        .stdout(predicate::str::diff("did:plc:alice\n"));

    assert_eq!(appview.requests().len(), 0);
}

#[test]
fn test_resolve_json_output() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    directory.mount("GET", "/alice.test", 200, r#"{"did":"did:plc:alice"}"#);

    let assert = skywalk_cmd(&directory, &appview)
        .args(["resolve", "alice.test", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["input"], "alice.test");
    assert_eq!(v["did"], "did:plc:alice");
}

#[test]
fn test_stats_text_output() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    appview.mount(
        "GET",
        "/stats",
        200,
        json!({
            "total_authors": 52_000,
            "total_users": 1_250_000,
            "total_posts": 4_800_000,
            "mean_post_count": 92.3,
            "percentiles": [
                {"percentile": 0.5, "count": 14},
                {"percentile": 0.99, "count": 2200},
            ],
            "follower_percentiles": [{"percentile": 0.5, "value": 1803.7}],
            "brackets": [{"min": 100, "count": 4100}],
            "updated_at": "2023-05-01T12:00:00Z",
            "top_posters": [
                {"handle": "busy.test", "did": "did:plc:busy", "post_count": 90_000},
            ],
            "daily_data": [],
        })
        .to_string(),
    );

    skywalk_cmd(&directory, &appview)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Network statistics"))
        .stdout(predicate::str::contains("updated 2023-05-01 12:00:00 UTC"))
        .stdout(predicate::str::contains("1,250,000"))
        .stdout(predicate::str::contains("Mean posts per author: 92.30"))
        .stdout(predicate::str::contains("p50"))
        .stdout(predicate::str::contains("p99"))
        // Fractional follower percentile renders floored and grouped.
        .stdout(predicate::str::contains("1,803"))
        .stdout(predicate::str::contains("busy.test"));
}

#[test]
fn test_stats_failure_reports_and_fails() {
    let directory = StubServer::start_blocking();
    let appview = StubServer::start_blocking();
    appview.mount("GET", "/stats", 502, r#"{"error":"bad gateway"}"#);

    skywalk_cmd(&directory, &appview)
        .arg("stats")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch network statistics"));
}

#[test]
fn test_config_file_supplies_endpoints() {
    let directory = StubServer::start_blocking();
    directory.mount("GET", "/alice.test", 200, r#"{"did":"did:plc:alice"}"#);

    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!("directory_url = \"{}\"\n", directory.url()),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("skywalk").unwrap();
    cmd.env_remove("SKYWALK_DIRECTORY_URL")
        .env_remove("SKYWALK_APPVIEW_URL")
        .env_remove("SKYWALK_CONFIG_PATH")
        .args(["resolve", "alice.test", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("did:plc:alice"));
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("skywalk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("walk"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("skywalk")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skywalk"));
}
