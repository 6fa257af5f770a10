//! End-to-end pipeline tests against stubbed directory and AppView services
//!
//! Each test mounts exactly the endpoints the scenario needs; anything else
//! the pipeline requests hits the stub's 404 route and fails the walk loudly.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Notify;

use skywalk::core::SkywalkError;
use skywalk::identity::Did;
use skywalk::utils::progress::WalkProgress;
use skywalk::walker::{WalkSession, WalkStatus};

use crate::common::{StubServer, batch_entry, direct_record, embedded_record, post_record};

fn quiet() -> WalkProgress {
    WalkProgress::new(false)
}

fn did(s: &str) -> Did {
    Did::parse(s).unwrap()
}

/// A populated repository referencing four other accounts, with one author
/// referenced twice (a like and a repost). The walk must resolve the input,
/// fetch the snapshot, and resolve all references plus the owner in a single
/// batch round trip.
#[tokio::test]
async fn test_walk_resolves_fetches_and_batch_resolves() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

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

    let session = WalkSession::new(directory.url(), appview.url());
    let status = session.walk("alice.test", &quiet()).await.unwrap();
    let WalkStatus::Completed(outcome) = status else {
        panic!("Expected a completed walk");
    };

    assert_eq!(outcome.did.as_str(), "did:plc:alice");
    let counts = outcome.snapshot.counts();
    assert_eq!(counts.posts, 2);
    assert_eq!(counts.reposts, 1);
    assert_eq!(counts.likes, 3);
    assert_eq!(counts.follows, 1);
    assert_eq!(counts.blocks, 1);

    // Five distinct identifiers: four referenced accounts plus the owner.
    assert_eq!(outcome.references, 5);
    assert_eq!(outcome.resolved, 5);
    assert!(!outcome.is_degraded());

    assert_eq!(session.cache().len(), 5);
    assert_eq!(session.cache().display_name(&did("did:plc:bob")), "bob.test");
    assert_eq!(session.cache().display_name(&did("did:plc:eve")), "eve.test");

    // One lookup, one batch, nothing else.
    assert_eq!(directory.hits("GET", "/alice.test"), 1);
    assert_eq!(directory.hits("GET", "/batch/by_did"), 1);
    assert_eq!(appview.hits("GET", "/repo/did:plc:alice"), 1);

    // The batch body lists every identifier once, sorted.
    let batch = directory
        .requests()
        .into_iter()
        .find(|r| r.path == "/batch/by_did")
        .unwrap();
    let sent: Vec<String> = serde_json::from_str(&batch.body).unwrap();
    assert_eq!(
        sent,
        vec![
            "did:plc:alice",
            "did:plc:bob",
            "did:plc:carol",
            "did:plc:dave",
            "did:plc:eve",
        ]
    );
}

/// Canonical input never touches the directory's lookup endpoint, and an
/// empty repository still batches the owner's own identifier.
#[tokio::test]
async fn test_canonical_input_skips_directory_lookup() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

    appview.mount("GET", "/repo/did:plc:alice", 200, "{}");
    directory.mount(
        "GET",
        "/batch/by_did",
        200,
        json!([batch_entry("did:plc:alice", "alice.test")]).to_string(),
    );

    let session = WalkSession::new(directory.url(), appview.url());
    let status = session.walk("did:plc:alice", &quiet()).await.unwrap();
    let WalkStatus::Completed(outcome) = status else {
        panic!("Expected a completed walk");
    };

    assert_eq!(outcome.references, 1);
    assert_eq!(outcome.resolved, 1);
    assert_eq!(session.cache().display_name(&did("did:plc:alice")), "alice.test");

    // The only directory traffic is the batch.
    let recorded = directory.requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/batch/by_did");
    let sent: Vec<String> = serde_json::from_str(&recorded[0].body).unwrap();
    assert_eq!(sent, vec!["did:plc:alice"]);
}

/// Mixed-case handle input is lowercased before the directory lookup.
#[tokio::test]
async fn test_handle_lookup_is_lowercased() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

    // Only the lowercase path is mounted; a non-normalized lookup would 404.
    directory.mount("GET", "/mixedcase.test", 200, r#"{"did":"did:plc:mixed"}"#);
    appview.mount("GET", "/repo/did:plc:mixed", 200, "{}");
    directory.mount("GET", "/batch/by_did", 200, "[]");

    let session = WalkSession::new(directory.url(), appview.url());
    let status = session.walk("MixedCase.Test", &quiet()).await.unwrap();
    let WalkStatus::Completed(outcome) = status else {
        panic!("Expected a completed walk");
    };

    assert_eq!(outcome.did.as_str(), "did:plc:mixed");
    assert_eq!(directory.hits("GET", "/mixedcase.test"), 1);
}

/// A 200 response whose body is an error envelope is a failed fetch, and the
/// walk halts before any batch resolution happens.
#[tokio::test]
async fn test_error_envelope_in_success_status_halts_walk() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

    appview.mount("GET", "/repo/did:plc:gone", 200, r#"{"error":"account not found"}"#);

    let session = WalkSession::new(directory.url(), appview.url());
    let err = session.walk("did:plc:gone", &quiet()).await.unwrap_err();

    match err {
        SkywalkError::RepoFetch { did, message } => {
            assert_eq!(did, "did:plc:gone");
            assert_eq!(message, "account not found");
        }
        other => panic!("Expected RepoFetch, got {other:?}"),
    }

    // The walk halted: no batch request, no cache writes.
    assert!(directory.requests().is_empty());
    assert!(session.cache().is_empty());
}

/// The directory's storage-layer sentinel for a missing handle surfaces as
/// the fixed friendly message, never as the raw sentinel.
#[tokio::test]
async fn test_missing_handle_maps_to_fixed_message() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

    directory.mount("GET", "/ghost.test", 404, r#"{"error":"redis: nil"}"#);

    let session = WalkSession::new(directory.url(), appview.url());
    let err = session.walk("ghost.test", &quiet()).await.unwrap_err();

    match &err {
        SkywalkError::HandleNotFound { handle } => assert_eq!(handle, "ghost.test"),
        other => panic!("Expected HandleNotFound, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Handle not found.");
    assert!(appview.requests().is_empty());
}

/// A failed batch round trip degrades the walk instead of failing it: the
/// outcome is usable, carries the failure reason, and the cache is untouched.
#[tokio::test]
async fn test_batch_failure_degrades_instead_of_failing() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

    directory.mount("GET", "/carol.test", 200, r#"{"did":"did:plc:carol"}"#);
    appview.mount(
        "GET",
        "/repo/did:plc:carol",
        200,
        json!({
            "likes": [embedded_record("did:plc:bob", "l1", "2023-05-03T10:00:00Z")],
        })
        .to_string(),
    );
    directory.mount("GET", "/batch/by_did", 500, r#"{"error":"directory overloaded"}"#);

    let session = WalkSession::new(directory.url(), appview.url());
    let status = session.walk("carol.test", &quiet()).await.unwrap();
    let WalkStatus::Completed(outcome) = status else {
        panic!("Expected a completed walk");
    };

    assert!(outcome.is_degraded());
    assert!(outcome.degraded.as_ref().unwrap().contains("directory overloaded"));
    assert_eq!(outcome.references, 2);
    assert_eq!(outcome.resolved, 0);
    assert!(session.cache().is_empty());
    assert_eq!(directory.hits("GET", "/batch/by_did"), 1);
}

/// A batch response covering only a subset of the requested identifiers is
/// still a success: covered identifiers land in the cache, omitted ones stay
/// absent and display as the raw identifier.
#[tokio::test]
async fn test_partial_batch_keeps_unresolved_identifiers_verbatim() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;

    directory.mount("GET", "/walker.test", 200, r#"{"did":"did:plc:walker"}"#);
    appview.mount(
        "GET",
        "/repo/did:plc:walker",
        200,
        json!({
            "likes": [
                embedded_record("did:plc:known", "l1", "2023-05-03T10:00:00Z"),
                embedded_record("did:plc:unlisted", "l2", "2023-05-03T11:00:00Z"),
            ],
        })
        .to_string(),
    );
    // Three identifiers go out; the directory only knows two of them.
    directory.mount(
        "GET",
        "/batch/by_did",
        200,
        json!([
            batch_entry("did:plc:known", "known.test"),
            batch_entry("did:plc:walker", "walker.test"),
        ])
        .to_string(),
    );

    let session = WalkSession::new(directory.url(), appview.url());
    let status = session.walk("walker.test", &quiet()).await.unwrap();
    let WalkStatus::Completed(outcome) = status else {
        panic!("Expected a completed walk");
    };

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.references, 3);
    assert_eq!(outcome.resolved, 2);

    let cache = session.cache();
    assert_eq!(cache.len(), 2);
    assert!(cache.has(&did("did:plc:known")));
    assert_eq!(cache.get(&did("did:plc:known")).unwrap().as_str(), "known.test");

    // The omitted identifier is not mapped to anything, and its display
    // form falls back to the identifier itself.
    assert!(!cache.has(&did("did:plc:unlisted")));
    assert!(cache.get(&did("did:plc:unlisted")).is_none());
    assert_eq!(cache.display_name(&did("did:plc:unlisted")), "did:plc:unlisted");

    assert_eq!(directory.hits("GET", "/batch/by_did"), 1);
}

/// A walk that finishes after a newer walk has started reports itself
/// superseded, even when its pipeline would have failed.
#[tokio::test]
async fn test_newer_walk_supersedes_older() {
    let directory = StubServer::start().await;
    let appview = StubServer::start().await;
    let gate = Arc::new(Notify::new());

    // The older walk's resolution stalls until the gate opens; its
    // repository route is never mounted, so once released it would fail.
    directory.mount_gated(
        "GET",
        "/slow.test",
        200,
        r#"{"did":"did:plc:slow"}"#,
        Arc::clone(&gate),
    );
    appview.mount("GET", "/repo/did:plc:fast", 200, "{}");
    directory.mount(
        "GET",
        "/batch/by_did",
        200,
        json!([batch_entry("did:plc:fast", "fast.test")]).to_string(),
    );

    let session = WalkSession::new(directory.url(), appview.url());
    let progress = quiet();

    // The first future claims its sequence ticket before the second starts;
    // the second runs to completion and only then releases the first.
    let (older, newer) = tokio::join!(session.walk("slow.test", &progress), async {
        let status = session.walk("did:plc:fast", &progress).await;
        gate.notify_one();
        status
    });

    assert!(matches!(older.unwrap(), WalkStatus::Superseded));
    let WalkStatus::Completed(outcome) = newer.unwrap() else {
        panic!("Expected the newer walk to complete");
    };
    assert_eq!(outcome.did.as_str(), "did:plc:fast");

    assert!(session.cache().has(&did("did:plc:fast")));
    assert!(!session.cache().has(&did("did:plc:slow")));
}

/// An unreachable directory yields the generic resolution message, not a
/// transport error dump.
#[tokio::test]
async fn test_unreachable_directory_reports_generic_message() {
    // Nothing listens on port 1; the connection is refused immediately.
    let session = WalkSession::new("http://127.0.0.1:1", "http://127.0.0.1:1");
    let err = session.walk("ghost.test", &quiet()).await.unwrap_err();

    match &err {
        SkywalkError::HandleResolution { handle, message } => {
            assert_eq!(handle, "ghost.test");
            assert_eq!(message, "An error occurred while resolving the handle.");
        }
        other => panic!("Expected HandleResolution, got {other:?}"),
    }
}
