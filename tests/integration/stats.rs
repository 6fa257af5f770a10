//! Network statistics retrieval against a stubbed AppView

use chrono::{Duration, Utc};
use serde_json::json;

use skywalk::core::SkywalkError;
use skywalk::stats::StatsClient;

use crate::common::StubServer;

/// The fetched document is normalized: a future update stamp is clamped and
/// the daily series drops entries that are too old or still incomplete.
#[tokio::test]
async fn test_stats_fetch_normalizes_document() {
    let appview = StubServer::start().await;
    let now = Utc::now();

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
            "follower_percentiles": [
                {"percentile": 0.5, "value": 28.7},
            ],
            "brackets": [{"min": 100, "count": 4100}],
            "updated_at": (now + Duration::hours(6)).to_rfc3339(),
            "top_posters": [
                {"handle": "busy.test", "did": "did:plc:busy", "post_count": 90_000},
            ],
            "daily_data": [
                {"date": (now - Duration::days(45)).format("%Y-%m-%d").to_string(),
                 "num_posters": 1, "num_followers": 2, "num_likers": 3},
                {"date": (now - Duration::days(3)).format("%Y-%m-%d").to_string(),
                 "num_posters": 40_000, "num_followers": 9_000, "num_likers": 75_000},
                {"date": now.format("%Y-%m-%d").to_string(),
                 "num_posters": 5, "num_followers": 5, "num_likers": 5},
            ],
        })
        .to_string(),
    );

    let stats = StatsClient::new(appview.url()).fetch().await.unwrap();

    assert_eq!(stats.total_users, 1_250_000);
    assert_eq!(stats.total_authors, 52_000);
    assert_eq!(stats.percentiles.len(), 2);
    assert_eq!(stats.follower_percentiles[0].value, 28.7);
    assert_eq!(stats.top_posters[0].handle, "busy.test");

    // The upstream stamp was hours in the future; it never survives as such.
    assert!(stats.updated_at <= Utc::now());

    // Too old (45d) and still-accumulating (today) both drop.
    assert_eq!(stats.daily_data.len(), 1);
    assert_eq!(stats.daily_data[0].num_posters, 40_000);
}

#[tokio::test]
async fn test_stats_non_success_status_is_an_error() {
    let appview = StubServer::start().await;
    appview.mount("GET", "/stats", 502, r#"{"error":"bad gateway"}"#);

    let err = StatsClient::new(appview.url()).fetch().await.unwrap_err();
    match err {
        SkywalkError::StatsFetch { reason } => assert!(reason.contains("502")),
        other => panic!("Expected StatsFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stats_unreadable_document_is_an_error() {
    let appview = StubServer::start().await;
    appview.mount("GET", "/stats", 200, "this is not a statistics document");

    let err = StatsClient::new(appview.url()).fetch().await.unwrap_err();
    match err {
        SkywalkError::StatsFetch { reason } => {
            assert_eq!(reason, "unreadable statistics document");
        }
        other => panic!("Expected StatsFetch, got {other:?}"),
    }
}
