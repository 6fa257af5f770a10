//! Aggregate network statistics from the AppView
//!
//! One `GET /stats` returns the network-wide statistics document: totals,
//! post-count percentiles, follower percentiles, count brackets, top posters,
//! and a daily time series. The document is normalized on receipt before
//! anything renders it:
//!
//! - an `updated_at` in the future is clamped to one second before now
//!   (the AppView's clock occasionally runs ahead)
//! - the daily series is windowed to entries newer than 30 days and older
//!   than 1 day, because the most recent day is always incomplete upstream

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{STATS_DAILY_MAX_AGE_DAYS, STATS_DAILY_MIN_AGE_DAYS, USER_AGENT};
use crate::core::SkywalkError;

/// One post-count percentile: the count at a given percentile of authors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Percentile {
    /// Percentile as a fraction (0.5 is the median)
    pub percentile: f64,
    /// Post count at that percentile
    pub count: u64,
}

/// One follower-count percentile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FollowerPercentile {
    /// Percentile as a fraction
    pub percentile: f64,
    /// Follower count at that percentile; upstream interpolates between
    /// ranks, so the value can be fractional. Floored for display.
    pub value: f64,
}

/// Number of authors with at least `min` posts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Bracket {
    /// Lower bound of the bracket
    pub min: u64,
    /// Authors in the bracket
    pub count: u64,
}

/// One entry of the most-active-authors table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopPoster {
    pub handle: String,
    pub did: String,
    pub post_count: u64,
}

/// One day of network activity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailyDatapoint {
    /// Day stamp as reported upstream (date or full timestamp)
    pub date: String,
    #[serde(default)]
    pub num_posters: u64,
    #[serde(default)]
    pub num_followers: u64,
    #[serde(default)]
    pub num_likers: u64,
}

/// The network-wide statistics document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkStats {
    pub total_authors: u64,
    pub total_users: u64,
    pub total_posts: u64,
    pub mean_post_count: f64,
    #[serde(default)]
    pub percentiles: Vec<Percentile>,
    #[serde(default)]
    pub follower_percentiles: Vec<FollowerPercentile>,
    #[serde(default)]
    pub brackets: Vec<Bracket>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub top_posters: Vec<TopPoster>,
    #[serde(default)]
    pub daily_data: Vec<DailyDatapoint>,
}

impl NetworkStats {
    /// Clamp a future `updated_at` and window the daily series.
    ///
    /// `now` is injected so tests can pin the clock; callers pass
    /// [`Utc::now`].
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        if self.updated_at > now {
            debug!(updated_at = %self.updated_at, "clamping future update timestamp");
            self.updated_at = now - Duration::seconds(1);
        }

        let newest = now - Duration::days(STATS_DAILY_MIN_AGE_DAYS);
        let oldest = now - Duration::days(STATS_DAILY_MAX_AGE_DAYS);
        self.daily_data.retain(|point| match parse_day(&point.date) {
            Some(day) => day > oldest && day < newest,
            None => {
                debug!(date = %point.date, "dropping daily datapoint with unreadable date");
                false
            }
        });
    }
}

/// Parse a daily stamp as either a full timestamp or a bare date at midnight UTC.
fn parse_day(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Client for the AppView's statistics endpoint.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    appview_url: String,
}

impl StatsClient {
    /// Create a stats client against the given AppView base URL.
    pub fn new(appview_url: impl Into<String>) -> Self {
        let mut appview_url = appview_url.into();
        while appview_url.ends_with('/') {
            appview_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            appview_url,
        }
    }

    /// Fetch and normalize the statistics document.
    ///
    /// # Errors
    ///
    /// [`SkywalkError::StatsFetch`] on transport failure, a non-success
    /// status, or an unparseable document.
    pub async fn fetch(&self) -> Result<NetworkStats, SkywalkError> {
        let url = format!("{}/stats", self.appview_url);
        debug!("fetching network statistics");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| SkywalkError::StatsFetch {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkywalkError::StatsFetch {
                reason: format!("AppView returned status {status}"),
            });
        }

        let mut stats = response.json::<NetworkStats>().await.map_err(|e| {
            debug!(error = %e, "unreadable statistics document");
            SkywalkError::StatsFetch {
                reason: "unreadable statistics document".to_string(),
            }
        })?;

        stats.normalize(Utc::now());
        debug!(
            total_users = stats.total_users,
            daily_points = stats.daily_data.len(),
            "network statistics fetched"
        );
        Ok(stats)
    }
}
