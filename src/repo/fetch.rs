//! Repository snapshot retrieval from the AppView
//!
//! One GET per walk, no retries, no configured timeout beyond the transport
//! default. The response body is validated as a tagged union before anything
//! is trusted: the AppView has been observed returning HTTP 200 with an error
//! envelope in the body, so a 200 alone proves nothing.

use serde::Deserialize;
use tracing::debug;

use crate::constants::{MSG_FETCH_FAILED, USER_AGENT};
use crate::core::SkywalkError;
use crate::identity::Did;

use super::model::RepositorySnapshot;

/// Error envelope the AppView returns on failure, sometimes inside a 200.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Fetch response, validated as a tagged union.
///
/// `Failure` must stay first: the snapshot shape has no required top-level
/// fields, so it would match any JSON object, error envelopes included.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepoResponse {
    Failure(ErrorEnvelope),
    Snapshot(RepositorySnapshot),
}

/// Client for the AppView's repository endpoint.
#[derive(Debug, Clone)]
pub struct RepoFetcher {
    client: reqwest::Client,
    appview_url: String,
}

impl RepoFetcher {
    /// Create a fetcher against the given AppView base URL.
    ///
    /// A trailing slash on the base URL is tolerated.
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

    /// Retrieve the full repository snapshot for a canonical identifier.
    ///
    /// # Errors
    ///
    /// [`SkywalkError::RepoFetch`] for every failure mode. The message is the
    /// upstream error when the body carried a readable envelope (whatever the
    /// HTTP status), otherwise the fixed generic fetch message.
    pub async fn fetch_snapshot(&self, did: &Did) -> Result<RepositorySnapshot, SkywalkError> {
        let url = format!("{}/repo/{}", self.appview_url, did);
        debug!(%did, "fetching repository snapshot");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                debug!(%did, error = %e, "repository request failed");
                SkywalkError::RepoFetch {
                    did: did.to_string(),
                    message: MSG_FETCH_FAILED.to_string(),
                }
            })?;

        let status = response.status();
        let parsed = match response.json::<RepoResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(%did, %status, error = %e, "unreadable repository response");
                return Err(SkywalkError::RepoFetch {
                    did: did.to_string(),
                    message: MSG_FETCH_FAILED.to_string(),
                });
            }
        };

        match parsed {
            RepoResponse::Snapshot(snapshot) if status.is_success() => {
                let counts = snapshot.counts();
                debug!(
                    %did,
                    posts = counts.posts,
                    reposts = counts.reposts,
                    likes = counts.likes,
                    follows = counts.follows,
                    blocks = counts.blocks,
                    "repository snapshot fetched"
                );
                Ok(snapshot)
            }
            RepoResponse::Snapshot(_) => {
                debug!(%did, %status, "repository request returned a failure status");
                Err(SkywalkError::RepoFetch {
                    did: did.to_string(),
                    message: MSG_FETCH_FAILED.to_string(),
                })
            }
            RepoResponse::Failure(envelope) => {
                debug!(%did, %status, error = %envelope.error, "repository response carried an error envelope");
                Err(SkywalkError::RepoFetch {
                    did: did.to_string(),
                    message: envelope.error,
                })
            }
        }
    }
}
