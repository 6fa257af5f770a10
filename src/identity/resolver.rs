//! Single and batch identity resolution against the directory
//!
//! The [`IdentityResolver`] is the only component that talks to the directory
//! service. It performs two operations:
//!
//! - [`resolve`](IdentityResolver::resolve): handle-or-identifier input to a
//!   canonical [`Did`], with at most one round trip. Input already carrying
//!   the `did:` scheme passes through without touching the network.
//! - [`resolve_batch`](IdentityResolver::resolve_batch): a whole set of
//!   identifiers to handles in exactly one round trip, merged into the
//!   [`HandleCache`]. A repository referencing N distinct accounts costs one
//!   network call, not N.
//!
//! Responses are validated through explicit schemas: each endpoint's body is
//! parsed as either its success shape or an error envelope, never inspected
//! field-by-field. The directory's storage-layer sentinel for a missing
//! handle record is translated to a fixed friendly message before it can
//! reach a user.

use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::constants::{HANDLE_NOT_FOUND_SENTINEL, MSG_RESOLUTION_FAILED, USER_AGENT};
use crate::core::SkywalkError;

use super::{Did, Handle, HandleCache};

/// Successful single-resolution body: the canonical identifier for a handle.
#[derive(Debug, Deserialize)]
struct ResolvedDid {
    did: String,
}

/// Error envelope the directory and AppView return on failure.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Single-resolution response, validated as a tagged union.
///
/// The failure variant comes first so a body carrying an `error` field is
/// classified as a failure even if other fields are present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DirectoryResponse {
    Failure(ErrorEnvelope),
    Resolved(ResolvedDid),
}

/// One resolved pair from the batch endpoint.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    did: String,
    handle: String,
}

/// Batch-resolution response, validated as a tagged union.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchResponse {
    Failure(ErrorEnvelope),
    Resolved(Vec<BatchEntry>),
}

/// Client for the identity directory.
///
/// Holds the base URL and a reusable HTTP client. Cheap to clone; all state
/// is shared.
///
/// # Examples
///
/// ```rust,no_run
/// use skywalk::identity::IdentityResolver;
///
/// # async fn example() -> anyhow::Result<()> {
/// let resolver = IdentityResolver::new("https://plc.jazco.io");
/// let did = resolver.resolve("alice.bsky.social").await?;
/// println!("{did}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    client: reqwest::Client,
    directory_url: String,
}

impl IdentityResolver {
    /// Create a resolver against the given directory base URL.
    ///
    /// A trailing slash on the base URL is tolerated.
    pub fn new(directory_url: impl Into<String>) -> Self {
        let mut directory_url = directory_url.into();
        while directory_url.ends_with('/') {
            directory_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            directory_url,
        }
    }

    /// Resolve user input (handle or canonical identifier) to a [`Did`].
    ///
    /// Input with the `did:` scheme is returned unchanged with zero network
    /// calls. Anything else is lowercased and looked up in the directory with
    /// a single `GET /{handle}`.
    ///
    /// # Errors
    ///
    /// - [`SkywalkError::HandleNotFound`] when the directory has no record
    ///   for the handle (translated from the upstream sentinel)
    /// - [`SkywalkError::HandleResolution`] for any other lookup failure,
    ///   carrying the upstream message when one was readable
    /// - [`SkywalkError::InvalidIdentifier`] for empty input or a malformed
    ///   `did:` string
    pub async fn resolve(&self, input: &str) -> Result<Did, SkywalkError> {
        let input = input.trim();
        if Did::is_canonical(input) {
            debug!(input, "input already canonical, skipping directory lookup");
            return Did::parse(input);
        }
        if input.is_empty() {
            return Err(SkywalkError::InvalidIdentifier {
                input: String::new(),
                reason: "empty input".to_string(),
            });
        }

        // Batch lookups are case-insensitive on the wire; single lookups
        // must match that policy.
        let handle = input.to_lowercase();
        let url = format!("{}/{handle}", self.directory_url);
        debug!(%handle, "resolving handle via directory");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                debug!(%handle, error = %e, "directory request failed");
                SkywalkError::HandleResolution {
                    handle: handle.clone(),
                    message: MSG_RESOLUTION_FAILED.to_string(),
                }
            })?;

        let status = response.status();
        let body = match response.json::<DirectoryResponse>().await {
            Ok(body) => body,
            Err(e) => {
                debug!(%handle, %status, error = %e, "unreadable directory response");
                return Err(SkywalkError::HandleResolution {
                    handle,
                    message: MSG_RESOLUTION_FAILED.to_string(),
                });
            }
        };

        match body {
            DirectoryResponse::Resolved(resolved) if status.is_success() => {
                let did = Did::parse(&resolved.did).map_err(|e| {
                    warn!(%handle, error = %e, "directory returned a malformed identifier");
                    SkywalkError::HandleResolution {
                        handle: handle.clone(),
                        message: MSG_RESOLUTION_FAILED.to_string(),
                    }
                })?;
                debug!(%handle, %did, "handle resolved");
                Ok(did)
            }
            DirectoryResponse::Resolved(_) => {
                debug!(%handle, %status, "directory returned a success body with a failure status");
                Err(SkywalkError::HandleResolution {
                    handle,
                    message: MSG_RESOLUTION_FAILED.to_string(),
                })
            }
            DirectoryResponse::Failure(envelope) => Err(translate_resolution_failure(handle, envelope)),
        }
    }

    /// Resolve a set of identifiers to handles in one round trip, merging the
    /// result into `cache`.
    ///
    /// Issues a single `GET /batch/by_did` whose JSON array body lists every
    /// identifier (already lowercase by construction, sorted for a stable
    /// wire form). An empty set short-circuits with zero merges and no
    /// network call.
    ///
    /// On success every returned `{did, handle}` pair is written to the
    /// cache, overwriting stale entries, and the number of merged pairs is
    /// returned. Identifiers absent from the response stay absent from the
    /// cache. On any failure the cache is untouched.
    ///
    /// # Errors
    ///
    /// [`SkywalkError::BatchResolution`] for a failed round trip, a non-success
    /// status, or an unparseable response. Callers treat this as non-fatal and
    /// fall back to rendering raw identifiers.
    pub async fn resolve_batch(
        &self,
        dids: &HashSet<Did>,
        cache: &HandleCache,
    ) -> Result<usize, SkywalkError> {
        if dids.is_empty() {
            debug!("no identifiers referenced, skipping batch resolution");
            return Ok(0);
        }

        let mut body: Vec<&str> = dids.iter().map(Did::as_str).collect();
        body.sort_unstable();
        debug!(count = body.len(), "resolving identifier batch via directory");

        let url = format!("{}/batch/by_did", self.directory_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|e| SkywalkError::BatchResolution {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let parsed = response.json::<BatchResponse>().await.map_err(|e| {
            debug!(%status, error = %e, "unreadable batch response");
            SkywalkError::BatchResolution {
                reason: format!("unreadable response (status {status})"),
            }
        })?;

        let entries = match parsed {
            BatchResponse::Resolved(entries) if status.is_success() => entries,
            BatchResponse::Resolved(_) => {
                return Err(SkywalkError::BatchResolution {
                    reason: format!("directory returned status {status}"),
                });
            }
            BatchResponse::Failure(envelope) => {
                return Err(SkywalkError::BatchResolution {
                    reason: envelope.error,
                });
            }
        };

        // The response parsed in full; only now does the cache change.
        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            match Did::parse(&entry.did) {
                Ok(did) => pairs.push((did, Handle::new(entry.handle))),
                Err(e) => {
                    warn!(did = %entry.did, error = %e, "skipping malformed identifier in batch response");
                }
            }
        }
        let merged = cache.merge_batch(pairs);
        debug!(merged, requested = dids.len(), "batch resolution merged into cache");
        Ok(merged)
    }
}

/// Map a directory error envelope to the resolution error a user should see.
///
/// The storage-layer sentinel for "no record" becomes [`SkywalkError::HandleNotFound`]
/// with its fixed message; everything else passes the upstream message through.
fn translate_resolution_failure(handle: String, envelope: ErrorEnvelope) -> SkywalkError {
    if envelope.error == HANDLE_NOT_FOUND_SENTINEL {
        debug!(%handle, "directory has no record for handle");
        return SkywalkError::HandleNotFound {
            handle,
        };
    }
    SkywalkError::HandleResolution {
        handle,
        message: envelope.error,
    }
}
