//! Walk orchestration: one account in, a display-ready picture out
//!
//! A walk runs the full pipeline for a single account: resolve the input to
//! a canonical identifier, fetch the repository snapshot, collect every
//! identifier the snapshot references, then resolve those to handles in one
//! batch. [`WalkSession`] owns the pieces and the shared
//! [`HandleCache`](crate::identity::HandleCache) that batch resolution fills.
//!
//! The pipeline is strictly sequential, but the session itself may be asked
//! to walk again while a walk is still in flight. Each walk takes a ticket
//! from a monotonic sequence and checks it once at the end: if a newer walk
//! started in the meantime the finished walk reports
//! [`WalkStatus::Superseded`] and its outcome (including any error) is
//! discarded. Cache writes from a superseded walk are kept, since the cache
//! only ever grows toward the same authoritative data.
//!
//! Batch resolution failing does not fail the walk. The outcome still
//! reaches [`WalkPhase::Ready`] and carries the failure message in
//! [`WalkOutcome::degraded`], so callers can render raw identifiers and
//! surface a soft warning instead of losing the whole view.
//!
//! # Examples
//!
//! ```rust,no_run
//! use skywalk::utils::progress::WalkProgress;
//! use skywalk::walker::{WalkSession, WalkStatus};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let session = WalkSession::new("https://plc.jazco.io", "https://bsky-search.jazco.io");
//! let progress = WalkProgress::new(false);
//!
//! match session.walk("alice.bsky.social", &progress).await? {
//!     WalkStatus::Completed(outcome) => {
//!         println!("{} referenced accounts", outcome.references);
//!     }
//!     WalkStatus::Superseded => {}
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::core::SkywalkError;
use crate::identity::{Did, HandleCache, IdentityResolver};
use crate::repo::{RepoFetcher, RepositorySnapshot, extract_references};
use crate::utils::progress::WalkProgress;

/// The stages a walk moves through, in order.
///
/// `Error` is reachable from `Resolving` and `Fetching`; a batch resolution
/// failure does not produce it, the walk still reaches `Ready` degraded.
/// Extraction cannot fail, so `Extracting` always advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPhase {
    /// No walk started yet.
    Idle,
    /// Turning the submitted input into a canonical identifier.
    Resolving,
    /// Retrieving the repository snapshot.
    Fetching,
    /// Collecting referenced identifiers from the snapshot.
    Extracting,
    /// Resolving referenced identifiers to handles in one round trip.
    BatchResolving,
    /// The walk finished and its outcome is usable.
    Ready,
    /// The walk halted on a fatal error.
    Error,
}

impl WalkPhase {
    /// Spinner text shown while this phase is active.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "Waiting",
            Self::Resolving => "Resolving identity",
            Self::Fetching => "Fetching repository",
            Self::Extracting => "Collecting referenced accounts",
            Self::BatchResolving => "Resolving referenced handles",
            Self::Ready => "Ready",
            Self::Error => "Failed",
        }
    }
}

impl fmt::Display for WalkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::BatchResolving => "batch-resolving",
            Self::Ready => "ready",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Everything a completed walk produced.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Canonical identifier the input resolved to.
    pub did: Did,
    /// The repository snapshot as fetched.
    pub snapshot: RepositorySnapshot,
    /// Distinct identifiers submitted for batch resolution, the snapshot's
    /// references plus the account itself.
    pub references: usize,
    /// Identifier/handle pairs the batch round trip merged into the cache.
    pub resolved: usize,
    /// Present when batch resolution failed: the walk is usable but handles
    /// are missing, and this carries the failure message for a soft warning.
    pub degraded: Option<String>,
}

impl WalkOutcome {
    /// Whether handle enrichment was lost to a batch resolution failure.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// How a walk ended relative to other walks on the same session.
#[derive(Debug)]
pub enum WalkStatus {
    /// The walk finished and no newer walk had started; the outcome is
    /// current.
    Completed(WalkOutcome),
    /// A newer walk started while this one was in flight. The outcome was
    /// discarded and nothing about it should be shown.
    Superseded,
}

/// One investigation session: the resolver, the fetcher, and the handle
/// cache they share across walks.
///
/// The cache is created empty and only grows; walking a second account adds
/// to it rather than replacing it. Renderers borrow the cache through
/// [`cache`](Self::cache), they never own a copy.
pub struct WalkSession {
    resolver: IdentityResolver,
    fetcher: RepoFetcher,
    cache: HandleCache,
    sequence: AtomicU64,
}

impl WalkSession {
    /// Create a session talking to the given directory and AppView bases.
    #[must_use]
    pub fn new(directory_url: impl Into<String>, appview_url: impl Into<String>) -> Self {
        Self {
            resolver: IdentityResolver::new(directory_url),
            fetcher: RepoFetcher::new(appview_url),
            cache: HandleCache::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// The identifier-to-handle cache batch resolution fills.
    #[must_use]
    pub fn cache(&self) -> &HandleCache {
        &self.cache
    }

    /// Walk one account through the full pipeline.
    ///
    /// Takes the next sequence ticket, runs resolve, fetch, extract and
    /// batch-resolve, then checks the ticket once: a walk that is no longer
    /// the newest returns [`WalkStatus::Superseded`] and discards its result,
    /// errors included.
    ///
    /// # Errors
    ///
    /// [`SkywalkError::HandleResolution`], [`SkywalkError::HandleNotFound`]
    /// or [`SkywalkError::InvalidIdentifier`] when resolution fails, and
    /// [`SkywalkError::RepoFetch`] when the snapshot cannot be retrieved.
    /// Batch resolution failures are not errors here; they surface through
    /// [`WalkOutcome::degraded`].
    pub async fn walk(
        &self,
        input: &str,
        progress: &WalkProgress,
    ) -> Result<WalkStatus, SkywalkError> {
        let run = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(run, input, "starting walk");

        let result = self.run_pipeline(input, progress).await;

        if self.sequence.load(Ordering::SeqCst) != run {
            debug!(run, "walk superseded by a newer submission, discarding result");
            return Ok(WalkStatus::Superseded);
        }
        result.map(WalkStatus::Completed)
    }

    async fn run_pipeline(
        &self,
        input: &str,
        progress: &WalkProgress,
    ) -> Result<WalkOutcome, SkywalkError> {
        let mut phase = WalkPhase::Idle;

        advance(&mut phase, WalkPhase::Resolving, progress);
        let did = match self.resolver.resolve(input).await {
            Ok(did) => did,
            Err(e) => {
                advance(&mut phase, WalkPhase::Error, progress);
                return Err(e);
            }
        };

        advance(&mut phase, WalkPhase::Fetching, progress);
        let snapshot = match self.fetcher.fetch_snapshot(&did).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                advance(&mut phase, WalkPhase::Error, progress);
                return Err(e);
            }
        };

        advance(&mut phase, WalkPhase::Extracting, progress);
        let mut references = extract_references(&snapshot);
        // The account's own handle is wanted for rendering too.
        references.insert(did.clone());

        advance(&mut phase, WalkPhase::BatchResolving, progress);
        let (resolved, degraded) = match self.resolver.resolve_batch(&references, &self.cache).await
        {
            Ok(merged) => (merged, None),
            Err(e) => {
                warn!(error = %e, "batch resolution failed, identifiers will render raw");
                (0, Some(e.to_string()))
            }
        };

        advance(&mut phase, WalkPhase::Ready, progress);
        Ok(WalkOutcome {
            did,
            snapshot,
            references: references.len(),
            resolved,
            degraded,
        })
    }
}

/// Move to the next phase, logging the transition and keeping the spinner
/// text current. The terminal phases clear the spinner so rendered output
/// never interleaves with it.
fn advance(phase: &mut WalkPhase, next: WalkPhase, progress: &WalkProgress) {
    debug!(from = %phase, to = %next, "walk phase transition");
    *phase = next;
    match next {
        WalkPhase::Ready | WalkPhase::Error => progress.finish_and_clear(),
        _ => progress.set_phase(next.message()),
    }
}
