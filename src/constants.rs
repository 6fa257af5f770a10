//! Global constants used throughout the skywalk codebase.
//!
//! This module contains upstream endpoint defaults, wire-format offsets,
//! and the fixed user-facing messages that are used across multiple
//! modules. Defining them centrally improves maintainability and makes
//! magic values more discoverable.

/// Default base URL of the identity directory.
///
/// The directory resolves handles to canonical identifiers
/// (`GET /{handle}`) and serves batch identifier-to-handle lookups
/// (`GET /batch/by_did`).
pub const DEFAULT_DIRECTORY_URL: &str = "https://plc.jazco.io";

/// Default base URL of the AppView.
///
/// The AppView serves full repository payloads (`GET /repo/{did}`) and
/// the aggregate network statistics document (`GET /stats`).
pub const DEFAULT_APPVIEW_URL: &str = "https://bsky-search.jazco.io";

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("skywalk/", env!("CARGO_PKG_VERSION"));

/// Scheme prefix identifying a canonical account identifier.
///
/// Inputs carrying this prefix are already canonical and bypass the
/// directory lookup entirely.
pub const DID_PREFIX: &str = "did:";

/// Sentinel error string the directory returns when a handle has no record.
///
/// Leaks from the directory's storage layer; translated to
/// [`MSG_HANDLE_NOT_FOUND`] before it reaches a user.
pub const HANDLE_NOT_FOUND_SENTINEL: &str = "redis: nil";

/// User-facing message for a handle with no directory record.
pub const MSG_HANDLE_NOT_FOUND: &str = "Handle not found.";

/// Generic user-facing message for a failed handle resolution.
pub const MSG_RESOLUTION_FAILED: &str = "An error occurred while resolving the handle.";

/// Generic user-facing message for a failed repository fetch.
pub const MSG_FETCH_FAILED: &str = "An error occurred while fetching the repository.";

/// Zero-based segment index of the account identifier in a reference locator.
///
/// Locators have the shape `at://<did>/<collection>/<rkey>`; splitting on
/// `/` puts the identifier at index 2 (the `//` after the scheme yields an
/// empty segment at index 1).
pub const LOCATOR_DID_SEGMENT: usize = 2;

/// Zero-based segment index of the record key in a reference locator.
pub const LOCATOR_RKEY_SEGMENT: usize = 4;

/// Base URL of the public app, used to build post permalinks.
pub const BLUESKY_APP_URL: &str = "https://bsky.app";

/// Base URL of the avatar CDN.
///
/// Avatar blobs render at `{AVATAR_CDN_URL}/{did}/{link}@jpeg`.
pub const AVATAR_CDN_URL: &str = "https://cdn.bsky.app/img/avatar/plain";

/// Default number of entries shown per collection in text output.
///
/// Zero means unlimited. Overridable per invocation with `--limit`.
pub const DEFAULT_DISPLAY_LIMIT: usize = 25;

/// Age in days beyond which daily statistics entries are discarded.
pub const STATS_DAILY_MAX_AGE_DAYS: i64 = 30;

/// Age in days below which daily statistics entries are discarded.
///
/// The most recent day is always incomplete upstream and would distort
/// any per-day comparison.
pub const STATS_DAILY_MIN_AGE_DAYS: i64 = 1;
