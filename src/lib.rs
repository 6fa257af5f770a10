//! Skywalk - account repository inspector
//!
//! Skywalk turns one public social-network account into a display-ready
//! picture: every post, repost, like, follow, and block, with each
//! referenced account shown by its human-readable handle instead of an
//! opaque identifier.
//!
//! # Pipeline
//!
//! A walk is four strictly sequential steps:
//!
//! 1. **Resolve** - the submitted handle becomes a canonical identifier via
//!    one directory lookup; canonical input skips the network entirely
//! 2. **Fetch** - the AppView serves the account's full repository snapshot
//! 3. **Extract** - a pure scan collects every identifier the snapshot
//!    references, deduplicated
//! 4. **Batch-resolve** - one round trip maps the whole reference set to
//!    handles, merged into a session-wide cache
//!
//! The batch step is the scalability property that makes the tool usable:
//! a repository referencing N distinct accounts costs O(1) lookups, not
//! O(N). It is also deliberately non-fatal; when it fails the walk still
//! completes and references render as raw identifiers.
//!
//! # Core Modules
//!
//! - [`walker`] - orchestration: phases, single-flight guard, outcomes
//! - [`identity`] - identifier and handle types, directory client, cache
//! - [`repo`] - snapshot model, AppView client, reference extraction
//! - [`stats`] - network-wide statistics document and client
//!
//! # Supporting Modules
//!
//! - [`cli`] - command-line surface (`walk`, `resolve`, `stats`)
//! - [`config`] - endpoint configuration file and environment overrides
//! - [`constants`] - endpoint defaults, wire offsets, fixed messages
//! - [`core`] - error taxonomy and user-facing error presentation
//! - [`utils`] - terminal progress spinner
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Walk an account by handle or identifier
//! skywalk walk alice.bsky.social
//! skywalk walk did:plc:abc123 --format json --limit 0
//!
//! # Resolve a handle to its identifier
//! skywalk resolve alice.bsky.social
//!
//! # Aggregate network statistics
//! skywalk stats
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod identity;
pub mod repo;
pub mod stats;
pub mod utils;
pub mod walker;
