//! Repository payloads: fetching, wire model, and reference extraction
//!
//! A walk needs three things from this module, in order:
//!
//! 1. [`RepoFetcher`] retrieves the full [`RepositorySnapshot`] for a
//!    canonical identifier, defending against error envelopes hidden inside
//!    success responses.
//! 2. [`extract_references`] walks the snapshot's reference-bearing
//!    collections and produces the distinct set of accounts it points at.
//! 3. [`at_uri`] supplies the positional locator parsing both extraction and
//!    permalink rendering rely on.
//!
//! Snapshots are immutable once fetched. There is no incremental update
//! path; a new walk replaces the snapshot wholesale.

pub mod at_uri;
pub mod extract;
pub mod fetch;
pub mod model;

pub use extract::extract_references;
pub use fetch::RepoFetcher;
pub use model::{CollectionCounts, RepositorySnapshot};
