//! Identifier extraction from repository snapshots
//!
//! [`extract_references`] walks the four reference-bearing collections and
//! produces the set of distinct accounts the repository points at. Likes and
//! reposts reference through an embedded locator; follows and blocks carry
//! the identifier directly. The result feeds the batch resolver, so order is
//! irrelevant and duplicates collapse.
//!
//! The walk never fails: absent collections contribute nothing, and entries
//! whose locator or identifier is malformed are skipped rather than aborting
//! the extraction.

use std::collections::HashSet;
use tracing::debug;

use crate::identity::Did;

use super::at_uri;
use super::model::RepositorySnapshot;

/// Collect every distinct account identifier referenced by the snapshot.
///
/// Pure with respect to the snapshot: no I/O, deterministic output set.
/// Identifiers are normalized through [`Did::parse`], so the set's keys agree
/// with batch resolution and cache lookups on case.
///
/// # Examples
///
/// ```rust
/// use skywalk::repo::{RepositorySnapshot, extract_references};
///
/// let snapshot = RepositorySnapshot::default();
/// assert!(extract_references(&snapshot).is_empty());
/// ```
#[must_use]
pub fn extract_references(snapshot: &RepositorySnapshot) -> HashSet<Did> {
    let mut references = HashSet::new();

    for like in &snapshot.likes {
        insert_locator_reference(&mut references, &like.content.subject.uri);
    }
    for follow in &snapshot.follows {
        insert_direct_reference(&mut references, &follow.content.subject);
    }
    for block in &snapshot.blocks {
        insert_direct_reference(&mut references, &block.content.subject);
    }
    for repost in &snapshot.reposts {
        insert_locator_reference(&mut references, &repost.content.subject.uri);
    }

    references
}

fn insert_locator_reference(references: &mut HashSet<Did>, uri: &str) {
    let Some(raw) = at_uri::locator_did(uri) else {
        debug!(uri, "skipping reference with malformed locator");
        return;
    };
    insert_direct_reference(references, raw);
}

fn insert_direct_reference(references: &mut HashSet<Did>, raw: &str) {
    match Did::parse(raw) {
        Ok(did) => {
            references.insert(did);
        }
        Err(e) => {
            debug!(raw, error = %e, "skipping malformed identifier reference");
        }
    }
}
