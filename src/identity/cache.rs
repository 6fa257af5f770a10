//! Session-wide identifier-to-handle cache
//!
//! The cache is owned by the walk session and injected into renderers by
//! reference; it is never duplicated. Its write surface is deliberately
//! narrow: the only mutator is [`HandleCache::merge_batch`], crate-internal
//! and called exclusively by the batch resolver after a fully-parsed
//! successful response. A failed batch therefore leaves the cache exactly as
//! it was.
//!
//! Lookups for identifiers that were never resolved are not errors: the
//! contract is "absent means render the identifier verbatim", encoded in
//! [`HandleCache::display_name`].

use dashmap::DashMap;

use super::{Did, Handle};

/// Append-only mapping from [`Did`] to [`Handle`] for one investigation session.
///
/// Backed by a concurrent map so renderers can read while a (stale) walk is
/// still merging; entries are last-write-wins, which is safe because the
/// directory is the only authority and identifiers are globally unique.
#[derive(Debug, Default)]
pub struct HandleCache {
    entries: DashMap<Did, Handle>,
}

impl HandleCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up the current handle for an identifier.
    ///
    /// Returns `None` for identifiers the batch resolver has not (yet)
    /// resolved. `None` is an expected outcome, not a failure.
    #[must_use]
    pub fn get(&self, did: &Did) -> Option<Handle> {
        self.entries.get(did).map(|entry| entry.value().clone())
    }

    /// Whether an identifier has a resolved handle.
    #[must_use]
    pub fn has(&self, did: &Did) -> bool {
        self.entries.contains_key(did)
    }

    /// The display form of an identifier: its handle if resolved, otherwise
    /// the identifier verbatim.
    #[must_use]
    pub fn display_name(&self, did: &Did) -> String {
        match self.get(did) {
            Some(handle) => handle.as_str().to_string(),
            None => did.as_str().to_string(),
        }
    }

    /// Number of resolved identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge a fully-parsed batch of resolved pairs, overwriting stale entries.
    ///
    /// Only the batch resolver calls this, and only after the whole response
    /// parsed successfully. Returns the number of entries written.
    pub(crate) fn merge_batch(&self, pairs: impl IntoIterator<Item = (Did, Handle)>) -> usize {
        let mut merged = 0;
        for (did, handle) in pairs {
            self.entries.insert(did, handle);
            merged += 1;
        }
        merged
    }
}
