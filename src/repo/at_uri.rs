//! Reference locator parsing
//!
//! Locators are `/`-delimited compound strings of the form
//! `at://<did>/<collection>/<rkey>`. Splitting on `/` yields the scheme at
//! index 0, an empty segment at index 1 (from the `//`), the owning account's
//! identifier at index 2, the collection at index 3, and the record key at
//! index 4. Only the identifier and record key positions are consumed here.

use crate::constants::{LOCATOR_DID_SEGMENT, LOCATOR_RKEY_SEGMENT};

/// The account identifier segment of a locator, if present and non-empty.
#[must_use]
pub fn locator_did(uri: &str) -> Option<&str> {
    segment(uri, LOCATOR_DID_SEGMENT)
}

/// The record key segment of a locator, if present and non-empty.
///
/// Used to rebuild permalinks for posts referenced by likes and reposts.
#[must_use]
pub fn locator_rkey(uri: &str) -> Option<&str> {
    segment(uri, LOCATOR_RKEY_SEGMENT)
}

fn segment(uri: &str, index: usize) -> Option<&str> {
    let segment = uri.split('/').nth(index)?;
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}
