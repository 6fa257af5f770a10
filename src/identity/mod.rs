//! Identity types and resolution for skywalk
//!
//! This module owns everything that names an account:
//!
//! - [`Did`] - the canonical, never-reassigned account identifier
//! - [`Handle`] - the human-readable, mutable alias for a [`Did`]
//! - [`IdentityResolver`] - single and batch lookups against the directory
//! - [`HandleCache`] - the session-wide identifier-to-handle lookup table
//!
//! # Canonical identifiers
//!
//! A [`Did`] is constructed only through [`Did::parse`], which rejects strings
//! without the `did:` scheme and lowercases the value. Normalizing once at the
//! type boundary means extraction, batch resolution, and cache lookups all agree
//! on case; a mixed-case identifier from an upstream payload can never miss a
//! cache entry created from its lowercase twin.
//!
//! # Resolution flow
//!
//! Single resolution turns user input (handle or identifier) into a [`Did`]
//! with at most one directory round trip. Batch resolution turns the set of
//! identifiers referenced by a repository into handles with exactly one round
//! trip, merging the result into the [`HandleCache`]. The cache only grows;
//! identifiers the directory did not return stay absent and render verbatim.

use std::fmt;

use crate::constants::DID_PREFIX;
use crate::core::SkywalkError;

pub mod cache;
pub mod resolver;

pub use cache::HandleCache;
pub use resolver::IdentityResolver;

/// A canonical account identifier.
///
/// Stable and globally unique; the join key for all resolution. The inner
/// string is always lowercase and always carries the `did:` scheme, enforced
/// by [`Did::parse`].
///
/// # Examples
///
/// ```rust
/// use skywalk::identity::Did;
///
/// let did = Did::parse("did:plc:ABC123").unwrap();
/// assert_eq!(did.as_str(), "did:plc:abc123");
/// assert!(Did::parse("alice.bsky.social").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Did(String);

impl Did {
    /// Parse a canonical identifier, normalizing to lowercase.
    ///
    /// Rejects input without the `did:` scheme or with nothing after it.
    /// Surrounding whitespace is trimmed.
    pub fn parse(input: &str) -> Result<Self, SkywalkError> {
        let normalized = input.trim().to_lowercase();
        if !normalized.starts_with(DID_PREFIX) {
            return Err(SkywalkError::InvalidIdentifier {
                input: input.to_string(),
                reason: format!("missing '{DID_PREFIX}' scheme"),
            });
        }
        if normalized.len() == DID_PREFIX.len() {
            return Err(SkywalkError::InvalidIdentifier {
                input: input.to_string(),
                reason: "missing method and identifier".to_string(),
            });
        }
        Ok(Self(normalized))
    }

    /// Whether raw input already carries the canonical `did:` scheme.
    ///
    /// Used to decide between identifier passthrough and a directory lookup
    /// without committing to full parsing.
    #[must_use]
    pub fn is_canonical(input: &str) -> bool {
        input.trim().starts_with(DID_PREFIX)
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A human-readable alias for an account.
///
/// Handles are mutable upstream; a resolution returns only the current one.
/// Stored verbatim as the directory reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(String);

impl Handle {
    /// Wrap a handle string as reported by the directory.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
