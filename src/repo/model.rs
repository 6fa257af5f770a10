//! Wire model for repository payloads
//!
//! These types mirror the AppView's JSON shape for a full account repository:
//! a profile record plus five record collections. Collections default to
//! empty when absent so a sparse account still parses; record fields are
//! otherwise required, and a payload that violates the shape fails parsing at
//! the fetch boundary instead of leaking partial data inward.
//!
//! Likes and reposts point at other accounts indirectly, through a nested
//! [`SubjectRef`] whose locator embeds the target account's identifier.
//! Follows and blocks carry the identifier directly as a string.

use serde::{Deserialize, Serialize};

/// Nested reference to another record: content id plus compound locator.
///
/// The locator has the shape `at://<did>/<collection>/<rkey>`; see
/// [`crate::repo::at_uri`] for the positional parsing rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectRef {
    /// Content identifier of the referenced record
    pub cid: String,
    /// Compound reference locator of the referenced record
    pub uri: String,
}

/// A record pointing at another account indirectly, via an embedded
/// reference. Used for likes and reposts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddedRefRecord {
    /// Locator of this record itself
    pub uri: String,
    /// Record body
    pub content: EmbeddedRefContent,
}

/// Body of an embedded-reference record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedRefContent {
    /// Creation timestamp as reported upstream
    pub created_at: String,
    /// The referenced record
    pub subject: SubjectRef,
}

/// A record pointing at another account directly, by bare identifier.
/// Used for follows and blocks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectRefRecord {
    /// Locator of this record itself
    pub uri: String,
    /// Record body
    pub content: DirectRefContent,
}

/// Body of a direct-reference record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRefContent {
    /// Creation timestamp as reported upstream
    pub created_at: String,
    /// Identifier of the referenced account, verbatim from the wire
    pub subject: String,
}

/// An authored post.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostRecord {
    /// Locator of this record itself
    pub uri: String,
    /// Record body
    pub content: PostContent,
}

/// Body of a post record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContent {
    /// Creation timestamp as reported upstream
    pub created_at: String,
    /// Post text
    #[serde(default)]
    pub text: String,
}

/// The account's profile record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileRecord {
    /// Locator of the profile record; its identifier segment names the
    /// repository owner
    pub uri: String,
    /// Record body
    pub content: ProfileContent,
}

/// Body of the profile record. Display name, description, and avatar are all
/// optional upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContent {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarRef>,
}

/// Avatar blob reference inside a profile record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AvatarRef {
    /// Blob link wrapper
    #[serde(rename = "ref")]
    pub blob: BlobLink,
}

/// Content-addressed blob link.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobLink {
    /// The blob's content identifier
    #[serde(rename = "$link")]
    pub link: String,
}

/// The full set of an account's records at fetch time.
///
/// Immutable once fetched; a fresh walk re-fetches and replaces it in full.
/// Any of the collections may be absent or empty for sparse accounts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RepositorySnapshot {
    /// Profile record, when the account has written one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,
    /// Authored posts, oldest first as served upstream
    #[serde(default)]
    pub posts: Vec<PostRecord>,
    /// Reposts of other accounts' posts
    #[serde(default)]
    pub reposts: Vec<EmbeddedRefRecord>,
    /// Likes of other accounts' posts
    #[serde(default)]
    pub likes: Vec<EmbeddedRefRecord>,
    /// Followed accounts
    #[serde(default)]
    pub follows: Vec<DirectRefRecord>,
    /// Blocked accounts
    #[serde(default)]
    pub blocks: Vec<DirectRefRecord>,
}

/// Per-collection record counts for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionCounts {
    pub posts: usize,
    pub reposts: usize,
    pub likes: usize,
    pub follows: usize,
    pub blocks: usize,
}

impl RepositorySnapshot {
    /// Record counts across the five collections.
    #[must_use]
    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            posts: self.posts.len(),
            reposts: self.reposts.len(),
            likes: self.likes.len(),
            follows: self.follows.len(),
            blocks: self.blocks.len(),
        }
    }
}
