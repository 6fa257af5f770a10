//! Walk an account's repository and render it with resolved handles.
//!
//! This is the main command: it drives the full pipeline through
//! [`WalkSession`] and renders the outcome. Referenced accounts appear as
//! handles where the batch resolution produced one and as raw identifiers
//! where it did not; a batch failure demotes every reference to its raw
//! identifier and prints a warning instead of failing the walk.
//!
//! # Examples
//!
//! ```bash
//! # Walk by handle
//! skywalk walk alice.bsky.social
//!
//! # Walk by canonical identifier, show every record
//! skywalk walk did:plc:abc123 --limit 0
//!
//! # Machine-readable output
//! skywalk walk alice.bsky.social --format json
//! ```
//!
//! # Output
//!
//! Text output starts with the profile and per-collection counts, then the
//! record sections: blocks, posts, follows, reposts, likes. Blocks, posts,
//! follows and reposts print newest first; likes keep their upstream order.
//! `--limit` caps each section (0 shows everything). JSON output carries
//! the full snapshot, the identifier-to-handle map, and the degraded
//! marker.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;

use crate::config::GlobalConfig;
use crate::constants::{AVATAR_CDN_URL, BLUESKY_APP_URL, DEFAULT_DISPLAY_LIMIT};
use crate::identity::{Did, HandleCache};
use crate::repo::at_uri;
use crate::repo::extract_references;
use crate::repo::model::{DirectRefRecord, EmbeddedRefRecord, PostRecord, ProfileContent};
use crate::utils::progress::WalkProgress;
use crate::walker::{WalkOutcome, WalkSession, WalkStatus};

/// Command to walk one account.
#[derive(Args, Debug)]
pub struct WalkCommand {
    /// Handle or canonical identifier of the account to walk
    account: String,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Maximum records shown per collection in text output, 0 for all
    #[arg(short, long, default_value_t = DEFAULT_DISPLAY_LIMIT)]
    limit: usize,
}

impl WalkCommand {
    /// Execute the walk command.
    ///
    /// # Errors
    ///
    /// Returns an error when resolution or the repository fetch fails. A
    /// batch resolution failure is not an error; it degrades the rendering
    /// and prints a warning.
    pub async fn execute(self, config: &GlobalConfig, progress_enabled: bool) -> Result<()> {
        self.validate_arguments()?;

        let session = WalkSession::new(config.directory_url(), config.appview_url());
        let progress = WalkProgress::new(progress_enabled);

        match session.walk(&self.account, &progress).await? {
            WalkStatus::Completed(outcome) => match self.format.as_str() {
                "json" => self.output_json(&outcome, session.cache()),
                _ => {
                    self.output_text(&outcome, session.cache());
                    Ok(())
                }
            },
            // One submission per invocation, so nothing can supersede it.
            WalkStatus::Superseded => Ok(()),
        }
    }

    fn validate_arguments(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid format '{}'. Valid formats are: text, json",
                self.format
            )),
        }
    }

    fn output_text(&self, outcome: &WalkOutcome, cache: &HandleCache) {
        let counts = outcome.snapshot.counts();

        println!(
            "{} {}",
            cache.display_name(&outcome.did).cyan().bold(),
            outcome.did.as_str().bright_black()
        );
        if let Some(profile) = &outcome.snapshot.profile {
            print_profile(&profile.content, &outcome.did);
        }

        println!();
        println!(
            "{} posts · {} reposts · {} likes · {} follows · {} blocks",
            counts.posts, counts.reposts, counts.likes, counts.follows, counts.blocks
        );
        println!(
            "{}",
            format!(
                "{} referenced accounts, {} resolved this walk",
                outcome.references, outcome.resolved
            )
            .bright_black()
        );

        if let Some(reason) = &outcome.degraded {
            println!();
            println!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("handle resolution failed ({reason}); showing raw identifiers").yellow()
            );
        }

        self.print_direct_section("Blocks", &outcome.snapshot.blocks, true, cache);
        self.print_posts(&outcome.snapshot.posts);
        self.print_direct_section("Follows", &outcome.snapshot.follows, true, cache);
        self.print_embedded_section("Reposts", &outcome.snapshot.reposts, true, cache);
        self.print_embedded_section("Likes", &outcome.snapshot.likes, false, cache);
    }

    /// Render a follows or blocks section: one referenced account per row.
    fn print_direct_section(
        &self,
        title: &str,
        records: &[DirectRefRecord],
        newest_first: bool,
        cache: &HandleCache,
    ) {
        if records.is_empty() {
            return;
        }
        println!();
        println!("{} ({})", title.bold(), records.len());

        let shown = self.clip(records.len());
        let render = |record: &DirectRefRecord| {
            let display = match Did::parse(&record.content.subject) {
                Ok(did) => cache.display_name(&did),
                Err(_) => record.content.subject.clone(),
            };
            println!(
                "  {} {}",
                display.cyan(),
                record.content.created_at.bright_black()
            );
        };
        if newest_first {
            records.iter().rev().take(shown).for_each(render);
        } else {
            records.iter().take(shown).for_each(render);
        }
        self.print_clipped(records.len(), shown);
    }

    /// Render a likes or reposts section: referenced author, timestamp, and
    /// a permalink to the referenced post.
    fn print_embedded_section(
        &self,
        title: &str,
        records: &[EmbeddedRefRecord],
        newest_first: bool,
        cache: &HandleCache,
    ) {
        if records.is_empty() {
            return;
        }
        println!();
        println!("{} ({})", title.bold(), records.len());

        let shown = self.clip(records.len());
        let render = |record: &EmbeddedRefRecord| {
            let subject_uri = record.content.subject.uri.as_str();
            let display = match at_uri::locator_did(subject_uri).map(Did::parse) {
                Some(Ok(did)) => cache.display_name(&did),
                _ => subject_uri.to_string(),
            };
            let permalink = post_permalink(subject_uri).unwrap_or_default();
            println!(
                "  {} {} {}",
                display.cyan(),
                record.content.created_at.bright_black(),
                permalink.bright_black()
            );
        };
        if newest_first {
            records.iter().rev().take(shown).for_each(render);
        } else {
            records.iter().take(shown).for_each(render);
        }
        self.print_clipped(records.len(), shown);
    }

    /// Render the posts section, newest first, with permalinks.
    fn print_posts(&self, records: &[PostRecord]) {
        if records.is_empty() {
            return;
        }
        println!();
        println!("{} ({})", "Posts".bold(), records.len());

        let shown = self.clip(records.len());
        for record in records.iter().rev().take(shown) {
            let permalink = post_permalink(&record.uri).unwrap_or_default();
            println!(
                "  {} {}",
                record.content.created_at.bright_black(),
                permalink.bright_black()
            );
            if !record.content.text.is_empty() {
                println!("    {}", record.content.text);
            }
        }
        self.print_clipped(records.len(), shown);
    }

    fn clip(&self, total: usize) -> usize {
        if self.limit == 0 {
            total
        } else {
            self.limit.min(total)
        }
    }

    fn print_clipped(&self, total: usize, shown: usize) {
        if total > shown {
            println!("  {}", format!("... and {} more", total - shown).bright_black());
        }
    }

    fn output_json(&self, outcome: &WalkOutcome, cache: &HandleCache) -> Result<()> {
        // Re-derive the reference set so the handle map covers exactly the
        // identifiers this snapshot mentions, not everything the session
        // ever cached.
        let mut references = extract_references(&outcome.snapshot);
        references.insert(outcome.did.clone());
        let handles: BTreeMap<&str, String> = references
            .iter()
            .filter_map(|did| cache.get(did).map(|handle| (did.as_str(), handle.as_str().to_string())))
            .collect();

        let json = serde_json::json!({
            "did": outcome.did.as_str(),
            "handle": cache.display_name(&outcome.did),
            "counts": outcome.snapshot.counts(),
            "references": outcome.references,
            "resolved": outcome.resolved,
            "degraded": outcome.degraded,
            "handles": handles,
            "snapshot": outcome.snapshot,
        });

        println!("{}", serde_json::to_string_pretty(&json)?);
        Ok(())
    }
}

fn print_profile(profile: &ProfileContent, did: &Did) {
    if !profile.display_name.is_empty() {
        println!("{}", profile.display_name.bold());
    }
    if !profile.description.is_empty() {
        println!("{}", profile.description);
    }
    if let Some(avatar) = &profile.avatar {
        println!("{}", avatar_url(did, &avatar.blob.link).bright_black());
    }
}

/// Permalink to the post a locator names, or `None` for a malformed locator.
fn post_permalink(uri: &str) -> Option<String> {
    let did = at_uri::locator_did(uri)?;
    let rkey = at_uri::locator_rkey(uri)?;
    Some(format!("{BLUESKY_APP_URL}/profile/{did}/post/{rkey}"))
}

/// CDN URL of an avatar blob.
fn avatar_url(did: &Did, link: &str) -> String {
    format!("{AVATAR_CDN_URL}/{did}/{link}@jpeg")
}
