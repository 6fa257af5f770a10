//! Resolve a handle to its canonical identifier.
//!
//! A thin wrapper over [`IdentityResolver::resolve`]: one lookup, one line
//! of output. Canonical identifiers pass through unchanged without touching
//! the network, so this doubles as a cheap syntax check.
//!
//! # Examples
//!
//! ```bash
//! skywalk resolve alice.bsky.social
//! did:plc:abc123
//!
//! skywalk resolve did:plc:abc123 --format json
//! {
//!   "input": "did:plc:abc123",
//!   "did": "did:plc:abc123"
//! }
//! ```

use anyhow::Result;
use clap::Args;

use crate::config::GlobalConfig;
use crate::identity::IdentityResolver;

/// Command to resolve a single handle.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Handle or canonical identifier to resolve
    account: String,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl ResolveCommand {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup fails or the input is empty.
    pub async fn execute(self, config: &GlobalConfig) -> Result<()> {
        self.validate_arguments()?;

        let resolver = IdentityResolver::new(config.directory_url());
        let did = resolver.resolve(&self.account).await?;

        match self.format.as_str() {
            "json" => {
                let json = serde_json::json!({
                    "input": self.account,
                    "did": did.as_str(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            _ => println!("{did}"),
        }
        Ok(())
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
}
