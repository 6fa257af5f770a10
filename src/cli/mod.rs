//! Command-line interface for skywalk.
//!
//! Three commands cover the tool's surface:
//!
//! - `walk` - resolve an account, fetch its repository, and render every
//!   record with referenced identities resolved to handles
//! - `resolve` - turn a single handle into its canonical identifier
//! - `stats` - show aggregate network statistics from the AppView
//!
//! Each command is implemented in its own module as a `clap` args struct
//! with an async `execute` method; this module owns the global flags and
//! the dispatch.
//!
//! # Global Options
//!
//! All commands accept:
//! - `--verbose` - debug-level logging on stderr
//! - `--quiet` - suppress logging and progress output
//! - `--config` - path to an alternate config file
//! - `--no-progress` - disable spinner animations
//!
//! # Examples
//!
//! ```bash
//! # Walk an account by handle
//! skywalk walk alice.bsky.social
//!
//! # Walk by canonical identifier, everything as JSON
//! skywalk walk did:plc:abc123 --format json
//!
//! # Just the identifier, script-friendly
//! skywalk resolve alice.bsky.social
//!
//! # Network-wide numbers
//! skywalk stats
//! ```

mod resolve;
mod stats;
mod walk;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

/// Top-level argument structure.
///
/// Global flags live here and apply to every subcommand; `clap` enforces
/// that `--verbose` and `--quiet` are mutually exclusive.
#[derive(Parser)]
#[command(
    name = "skywalk",
    about = "Walk an account repository with every referenced identity resolved",
    version,
    author,
    long_about = "Skywalk inspects a public social-network account: it resolves a handle to \
                  its canonical identifier, fetches the account's full repository, collects \
                  every account the repository references, and resolves those references to \
                  human-readable handles in a single batch."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr.
    ///
    /// Shows phase transitions, request targets, and cache merge counts.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging and progress output, leaving only results and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate config file.
    ///
    /// Defaults to `~/.skywalk/config.toml`, or `SKYWALK_CONFIG_PATH` when
    /// set.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable spinner animations.
    ///
    /// Useful for CI logs and terminals without ANSI support. The
    /// `SKYWALK_NO_PROGRESS` environment variable has the same effect.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Walk an account's repository and render it with resolved handles.
    Walk(walk::WalkCommand),

    /// Resolve a handle to its canonical identifier.
    Resolve(resolve::ResolveCommand),

    /// Show aggregate network statistics.
    Stats(stats::StatsCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// Initializes logging from the verbosity flags, loads configuration,
    /// and dispatches. Errors bubble up to `main` for user-friendly
    /// display.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration loading fails or the command
    /// itself fails.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let config = GlobalConfig::load_with_optional(self.config.clone()).await?;
        let progress_enabled = !self.no_progress && !self.quiet;

        match self.command {
            Commands::Walk(cmd) => cmd.execute(&config, progress_enabled).await,
            Commands::Resolve(cmd) => cmd.execute(&config).await,
            Commands::Stats(cmd) => cmd.execute(&config).await,
        }
    }

    /// Install the global tracing subscriber.
    ///
    /// `--verbose` forces debug level for this crate, `--quiet` turns
    /// logging off entirely, and the default honors `RUST_LOG` with a
    /// fallback of `warn` so degraded-mode warnings stay visible. Logs go
    /// to stderr so stdout stays parseable.
    fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("skywalk=debug")
        } else if self.quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
