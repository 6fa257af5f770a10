//! Skywalk CLI entry point
//!
//! This is the main executable for the account repository inspector.
//! It handles command-line argument parsing, error display, and command
//! execution.
//!
//! Commands:
//! - `walk` - walk an account's repository with resolved handles
//! - `resolve` - resolve a handle to its canonical identifier
//! - `stats` - show aggregate network statistics

use anyhow::Result;
use clap::Parser;
use skywalk::cli;
use skywalk::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
