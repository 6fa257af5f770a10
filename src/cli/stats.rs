//! Show aggregate network statistics.
//!
//! Fetches the AppView's statistics document and renders it: totals,
//! posts-per-author and follower percentiles, activity brackets, the
//! most-active-authors table, and the most recent daily datapoint. The
//! daily series is already windowed by
//! [`NetworkStats::normalize`](crate::stats::NetworkStats::normalize)
//! before it gets here.
//!
//! # Examples
//!
//! ```bash
//! skywalk stats
//! skywalk stats --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::GlobalConfig;
use crate::stats::{NetworkStats, StatsClient};

/// Command to show network statistics.
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl StatsCommand {
    /// Execute the stats command.
    ///
    /// # Errors
    ///
    /// Returns an error when the statistics document cannot be fetched or
    /// parsed.
    pub async fn execute(self, config: &GlobalConfig) -> Result<()> {
        self.validate_arguments()?;

        let client = StatsClient::new(config.appview_url());
        let stats = client.fetch().await?;

        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
            _ => output_text(&stats),
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

fn output_text(stats: &NetworkStats) {
    println!("{}", "Network statistics".bold());
    println!(
        "{}",
        format!("updated {}", stats.updated_at.format("%Y-%m-%d %H:%M:%S UTC")).bright_black()
    );
    println!();
    println!("  Users:   {}", group_thousands(stats.total_users));
    println!("  Authors: {}", group_thousands(stats.total_authors));
    println!("  Posts:   {}", group_thousands(stats.total_posts));
    println!("  Mean posts per author: {:.2}", stats.mean_post_count);

    if !stats.percentiles.is_empty() {
        println!();
        println!("{}", "Posts per author".bold());
        for p in &stats.percentiles {
            println!(
                "  {:>6}  {}",
                percentile_label(p.percentile),
                group_thousands(p.count)
            );
        }
    }

    if !stats.follower_percentiles.is_empty() {
        println!();
        println!("{}", "Followers per user".bold());
        for p in &stats.follower_percentiles {
            // Interpolated percentiles arrive fractional; display whole counts.
            println!(
                "  {:>6}  {}",
                percentile_label(p.percentile),
                group_thousands(p.value.floor() as u64)
            );
        }
    }

    if !stats.brackets.is_empty() {
        println!();
        println!("{}", "Authors by post count".bold());
        for bracket in &stats.brackets {
            println!(
                "  {:>6}+ {}",
                bracket.min,
                group_thousands(bracket.count)
            );
        }
    }

    if !stats.top_posters.is_empty() {
        println!();
        println!("{}", "Most active authors".bold());
        for (rank, poster) in stats.top_posters.iter().enumerate() {
            println!(
                "  {:>3}. {} {} {}",
                rank + 1,
                poster.handle.cyan(),
                group_thousands(poster.post_count),
                poster.did.bright_black()
            );
        }
    }

    if let Some(latest) = stats.daily_data.last() {
        println!();
        println!(
            "{} ({} days tracked)",
            "Daily activity".bold(),
            stats.daily_data.len()
        );
        println!(
            "  {}: {} posters, {} likers, {} new followers",
            latest.date,
            group_thousands(latest.num_posters),
            group_thousands(latest.num_likers),
            group_thousands(latest.num_followers)
        );
    }
}

/// Format a count with `,` thousands separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Render a fractional percentile as a `pNN` label, keeping fractional
/// digits only where they carry information (`0.999` becomes `p99.9`).
fn percentile_label(fraction: f64) -> String {
    let scaled = fraction * 100.0;
    // Tolerance absorbs float noise like 0.9 * 100 = 90.00000000000001.
    if (scaled - scaled.round()).abs() < 1e-9 {
        format!("p{}", scaled.round() as u64)
    } else {
        format!("p{scaled:.1}")
    }
}
