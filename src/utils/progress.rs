//! Progress indicators for walk operations
//!
//! A thin wrapper over `indicatif` that keeps spinner styling in one place
//! and stays silent where spinners would be noise: non-interactive runs,
//! `--no-progress`/`--quiet`, or any environment with `SKYWALK_NO_PROGRESS`
//! set.
//!
//! # Examples
//!
//! ```rust
//! use skywalk::utils::progress::WalkProgress;
//!
//! let progress = WalkProgress::new(true);
//! progress.set_phase("Resolving identity");
//! // ... work ...
//! progress.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress indicators should be disabled via the environment.
///
/// Set `SKYWALK_NO_PROGRESS` to any value to force-disable spinners, useful
/// for CI logs and scripted runs where escape sequences only add noise.
fn is_progress_disabled() -> bool {
    std::env::var("SKYWALK_NO_PROGRESS").is_ok()
}

/// An indeterminate spinner for the phases of a walk.
///
/// Each pipeline phase updates the message; the spinner is cleared before
/// any real output prints so rendered content never interleaves with the
/// animation. A disabled spinner (flag or environment) is a hidden bar that
/// silently ignores every call, so callers never branch.
#[derive(Clone)]
pub struct WalkProgress {
    inner: IndicatifBar,
}

impl WalkProgress {
    /// Create a spinner, hidden when `enabled` is false or the environment
    /// disables progress.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Update the message to the current pipeline phase.
    pub fn set_phase(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Remove the spinner from the terminal without a completion message.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
