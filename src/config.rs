//! Runtime configuration
//!
//! Skywalk talks to two services, a handle directory and an AppView, and
//! both bases can be pointed somewhere else: a self-hosted deployment, a
//! staging instance, or a local fixture in tests. Overrides come from an
//! optional TOML file and from environment variables; everything else falls
//! back to the public deployment in [`crate::constants`].
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.skywalk/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\skywalk\config.toml`
//! - **Override**: `--config <PATH>` on the command line, or the
//!   `SKYWALK_CONFIG_PATH` environment variable
//!
//! The tool only ever reads this file; there is no write path.
//!
//! # File Format
//!
//! ```toml
//! directory_url = "https://plc.jazco.io"
//! appview_url = "https://bsky-search.jazco.io"
//! ```
//!
//! # Precedence
//!
//! For each endpoint: environment variable (`SKYWALK_DIRECTORY_URL`,
//! `SKYWALK_APPVIEW_URL`), then the config file, then the built-in default.
//!
//! # Examples
//!
//! ```rust,no_run
//! use skywalk::config::GlobalConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::load_with_optional(None).await?;
//! println!("directory: {}", config.directory_url());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{DEFAULT_APPVIEW_URL, DEFAULT_DIRECTORY_URL};

/// User-wide configuration, all fields optional.
///
/// A missing file and an empty file mean the same thing: every endpoint at
/// its default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    /// Base URL of the handle directory, without a trailing slash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_url: Option<String>,

    /// Base URL of the AppView serving repositories and network stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appview_url: Option<String>,
}

impl GlobalConfig {
    /// Load configuration from an optional explicit path.
    ///
    /// With a path, that file must parse but may be absent (absent means
    /// defaults). Without one, `SKYWALK_CONFIG_PATH` is consulted, then the
    /// platform default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or contains
    /// invalid TOML.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var_os("SKYWALK_CONFIG_PATH") {
                Some(env_path) => PathBuf::from(env_path),
                None => Self::default_path()?,
            },
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// The platform-default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory (or local data directory on
    /// Windows) cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("skywalk")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".skywalk")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The directory base URL after applying the override precedence.
    #[must_use]
    pub fn directory_url(&self) -> String {
        std::env::var("SKYWALK_DIRECTORY_URL")
            .ok()
            .or_else(|| self.directory_url.clone())
            .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string())
    }

    /// The AppView base URL after applying the override precedence.
    #[must_use]
    pub fn appview_url(&self) -> String {
        std::env::var("SKYWALK_APPVIEW_URL")
            .ok()
            .or_else(|| self.appview_url.clone())
            .unwrap_or_else(|| DEFAULT_APPVIEW_URL.to_string())
    }
}
