//! Core types and functionality for skywalk
//!
//! This module is the foundation of skywalk's error handling. It defines the
//! strongly-typed pipeline errors, the user-friendly wrapper the CLI prints,
//! and the translation from arbitrary [`anyhow::Error`] chains into actionable
//! terminal output.
//!
//! # Architecture Overview
//!
//! - **Strongly-typed errors** ([`SkywalkError`]) for precise handling in code;
//!   the orchestration layer decides fatal vs. non-fatal by variant
//! - **User-friendly contexts** ([`ErrorContext`]) with colored output and
//!   actionable suggestions for CLI users
//! - **Conversion** from common ambient errors (I/O, TOML) into suggestions
//!   via [`user_friendly_error`]
//!
//! # Examples
//!
//! ```rust
//! use skywalk::core::{SkywalkError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(SkywalkError::HandleNotFound {
//!         handle: "ghost.bsky.social".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, SkywalkError, user_friendly_error};
