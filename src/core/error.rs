//! Error handling for skywalk
//!
//! This module provides the error types and user-friendly error reporting for the
//! skywalk CLI. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`SkywalkError`] - Enumerated error types for all failure cases in the pipeline
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! Pipeline errors fall into fatal and non-fatal groups, decided by the stage that
//! produced them:
//! - **Fatal**: [`SkywalkError::HandleResolution`], [`SkywalkError::HandleNotFound`],
//!   [`SkywalkError::RepoFetch`] - the walk halts and the error replaces the view
//! - **Non-fatal**: [`SkywalkError::BatchResolution`] - the walk completes with raw
//!   identifiers shown in place of handles
//!
//! The fatal variants carry the exact user-facing message the upstream service
//! produced (or a fixed generic fallback when the upstream body was unreadable),
//! so the displayed banner matches what the operator would see against the live
//! services.
//!
//! Use [`user_friendly_error`] to convert any error into a user-friendly format with
//! contextual suggestions.
//!
//! # Examples
//!
//! ## Basic Error Handling
//!
//! ```rust,no_run
//! use skywalk::core::{SkywalkError, user_friendly_error};
//!
//! fn resolve_account() -> Result<(), SkywalkError> {
//!     Err(SkywalkError::HandleNotFound {
//!         handle: "missing.bsky.social".to_string(),
//!     })
//! }
//!
//! match resolve_account() {
//!     Ok(_) => println!("Resolved!"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Shows colored error with suggestions
//!     }
//! }
//! ```
//!
//! ## Creating Error Context Manually
//!
//! ```rust,no_run
//! use skywalk::core::{SkywalkError, ErrorContext};
//!
//! let error = SkywalkError::BatchResolution {
//!     reason: "directory returned 503".to_string(),
//! };
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Re-run the walk to retry handle enrichment")
//!     .with_details("Raw identifiers are shown until handles resolve");
//!
//! // Display with colors in terminal
//! context.display();
//!
//! // Or get as string for logging
//! let message = format!("{}", context);
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for skywalk operations
///
/// Each variant represents one failure mode of the identity-resolution pipeline
/// or of the ambient CLI machinery around it. Variants carry the details needed
/// to build an actionable message, and the pipeline stage is recoverable from
/// the variant itself so orchestration can decide fatal vs. non-fatal.
///
/// # Examples
///
/// ```rust,no_run
/// use skywalk::core::SkywalkError;
///
/// fn describe(error: &SkywalkError) -> &'static str {
///     match error {
///         SkywalkError::HandleNotFound { .. } => "unknown handle",
///         SkywalkError::RepoFetch { .. } => "repository unavailable",
///         SkywalkError::BatchResolution { .. } => "handles incomplete",
///         _ => "other failure",
///     }
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum SkywalkError {
    /// Handle lookup at the directory failed
    ///
    /// The `message` is what the user sees: the upstream error body when one
    /// was readable, otherwise the fixed generic resolution message.
    ///
    /// # Fields
    /// - `handle`: The handle that was being resolved
    /// - `message`: The user-facing failure message
    #[error("{message}")]
    HandleResolution {
        /// The handle that was being resolved
        handle: String,
        /// The user-facing failure message
        message: String,
    },

    /// The directory has no record for the handle
    ///
    /// The directory leaks a storage-layer sentinel for missing records; the
    /// resolver translates it to this variant so the user sees a fixed
    /// friendly message instead of the raw sentinel.
    #[error("Handle not found.")]
    HandleNotFound {
        /// The handle that has no directory record
        handle: String,
    },

    /// Repository retrieval from the AppView failed
    ///
    /// Raised for non-success HTTP statuses and for 200 responses that carry
    /// an embedded error envelope. The `message` is the upstream error when
    /// readable, otherwise the fixed generic fetch message.
    ///
    /// # Fields
    /// - `did`: The canonical identifier whose repository was requested
    /// - `message`: The user-facing failure message
    #[error("{message}")]
    RepoFetch {
        /// The canonical identifier whose repository was requested
        did: String,
        /// The user-facing failure message
        message: String,
    },

    /// Batch handle resolution failed
    ///
    /// Non-fatal: the walk still completes and raw identifiers are displayed
    /// in place of handles. The handle cache is untouched by a failed batch.
    #[error("Batch handle resolution failed: {reason}")]
    BatchResolution {
        /// The reason the batch round trip failed
        reason: String,
    },

    /// Input is neither a plausible handle nor a canonical identifier
    #[error("Invalid account identifier '{input}': {reason}")]
    InvalidIdentifier {
        /// The rejected input
        input: String,
        /// Why the input was rejected
        reason: String,
    },

    /// Network statistics retrieval failed
    #[error("Failed to fetch network statistics: {reason}")]
    StatsFetch {
        /// The reason the stats request failed
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`SkywalkError`] and adds optional suggestions for
/// resolution and additional details. This is the primary way skywalk presents
/// errors to CLI users.
///
/// # Display Format
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use skywalk::core::{SkywalkError, ErrorContext};
///
/// let context = ErrorContext::new(SkywalkError::HandleNotFound {
///     handle: "someone.bsky.social".to_string(),
/// })
/// .with_suggestion("Check the spelling of the handle")
/// .with_details("The directory has no record for this handle");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying skywalk error
    pub error: SkywalkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`SkywalkError`]
    ///
    /// This creates a basic error context with no additional suggestions or
    /// details. Use the builder methods [`with_suggestion`] and [`with_details`]
    /// to add user-friendly information.
    ///
    /// [`with_suggestion`]: ErrorContext::with_suggestion
    /// [`with_details`]: ErrorContext::with_details
    #[must_use]
    pub const fn new(error: SkywalkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps that users can take to resolve
    /// the error. They are displayed in green in the terminal.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details provide context about why the error occurred or what it means.
    /// They are displayed in yellow in the terminal.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// Color coding:
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// This function is the main entry point for converting arbitrary errors into
/// user-friendly error messages for CLI display. It recognizes common error types
/// and provides appropriate context and suggestions.
///
/// # Error Recognition
///
/// The function recognizes and provides specific handling for:
/// - [`SkywalkError`] variants with tailored suggestions
/// - [`std::io::Error`] with filesystem-specific guidance (config file access)
/// - [`toml::de::Error`] with config syntax help
/// - Generic errors with their full cause chain
///
/// # Examples
///
/// ```rust,no_run
/// use skywalk::core::{SkywalkError, user_friendly_error};
///
/// let error = SkywalkError::HandleNotFound {
///     handle: "ghost.bsky.social".to_string(),
/// };
/// let context = user_friendly_error(anyhow::Error::from(error));
///
/// context.display(); // Shows spelling suggestions
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // Check for specific error types and provide helpful suggestions
    if let Some(walk_error) = error.downcast_ref::<SkywalkError>() {
        return create_error_context(walk_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(SkywalkError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check ownership and permissions of the config file path")
                .with_details(
                    "This error occurs when skywalk cannot read or write its configuration",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(SkywalkError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the path exists and is spelled correctly");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(SkywalkError::Config {
            message: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax in your config file. Verify quotes, brackets, and indentation",
        )
        .with_details("TOML parsing errors are usually caused by missing quotes or mismatched brackets");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    // Append error chain if available
    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(SkywalkError::Other {
        message,
    })
}

/// Create appropriate [`ErrorContext`] with suggestions for specific skywalk errors
///
/// Maps each [`SkywalkError`] variant to an [`ErrorContext`] with tailored
/// suggestions and details. Used by [`user_friendly_error`] to provide
/// consistent, helpful error messages.
fn create_error_context(error: SkywalkError) -> ErrorContext {
    match &error {
        SkywalkError::HandleNotFound { handle } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check the spelling of '{handle}'. Handles look like 'name.bsky.social' and carry no '@' prefix"
            ))
            .with_details("The directory has no record for this handle. It may have been changed or deleted"),

        SkywalkError::HandleResolution { handle, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Verify '{handle}' is a valid handle and try again. Run with -v to see the underlying failure"
            ))
            .with_details("The directory lookup failed before a canonical identifier could be obtained"),

        SkywalkError::RepoFetch { did, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Verify the account '{did}' exists and try again later. The AppView may still be indexing it"
            ))
            .with_details("The repository payload could not be retrieved from the AppView"),

        SkywalkError::BatchResolution { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Re-run the walk to retry handle enrichment")
            .with_details("The walk completed, but referenced accounts are shown by raw identifier instead of handle"),

        SkywalkError::InvalidIdentifier { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Pass either a handle like 'name.bsky.social' or a canonical identifier starting with 'did:'",
            ),

        SkywalkError::StatsFetch { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check your internet connection and try again. The AppView may be temporarily unavailable"),

        SkywalkError::Config { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check your config file syntax, or remove it to fall back to the default endpoints"),

        _ => ErrorContext::new(error.clone()),
    }
}
