//! Terminal utilities
//!
//! User interface helpers for the command line surface. Currently this is
//! the [`progress`] spinner shown while a walk moves through its phases.

pub mod progress;

pub use progress::WalkProgress;
