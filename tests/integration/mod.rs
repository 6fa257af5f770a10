//! Integration test suite for skywalk
//!
//! End-to-end tests that drive the pipeline and the compiled binary against
//! an in-process HTTP stub standing in for the identity directory and the
//! AppView. No test touches the real network; endpoints the tests rely on
//! are mounted per test and the stub records every request it serves.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! cargo nextest run --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **pipeline**: walk orchestration end to end: resolution, snapshot
//!   fetching, reference extraction, batch handle resolution, supersession
//! - **cli**: the compiled binary's commands, flags, output and exit codes
//! - **stats**: network statistics retrieval and normalization

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

// Integration tests
mod cli;
mod pipeline;
mod stats;
