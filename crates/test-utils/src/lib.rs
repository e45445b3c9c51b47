//! Shared test utilities for the SeaView workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic velocity field generators
//! - Small hand-checkable fixture fields
//! - Raw buffer helpers for building wire payloads
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, create_gyre_field};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
