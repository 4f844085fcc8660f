//! Test helpers shared across crates.
//!
//! This crate provides a cloneable in-memory writer for capturing usage and
//! error output, plus helpers for assembling argument lists.

pub mod args;
pub mod output;

pub use args::{argv, split_args};
pub use output::OutputBuffer;
