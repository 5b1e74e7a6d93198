//! Specialized data structures for graph search operations.
//!
//! # Submodules
//!
//! - [`visited`]: Per-traversal visited node tracking with constant-time resets

pub mod visited;
