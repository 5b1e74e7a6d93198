//! Usage statistics for visited sets and their pool.
//!
//! Tracks traversals, first-time visits, full clears caused by epoch
//! wraparound, growths, and pool lifecycle events.

mod stats;
pub use stats::*;
