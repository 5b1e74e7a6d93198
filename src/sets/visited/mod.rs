//! Visited-node tracking for graph traversals.
//!
//! [`ListSet`] is the structure used on the search path: a dense stamp array
//! reset in O(1) by advancing an epoch. [`HashVisitedSet`] and
//! [`UncompressedSet`] are the naive alternatives (hash set, bitmap cleared on
//! reset) kept as baselines for the benchmark binary.

mod epoch;
mod hashset;
mod list_set;
mod uncompressed_set;
mod visitor_set;

pub use epoch::*;
pub use hashset::*;
pub use list_set::*;
pub use uncompressed_set::*;
pub use visitor_set::*;
