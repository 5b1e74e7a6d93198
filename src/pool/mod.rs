//! Reuse of visited sets across traversals.
//!
//! Each concurrently running traversal borrows its own [`ListSet`] from a
//! [`VisitedPool`] and hands it back when done. The pool resets returned sets,
//! keeps the warmest ones, and releases the rest.
//!
//! [`ListSet`]: crate::sets::visited::ListSet

mod visited_pool;

pub use visited_pool::*;
