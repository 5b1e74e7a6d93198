//! Synthetic traversal workloads.
//!
//! Real searches touch a few hub nodes over and over and a long tail of other
//! nodes once. [`TraceParams`] produces id sequences with that shape, and the
//! runners replay them against any [`VisitorSet`] the way a graph search uses
//! its visited set: reset, test, mark.
//!
//! [`VisitorSet`]: crate::sets::visited::VisitorSet

mod runner;
mod trace;

pub use runner::*;
pub use trace::*;
