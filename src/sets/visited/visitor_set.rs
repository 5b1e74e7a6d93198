use crate::sets::visited::ResetKind;

/// Per-traversal membership over dense node ids.
///
/// `get` must never allocate, `set` may grow the structure to fit the id.
/// After `reset` every id reads as unvisited.
pub trait VisitorSet {
    fn get(&self, i: usize) -> bool;
    fn set(&mut self, i: usize);
    fn reset(&mut self) -> ResetKind;
}
