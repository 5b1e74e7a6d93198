use tracing::trace;

use crate::{
    error::{Result, VisitedError},
    sets::visited::{Epoch, VisitorSet},
};

/// Extra slots allocated past the requested node id when a visit lands outside
/// the current capacity.
pub const DEFAULT_GROWTH_MARGIN: usize = 1024;

/// What a call to [`ListSet::reset`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// The epoch moved forward, no stamp was touched.
    Advanced,
    /// The epoch wrapped around: every stamp was zeroed and the epoch restarted at one.
    Cleared,
}

/// A reusable visited list over dense node ids with O(1) resets.
///
/// Every node owns one stamp holding the epoch during which it was last
/// visited. A node is visited iff its stamp equals the current epoch, so
/// starting a new traversal only moves the epoch forward. The stamp array is
/// zeroed once per [`Epoch::GENERATIONS`] resets, when the counter wraps.
///
/// # Invariants
/// - `epoch != 0`, zero is the "never visited" stamp.
/// - Ids at or past [`capacity`](Self::capacity) are never visited.
/// - The capacity only grows, and growth keeps existing stamps.
///
/// A single instance must not be shared between concurrent traversals; the
/// mutating operations take `&mut self` for that reason. Use one instance per
/// in-flight traversal, e.g. through a [`VisitedPool`](crate::pool::VisitedPool).
///
/// # Examples
///
/// ```
/// use epochset::sets::visited::ListSet;
///
/// let mut visited: ListSet = ListSet::new(4);
/// visited.visit(2);
/// assert!(visited.is_visited(2));
///
/// visited.reset();
/// assert!(!visited.is_visited(2));
/// ```
pub struct ListSet<E: Epoch = u8> {
    epoch: E,
    stamps: Vec<E>,
    growth_margin: usize,
}

impl<E: Epoch> ListSet<E> {
    /// Creates a set able to track ids `0..capacity` without growing.
    pub fn new(capacity: usize) -> Self {
        Self::with_growth_margin(capacity, DEFAULT_GROWTH_MARGIN)
    }

    /// Creates a set with a custom growth margin.
    ///
    /// # Panics
    /// Panics if `growth_margin == 0`.
    pub fn with_growth_margin(capacity: usize, growth_margin: usize) -> Self {
        assert!(growth_margin > 0, "growth margin must be positive");
        ListSet {
            epoch: E::ONE,
            stamps: vec![E::ZERO; capacity],
            growth_margin,
        }
    }

    /// Highest trackable id without growth, plus one.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.stamps.len()
    }

    #[inline]
    pub fn epoch(&self) -> E {
        self.epoch
    }

    pub fn growth_margin(&self) -> usize {
        self.growth_margin
    }

    /// Bytes held by the stamp array.
    pub fn memory_usage(&self) -> usize {
        self.stamps.capacity() * size_of::<E>()
    }

    /// Marks `node` as visited in the current traversal, growing the set if
    /// `node` lies past the current capacity.
    ///
    /// # Panics
    /// Panics if the stamp array cannot be grown. Running out of memory here is
    /// not recoverable for the traversal; use [`try_visit`](Self::try_visit) to
    /// surface it as an error instead.
    #[inline]
    pub fn visit(&mut self, node: usize) {
        if node >= self.stamps.len() {
            self.grow_for(node)
                .unwrap_or_else(|err| panic!("visited set growth failed: {err}"));
        }
        self.stamps[node] = self.epoch;
    }

    /// Same as [`visit`](Self::visit) but reports a failed growth.
    ///
    /// On error the set is left untouched.
    pub fn try_visit(&mut self, node: usize) -> Result<()> {
        if node >= self.stamps.len() {
            self.grow_for(node)?;
        }
        self.stamps[node] = self.epoch;
        Ok(())
    }

    /// Returns `true` if `node` was visited since the last reset. Never allocates.
    #[inline]
    pub fn is_visited(&self, node: usize) -> bool {
        self.stamps.get(node).is_some_and(|&stamp| stamp == self.epoch)
    }

    /// Starts a new traversal: every node reads as unvisited afterwards.
    pub fn reset(&mut self) -> ResetKind {
        self.epoch = self.epoch.wrapping_next();
        if self.epoch != E::ZERO {
            return ResetKind::Advanced;
        }

        self.stamps.fill(E::ZERO);
        self.epoch = E::ONE;
        trace!(capacity = self.stamps.len(), "epoch wrapped, stamps cleared");
        ResetKind::Cleared
    }

    /// Retires the set and frees its stamp array, returning the number of bytes released.
    ///
    /// Pools holding sets for a long time should call this when evicting, a
    /// large idle stamp array otherwise lives as long as the pool.
    pub fn release(self) -> usize {
        let released = self.memory_usage();
        trace!(capacity = self.stamps.len(), released, "visited set released");
        released
    }

    #[cold]
    fn grow_for(&mut self, node: usize) -> Result<()> {
        let new_len = node
            .checked_add(self.growth_margin)
            .ok_or(VisitedError::CapacityOverflow { node })?;
        let old_len = self.stamps.len();

        self.stamps
            .try_reserve_exact(new_len - old_len)
            .map_err(|source| VisitedError::Allocation {
                requested: new_len,
                source,
            })?;
        self.stamps.resize(new_len, E::ZERO);

        trace!(old_len, new_len, "visited set grown");
        Ok(())
    }
}

impl<E: Epoch> Default for ListSet<E> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<E: Epoch> VisitorSet for ListSet<E> {
    fn get(&self, i: usize) -> bool {
        self.is_visited(i)
    }

    fn set(&mut self, i: usize) {
        self.visit(i)
    }

    fn reset(&mut self) -> ResetKind {
        ListSet::reset(self)
    }
}

impl<E: Epoch> std::fmt::Debug for ListSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSet")
            .field("epoch", &self.epoch)
            .field("capacity", &self.stamps.len())
            .field("growth_margin", &self.growth_margin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn fresh_set_has_nothing_visited() {
        let set: ListSet = ListSet::new(16);
        for i in 0..64 {
            assert!(!set.is_visited(i), "node {i} should start unvisited");
        }
        assert!(!set.is_visited(usize::MAX));
        assert_eq!(set.epoch(), 1);
    }

    #[test]
    fn visit_then_is_visited() {
        let mut set: ListSet = ListSet::new(8);
        for i in [0, 3, 7] {
            set.visit(i);
            assert!(set.is_visited(i));
        }
    }

    #[test]
    fn visit_does_not_leak_to_other_nodes() {
        let mut set: ListSet = ListSet::new(32);
        set.visit(5);
        for i in 0..32 {
            assert_eq!(set.is_visited(i), i == 5, "node {i} mismatch");
        }
    }

    #[test]
    fn read_past_capacity_does_not_grow() {
        let set: ListSet = ListSet::new(4);
        assert!(!set.is_visited(1_000));
        assert_eq!(set.capacity(), 4);
    }

    #[test]
    fn scenario_reset_clears_a_visit() {
        let mut set: ListSet = ListSet::new(4);
        assert_eq!(set.capacity(), 4);
        assert!(!set.is_visited(2));
        set.visit(2);
        assert!(set.is_visited(2));
        assert_eq!(set.reset(), ResetKind::Advanced);
        assert!(!set.is_visited(2));
    }

    #[test]
    fn scenario_visit_past_capacity_grows() {
        let mut set: ListSet = ListSet::new(4);
        set.visit(10);
        assert!(set.capacity() >= 11);
        assert_eq!(set.capacity(), 10 + DEFAULT_GROWTH_MARGIN);
        assert!(set.is_visited(10));
        assert!(!set.is_visited(3));
    }

    #[test]
    fn growth_keeps_existing_stamps() {
        let mut set: ListSet = ListSet::with_growth_margin(4, 2);
        set.visit(1);
        set.visit(3);
        set.visit(9);
        assert_eq!(set.capacity(), 11);
        assert!(set.is_visited(1));
        assert!(set.is_visited(3));
        assert!(set.is_visited(9));
        assert!(!set.is_visited(10));
    }

    #[test]
    fn capacity_never_decreases() {
        let mut set: ListSet = ListSet::with_growth_margin(0, 1);
        let mut last = set.capacity();
        for node in [5, 2, 40, 0, 39, 41, 100, 7] {
            set.visit(node);
            assert!(set.capacity() >= last);
            assert!(set.capacity() > node);
            last = set.capacity();
        }
    }

    #[test]
    fn reset_unvisits_everything_in_range() {
        let mut set: ListSet = ListSet::new(100);
        for i in (0..100).step_by(3) {
            set.visit(i);
        }
        set.reset();
        for i in 0..set.capacity() {
            assert!(!set.is_visited(i), "node {i} survived reset");
        }
    }

    #[test]
    fn wraparound_is_transparent() {
        let mut set: ListSet = ListSet::new(8);
        set.visit(3);
        set.visit(7);

        let mut cleared = 0;
        for _ in 0..<u8 as Epoch>::GENERATIONS {
            if set.reset() == ResetKind::Cleared {
                cleared += 1;
            }
            assert!(!set.is_visited(3));
            assert!(!set.is_visited(7));
        }
        assert_eq!(cleared, 1);
        assert_eq!(set.epoch(), 1);

        set.reset();
        assert!(!set.is_visited(3));
        assert!(!set.is_visited(7));
    }

    #[test]
    fn stale_stamp_does_not_match_after_wraparound() {
        // a stamp written at epoch 1 would collide with the restarted epoch
        // if the clear were skipped.
        let mut set: ListSet = ListSet::new(2);
        set.visit(0);
        for _ in 0..<u8 as Epoch>::GENERATIONS {
            set.reset();
        }
        assert_eq!(set.epoch(), 1);
        assert!(!set.is_visited(0));
    }

    #[test]
    fn scenario_three_hundred_resets() {
        let mut set: ListSet = ListSet::new(1);
        set.visit(0);
        for _ in 0..300 {
            set.reset();
            assert!(!set.is_visited(0));
        }
        assert!(!set.is_visited(0));
    }

    #[test]
    fn visits_in_new_epoch_survive_until_next_reset() {
        let mut set: ListSet = ListSet::new(4);
        for round in 0..600 {
            set.reset();
            let node = round % 4;
            set.visit(node);
            for i in 0..4 {
                assert_eq!(set.is_visited(i), i == node, "round {round}, node {i}");
            }
        }
    }

    #[test]
    fn wider_epoch_behaves_the_same() {
        let mut set: ListSet<u16> = ListSet::new(4);
        set.visit(10);
        assert!(set.is_visited(10));
        assert_eq!(set.reset(), ResetKind::Advanced);
        assert!(!set.is_visited(10));
        assert!(set.memory_usage() >= set.capacity() * 2);
    }

    #[test]
    fn try_visit_reports_overflow() {
        let mut set: ListSet = ListSet::new(4);
        let err = set.try_visit(usize::MAX).unwrap_err();
        assert!(matches!(err, VisitedError::CapacityOverflow { node } if node == usize::MAX));
        assert_eq!(set.capacity(), 4);
    }

    #[test]
    fn try_visit_reports_allocation_failure() {
        let mut set: ListSet = ListSet::new(4);
        let node = usize::MAX - DEFAULT_GROWTH_MARGIN;
        let err = set.try_visit(node).unwrap_err();
        assert!(matches!(err, VisitedError::Allocation { .. }));
        assert_eq!(set.capacity(), 4);
    }

    #[test]
    fn try_visit_in_range_succeeds() {
        let mut set: ListSet = ListSet::new(4);
        set.try_visit(2).unwrap();
        set.try_visit(20).unwrap();
        assert!(set.is_visited(2));
        assert!(set.is_visited(20));
    }

    #[test]
    #[should_panic(expected = "growth margin must be positive")]
    fn zero_growth_margin_panics() {
        let _set: ListSet = ListSet::with_growth_margin(4, 0);
    }

    #[test]
    fn release_reports_freed_bytes() {
        let set: ListSet = ListSet::new(1000);
        assert!(set.release() >= 1000);
    }

    #[test]
    fn matches_hash_set_oracle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut set: ListSet = ListSet::with_growth_margin(16, 8);
        let mut oracle = hashbrown::HashSet::new();

        for _ in 0..2_000 {
            match rng.random_range(0..10) {
                0 => {
                    set.reset();
                    oracle.clear();
                }
                1..=5 => {
                    let node = rng.random_range(0..200);
                    set.visit(node);
                    oracle.insert(node);
                }
                _ => {
                    let node = rng.random_range(0..250);
                    assert_eq!(set.is_visited(node), oracle.contains(&node));
                }
            }
        }
    }
}
