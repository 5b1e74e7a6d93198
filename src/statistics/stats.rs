use serde::Serialize;

/// Counters describing how visited sets were used.
///
/// Workers keep a private `Stats` and [`merge`](Stats::merge) them once done;
/// the pool keeps its own lifecycle counters and hands out snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    traversals: usize,
    visits: usize,
    full_clears: usize,
    growths: usize,
    created: usize,
    recycled: usize,
    evicted: usize,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    /// Record that a traversal started (one reset of its visited set)
    pub fn bump_traversals(&mut self) {
        self.traversals += 1
    }

    /// Record a batch of first-time visits
    pub fn bump_visits(&mut self, amount: usize) {
        self.visits += amount
    }

    /// Record a reset that had to zero the whole stamp array
    pub fn bump_full_clears(&mut self) {
        self.full_clears += 1
    }

    pub fn bump_growths(&mut self) {
        self.growths += 1
    }

    pub fn bump_created(&mut self) {
        self.created += 1
    }

    pub fn bump_recycled(&mut self) {
        self.recycled += 1
    }

    pub fn bump_evicted(&mut self) {
        self.evicted += 1
    }

    pub fn get_traversals(&self) -> usize {
        self.traversals
    }

    pub fn get_visits(&self) -> usize {
        self.visits
    }

    pub fn get_full_clears(&self) -> usize {
        self.full_clears
    }

    pub fn get_growths(&self) -> usize {
        self.growths
    }

    pub fn get_created(&self) -> usize {
        self.created
    }

    pub fn get_recycled(&self) -> usize {
        self.recycled
    }

    pub fn get_evicted(&self) -> usize {
        self.evicted
    }

    pub fn merge(&self, other: &Stats) -> Stats {
        Stats {
            traversals: self.traversals + other.traversals,
            visits: self.visits + other.visits,
            full_clears: self.full_clears + other.full_clears,
            growths: self.growths + other.growths,
            created: self.created + other.created,
            recycled: self.recycled + other.recycled,
            evicted: self.evicted + other.evicted,
        }
    }
}
