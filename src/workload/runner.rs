use crate::{
    pool::VisitedPool,
    sets::visited::{Epoch, ResetKind, VisitorSet},
    statistics::Stats,
};

/// Replays one traversal against a set that is already reset.
///
/// Returns the number of ids seen for the first time.
pub fn run_traversal<S: VisitorSet + ?Sized>(visited: &mut S, trace: &[usize]) -> usize {
    let mut first_visits = 0;
    for &node in trace {
        if !visited.get(node) {
            visited.set(node);
            first_visits += 1;
        }
    }
    first_visits
}

/// Replays every trace on the same set, resetting it before each traversal.
pub fn run_traversals<S: VisitorSet + ?Sized>(
    visited: &mut S,
    traces: &[Vec<usize>],
    stats: &mut Stats,
) -> usize {
    traces
        .iter()
        .map(|trace| {
            if visited.reset() == ResetKind::Cleared {
                stats.bump_full_clears();
            }
            stats.bump_traversals();
            let first_visits = run_traversal(&mut *visited, trace);
            stats.bump_visits(first_visits);
            first_visits
        })
        .sum()
}

/// Replays every trace on a set borrowed from `pool` for that traversal only.
pub fn run_pooled_traversals<E: Epoch>(
    pool: &VisitedPool<E>,
    traces: &[Vec<usize>],
    stats: &mut Stats,
) -> usize {
    traces
        .iter()
        .map(|trace| {
            // loans arrive reset
            let mut visited = pool.borrow();
            stats.bump_traversals();
            let first_visits = run_traversal(&mut *visited, trace);
            stats.bump_visits(first_visits);
            first_visits
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::PoolConfig,
        sets::visited::{HashVisitedSet, ListSet, UncompressedSet},
        workload::TraceParams,
    };

    #[test]
    fn duplicates_count_once() {
        let mut visited: ListSet = ListSet::new(10);
        assert_eq!(run_traversal(&mut visited, &[1, 2, 1, 3, 2, 1]), 3);
    }

    #[test]
    fn each_traversal_starts_clean() {
        let mut visited: ListSet = ListSet::new(10);
        let mut stats = Stats::new();
        let traces = vec![vec![1, 2, 3], vec![1, 2, 3], vec![3, 3]];
        assert_eq!(run_traversals(&mut visited, &traces, &mut stats), 7);
        assert_eq!(stats.get_traversals(), 3);
        assert_eq!(stats.get_visits(), 7);
        assert_eq!(stats.get_full_clears(), 0);
    }

    #[test]
    fn all_sets_agree_on_a_workload() {
        let traces = TraceParams {
            node_count: 5_000,
            visits_per_traversal: 500,
            hub_ratio: 0.3,
            seed: 3,
        }
        .generate(300);

        let mut list: ListSet = ListSet::new(100);
        let mut hash = HashVisitedSet::new();
        let mut bitmap = UncompressedSet::new(100);

        let mut list_stats = Stats::new();
        let expected = run_traversals(&mut hash, &traces, &mut Stats::new());
        assert_eq!(run_traversals(&mut list, &traces, &mut list_stats), expected);
        assert_eq!(run_traversals(&mut bitmap, &traces, &mut Stats::new()), expected);

        // 300 resets on a u8 epoch wrap exactly once
        assert_eq!(list_stats.get_full_clears(), 1);
    }

    #[test]
    fn pooled_runs_match_direct_runs() {
        let traces = TraceParams {
            node_count: 2_000,
            visits_per_traversal: 100,
            hub_ratio: 0.5,
            seed: 11,
        }
        .generate(50);

        let pool: VisitedPool = VisitedPool::new(PoolConfig::default()).unwrap();
        let mut stats = Stats::new();
        let pooled = run_pooled_traversals(&pool, &traces, &mut stats);
        let direct = run_traversals(&mut HashVisitedSet::new(), &traces, &mut Stats::new());

        assert_eq!(pooled, direct);
        assert_eq!(stats.get_traversals(), 50);
        assert_eq!(pool.stats().get_created(), 1);
        assert_eq!(pool.stats().get_recycled(), 49);
    }
}
