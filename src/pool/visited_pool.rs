use std::{
    ops::{Deref, DerefMut},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use tracing::{debug, info, trace};

use crate::{
    config::PoolConfig,
    error::Result,
    sets::visited::{Epoch, ListSet, ResetKind},
    statistics::Stats,
};

struct PoolInner<E: Epoch> {
    /// Idle sets sorted by ascending capacity, the warmest one is last.
    idle: Vec<ListSet<E>>,
    stats: Stats,
    shut_down: bool,
}

impl<E: Epoch> PoolInner<E> {
    fn insert_sorted(&mut self, set: ListSet<E>) {
        let position = self
            .idle
            .partition_point(|idle| idle.capacity() <= set.capacity());
        self.idle.insert(position, set);
    }
}

/// A pool lending one [`ListSet`] per in-flight traversal.
///
/// Borrowing hands out the idle set with the largest capacity, so that sets
/// which already grew to the size of the graph are reused first. A loan is
/// always in a just-reset state. Dropping the loan resets the set and puts it
/// back, unless the pool is full or shut down, in which case the set is
/// released.
///
/// # Examples
///
/// ```
/// use epochset::{config::PoolConfig, pool::VisitedPool};
///
/// let pool: VisitedPool = VisitedPool::new(PoolConfig::default()).unwrap();
/// {
///     let mut visited = pool.borrow();
///     visited.visit(7);
///     assert!(visited.is_visited(7));
/// }
/// assert!(!pool.borrow().is_visited(7));
/// ```
pub struct VisitedPool<E: Epoch = u8> {
    inner: Mutex<PoolInner<E>>,
    initial_capacity: AtomicUsize,
    growth_margin: usize,
    max_idle: usize,
}

impl<E: Epoch> VisitedPool<E> {
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        debug!(?config, "visited pool created");
        Ok(VisitedPool {
            inner: Mutex::new(PoolInner {
                idle: Vec::with_capacity(config.max_idle),
                stats: Stats::new(),
                shut_down: false,
            }),
            initial_capacity: AtomicUsize::new(config.initial_capacity),
            growth_margin: config.growth_margin,
            max_idle: config.max_idle,
        })
    }

    /// Lends a set for the duration of one traversal.
    pub fn borrow(&self) -> PooledSet<'_, E> {
        let reused = {
            let mut inner = self.lock();
            let set = inner.idle.pop();
            match set {
                Some(_) => inner.stats.bump_recycled(),
                None => inner.stats.bump_created(),
            }
            set
        };

        let set = reused.unwrap_or_else(|| {
            let capacity = self.initial_capacity.load(Ordering::Relaxed);
            trace!(capacity, "no idle visited set, allocating");
            ListSet::with_growth_margin(capacity, self.growth_margin)
        });

        PooledSet {
            pool: self,
            loaned_capacity: set.capacity(),
            set,
        }
    }

    /// Raises the capacity of sets created from now on, e.g. after the graph grew.
    /// Idle sets are left alone, they grow lazily when visited.
    pub fn grow_hint(&self, node_count: usize) {
        let previous = self.initial_capacity.fetch_max(node_count, Ordering::Relaxed);
        if node_count > previous {
            debug!(previous, node_count, "visited pool capacity hint raised");
        }
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity.load(Ordering::Relaxed)
    }

    pub fn idle_len(&self) -> usize {
        self.lock().idle.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.lock().shut_down
    }

    pub fn stats(&self) -> Stats {
        self.lock().stats
    }

    /// Releases every idle set. Sets still on loan are released when they come
    /// back. Returns the number of bytes freed now; calling it again is a no-op.
    pub fn shutdown(&self) -> usize {
        let drained = {
            let mut inner = self.lock();
            if inner.shut_down {
                return 0;
            }
            inner.shut_down = true;
            std::mem::take(&mut inner.idle)
        };

        let count = drained.len();
        let released: usize = drained.into_iter().map(ListSet::release).sum();
        info!(count, released, "visited pool shut down");
        released
    }

    fn give_back(&self, mut set: ListSet<E>, loaned_capacity: usize) {
        let cleared = set.reset() == ResetKind::Cleared;

        let evicted = {
            let mut inner = self.lock();
            if set.capacity() > loaned_capacity {
                inner.stats.bump_growths();
            }
            if cleared {
                inner.stats.bump_full_clears();
            }

            let evicted = if inner.shut_down {
                Some(set)
            } else if inner.idle.len() < self.max_idle {
                inner.insert_sorted(set);
                None
            } else if inner
                .idle
                .first()
                .is_some_and(|coldest| coldest.capacity() < set.capacity())
            {
                // full: the returned set is warmer than the coldest idle one, swap them
                let coldest = inner.idle.remove(0);
                inner.insert_sorted(set);
                Some(coldest)
            } else {
                Some(set)
            };

            if evicted.is_some() {
                inner.stats.bump_evicted();
            }
            evicted
        };

        if let Some(set) = evicted {
            let capacity = set.capacity();
            let released = set.release();
            trace!(capacity, released, "visited set evicted");
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner<E>> {
        // the idle list stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Epoch> Drop for VisitedPool<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<E: Epoch> std::fmt::Debug for VisitedPool<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitedPool")
            .field("initial_capacity", &self.initial_capacity())
            .field("growth_margin", &self.growth_margin)
            .field("max_idle", &self.max_idle)
            .field("idle", &self.idle_len())
            .finish()
    }
}

/// A [`ListSet`] on loan from a [`VisitedPool`]. Returned to the pool on drop.
pub struct PooledSet<'a, E: Epoch = u8> {
    pool: &'a VisitedPool<E>,
    set: ListSet<E>,
    loaned_capacity: usize,
}

impl<E: Epoch> Deref for PooledSet<'_, E> {
    type Target = ListSet<E>;

    fn deref(&self) -> &Self::Target {
        &self.set
    }
}

impl<E: Epoch> DerefMut for PooledSet<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.set
    }
}

impl<E: Epoch> Drop for PooledSet<'_, E> {
    fn drop(&mut self) {
        let set = std::mem::take(&mut self.set);
        self.pool.give_back(set, self.loaned_capacity);
    }
}
