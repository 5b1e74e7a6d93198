use std::hash::{BuildHasherDefault, Hasher};

use hashbrown::HashSet;

use crate::sets::visited::{ResetKind, VisitorSet};

/// Hasher for dense integer ids: the id is its own hash.
#[derive(Default)]
pub struct IdentityHasher {
    hash: u64,
}

impl Hasher for IdentityHasher {
    fn write(&mut self, _bytes: &[u8]) {
        panic!("This hasher only accepts u64/usize keys");
    }

    fn write_usize(&mut self, i: usize) {
        self.hash = i as u64;
    }

    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }

    fn finish(&self) -> u64 {
        self.hash
    }
}

/// Visited set backed by a hash set. Unbounded, but `reset` is a `clear`
/// proportional to the table size and every probe hashes.
#[derive(Default)]
pub struct HashVisitedSet {
    inner: HashSet<usize, BuildHasherDefault<IdentityHasher>>,
}

impl HashVisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HashVisitedSet {
            inner: HashSet::with_capacity_and_hasher(capacity, BuildHasherDefault::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl VisitorSet for HashVisitedSet {
    fn get(&self, i: usize) -> bool {
        self.inner.contains(&i)
    }

    fn set(&mut self, i: usize) {
        self.inner.insert(i);
    }

    fn reset(&mut self) -> ResetKind {
        self.inner.clear();
        ResetKind::Cleared
    }
}
