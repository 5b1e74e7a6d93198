use crate::sets::visited::{ResetKind, VisitorSet};

/// A growable bitmap of visited ids, cleared bit by bit on reset.
///
/// One bit per node is as dense as it gets, but `reset` writes the whole
/// buffer, which dominates when traversals are short relative to the graph.
///
/// # Examples
///
/// ```
/// use epochset::sets::visited::{UncompressedSet, VisitorSet};
///
/// let mut bs = UncompressedSet::new(10);
/// assert!(!bs.get(3));
///
/// bs.set(3);
/// assert!(bs.get(3));
///
/// bs.set(42);
/// assert!(bs.get(42));
/// assert!(bs.capacity() > 42);
/// ```
pub struct UncompressedSet {
    /*private*/ buffer: Vec<u8>,
}

impl UncompressedSet {
    /// Constructs a new [`UncompressedSet`] with space for `capacity` bits,
    /// all initialized to zero.
    pub fn new(capacity: usize) -> Self {
        UncompressedSet {
            buffer: vec![0u8; capacity.div_ceil(8)],
        }
    }

    /// Number of addressable bits, always a multiple of 8.
    pub fn capacity(&self) -> usize {
        self.buffer.len() * 8
    }
}

impl VisitorSet for UncompressedSet {
    /// Sets the bit at `index`, doubling the buffer when `index` is out of range.
    fn set(&mut self, index: usize) {
        let byte_index = index / 8;
        let bit_index = index % 8;

        if byte_index >= self.buffer.len() {
            let new_len = (byte_index + 1).max(self.buffer.len() * 2);
            self.buffer.resize(new_len, 0);
        }

        self.buffer[byte_index] |= 1u8 << bit_index
    }

    /// Returns `true` if the bit at `index` is set. Out of range reads as unset.
    fn get(&self, index: usize) -> bool {
        let byte_index = index / 8;
        let bit_index = index % 8;

        self.buffer
            .get(byte_index)
            .is_some_and(|byte| byte & (1u8 << bit_index) != 0)
    }

    fn reset(&mut self) -> ResetKind {
        self.buffer.fill(0);
        ResetKind::Cleared
    }
}
