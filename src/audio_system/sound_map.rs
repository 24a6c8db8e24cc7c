/// Per-frame sound dedup set
///
/// Remembers which asset ids were already triggered during the current tick
/// so that ten enemies requesting the same "hit" sound in one frame only
/// reach the player once.

use super::source::AssetId;

/// Default number of tracked ids (a 64-byte table).
pub const DEFAULT_CAPACITY: usize = 512;

/// Fixed-capacity bitset keyed by asset id.
///
/// Ids at or above the capacity are never tracked: `is_set` reports false for
/// them and `set` ignores them, so high-numbered assets always bypass dedup.
/// This ceiling is intentional.
#[derive(Debug, Clone)]
pub struct SoundMap {
    table: Box<[u64]>,
    capacity: usize,
}

impl SoundMap {
    /// Create a map tracking ids in `0..capacity`
    pub fn new(capacity: usize) -> Self {
        let words = capacity.div_ceil(64);
        Self {
            table: vec![0u64; words].into_boxed_slice(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget every id. Called once per tick.
    pub fn reset(&mut self) {
        self.table.fill(0);
    }

    pub fn is_set(&self, id: AssetId) -> bool {
        match self.slot(id) {
            Some((word, mask)) => self.table[word] & mask != 0,
            None => false,
        }
    }

    pub fn set(&mut self, id: AssetId) {
        if let Some((word, mask)) = self.slot(id) {
            self.table[word] |= mask;
        }
    }

    fn slot(&self, id: AssetId) -> Option<(usize, u64)> {
        let index = id.0 as usize;
        if index >= self.capacity {
            return None;
        }
        Some((index / 64, 1u64 << (index % 64)))
    }
}

impl Default for SoundMap {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
