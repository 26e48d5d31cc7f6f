//! Bucket directory
//!
//! Open-addressing table from key hash to entry block. Probing is linear
//! from `KeyHash::bucket`. Removal leaves a tombstone so probe chains stay
//! intact; tombstones are dropped on the next rehash.
//!
//! The directory never looks at key bytes itself: `find` takes an equality
//! callback that the segment answers from the region.

use crate::region::RegionHandle;
use flymap_core::KeyHash;
use tracing::debug;

/// Smallest directory size
pub const MIN_BUCKETS: usize = 8;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Empty,
    Tombstone,
    Occupied { hash: u64, block: RegionHandle },
}

/// Hash-to-block index for one segment
#[derive(Debug)]
pub struct BucketDirectory {
    slots: Vec<Slot>,
    len: usize,
    tombstones: usize,
}

impl BucketDirectory {
    /// Directory with room for at least `buckets` slots
    pub fn with_buckets(buckets: usize) -> Self {
        let buckets = buckets.max(MIN_BUCKETS).next_power_of_two();
        Self {
            slots: vec![Slot::Empty; buckets],
            len: 0,
            tombstones: 0,
        }
    }

    /// Number of live entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no entries are live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots
    #[inline]
    pub fn buckets(&self) -> usize {
        self.slots.len()
    }

    /// Number of tombstoned slots
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Find the slot whose block matches `hash` and satisfies `matches`
    pub fn find(&self, hash: KeyHash, mut matches: impl FnMut(RegionHandle) -> bool) -> Option<usize> {
        let mask = self.mask();
        let mut idx = hash.bucket(self.slots.len());
        // load factor < 1 guarantees an empty slot ends every chain
        loop {
            match self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied { hash: h, block } if h == hash.raw() && matches(block) => {
                    return Some(idx);
                }
                _ => {}
            }
            idx = (idx + 1) & mask;
        }
    }

    /// Insert a block for a key known to be absent. Returns its slot.
    ///
    /// May rehash, which renumbers every slot.
    pub fn insert(&mut self, hash: KeyHash, block: RegionHandle) -> usize {
        if (self.len + self.tombstones + 1) * 4 > self.slots.len() * 3 {
            self.rehash();
        }
        let slot = self.place(hash.raw(), block);
        self.len += 1;
        slot
    }

    fn place(&mut self, hash: u64, block: RegionHandle) -> usize {
        let mask = self.mask();
        let mut idx = KeyHash::from_raw(hash).bucket(self.slots.len());
        loop {
            match self.slots[idx] {
                Slot::Empty => break,
                Slot::Tombstone => {
                    self.tombstones -= 1;
                    break;
                }
                Slot::Occupied { .. } => idx = (idx + 1) & mask,
            }
        }
        self.slots[idx] = Slot::Occupied { hash, block };
        idx
    }

    /// Double the table, or rebuild it in place when tombstones dominate
    fn rehash(&mut self) {
        let old_buckets = self.slots.len();
        let buckets = if self.len * 2 >= old_buckets {
            old_buckets * 2
        } else {
            old_buckets
        };
        let old = std::mem::replace(&mut self.slots, vec![Slot::Empty; buckets]);
        let dropped = self.tombstones;
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied { hash, block } = slot {
                self.place(hash, block);
            }
        }
        debug!(
            from = old_buckets,
            to = buckets,
            live = self.len,
            tombstones = dropped,
            "bucket directory rehashed"
        );
    }

    /// Block stored in an occupied slot
    ///
    /// # Panics
    ///
    /// If `slot` is not occupied.
    #[inline]
    pub fn block(&self, slot: usize) -> RegionHandle {
        match self.slots[slot] {
            Slot::Occupied { block, .. } => block,
            _ => panic!("directory slot {} is not occupied", slot),
        }
    }

    /// Point an occupied slot at a relocated block
    pub fn set_block(&mut self, slot: usize, moved: RegionHandle) {
        if let Slot::Occupied { block, .. } = &mut self.slots[slot] {
            *block = moved;
        }
    }

    /// Tombstone an occupied slot and return its block
    pub fn remove(&mut self, slot: usize) -> Option<RegionHandle> {
        match self.slots[slot] {
            Slot::Occupied { block, .. } => {
                self.slots[slot] = Slot::Tombstone;
                self.len -= 1;
                self.tombstones += 1;
                Some(block)
            }
            _ => None,
        }
    }

    /// Every live block, in slot order
    pub fn blocks(&self) -> impl Iterator<Item = RegionHandle> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { block, .. } => Some(*block),
            _ => None,
        })
    }

    /// Forget every entry, keeping the current size
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.len = 0;
        self.tombstones = 0;
    }
}
