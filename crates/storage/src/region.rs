//! Byte region allocator
//!
//! Each segment owns one `ByteRegion`: a growable byte buffer carved into
//! blocks. Blocks come in power-of-two size classes starting at
//! [`MIN_BLOCK`] bytes; a freed block goes onto its class's free-list and is
//! handed out again before the bump pointer advances.
//!
//! ```text
//! ByteRegion (limit = 1 MiB)
//!   data: [ blk16 | blk64 ......... | blk16 | free blk32 | ... | (unused) ]
//!                                                          ^ top
//!   free[0] (16B) -> []
//!   free[1] (32B) -> [offset]
//!   free[2] (64B) -> []
//! ```
//!
//! Handles are offsets, so growing `data` never invalidates a live handle.
//! Only `resize` and `free` do.

use flymap_core::{Error, Result};
use tracing::debug;

/// Smallest block handed out
pub const MIN_BLOCK: usize = 16;

/// Largest supported size class (16 << 27 = 2 GiB)
const MAX_CLASS: u8 = 27;

/// Handle to an allocated block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionHandle {
    offset: usize,
    class: u8,
}

impl RegionHandle {
    /// Byte offset of the block inside the region
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Usable size of the block
    #[inline]
    pub fn capacity(&self) -> usize {
        MIN_BLOCK << self.class
    }
}

/// Allocator statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionStats {
    /// Bytes currently reserved from the host
    pub reserved: usize,
    /// High-water mark of the bump pointer
    pub top: usize,
    /// Bytes in live blocks
    pub in_use: usize,
    /// Bytes parked on free-lists
    pub free: usize,
    /// Number of live blocks
    pub live_blocks: usize,
    /// Configured byte limit
    pub limit: usize,
}

/// Growable, size-classed byte region
pub struct ByteRegion {
    data: Vec<u8>,
    top: usize,
    limit: usize,
    free_lists: Vec<Vec<usize>>,
    in_use: usize,
    live_blocks: usize,
}

impl ByteRegion {
    /// Create an empty region that may grow up to `limit` bytes
    pub fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            top: 0,
            limit,
            free_lists: Vec::new(),
            in_use: 0,
            live_blocks: 0,
        }
    }

    /// Create a region with `initial` bytes reserved up front
    pub fn with_capacity(initial: usize, limit: usize) -> Self {
        let mut region = Self::new(limit);
        let initial = initial.min(limit);
        region.data.resize(initial, 0);
        region
    }

    /// Size class able to hold `size` bytes
    fn class_for(&self, size: usize) -> Result<u8> {
        let rounded = size
            .max(MIN_BLOCK)
            .checked_next_power_of_two()
            .ok_or(Error::OutOfMemory {
                requested: size,
                limit: self.limit,
            })?;
        let class = (rounded / MIN_BLOCK).trailing_zeros() as u8;
        if class > MAX_CLASS || rounded > self.limit {
            return Err(Error::OutOfMemory {
                requested: rounded,
                limit: self.limit,
            });
        }
        Ok(class)
    }

    /// Allocate a zero-filled block of at least `size` bytes
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the region limit would be exceeded or the
    /// host refuses to reserve more memory.
    pub fn allocate(&mut self, size: usize) -> Result<RegionHandle> {
        let class = self.class_for(size)?;
        let capacity = MIN_BLOCK << class;

        let reused = self
            .free_lists
            .get_mut(class as usize)
            .and_then(|list| list.pop());

        let offset = match reused {
            Some(offset) => {
                self.data[offset..offset + capacity].fill(0);
                offset
            }
            None => {
                let end = self.top + capacity;
                if end > self.limit {
                    return Err(Error::OutOfMemory {
                        requested: capacity,
                        limit: self.limit,
                    });
                }
                self.ensure_len(end)?;
                let offset = self.top;
                self.top = end;
                offset
            }
        };

        self.in_use += capacity;
        self.live_blocks += 1;
        Ok(RegionHandle { offset, class })
    }

    /// Move `handle`'s content into a block of at least `new_size` bytes.
    ///
    /// Returns the same handle if the size class does not change. Otherwise
    /// the new block is allocated first, the overlapping prefix copied, and
    /// only then the old block freed; on error the old block is untouched.
    pub fn resize(&mut self, handle: RegionHandle, new_size: usize) -> Result<RegionHandle> {
        let class = self.class_for(new_size)?;
        if class == handle.class {
            return Ok(handle);
        }

        let moved = self.allocate(new_size)?;
        let keep = handle.capacity().min(moved.capacity());
        self.data
            .copy_within(handle.offset..handle.offset + keep, moved.offset);
        self.free(handle);

        debug!(
            from = handle.offset,
            to = moved.offset,
            old_capacity = handle.capacity(),
            new_capacity = moved.capacity(),
            "region block relocated"
        );
        Ok(moved)
    }

    /// Return a block to its free-list
    pub fn free(&mut self, handle: RegionHandle) {
        let class = handle.class as usize;
        if self.free_lists.len() <= class {
            self.free_lists.resize_with(class + 1, Vec::new);
        }
        debug_assert!(!self.free_lists[class].contains(&handle.offset));
        self.free_lists[class].push(handle.offset);
        self.in_use -= handle.capacity();
        self.live_blocks -= 1;
    }

    /// Block content
    #[inline]
    pub fn bytes(&self, handle: RegionHandle) -> &[u8] {
        &self.data[handle.offset..handle.offset + handle.capacity()]
    }

    /// Mutable block content
    #[inline]
    pub fn bytes_mut(&mut self, handle: RegionHandle) -> &mut [u8] {
        let end = handle.offset + handle.capacity();
        &mut self.data[handle.offset..end]
    }

    /// Drop every block and release the backing memory
    pub fn reset(&mut self) {
        self.data = Vec::new();
        self.free_lists = Vec::new();
        self.top = 0;
        self.in_use = 0;
        self.live_blocks = 0;
    }

    /// Current statistics
    pub fn stats(&self) -> RegionStats {
        RegionStats {
            reserved: self.data.len(),
            top: self.top,
            in_use: self.in_use,
            free: self
                .free_lists
                .iter()
                .enumerate()
                .map(|(class, list)| list.len() * (MIN_BLOCK << class))
                .sum(),
            live_blocks: self.live_blocks,
            limit: self.limit,
        }
    }

    /// Grow the backing buffer so that `end` bytes are addressable
    fn ensure_len(&mut self, end: usize) -> Result<()> {
        let len = self.data.len();
        if end <= len {
            return Ok(());
        }
        let target = end.max(len.saturating_mul(2)).min(self.limit);
        self.data
            .try_reserve_exact(target - len)
            .map_err(|_| Error::OutOfMemory {
                requested: target,
                limit: self.limit,
            })?;
        self.data.resize(target, 0);
        debug!(from = len, to = target, "region grown");
        Ok(())
    }
}

impl std::fmt::Debug for ByteRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteRegion")
            .field("stats", &self.stats())
            .finish()
    }
}
