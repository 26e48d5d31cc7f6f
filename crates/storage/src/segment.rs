//! Segments
//!
//! A map is split into a power-of-two number of segments. Each segment owns
//! its own byte region, its own bucket directory and its own reader/writer
//! lock, so operations on different segments never contend.
//!
//! # Design
//!
//! - `SegmentState`: the unlocked data. Every method assumes the caller
//!   already holds the right lock.
//! - `Segment`: `Arc<RwLock<SegmentState>>`. The lock is taken through
//!   parking_lot's `arc_lock` guards so a guard can outlive the borrow of
//!   the segment and travel inside a context or a bound flyweight.
//!
//! # Thread Safety
//!
//! - many readers or one writer per segment
//! - parking_lot locks do not poison; a panic while a guard is held simply
//!   releases it during unwinding

use crate::directory::BucketDirectory;
use crate::entry;
use crate::region::{ByteRegion, RegionHandle, RegionStats};
use flymap_core::{Error, KeyHash, Result};
use parking_lot::{ArcRwLockReadGuard, ArcRwLockWriteGuard, RawRwLock, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Shared lock on a segment, owned independently of the segment borrow
pub type SegmentReadGuard = ArcRwLockReadGuard<RawRwLock, SegmentState>;

/// Exclusive lock on a segment, owned independently of the segment borrow
pub type SegmentWriteGuard = ArcRwLockWriteGuard<RawRwLock, SegmentState>;

/// Per-segment sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Hard cap on the segment's region
    pub max_bytes: usize,
    /// Initial directory size
    pub initial_buckets: usize,
    /// Minimum key plus value bytes reserved for a new entry
    pub entry_size: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_bytes: 64 << 20,
            initial_buckets: 64,
            entry_size: 0,
        }
    }
}

/// Location of a live entry, valid while the segment lock is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHandle {
    slot: usize,
    block: RegionHandle,
}

impl EntryHandle {
    /// Directory slot
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Region block
    pub fn block(&self) -> RegionHandle {
        self.block
    }
}

/// Point-in-time view of one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStats {
    /// Segment index
    pub index: usize,
    /// Live entries
    pub entries: usize,
    /// Directory size
    pub buckets: usize,
    /// Tombstoned directory slots
    pub tombstones: usize,
    /// Allocator view
    pub region: RegionStats,
}

/// Data owned by one segment
#[derive(Debug)]
pub struct SegmentState {
    index: usize,
    config: SegmentConfig,
    region: ByteRegion,
    directory: BucketDirectory,
}

impl SegmentState {
    /// Empty segment state
    pub fn new(index: usize, config: SegmentConfig) -> Self {
        Self {
            index,
            config,
            region: ByteRegion::new(config.max_bytes),
            directory: BucketDirectory::with_buckets(config.initial_buckets),
        }
    }

    /// Segment index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// True if the segment holds no entries
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Locate the entry for `key`
    pub fn find(&self, key: &[u8], hash: KeyHash) -> Option<EntryHandle> {
        let region = &self.region;
        self.directory
            .find(hash, |block| entry::key(region.bytes(block)) == key)
            .map(|slot| EntryHandle {
                slot,
                block: self.directory.block(slot),
            })
    }

    /// Key bytes of an entry
    pub fn key(&self, handle: EntryHandle) -> &[u8] {
        entry::key(self.region.bytes(handle.block))
    }

    /// Value bytes of an entry
    pub fn value(&self, handle: EntryHandle) -> &[u8] {
        entry::value(self.region.bytes(handle.block))
    }

    /// Mutable value bytes of an entry; the length cannot change this way
    pub fn value_mut(&mut self, handle: EntryHandle) -> &mut [u8] {
        entry::value_mut(self.region.bytes_mut(handle.block))
    }

    /// Copy of the value, if `key` is present
    pub fn get(&self, key: &[u8], hash: KeyHash) -> Option<Vec<u8>> {
        self.find(key, hash).map(|h| self.value(h).to_vec())
    }

    /// Add an entry for a key known to be absent
    fn insert(&mut self, key: &[u8], hash: KeyHash, value: &[u8]) -> Result<EntryHandle> {
        let reserve = self
            .config
            .entry_size
            .saturating_sub(key.len())
            .max(value.len());
        let block = self.region.allocate(entry::checked_block_size(key.len(), reserve)?)?;
        let bytes = self.region.bytes_mut(block);
        entry::init(bytes, key, 0);
        entry::write_value(bytes, value);
        let slot = self.directory.insert(hash, block);
        trace!(segment = self.index, slot, "entry created");
        Ok(EntryHandle { slot, block })
    }

    /// Insert or replace; returns the previous value bytes
    pub fn put(&mut self, key: &[u8], hash: KeyHash, value: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.find(key, hash) {
            Some(handle) => {
                let previous = self.value(handle).to_vec();
                self.store_value(handle, value)?;
                Ok(Some(previous))
            }
            None => {
                self.insert(key, hash, value)?;
                Ok(None)
            }
        }
    }

    /// Remove `key`; returns the removed value bytes
    pub fn remove(&mut self, key: &[u8], hash: KeyHash) -> Option<Vec<u8>> {
        let handle = self.find(key, hash)?;
        let previous = self.value(handle).to_vec();
        if let Some(block) = self.directory.remove(handle.slot) {
            self.region.free(block);
        }
        Some(previous)
    }

    /// Existing entry for `key`, or a new one holding `zero`
    pub fn acquire_or_create(&mut self, key: &[u8], hash: KeyHash, zero: &[u8]) -> Result<EntryHandle> {
        match self.find(key, hash) {
            Some(handle) => Ok(handle),
            None => self.insert(key, hash, zero),
        }
    }

    /// Replace an entry's value, relocating the block if it has outgrown it.
    ///
    /// Returns the entry's handle, which differs from `handle` after a
    /// relocation. On error the entry keeps its previous value.
    pub fn store_value(&mut self, handle: EntryHandle, value: &[u8]) -> Result<EntryHandle> {
        let block = self.region.bytes(handle.block);
        if value.len() <= entry::value_cap(block) {
            entry::write_value(self.region.bytes_mut(handle.block), value);
            return Ok(handle);
        }

        let key_len = entry::key_len(block);
        let exact = entry::checked_block_size(key_len, value.len())?;
        let doubled = entry::value_cap(block).saturating_mul(2).max(value.len());
        let grown = entry::checked_block_size(key_len, doubled).unwrap_or(exact);
        let moved = match self.region.resize(handle.block, grown) {
            Ok(moved) => moved,
            Err(Error::OutOfMemory { .. }) if grown > exact => {
                self.region.resize(handle.block, exact)?
            }
            Err(e) => return Err(e),
        };

        let bytes = self.region.bytes_mut(moved);
        entry::refit(bytes);
        entry::write_value(bytes, value);
        self.directory.set_block(handle.slot, moved);
        debug!(
            segment = self.index,
            slot = handle.slot,
            capacity = moved.capacity(),
            "entry relocated"
        );
        Ok(EntryHandle {
            slot: handle.slot,
            block: moved,
        })
    }

    /// Drop every entry and release the region's memory
    pub fn clear(&mut self) {
        self.directory.clear();
        self.region.reset();
    }

    /// Current statistics
    pub fn stats(&self) -> SegmentStats {
        SegmentStats {
            index: self.index,
            entries: self.directory.len(),
            buckets: self.directory.buckets(),
            tombstones: self.directory.tombstones(),
            region: self.region.stats(),
        }
    }
}

/// A lockable segment
#[derive(Debug, Clone)]
pub struct Segment {
    index: usize,
    state: Arc<RwLock<SegmentState>>,
}

impl Segment {
    /// Create an empty segment
    pub fn new(index: usize, config: SegmentConfig) -> Self {
        Self {
            index,
            state: Arc::new(RwLock::new(SegmentState::new(index, config))),
        }
    }

    /// Segment index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Block until a shared lock is held
    pub fn read(&self) -> SegmentReadGuard {
        self.state.read_arc()
    }

    /// Block until the exclusive lock is held
    pub fn write(&self) -> SegmentWriteGuard {
        self.state.write_arc()
    }

    /// Shared lock, giving up after `timeout`
    pub fn try_read_for(&self, timeout: Duration) -> Option<SegmentReadGuard> {
        self.state.try_read_arc_for(timeout)
    }

    /// Exclusive lock, giving up after `timeout`
    pub fn try_write_for(&self, timeout: Duration) -> Option<SegmentWriteGuard> {
        self.state.try_write_arc_for(timeout)
    }

    /// Run `f` under a short-lived shared lock
    pub fn view<R>(&self, f: impl FnOnce(&SegmentState) -> R) -> R {
        f(&self.state.read())
    }

    /// Copy of the value for `key`
    pub fn get(&self, key: &[u8], hash: KeyHash) -> Option<Vec<u8>> {
        self.state.read().get(key, hash)
    }

    /// True if `key` is present
    pub fn contains(&self, key: &[u8], hash: KeyHash) -> bool {
        self.state.read().find(key, hash).is_some()
    }

    /// Insert or replace
    pub fn put(&self, key: &[u8], hash: KeyHash, value: &[u8]) -> Result<Option<Vec<u8>>> {
        self.state.write().put(key, hash, value)
    }

    /// Remove
    pub fn remove(&self, key: &[u8], hash: KeyHash) -> Option<Vec<u8>> {
        self.state.write().remove(key, hash)
    }

    /// Live entry count
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// True if the segment is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.state.write().clear();
    }

    /// Statistics
    pub fn stats(&self) -> SegmentStats {
        self.state.read().stats()
    }
}
