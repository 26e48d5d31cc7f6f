//! Entry bindings
//!
//! A binding is a segment lock guard paired with the handle of one entry in
//! that segment. Holding the binding holds the lock, so the entry bytes
//! cannot move or change underneath it. Dropping the binding releases the
//! lock.

use crate::segment::{EntryHandle, SegmentReadGuard, SegmentWriteGuard};
use flymap_core::Result;
use std::fmt;

/// Shared access to one entry
pub struct SharedEntry {
    guard: SegmentReadGuard,
    handle: EntryHandle,
}

impl SharedEntry {
    /// Pair a shared guard with an entry it covers
    pub fn new(guard: SegmentReadGuard, handle: EntryHandle) -> Self {
        Self { guard, handle }
    }

    /// Value bytes
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.guard.value(self.handle)
    }

    /// Key bytes
    pub fn key(&self) -> &[u8] {
        self.guard.key(self.handle)
    }

    /// Index of the locked segment
    pub fn segment(&self) -> usize {
        self.guard.index()
    }
}

impl fmt::Debug for SharedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEntry")
            .field("segment", &self.segment())
            .field("handle", &self.handle)
            .finish()
    }
}

/// Exclusive access to one entry
pub struct ExclusiveEntry {
    guard: SegmentWriteGuard,
    handle: EntryHandle,
}

impl ExclusiveEntry {
    /// Pair an exclusive guard with an entry it covers
    pub fn new(guard: SegmentWriteGuard, handle: EntryHandle) -> Self {
        Self { guard, handle }
    }

    /// Value bytes
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.guard.value(self.handle)
    }

    /// Mutable value bytes; writes land directly in the segment
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.guard.value_mut(self.handle)
    }

    /// Key bytes
    pub fn key(&self) -> &[u8] {
        self.guard.key(self.handle)
    }

    /// Index of the locked segment
    pub fn segment(&self) -> usize {
        self.guard.index()
    }

    /// Replace the whole value, growing the entry if needed
    pub fn store(&mut self, bytes: &[u8]) -> Result<()> {
        self.handle = self.guard.store_value(self.handle, bytes)?;
        Ok(())
    }
}

impl fmt::Debug for ExclusiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusiveEntry")
            .field("segment", &self.segment())
            .field("handle", &self.handle)
            .finish()
    }
}

/// Either kind of entry access, as held by a direct flyweight
#[derive(Debug)]
pub enum Binding {
    /// Read-only view
    Shared(SharedEntry),
    /// Writable view
    Exclusive(ExclusiveEntry),
}

impl Binding {
    /// Value bytes
    pub fn bytes(&self) -> &[u8] {
        match self {
            Binding::Shared(entry) => entry.bytes(),
            Binding::Exclusive(entry) => entry.bytes(),
        }
    }

    /// Mutable value bytes, if the binding is exclusive
    pub fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match self {
            Binding::Shared(_) => None,
            Binding::Exclusive(entry) => Some(entry.bytes_mut()),
        }
    }

    /// True for an exclusive binding
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Binding::Exclusive(_))
    }
}
