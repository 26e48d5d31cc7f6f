//! Scoped access contexts
//!
//! A context is the only way to hold a segment lock across caller code.
//! It borrows the caller's value instance for its whole lifetime and
//! releases the lock when it is dropped:
//!
//! ```text
//! ReadContext   shared lock   value bound read-only    Deref
//! WriteContext  exclusive     value bound for writing  Deref + DerefMut
//! ```
//!
//! On release a write context first commits the value (a no-op for Direct
//! values, whose writes already landed), then unbinds it, then drops the
//! lock. This runs on every exit path: normal scope end, an early `?`
//! return, or a panic unwinding through the scope. A commit that fails on
//! drop is logged and the lock is still released.

use crate::lifecycle::OpGuard;
use flymap_core::{KeyHash, Result};
use flymap_storage::{
    ExclusiveEntry, Flyweight, SegmentReadGuard, SegmentWriteGuard, SharedEntry,
};
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::error;

/// Shared access to one entry, read-only for its whole lifetime
pub struct ReadContext<'a, V: Flyweight> {
    value: &'a mut V,
    entry: Option<SharedEntry>,
    segment: Option<SegmentReadGuard>,
    present: bool,
    _op: OpGuard<'a>,
}

impl<'a, V: Flyweight> ReadContext<'a, V> {
    /// Look `key` up under `guard` and bind `value` to it if present.
    ///
    /// When the key is absent the lock is still held until the context is
    /// dropped, and `value` is left untouched.
    pub fn bind(
        op: OpGuard<'a>,
        guard: SegmentReadGuard,
        key: &[u8],
        hash: KeyHash,
        value: &'a mut V,
    ) -> Result<Self> {
        match guard.find(key, hash) {
            None => Ok(Self {
                value,
                entry: None,
                segment: Some(guard),
                present: false,
                _op: op,
            }),
            Some(handle) => {
                let entry = value.bind_shared(SharedEntry::new(guard, handle))?;
                Ok(Self {
                    value,
                    entry,
                    segment: None,
                    present: true,
                    _op: op,
                })
            }
        }
    }

    /// True if the key was present when the context was opened
    pub fn present(&self) -> bool {
        self.present
    }

    /// The bound value
    pub fn get(&self) -> &V {
        self.value
    }

    /// Release the lock now
    pub fn close(self) {}
}

impl<V: Flyweight> Deref for ReadContext<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.value
    }
}

impl<V: Flyweight> Drop for ReadContext<'_, V> {
    fn drop(&mut self) {
        self.value.unbind();
        self.entry = None;
        self.segment = None;
    }
}

impl<V: Flyweight> fmt::Debug for ReadContext<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadContext")
            .field("present", &self.present)
            .field("mode", &self.value.mode())
            .finish()
    }
}

/// Exclusive access to one entry, created with the zero value if absent
pub struct WriteContext<'a, V: Flyweight> {
    value: &'a mut V,
    entry: Option<ExclusiveEntry>,
    finished: bool,
    _op: OpGuard<'a>,
}

impl<'a, V: Flyweight> WriteContext<'a, V> {
    /// Find or create the entry for `key` under `guard` and bind `value`.
    ///
    /// A new entry is initialised from `zero`. On error the lock is
    /// released before returning.
    pub fn bind(
        op: OpGuard<'a>,
        mut guard: SegmentWriteGuard,
        key: &[u8],
        hash: KeyHash,
        zero: &[u8],
        value: &'a mut V,
    ) -> Result<Self> {
        let handle = guard.acquire_or_create(key, hash, zero)?;
        let entry = value.bind_exclusive(ExclusiveEntry::new(guard, handle))?;
        Ok(Self {
            value,
            entry,
            finished: false,
            _op: op,
        })
    }

    /// The bound value
    pub fn get(&self) -> &V {
        self.value
    }

    /// The bound value, writable
    pub fn get_mut(&mut self) -> &mut V {
        self.value
    }

    /// Commit and release, reporting a failed commit.
    ///
    /// Dropping the context does the same but can only log the failure.
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        if std::mem::replace(&mut self.finished, true) {
            return Ok(());
        }
        let result = match self.entry.as_mut() {
            Some(entry) => self.value.commit(entry),
            None => Ok(()),
        };
        self.value.unbind();
        self.entry = None;
        result
    }
}

impl<V: Flyweight> Deref for WriteContext<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.value
    }
}

impl<V: Flyweight> DerefMut for WriteContext<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.value
    }
}

impl<V: Flyweight> Drop for WriteContext<'_, V> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            error!(error = %e, "write context commit failed on release");
        }
    }
}

impl<V: Flyweight> fmt::Debug for WriteContext<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteContext")
            .field("finished", &self.finished)
            .field("mode", &self.value.mode())
            .finish()
    }
}
