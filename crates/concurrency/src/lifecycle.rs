//! Map lifecycle tracking
//!
//! One atomic word holds both the closed flag (top bit) and the number of
//! operations currently in flight (remaining bits). Entering an operation
//! and closing the map are single compare-and-swap steps against that word,
//! so an operation can never start on a map that is being closed and a map
//! can never close under a live operation.

use flymap_core::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

const CLOSED: usize = 1 << (usize::BITS - 1);

/// Open/closed state plus active-operation count
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: AtomicUsize,
}

impl Lifecycle {
    /// An open map with nothing in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] once the map has been closed.
    pub fn enter(&self) -> Result<OpGuard<'_>> {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
                if s & CLOSED != 0 {
                    None
                } else {
                    Some(s + 1)
                }
            })
            .map_err(|_| Error::Closed)?;
        Ok(OpGuard { lifecycle: self })
    }

    /// Close the map. Closing twice is not an error.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] if any operation or context is still active; the map
    /// stays open.
    pub fn close(&self) -> Result<()> {
        let result = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
                if s == 0 {
                    Some(CLOSED)
                } else {
                    None
                }
            });
        match result {
            Ok(_) => {
                debug!("map closed");
                Ok(())
            }
            Err(s) if s & CLOSED != 0 => Ok(()),
            Err(active) => Err(Error::Busy(active)),
        }
    }

    /// True once [`Lifecycle::close`] has succeeded
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) & CLOSED != 0
    }

    /// Operations and contexts currently in flight
    pub fn active(&self) -> usize {
        self.state.load(Ordering::Acquire) & !CLOSED
    }
}

/// Marks one operation as active until dropped
#[derive(Debug)]
pub struct OpGuard<'a> {
    lifecycle: &'a Lifecycle,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.state.fetch_sub(1, Ordering::AcqRel);
    }
}
