//! Use-Case Test Suite
//!
//! End-to-end scenarios against the public `FlyMap` surface: copy-in/copy-out
//! access, reusable instances, locked read and write contexts in both Direct
//! and Heap mode, collection values, and the map lifecycle.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test use_cases
//!
//! # Fixed-size value types only
//! cargo test --test use_cases fixed_values::
//! ```

#[path = "../common/mod.rs"]
mod common;

use flymap::prelude::*;

pub use common::*;

// Test modules
mod collections;
mod fixed_values;
mod lifecycle;
mod roundtrip;
mod strings;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Open a write context on `key`, run `f` on the bound value, then release.
pub fn update<K: Data, V: Flyweight>(map: &FlyMap<K, V>, key: &K, using: &mut V, f: impl FnOnce(&mut V)) {
    let mut ctx = map
        .acquire_using_locked(key, using)
        .expect("failed to acquire write context");
    f(ctx.get_mut());
    ctx.close().expect("commit failed");
}

/// Read `key` under a read context, mapping the bound value with `f`.
pub fn read<K: Data, V: Flyweight, R>(map: &FlyMap<K, V>, key: &K, using: &mut V, f: impl FnOnce(&V) -> R) -> Option<R> {
    let ctx = map
        .get_using_locked(key, using)
        .expect("failed to open read context");
    if ctx.present() {
        Some(f(ctx.get()))
    } else {
        None
    }
}
