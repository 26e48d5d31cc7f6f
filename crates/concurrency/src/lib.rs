//! Concurrency layer for flymap
//!
//! This crate turns segment locks into caller-facing scopes:
//! - Lifecycle / OpGuard: open/closed state and in-flight operation count
//! - ReadContext: shared lock held for the context's lifetime, read-only view
//! - WriteContext: exclusive lock, commit-then-unbind-then-release on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod lifecycle;

pub use context::{ReadContext, WriteContext};
pub use lifecycle::{Lifecycle, OpGuard};
