//! # flymap
//!
//! A segmented concurrent key-value map with flyweight values.
//!
//! Entries live as encoded bytes in per-segment byte regions. Values are
//! read and written either by copy (`put`, `get`) or through a reusable
//! *flyweight* instance bound to the stored bytes for the lifetime of a
//! locked context.
//!
//! ## Quick Start
//!
//! ```ignore
//! use flymap::prelude::*;
//!
//! let map = FlyMap::<String, IntValue>::builder()
//!     .segments(16)
//!     .create()?;
//!
//! // Copy in, copy out
//! let mut v = IntValue::new_heap();
//! v.set_value(123);
//! map.put(&"a".to_string(), &v)?;
//!
//! // Update in place under the segment's write lock
//! let mut direct = IntValue::new_direct();
//! {
//!     let mut ctx = map.acquire_using_locked(&"a".to_string(), &mut direct)?;
//!     ctx.add_value(1107);
//! }
//!
//! // Read under the shared lock
//! let ctx = map.get_using_locked(&"a".to_string(), &mut direct)?;
//! assert!(ctx.present());
//! assert_eq!(ctx.get_value(), 1230);
//! drop(ctx);
//!
//! map.close()?;
//! ```
//!
//! ## Value modes
//!
//! - **Direct**: the instance aliases the stored bytes while bound; writes
//!   land immediately. Generated by [`flyweight!`] and [`FixedString`].
//! - **Heap**: the instance holds a decoded copy; a write context encodes it
//!   back when it closes. Used by strings, collections and primitives.
//!
//! ## Crates
//!
//! - `flymap-core`: errors, type tags, codecs, key hashing
//! - `flymap-storage`: byte regions, segments, flyweight values
//! - `flymap-concurrency`: lifecycle and locked contexts

#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod map;

pub mod prelude;

// Re-export main entry points
pub use builder::FlyMapBuilder;
pub use config::MapConfig;
pub use error::{Error, Result};
pub use map::{FlyMap, MapStats};

// Re-export contexts
pub use flymap_concurrency::{ReadContext, WriteContext};

// Re-export value types
pub use flymap_storage::{
    flyweight, BooleanValue, ByteValue, CharValue, DoubleValue, FixedString, FloatValue,
    Flyweight, IntValue, LongValue, SampleBean, ShortValue, StringValue, UnsignedByteValue,
    UnsignedIntValue, UnsignedShortValue,
};

// Re-export codec types
pub use flymap_core::{CodecRegistry, Data, EntryCodec, Layout, TypeTag, ValueMode};

// Re-export stats
pub use flymap_storage::{RegionStats, SegmentStats};
