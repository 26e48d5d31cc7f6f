//! Storage layer for flymap
//!
//! This crate owns the bytes:
//! - ByteRegion: per-segment growable allocator with size-class free-lists
//! - BucketDirectory: open-addressing hash index into the region
//! - Segment: region + directory behind a reader/writer lock
//! - SharedEntry / ExclusiveEntry: a held lock plus one entry handle
//! - Flyweight: how a caller-supplied value binds to an entry

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod directory;
pub mod entry;
pub mod flyweight;
pub mod region;
pub mod segment;

pub use binding::{Binding, ExclusiveEntry, SharedEntry};
pub use directory::BucketDirectory;
pub use flyweight::{
    BooleanValue, ByteValue, CharValue, DoubleValue, FixedString, FloatValue, Flyweight, IntValue,
    LongValue, SampleBean, ShortValue, StringValue, UnsignedByteValue, UnsignedIntValue,
    UnsignedShortValue,
};
pub use region::{ByteRegion, RegionHandle, RegionStats};
pub use segment::{
    EntryHandle, Segment, SegmentConfig, SegmentReadGuard, SegmentStats, SegmentState,
    SegmentWriteGuard,
};

#[doc(hidden)]
pub mod __private {
    pub use flymap_core::codec::take;
    pub use flymap_core::{Data, Error, Layout, Numeric, Primitive, Result, TypeTag, ValueMode};
}
