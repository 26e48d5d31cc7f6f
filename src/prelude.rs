//! Convenient imports for flymap.
//!
//! ```ignore
//! use flymap::prelude::*;
//!
//! let map = FlyMap::<i64, LongValue>::builder().create()?;
//! ```

// Main entry point
pub use crate::builder::FlyMapBuilder;
pub use crate::config::MapConfig;
pub use crate::map::FlyMap;

// Error handling
pub use crate::error::{Error, Result};

// Contexts
pub use flymap_concurrency::{ReadContext, WriteContext};

// Values
pub use flymap_storage::{
    BooleanValue, ByteValue, CharValue, DoubleValue, FixedString, FloatValue, Flyweight,
    IntValue, LongValue, SampleBean, ShortValue, StringValue, UnsignedByteValue,
    UnsignedIntValue, UnsignedShortValue,
};

// Codecs
pub use flymap_core::{Data, TypeTag, ValueMode};
