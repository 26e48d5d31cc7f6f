//! Error types for the flymap engine crates
//!
//! Every fallible engine operation returns [`Result<T>`]. The variants are
//! coarse on purpose: callers mostly need to tell "the map is closed" from
//! "this one operation ran out of memory" from "the stored bytes are bad".

use crate::types::TypeTag;
use thiserror::Error;

/// Engine error
#[derive(Debug, Error)]
pub enum Error {
    /// A segment region could not grow to satisfy an allocation.
    ///
    /// Fatal to the triggering operation only; the entry it was working on
    /// keeps its pre-operation content.
    #[error("out of memory: requested {requested} bytes, segment limit is {limit} bytes")]
    OutOfMemory {
        /// Bytes the allocator was asked for
        requested: usize,
        /// Configured byte limit of the region
        limit: usize,
    },

    /// Invalid map configuration (bad segment count, missing codec, ...)
    #[error("configuration error: {0}")]
    Config(String),

    /// No codec registered under the requested type tag
    #[error("no codec registered for {0}")]
    UnknownCodec(TypeTag),

    /// Stored bytes could not be decoded as the expected type
    #[error("codec error: {0}")]
    Codec(String),

    /// A bounded value was given more content than its layout holds
    #[error("capacity exceeded: {len} bytes does not fit in {capacity}")]
    Capacity {
        /// Encoded length that was attempted
        len: usize,
        /// Capacity of the layout
        capacity: usize,
    },

    /// The map has been closed
    #[error("map is closed")]
    Closed,

    /// The map cannot be closed while operations or contexts are active
    #[error("map is busy: {0} active operation(s)")]
    Busy(usize),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    // byteorder reports truncated input as an io::Error
    fn from(e: std::io::Error) -> Self {
        Error::Codec(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Error::Codec(format!("invalid utf-8: {}", e))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Error::Codec(format!("invalid utf-8: {}", e))
    }
}
