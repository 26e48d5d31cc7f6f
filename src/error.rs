//! Public error type for flymap.
//!
//! This module wraps the engine crates' error and presents a stable surface
//! to users.

use thiserror::Error;

/// All flymap errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A segment ran out of room; the entry being written is unchanged
    #[error("out of memory: requested {requested} bytes, segment limit is {limit} bytes")]
    OutOfMemory {
        /// Bytes requested from the segment
        requested: usize,
        /// Segment byte limit
        limit: usize,
    },

    /// Invalid configuration or unresolvable codec, reported at construction
    #[error("configuration error: {0}")]
    Config(String),

    /// Stored bytes did not decode as the expected type
    #[error("codec error: {0}")]
    Codec(String),

    /// Bounded value overflow
    #[error("capacity exceeded: {len} bytes does not fit in {capacity}")]
    Capacity {
        /// Attempted length
        len: usize,
        /// Layout capacity
        capacity: usize,
    },

    /// The map has been closed
    #[error("map is closed")]
    Closed,

    /// Close refused while operations or contexts are active
    #[error("map is busy: {0} active operation(s)")]
    Busy(usize),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for flymap operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the map was closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }

    /// Check if a segment ran out of memory.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::OutOfMemory { .. })
    }

    /// Check if this is a construction-time configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if the operation may succeed once contexts are released.
    pub fn is_busy(&self) -> bool {
        matches!(self, Error::Busy(_))
    }
}

// Convert from engine errors
impl From<flymap_core::Error> for Error {
    fn from(e: flymap_core::Error) -> Self {
        use flymap_core::Error as CoreError;
        match e {
            CoreError::OutOfMemory { requested, limit } => Error::OutOfMemory { requested, limit },
            CoreError::Config(msg) => Error::Config(msg),
            CoreError::UnknownCodec(tag) => {
                Error::Config(format!("no codec registered for {}", tag))
            }
            CoreError::Codec(msg) => Error::Codec(msg),
            CoreError::Capacity { len, capacity } => Error::Capacity { len, capacity },
            CoreError::Closed => Error::Closed,
            CoreError::Busy(active) => Error::Busy(active),
        }
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
