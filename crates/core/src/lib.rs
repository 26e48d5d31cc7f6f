//! Core types for flymap
//!
//! This crate defines what every other flymap crate agrees on:
//! - [`Error`] / [`Result`]: engine error type
//! - [`TypeTag`], [`Layout`], [`ValueMode`]: type and layout descriptors
//! - [`Data`]: typed encode/decode contract for keys and values
//! - [`CodecRegistry`] / [`EntryCodec`]: type-erased codecs resolved per map

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod collections;
pub mod error;
pub mod hash;
pub mod registry;
pub mod types;

pub use codec::{Data, Numeric, Primitive, LEN_PREFIX, MAX_LEN};
pub use error::{Error, Result};
pub use hash::{hash_bytes, KeyHash};
pub use registry::{CodecRegistry, DataCodec, EntryCodec, FixedCodec, VariableCodec};
pub use types::{Layout, TypeTag, ValueMode};
