//! Value flyweights
//!
//! Every value type stored in a map implements [`Flyweight`]. The trait
//! decides what happens when a caller-supplied instance is bound to an entry
//! under a segment lock:
//!
//! - Heap mode (the default): the entry bytes are decoded into the instance,
//!   which then owns a private copy. Writes made through a write context are
//!   encoded back into the entry before the lock is released.
//! - Direct mode: the instance keeps the binding (lock guard plus entry
//!   handle) and its accessors read and write the entry bytes in place.
//!   Nothing is copied on bind or on release.
//!
//! Direct types are generated with the [`flyweight!`](crate::flyweight!)
//! macro or hand-written like [`FixedString`]. Owned types such as `String`,
//! numbers and collections are always Heap.

mod macros;
mod text;
mod values;

pub use text::{FixedString, StringValue};
pub use values::{
    BooleanValue, ByteValue, CharValue, DoubleValue, FloatValue, IntValue, LongValue,
    SampleBean, ShortValue, UnsignedByteValue, UnsignedIntValue, UnsignedShortValue,
};

use crate::binding::{ExclusiveEntry, SharedEntry};
use flymap_core::{Data, Result, ValueMode};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// A value that can be bound to a map entry
pub trait Flyweight: Data {
    /// How this instance is bound
    fn mode(&self) -> ValueMode {
        ValueMode::Heap
    }

    /// Bind for reading.
    ///
    /// Returns the entry back if the caller must keep the lock itself
    /// (Heap), or `None` once the instance has taken ownership of it
    /// (Direct).
    fn bind_shared(&mut self, entry: SharedEntry) -> Result<Option<SharedEntry>> {
        decode_shared(self, entry)
    }

    /// Bind for writing; same return contract as [`Flyweight::bind_shared`]
    fn bind_exclusive(&mut self, entry: ExclusiveEntry) -> Result<Option<ExclusiveEntry>> {
        decode_exclusive(self, entry)
    }

    /// Write the instance's state into `entry`
    fn commit(&self, entry: &mut ExclusiveEntry) -> Result<()> {
        encode_into(self, entry)
    }

    /// Drop any binding the instance holds, keeping its current content
    fn unbind(&mut self) {}

    /// True while the instance holds a binding
    fn is_bound(&self) -> bool {
        false
    }
}

/// Heap bind: decode a private copy and hand the entry back
pub fn decode_shared<V: Data>(value: &mut V, entry: SharedEntry) -> Result<Option<SharedEntry>> {
    value.decode_into(entry.bytes())?;
    Ok(Some(entry))
}

/// Heap bind for writing
pub fn decode_exclusive<V: Data>(
    value: &mut V,
    entry: ExclusiveEntry,
) -> Result<Option<ExclusiveEntry>> {
    value.decode_into(entry.bytes())?;
    Ok(Some(entry))
}

/// Heap commit: encode and store, skipping the write when nothing changed
pub fn encode_into<V: Data>(value: &V, entry: &mut ExclusiveEntry) -> Result<()> {
    let mut bytes = Vec::with_capacity(value.encoded_len());
    value.write_to(&mut bytes)?;
    if entry.bytes() == bytes.as_slice() {
        return Ok(());
    }
    entry.store(&bytes)
}

macro_rules! heap_flyweight {
    ($($ty:ty),* $(,)?) => {
        $(impl Flyweight for $ty {})*
    };
}

heap_flyweight!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char, String);

impl<T: Data> Flyweight for Vec<T> {}
impl<T: Data + Eq + Hash> Flyweight for HashSet<T> {}
impl<T: Data + Ord> Flyweight for BTreeSet<T> {}
impl<K: Data + Eq + Hash, V: Data> Flyweight for HashMap<K, V> {}
impl<K: Data + Ord, V: Data> Flyweight for BTreeMap<K, V> {}
