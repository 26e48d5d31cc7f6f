//! The map facade.
//!
//! A [`FlyMap`] partitions keys across a fixed array of segments by key
//! hash. Each operation locks exactly one segment; keys in different
//! segments never contend.

use crate::builder::FlyMapBuilder;
use crate::config::MapConfig;
use crate::error::{Error, Result};
use flymap_concurrency::{Lifecycle, ReadContext, WriteContext};
use flymap_core::{CodecRegistry, Data, EntryCodec, KeyHash, TypeTag};
use flymap_storage::{Flyweight, Segment, SegmentStats};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A segmented concurrent map with flyweight values.
///
/// Keys and values are stored as encoded bytes inside per-segment regions.
/// Plain operations (`put`, `get`, `remove`) copy whole values in and out.
/// Locked operations bind a caller-owned value instance to the stored entry
/// for the lifetime of a context; a Direct instance then reads and writes
/// the stored bytes in place.
///
/// # Example
///
/// ```ignore
/// use flymap::prelude::*;
///
/// let map = FlyMap::<String, IntValue>::builder().segments(4).create()?;
///
/// let mut value = IntValue::new_direct();
/// {
///     let mut ctx = map.acquire_using_locked(&"hits".to_string(), &mut value)?;
///     ctx.add_value(1);
/// }
/// assert_eq!(map.get(&"hits".to_string())?.map(|v| v.get_value()), Some(1));
///
/// map.close()?;
/// ```
pub struct FlyMap<K, V> {
    segments: Box<[Segment]>,
    config: MapConfig,
    key_codec: Arc<dyn EntryCodec>,
    value_codec: Arc<dyn EntryCodec>,
    /// Encoded zero value used for entries created by a write context
    value_zero: Vec<u8>,
    /// Run the registered codec's `validate` on written keys
    check_keys: bool,
    /// Run the registered codec's `validate` on written values
    check_values: bool,
    lifecycle: Lifecycle,
    _marker: PhantomData<fn() -> (K, V)>,
}

/// Point-in-time occupancy of a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStats {
    /// Live entries across all segments
    pub entries: usize,
    /// Bytes reserved by all segment regions
    pub reserved_bytes: usize,
    /// Bytes held by live blocks
    pub in_use_bytes: usize,
    /// Per-segment detail, in segment order
    pub segments: Vec<SegmentStats>,
}

impl<K: Data, V: Flyweight> FlyMap<K, V> {
    /// Start building a map.
    pub fn builder() -> FlyMapBuilder<K, V> {
        FlyMapBuilder::new()
    }

    /// Create a map with the default configuration and built-in codecs.
    pub fn new() -> Result<Self> {
        Self::builder().create()
    }

    pub(crate) fn create(config: MapConfig, registry: &CodecRegistry) -> Result<Self> {
        let key_codec = registry.resolve::<K>()?;
        let value_codec = registry.resolve::<V>()?;
        let segment_config = config.segment_config(key_codec.layout(), value_codec.layout())?;

        let segments: Box<[Segment]> = (0..config.segments)
            .map(|index| Segment::new(index, segment_config))
            .collect();
        let value_zero = value_codec.zero_bytes()?;
        value_codec.validate(&value_zero)?;

        info!(
            key = %key_codec.type_tag(),
            value = %value_codec.type_tag(),
            segments = segments.len(),
            entry_size = segment_config.entry_size,
            max_segment_bytes = segment_config.max_bytes,
            "flymap created"
        );

        Ok(Self {
            segments,
            config,
            check_keys: is_custom(key_codec.as_ref()),
            check_values: is_custom(value_codec.as_ref()),
            key_codec,
            value_codec,
            value_zero,
            lifecycle: Lifecycle::new(),
            _marker: PhantomData,
        })
    }

    fn locate(&self, key: &K) -> Result<(Vec<u8>, KeyHash, &Segment)> {
        let bytes = key.encode()?;
        let hash = KeyHash::of(&bytes);
        let segment = &self.segments[hash.segment(self.segments.len())];
        Ok((bytes, hash, segment))
    }

    /// [`locate`](Self::locate) for operations that may create the entry
    fn locate_for_write(&self, key: &K) -> Result<(Vec<u8>, KeyHash, &Segment)> {
        let located = self.locate(key)?;
        if self.check_keys {
            self.key_codec.validate(&located.0)?;
        }
        Ok(located)
    }

    /// Store a copy of `value` under `key`, returning the previous value.
    ///
    /// On [`Error::OutOfMemory`] the map is unchanged.
    pub fn put(&self, key: &K, value: &V) -> Result<Option<V>> {
        let _op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate_for_write(key)?;
        let bytes = value.encode()?;
        if self.check_values {
            self.value_codec.validate(&bytes)?;
        }
        let previous = segment.put(&key, hash, &bytes)?;
        Ok(previous.map(|bytes| V::decode(&bytes)).transpose()?)
    }

    /// A freshly decoded copy of the value under `key`.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let _op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate(key)?;
        let value = segment.view(|state| {
            state
                .find(&key, hash)
                .map(|handle| V::decode(state.value(handle)))
                .transpose()
        })?;
        Ok(value)
    }

    /// Decode the value under `key` into `using`.
    ///
    /// Returns `Some(using)` when the key is present. When it is absent the
    /// content of `using` is unspecified; callers must check the result
    /// before reading it.
    pub fn get_using<'u>(&self, key: &K, using: &'u mut V) -> Result<Option<&'u mut V>> {
        let _op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate(key)?;
        let found = segment.view(|state| match state.find(&key, hash) {
            Some(handle) => using.decode_into(state.value(handle)).map(|()| true),
            None => Ok(false),
        })?;
        Ok(if found { Some(using) } else { None })
    }

    /// Hold the shared lock of `key`'s segment and bind `using` to its entry.
    ///
    /// Check [`ReadContext::present`] before reading; an absent key leaves
    /// `using` as it was. The lock is released when the context drops.
    pub fn get_using_locked<'a>(&'a self, key: &K, using: &'a mut V) -> Result<ReadContext<'a, V>> {
        let op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate(key)?;
        Ok(ReadContext::bind(op, segment.read(), &key, hash, using)?)
    }

    /// Like [`get_using_locked`](Self::get_using_locked), giving up after
    /// `timeout` with `Ok(None)`.
    pub fn try_get_using_locked_for<'a>(
        &'a self,
        key: &K,
        using: &'a mut V,
        timeout: Duration,
    ) -> Result<Option<ReadContext<'a, V>>> {
        let op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate(key)?;
        match segment.try_read_for(timeout) {
            Some(guard) => Ok(Some(ReadContext::bind(op, guard, &key, hash, using)?)),
            None => Ok(None),
        }
    }

    /// Hold the exclusive lock of `key`'s segment and bind `using` to its
    /// entry, creating the entry with the zero value if absent.
    ///
    /// Heap values are written back when the context closes or drops.
    pub fn acquire_using_locked<'a>(
        &'a self,
        key: &K,
        using: &'a mut V,
    ) -> Result<WriteContext<'a, V>> {
        let op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate_for_write(key)?;
        Ok(WriteContext::bind(
            op,
            segment.write(),
            &key,
            hash,
            &self.value_zero,
            using,
        )?)
    }

    /// Like [`acquire_using_locked`](Self::acquire_using_locked), giving up
    /// after `timeout` with `Ok(None)`.
    pub fn try_acquire_using_locked_for<'a>(
        &'a self,
        key: &K,
        using: &'a mut V,
        timeout: Duration,
    ) -> Result<Option<WriteContext<'a, V>>> {
        let op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate_for_write(key)?;
        match segment.try_write_for(timeout) {
            Some(guard) => Ok(Some(WriteContext::bind(
                op,
                guard,
                &key,
                hash,
                &self.value_zero,
                using,
            )?)),
            None => Ok(None),
        }
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let _op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate(key)?;
        let previous = segment.remove(&key, hash);
        Ok(previous.map(|bytes| V::decode(&bytes)).transpose()?)
    }

    /// True if `key` is present.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        let _op = self.lifecycle.enter()?;
        let (key, hash, segment) = self.locate(key)?;
        Ok(segment.contains(&key, hash))
    }

    /// Number of entries.
    ///
    /// Segments are counted one at a time, so concurrent writers may make
    /// the total stale.
    pub fn len(&self) -> Result<usize> {
        let _op = self.lifecycle.enter()?;
        Ok(self.segments.iter().map(Segment::len).sum())
    }

    /// True if no segment holds an entry.
    pub fn is_empty(&self) -> Result<bool> {
        let _op = self.lifecycle.enter()?;
        Ok(self.segments.iter().all(Segment::is_empty))
    }

    /// Remove every entry, keeping the map open.
    pub fn clear(&self) -> Result<()> {
        let _op = self.lifecycle.enter()?;
        for segment in self.segments.iter() {
            segment.clear();
        }
        Ok(())
    }

    /// Occupancy summary.
    pub fn stats(&self) -> Result<MapStats> {
        let _op = self.lifecycle.enter()?;
        let segments: Vec<SegmentStats> = self.segments.iter().map(Segment::stats).collect();
        Ok(MapStats {
            entries: segments.iter().map(|s| s.entries).sum(),
            reserved_bytes: segments.iter().map(|s| s.region.reserved).sum(),
            in_use_bytes: segments.iter().map(|s| s.region.in_use).sum(),
            segments,
        })
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Index of the segment that owns `key`.
    ///
    /// Fails only if `key` cannot be encoded.
    pub fn segment_of(&self, key: &K) -> Result<usize> {
        Ok(KeyHash::of(&key.encode()?).segment(self.segments.len()))
    }

    /// The configuration the map was created with.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// True once [`close`](Self::close) has succeeded.
    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Close the map and release all segment memory.
    ///
    /// Every later operation fails with [`Error::Closed`]. While any
    /// operation or context is active this fails with [`Error::Busy`] and
    /// the map stays usable. Closing a closed map is a no-op.
    pub fn close(&self) -> Result<()> {
        if self.lifecycle.is_closed() {
            return Ok(());
        }
        if let Err(e) = self.lifecycle.close() {
            let e = Error::from(e);
            warn!(error = %e, "flymap close refused");
            return Err(e);
        }
        for segment in self.segments.iter() {
            segment.clear();
        }
        info!(segments = self.segments.len(), "flymap closed");
        Ok(())
    }
}

/// Custom tags are user codecs; built-in encodings are trusted
fn is_custom(codec: &dyn EntryCodec) -> bool {
    matches!(codec.type_tag(), TypeTag::Custom(_))
}

impl<K, V> fmt::Debug for FlyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlyMap")
            .field("key", &self.key_codec.type_tag())
            .field("value", &self.value_codec.type_tag())
            .field("segments", &self.segments.len())
            .field("closed", &self.lifecycle.is_closed())
            .finish()
    }
}
