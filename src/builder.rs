//! Map builder.

use crate::config::MapConfig;
use crate::error::Result;
use crate::map::FlyMap;
use flymap_core::{CodecRegistry, Data};
use flymap_storage::Flyweight;
use std::marker::PhantomData;

/// Builder for [`FlyMap`].
///
/// # Example
///
/// ```ignore
/// use flymap::prelude::*;
///
/// let map = FlyMap::<IntValue, IntValue>::builder()
///     .segments(16)
///     .entry_size(8)
///     .create()?;
/// ```
pub struct FlyMapBuilder<K, V> {
    config: MapConfig,
    registry: CodecRegistry,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Data, V: Flyweight> FlyMapBuilder<K, V> {
    /// Create a builder with default settings and the built-in codecs.
    pub fn new() -> Self {
        Self {
            config: MapConfig::default(),
            registry: CodecRegistry::with_builtins(),
            _marker: PhantomData,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of segments (a non-zero power of two).
    pub fn segments(mut self, segments: usize) -> Self {
        self.config.segments = segments;
        self
    }

    /// Set the expected key plus value size per entry.
    pub fn entry_size(mut self, bytes: usize) -> Self {
        self.config.entry_size = Some(bytes);
        self
    }

    /// Set the byte limit of each segment.
    pub fn max_segment_bytes(mut self, bytes: usize) -> Self {
        self.config.max_segment_bytes = bytes;
        self
    }

    /// Set the initial bucket directory size of each segment.
    pub fn initial_buckets(mut self, buckets: usize) -> Self {
        self.config.initial_buckets = buckets;
        self
    }

    /// Register a codec for a user type carrying a `Custom` tag.
    pub fn register<T: Data + 'static>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Use a prepared codec registry.
    pub fn registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Validate the configuration, resolve codecs and create the map.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) for an invalid configuration
    /// or a key/value type without a usable codec.
    pub fn create(self) -> Result<FlyMap<K, V>> {
        FlyMap::create(self.config, &self.registry)
    }
}

impl<K: Data, V: Flyweight> Default for FlyMapBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
