//! Map configuration.
//!
//! [`MapConfig`] is plain data: it can be built in code, through
//! [`FlyMapBuilder`](crate::FlyMapBuilder), or loaded from JSON. Missing
//! fields take their defaults.
//!
//! ```ignore
//! let config = MapConfig::from_json(r#"{ "segments": 8, "entry_size": 16 }"#)?;
//! let map = FlyMap::<i64, i64>::builder().config(config).create()?;
//! ```

use crate::error::{Error, Result};
use flymap_core::Layout;
use flymap_storage::entry;
use flymap_storage::region::MIN_BLOCK;
use flymap_storage::SegmentConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizing for a [`FlyMap`](crate::FlyMap)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Number of independently locked segments; a non-zero power of two
    pub segments: usize,

    /// Expected key plus value bytes per entry.
    ///
    /// Fixed layouts default to their exact size. For variable layouts this
    /// is the capacity reserved for a new entry.
    pub entry_size: Option<usize>,

    /// Byte limit of each segment's region
    pub max_segment_bytes: usize,

    /// Initial bucket directory size per segment
    pub initial_buckets: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            segments: 16,
            entry_size: None,
            max_segment_bytes: 64 << 20,
            initial_buckets: 64,
        }
    }
}

impl MapConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the layout-independent rules
    pub fn validate(&self) -> Result<()> {
        if self.segments == 0 || !self.segments.is_power_of_two() {
            return Err(Error::Config(format!(
                "segments must be a non-zero power of two, got {}",
                self.segments
            )));
        }
        if self.max_segment_bytes == 0 {
            return Err(Error::Config("max_segment_bytes must be non-zero".into()));
        }
        if self.initial_buckets == 0 {
            return Err(Error::Config("initial_buckets must be non-zero".into()));
        }
        if self.entry_size == Some(0) {
            return Err(Error::Config("entry_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Validate against the key and value layouts and derive segment sizing
    pub(crate) fn segment_config(&self, key: Layout, value: Layout) -> Result<SegmentConfig> {
        self.validate()?;
        let fixed = key
            .fixed_size()
            .zip(value.fixed_size())
            .map(|(k, v)| k + v);
        let entry_size = match (self.entry_size, fixed) {
            (Some(size), Some(needed)) if size < needed => {
                return Err(Error::Config(format!(
                    "entry_size {} is smaller than the fixed key and value size {}",
                    size, needed
                )));
            }
            (Some(size), _) => size,
            (None, Some(needed)) => needed,
            (None, None) => 0,
        };
        // the block a new entry gets, as sized by the segment and its region
        let reserve = entry_size
            .saturating_sub(key.min_size())
            .max(value.min_size());
        let block = entry::block_size(key.min_size(), reserve)
            .max(MIN_BLOCK)
            .checked_next_power_of_two();
        match block {
            Some(block) if block <= self.max_segment_bytes => {}
            _ => {
                return Err(Error::Config(format!(
                    "entry_size {} needs a block larger than the {}-byte segment limit",
                    entry_size, self.max_segment_bytes
                )));
            }
        }
        Ok(SegmentConfig {
            max_bytes: self.max_segment_bytes,
            initial_buckets: self.initial_buckets,
            entry_size,
        })
    }
}
