//! Key hashing
//!
//! One 64-bit hash per key feeds two consumers: the high bits pick the
//! segment, the low bits pick the starting bucket inside that segment's
//! directory. Keeping the two ranges apart stops every key of a segment from
//! sharing the same low bits.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Hash raw key bytes.
///
/// FxHash is fast but weak in the low bits for short inputs, so the result
/// goes through a 64-bit finalizer (murmur3 fmix64).
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.write_usize(bytes.len());
    fmix64(hasher.finish())
}

#[inline]
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Hash of an encoded key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyHash(u64);

impl KeyHash {
    /// Hash the encoded key bytes
    #[inline]
    pub fn of(key: &[u8]) -> Self {
        KeyHash(hash_bytes(key))
    }

    /// Wrap a precomputed hash
    pub fn from_raw(raw: u64) -> Self {
        KeyHash(raw)
    }

    /// Raw 64-bit value
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Segment index for a power-of-two `segments` count
    #[inline]
    pub fn segment(self, segments: usize) -> usize {
        debug_assert!(segments.is_power_of_two());
        ((self.0 >> 32) as usize) & (segments - 1)
    }

    /// Starting bucket for a power-of-two directory of `buckets` slots
    #[inline]
    pub fn bucket(self, buckets: usize) -> usize {
        debug_assert!(buckets.is_power_of_two());
        (self.0 as usize) & (buckets - 1)
    }
}
