//! Entry block layout
//!
//! ```text
//! offset 0      4          8          12           12+key_len
//!        | key_len | value_len | value_cap | key bytes | value bytes ...    |
//!        |  u32 LE |   u32 LE  |   u32 LE  |           | <- value_cap ->    |
//! ```
//!
//! `value_cap` is whatever the block has left after the header and key, so
//! power-of-two rounding in the region becomes spare value capacity.

use byteorder::{ByteOrder, LittleEndian};
use flymap_core::{Error, Result};

/// Bytes taken by the entry header
pub const HEADER: usize = 12;

/// Largest block whose header fields fit their `u32` slots
pub const MAX_BLOCK: usize = u32::MAX as usize;

/// Block size needed for a key of `key_len` and `value_cap` value bytes
#[inline]
pub fn block_size(key_len: usize, value_cap: usize) -> usize {
    HEADER + key_len + value_cap
}

/// [`block_size`], rejecting blocks whose lengths would not fit the header.
///
/// # Errors
///
/// [`Error::Capacity`] if the block would exceed [`MAX_BLOCK`]
pub fn checked_block_size(key_len: usize, value_cap: usize) -> Result<usize> {
    HEADER
        .checked_add(key_len)
        .and_then(|n| n.checked_add(value_cap))
        .filter(|&size| size <= MAX_BLOCK)
        .ok_or(Error::Capacity {
            len: key_len.saturating_add(value_cap),
            capacity: MAX_BLOCK - HEADER,
        })
}

/// Header field value; callers size blocks through [`checked_block_size`]
#[inline]
fn field(n: usize) -> u32 {
    debug_assert!(n <= MAX_BLOCK);
    n as u32
}

#[inline]
pub fn key_len(block: &[u8]) -> usize {
    LittleEndian::read_u32(&block[0..4]) as usize
}

#[inline]
pub fn value_len(block: &[u8]) -> usize {
    LittleEndian::read_u32(&block[4..8]) as usize
}

#[inline]
pub fn value_cap(block: &[u8]) -> usize {
    LittleEndian::read_u32(&block[8..12]) as usize
}

#[inline]
pub fn set_value_len(block: &mut [u8], len: usize) {
    LittleEndian::write_u32(&mut block[4..8], field(len));
}

/// Key bytes
#[inline]
pub fn key(block: &[u8]) -> &[u8] {
    let len = key_len(block);
    &block[HEADER..HEADER + len]
}

/// Value bytes, trimmed to the stored length
#[inline]
pub fn value(block: &[u8]) -> &[u8] {
    let start = HEADER + key_len(block);
    &block[start..start + value_len(block)]
}

/// Mutable value bytes, trimmed to the stored length
#[inline]
pub fn value_mut(block: &mut [u8]) -> &mut [u8] {
    let start = HEADER + key_len(block);
    let end = start + value_len(block);
    &mut block[start..end]
}

/// Write the header and key into a fresh block.
///
/// The value area is left as-is (zero for a fresh block) and its length set
/// to `value_len`.
pub fn init(block: &mut [u8], key: &[u8], value_len: usize) {
    let cap = block.len() - HEADER - key.len();
    debug_assert!(value_len <= cap);
    LittleEndian::write_u32(&mut block[0..4], field(key.len()));
    LittleEndian::write_u32(&mut block[4..8], field(value_len));
    LittleEndian::write_u32(&mut block[8..12], field(cap));
    block[HEADER..HEADER + key.len()].copy_from_slice(key);
}

/// Recompute `value_cap` after the block moved to a different size class
pub fn refit(block: &mut [u8]) {
    let cap = block.len() - HEADER - key_len(block);
    LittleEndian::write_u32(&mut block[8..12], field(cap));
}

/// Overwrite the value; the caller guarantees `bytes` fits `value_cap`
pub fn write_value(block: &mut [u8], bytes: &[u8]) {
    debug_assert!(bytes.len() <= value_cap(block));
    let start = HEADER + key_len(block);
    block[start..start + bytes.len()].copy_from_slice(bytes);
    set_value_len(block, bytes.len());
}
