//! Bounded text flyweight
//!
//! `FixedString<N>` stores up to `N` bytes of UTF-8 behind a `u16` length,
//! always occupying `N + 2` bytes. Because the layout is fixed it can alias
//! entry bytes in Direct mode just like the numeric flyweights.

use crate::binding::{Binding, ExclusiveEntry, SharedEntry};
use crate::flyweight::{decode_exclusive, decode_shared, encode_into, Flyweight};
use byteorder::{ByteOrder, LittleEndian};
use flymap_core::codec::take;
use flymap_core::{Data, Error, Layout, Result, TypeTag, ValueMode};
use std::fmt;

const LEN: usize = 2;

/// Text bounded to `N` UTF-8 bytes
pub struct FixedString<const N: usize> {
    mode: ValueMode,
    local: Vec<u8>,
    binding: Option<Binding>,
}

/// Text value bounded to 64 bytes
pub type StringValue = FixedString<64>;

impl<const N: usize> FixedString<N> {
    /// Encoded size in bytes
    pub const SIZE: usize = N + LEN;

    /// Instance that aliases entry bytes while bound
    pub fn new_direct() -> Self {
        Self::with_mode(ValueMode::Direct)
    }

    /// Instance that keeps a private copy
    pub fn new_heap() -> Self {
        Self::with_mode(ValueMode::Heap)
    }

    fn with_mode(mode: ValueMode) -> Self {
        Self {
            mode,
            local: vec![0; Self::SIZE],
            binding: None,
        }
    }

    /// Maximum text length in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    fn raw(&self) -> &[u8] {
        match &self.binding {
            Some(binding) => binding.bytes(),
            None => &self.local,
        }
    }

    fn raw_mut(&mut self) -> &mut [u8] {
        debug_assert!(!matches!(self.binding, Some(Binding::Shared(_))));
        if let Some(Binding::Exclusive(entry)) = &mut self.binding {
            return entry.bytes_mut();
        }
        &mut self.local
    }

    fn text_bytes(&self) -> &[u8] {
        let raw = self.raw();
        let len = (LittleEndian::read_u16(&raw[..LEN]) as usize).min(N);
        &raw[LEN..LEN + len]
    }

    /// Current text length in bytes
    pub fn len(&self) -> usize {
        self.text_bytes().len()
    }

    /// True for the empty string
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the text
    pub fn get_value(&self) -> String {
        String::from_utf8_lossy(self.text_bytes()).into_owned()
    }

    /// Copy the text into `out`, reusing its allocation
    pub fn get_using_value(&self, out: &mut String) {
        out.clear();
        out.push_str(&String::from_utf8_lossy(self.text_bytes()));
    }

    /// Replace the text.
    ///
    /// # Errors
    ///
    /// [`Error::Capacity`] if `text` is longer than `N` bytes; the stored
    /// text is unchanged.
    pub fn set_value(&mut self, text: &str) -> Result<()> {
        if text.len() > N {
            return Err(Error::Capacity {
                len: text.len(),
                capacity: N,
            });
        }
        let raw = self.raw_mut();
        LittleEndian::write_u16(&mut raw[..LEN], text.len() as u16);
        raw[LEN..LEN + text.len()].copy_from_slice(text.as_bytes());
        raw[LEN + text.len()..].fill(0);
        Ok(())
    }

    fn check_len(bytes: &[u8]) -> Result<()> {
        if bytes.len() != Self::SIZE {
            return Err(Error::Codec(format!(
                "FixedString<{}> expects {} bytes, entry holds {}",
                N,
                Self::SIZE,
                bytes.len()
            )));
        }
        Ok(())
    }
}

impl<const N: usize> Data for FixedString<N> {
    const TYPE_TAG: TypeTag = TypeTag::FixedText(N as u32);
    const LAYOUT: Layout = Layout::Fixed(N + LEN);

    fn encoded_len(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.raw());
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let bytes = take(input, Self::SIZE)?;
        let mut value = Self::new_heap();
        value.local.copy_from_slice(bytes);
        Ok(value)
    }

    fn zero() -> Self {
        Self::new_heap()
    }

    fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        Self::check_len(bytes)?;
        self.raw_mut().copy_from_slice(bytes);
        Ok(())
    }
}

impl<const N: usize> Flyweight for FixedString<N> {
    fn mode(&self) -> ValueMode {
        self.mode
    }

    fn bind_shared(&mut self, entry: SharedEntry) -> Result<Option<SharedEntry>> {
        match self.mode {
            ValueMode::Heap => decode_shared(self, entry),
            ValueMode::Direct => {
                Self::check_len(entry.bytes())?;
                self.binding = Some(Binding::Shared(entry));
                Ok(None)
            }
        }
    }

    fn bind_exclusive(&mut self, entry: ExclusiveEntry) -> Result<Option<ExclusiveEntry>> {
        match self.mode {
            ValueMode::Heap => decode_exclusive(self, entry),
            ValueMode::Direct => {
                Self::check_len(entry.bytes())?;
                self.binding = Some(Binding::Exclusive(entry));
                Ok(None)
            }
        }
    }

    fn commit(&self, entry: &mut ExclusiveEntry) -> Result<()> {
        match self.mode {
            ValueMode::Heap => encode_into(self, entry),
            ValueMode::Direct => Ok(()),
        }
    }

    fn unbind(&mut self) {
        if let Some(binding) = self.binding.take() {
            self.local.copy_from_slice(binding.bytes());
        }
    }

    fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self::new_heap()
    }
}

impl<const N: usize> Clone for FixedString<N> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            local: self.raw().to_vec(),
            binding: None,
        }
    }
}

impl<const N: usize> PartialEq for FixedString<N> {
    fn eq(&self, other: &Self) -> bool {
        self.text_bytes() == other.text_bytes()
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.text_bytes()))
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedString<{}>({:?})", N, self.get_value())
    }
}
