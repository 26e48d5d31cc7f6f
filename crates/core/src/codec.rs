//! Typed entry codecs
//!
//! [`Data`] is the contract every key and value type implements: how many
//! bytes it needs, how it is written into a region and how it is read back.
//! Two families exist:
//!
//! - Fixed layouts: numbers, `bool`, `char`, flyweight structs. The encoding
//!   is a little-endian transcription of the fields and never changes size.
//! - Variable layouts: text is a `u32` byte length followed by UTF-8, and
//!   collections are a `u32` element count followed by the elements encoded
//!   recursively (see [`crate::collections`]).
//!
//! Round-trip law: `T::decode(&v.encode()?) == v` for every representable `v`.

use crate::error::{Error, Result};
use crate::types::{Layout, TypeTag};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

/// Size of the length/count prefix used by variable layouts
pub const LEN_PREFIX: usize = 4;

/// A type that can be stored as a map key or value.
pub trait Data: Sized {
    /// Codec tag; types sharing a tag share an encoding
    const TYPE_TAG: TypeTag;

    /// Byte layout of the encoding
    const LAYOUT: Layout;

    /// Exact number of bytes [`Data::write_to`] will append
    fn encoded_len(&self) -> usize;

    /// Append the encoding to `out`.
    ///
    /// Fails with [`Error::Capacity`] if a length or count does not fit its
    /// `u32` prefix.
    fn write_to(&self, out: &mut Vec<u8>) -> Result<()>;

    /// Read one value from the front of `input`, advancing it
    fn read_from(input: &mut &[u8]) -> Result<Self>;

    /// The type's zero value (`0`, `false`, `""`, empty collection)
    fn zero() -> Self;

    /// Encode into a fresh buffer
    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Decode a complete encoding; trailing bytes are an error
    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut input = bytes;
        let value = Self::read_from(&mut input)?;
        if !input.is_empty() {
            return Err(Error::Codec(format!(
                "{} trailing byte(s) after {}",
                input.len(),
                Self::TYPE_TAG
            )));
        }
        Ok(value)
    }

    /// Decode into `self`, reusing its allocations where the type can
    fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        *self = Self::decode(bytes)?;
        Ok(())
    }
}

/// A scalar with a fixed little-endian transcription.
///
/// Used both by the [`Data`] impls below and by flyweight structs, which
/// read and write their fields straight out of entry bytes.
pub trait Primitive: Copy + Default + PartialEq + std::fmt::Debug {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Read from the first `SIZE` bytes of `bytes`
    fn load(bytes: &[u8]) -> Self;

    /// Write into the first `SIZE` bytes of `bytes`
    fn store(self, bytes: &mut [u8]);
}

/// A primitive supporting the "add and return" compound mutator.
///
/// Integer addition wraps. Unsigned types take a signed, wider delta so a
/// negative adjustment can be expressed.
pub trait Numeric: Primitive {
    /// Type of the adjustment
    type Delta: Copy;

    /// `self + delta`, wrapping on overflow
    fn add_delta(self, delta: Self::Delta) -> Self;
}

impl Primitive for bool {
    const SIZE: usize = 1;

    fn load(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[0] = self as u8;
    }
}

impl Primitive for u8 {
    const SIZE: usize = 1;

    fn load(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[0] = self;
    }
}

impl Primitive for i8 {
    const SIZE: usize = 1;

    fn load(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[0] = self as u8;
    }
}

impl Primitive for char {
    const SIZE: usize = 4;

    fn load(bytes: &[u8]) -> Self {
        char::from_u32(LittleEndian::read_u32(bytes)).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn store(self, bytes: &mut [u8]) {
        LittleEndian::write_u32(bytes, self as u32);
    }
}

macro_rules! le_primitive {
    ($($ty:ty => $size:expr, $read:ident, $write:ident;)*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = $size;

                #[inline]
                fn load(bytes: &[u8]) -> Self {
                    LittleEndian::$read(bytes)
                }

                #[inline]
                fn store(self, bytes: &mut [u8]) {
                    LittleEndian::$write(bytes, self);
                }
            }
        )*
    };
}

le_primitive! {
    u16 => 2, read_u16, write_u16;
    i16 => 2, read_i16, write_i16;
    u32 => 4, read_u32, write_u32;
    i32 => 4, read_i32, write_i32;
    u64 => 8, read_u64, write_u64;
    i64 => 8, read_i64, write_i64;
    f32 => 4, read_f32, write_f32;
    f64 => 8, read_f64, write_f64;
}

macro_rules! wrapping_numeric {
    ($($ty:ty => $delta:ty, $wide:ty;)*) => {
        $(
            impl Numeric for $ty {
                type Delta = $delta;

                #[inline]
                fn add_delta(self, delta: $delta) -> Self {
                    (self as $wide).wrapping_add(delta as $wide) as $ty
                }
            }
        )*
    };
}

wrapping_numeric! {
    i8 => i8, i8;
    u8 => i16, i16;
    i16 => i16, i16;
    u16 => i32, i32;
    i32 => i32, i32;
    u32 => i64, i64;
    i64 => i64, i64;
    u64 => i64, i64;
}

impl Numeric for f32 {
    type Delta = f32;

    fn add_delta(self, delta: f32) -> Self {
        self + delta
    }
}

impl Numeric for f64 {
    type Delta = f64;

    fn add_delta(self, delta: f64) -> Self {
        self + delta
    }
}

/// Split `n` bytes off the front of `input`
pub fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    if input.len() < n {
        return Err(Error::Codec(format!(
            "truncated input: need {} bytes, have {}",
            n,
            input.len()
        )));
    }
    let (head, tail) = input.split_at(n);
    *input = tail;
    Ok(head)
}

/// Read a length or element-count prefix
pub fn read_len(input: &mut &[u8]) -> Result<usize> {
    Ok(input.read_u32::<LittleEndian>()? as usize)
}

/// Largest length or element count a prefix can carry
pub const MAX_LEN: usize = u32::MAX as usize;

/// Append a length or element-count prefix
pub fn write_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let prefix = u32::try_from(len).map_err(|_| Error::Capacity {
        len,
        capacity: MAX_LEN,
    })?;
    out.extend_from_slice(&prefix.to_le_bytes());
    Ok(())
}

macro_rules! primitive_data {
    ($($ty:ty => $tag:ident;)*) => {
        $(
            impl Data for $ty {
                const TYPE_TAG: TypeTag = TypeTag::$tag;
                const LAYOUT: Layout = Layout::Fixed(<$ty as Primitive>::SIZE);

                #[inline]
                fn encoded_len(&self) -> usize {
                    <$ty as Primitive>::SIZE
                }

                fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
                    let start = out.len();
                    out.resize(start + <$ty as Primitive>::SIZE, 0);
                    self.store(&mut out[start..]);
                    Ok(())
                }

                fn read_from(input: &mut &[u8]) -> Result<Self> {
                    let bytes = take(input, <$ty as Primitive>::SIZE)?;
                    Ok(<$ty as Primitive>::load(bytes))
                }

                fn zero() -> Self {
                    <$ty>::default()
                }
            }
        )*
    };
}

primitive_data! {
    bool => Bool;
    u8 => U8;
    i8 => I8;
    u16 => U16;
    i16 => I16;
    u32 => U32;
    i32 => I32;
    u64 => U64;
    i64 => I64;
    f32 => F32;
    f64 => F64;
    char => Char;
}

impl Data for String {
    const TYPE_TAG: TypeTag = TypeTag::Text;
    const LAYOUT: Layout = Layout::Variable { min: LEN_PREFIX };

    fn encoded_len(&self) -> usize {
        LEN_PREFIX + self.len()
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        write_len(out, self.len())?;
        out.extend_from_slice(self.as_bytes());
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let len = read_len(input)?;
        let bytes = take(input, len)?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    fn zero() -> Self {
        String::new()
    }

    fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        let mut input = bytes;
        let len = read_len(&mut input)?;
        if input.len() != len {
            return Err(Error::Codec(format!(
                "text length {} does not match {} payload byte(s)",
                len,
                input.len()
            )));
        }
        let text = std::str::from_utf8(input)?;
        self.clear();
        self.push_str(text);
        Ok(())
    }
}
