//! Core types shared by every flymap crate
//!
//! - [`TypeTag`]: identifies the codec a key or value type is stored with
//! - [`Layout`]: fixed or variable byte layout of an encoded value
//! - [`ValueMode`]: Direct or Heap binding mode of a flyweight accessor

use std::fmt;

/// Identifies the on-region representation of a type.
///
/// Two types with the same tag share a codec, so a map created for one can be
/// read through accessors of the other (for example `i32` and `IntValue`).
/// The codec registry is keyed by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// 1-byte boolean
    Bool,
    /// Signed 8-bit integer
    I8,
    /// Unsigned 8-bit integer
    U8,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 32-bit integer
    I32,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 64-bit integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Unicode scalar value (4 bytes)
    Char,
    /// Length-prefixed UTF-8 text
    Text,
    /// Text with a bounded capacity and a fixed layout
    FixedText(u32),
    /// Count-prefixed sequence
    List,
    /// Count-prefixed set
    Set,
    /// Count-prefixed key/value pairs
    Map,
    /// Fixed multi-field layout, named by the bean type
    Bean(&'static str),
    /// User supplied codec
    Custom(&'static str),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::FixedText(n) => write!(f, "FixedText({})", n),
            TypeTag::Bean(name) => write!(f, "Bean({})", name),
            TypeTag::Custom(name) => write!(f, "Custom({})", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Byte layout of an encoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Always exactly this many bytes; never resized
    Fixed(usize),
    /// Length depends on content; `min` is the size of the smallest encoding
    Variable {
        /// Encoded size of the type's zero value
        min: usize,
    },
}

impl Layout {
    /// Size of a fixed layout, `None` for variable ones
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Layout::Fixed(n) => Some(*n),
            Layout::Variable { .. } => None,
        }
    }

    /// Smallest possible encoding
    pub fn min_size(&self) -> usize {
        match self {
            Layout::Fixed(n) => *n,
            Layout::Variable { min } => *min,
        }
    }

    /// True for fixed layouts
    pub fn is_fixed(&self) -> bool {
        matches!(self, Layout::Fixed(_))
    }
}

/// Binding mode of a flyweight accessor, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueMode {
    /// Aliases the entry bytes while bound; writes land immediately
    Direct,
    /// Holds a private decoded copy; written back when a write context exits
    Heap,
}

impl fmt::Display for ValueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueMode::Direct => write!(f, "direct"),
            ValueMode::Heap => write!(f, "heap"),
        }
    }
}
