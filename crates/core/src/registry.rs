//! Codec registry
//!
//! Maps a [`TypeTag`] to a type-erased [`EntryCodec`]. A map resolves its key
//! and value codecs once, at construction, and caches the resulting
//! `Arc<dyn EntryCodec>`; nothing is looked up per operation.
//!
//! Built-in tags are pre-registered. Flyweight beans and bounded text carry
//! their layout in the type, so they resolve without registration. `Custom`
//! tags must be registered by the caller, which is how user types are
//! plugged in.

use crate::codec::{Data, LEN_PREFIX};
use crate::error::{Error, Result};
use crate::types::{Layout, TypeTag};
use rustc_hash::FxHashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased view of a codec
pub trait EntryCodec: Send + Sync + fmt::Debug {
    /// Tag this codec is registered under
    fn type_tag(&self) -> TypeTag;

    /// Byte layout of encodings produced by this codec
    fn layout(&self) -> Layout;

    /// Encoding of the type's zero value, used to initialise new entries
    fn zero_bytes(&self) -> Result<Vec<u8>>;

    /// Check that `bytes` is a well-formed encoding
    fn validate(&self, bytes: &[u8]) -> Result<()>;
}

/// Codec for fixed-size layouts: zero bytes are all zeros
#[derive(Debug, Clone, Copy)]
pub struct FixedCodec {
    tag: TypeTag,
    size: usize,
}

impl FixedCodec {
    /// Create a fixed codec of `size` bytes
    pub fn new(tag: TypeTag, size: usize) -> Self {
        Self { tag, size }
    }
}

impl EntryCodec for FixedCodec {
    fn type_tag(&self) -> TypeTag {
        self.tag
    }

    fn layout(&self) -> Layout {
        Layout::Fixed(self.size)
    }

    fn zero_bytes(&self) -> Result<Vec<u8>> {
        Ok(vec![0; self.size])
    }

    fn validate(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.size {
            return Err(Error::Codec(format!(
                "{} expects {} bytes, got {}",
                self.tag,
                self.size,
                bytes.len()
            )));
        }
        Ok(())
    }
}

/// Codec for length- or count-prefixed layouts
#[derive(Debug, Clone, Copy)]
pub struct VariableCodec {
    tag: TypeTag,
}

impl VariableCodec {
    /// Create a variable codec
    pub fn new(tag: TypeTag) -> Self {
        Self { tag }
    }
}

impl EntryCodec for VariableCodec {
    fn type_tag(&self) -> TypeTag {
        self.tag
    }

    fn layout(&self) -> Layout {
        Layout::Variable { min: LEN_PREFIX }
    }

    fn zero_bytes(&self) -> Result<Vec<u8>> {
        // empty text and empty collections are both a zero prefix
        Ok(vec![0; LEN_PREFIX])
    }

    fn validate(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() < LEN_PREFIX {
            return Err(Error::Codec(format!(
                "{} encoding shorter than its {}-byte prefix",
                self.tag, LEN_PREFIX
            )));
        }
        Ok(())
    }
}

/// Codec backed by a concrete [`Data`] implementation
pub struct DataCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> DataCodec<T> {
    /// Create a codec for `T`
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for DataCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DataCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCodec")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Data + 'static> EntryCodec for DataCodec<T> {
    fn type_tag(&self) -> TypeTag {
        T::TYPE_TAG
    }

    fn layout(&self) -> Layout {
        T::LAYOUT
    }

    fn zero_bytes(&self) -> Result<Vec<u8>> {
        T::zero().encode()
    }

    fn validate(&self, bytes: &[u8]) -> Result<()> {
        T::decode(bytes).map(|_| ())
    }
}

/// Registry of codecs keyed by type tag
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: FxHashMap<TypeTag, Arc<dyn EntryCodec>>,
}

impl CodecRegistry {
    /// Registry with no codecs at all
    pub fn empty() -> Self {
        Self {
            codecs: FxHashMap::default(),
        }
    }

    /// Registry with every built-in tag registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let fixed = [
            (TypeTag::Bool, 1),
            (TypeTag::I8, 1),
            (TypeTag::U8, 1),
            (TypeTag::I16, 2),
            (TypeTag::U16, 2),
            (TypeTag::I32, 4),
            (TypeTag::U32, 4),
            (TypeTag::I64, 8),
            (TypeTag::U64, 8),
            (TypeTag::F32, 4),
            (TypeTag::F64, 8),
            (TypeTag::Char, 4),
        ];
        for (tag, size) in fixed {
            registry.register_codec(Arc::new(FixedCodec::new(tag, size)));
        }
        for tag in [TypeTag::Text, TypeTag::List, TypeTag::Set, TypeTag::Map] {
            registry.register_codec(Arc::new(VariableCodec::new(tag)));
        }
        registry
    }

    /// Register (or replace) the codec for `T`
    pub fn register<T: Data + 'static>(&mut self) -> &mut Self {
        self.register_codec(Arc::new(DataCodec::<T>::new()))
    }

    /// Register (or replace) an arbitrary codec under its own tag
    pub fn register_codec(&mut self, codec: Arc<dyn EntryCodec>) -> &mut Self {
        self.codecs.insert(codec.type_tag(), codec);
        self
    }

    /// Look up a codec by tag
    pub fn get(&self, tag: TypeTag) -> Option<&Arc<dyn EntryCodec>> {
        self.codecs.get(&tag)
    }

    /// Number of registered codecs
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Resolve the codec for `T`, checking it agrees with `T`'s layout.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCodec`] if the tag is neither registered nor
    ///   self-describing
    /// - [`Error::Config`] if the registered codec's layout differs from
    ///   `T::LAYOUT`
    pub fn resolve<T: Data>(&self) -> Result<Arc<dyn EntryCodec>> {
        let tag = T::TYPE_TAG;
        let codec = match self.codecs.get(&tag) {
            Some(codec) => Arc::clone(codec),
            None => match (tag, T::LAYOUT) {
                (TypeTag::Bean(_) | TypeTag::FixedText(_), Layout::Fixed(size)) => {
                    Arc::new(FixedCodec::new(tag, size))
                }
                _ => return Err(Error::UnknownCodec(tag)),
            },
        };
        if codec.layout() != T::LAYOUT {
            return Err(Error::Config(format!(
                "codec registered for {} has layout {:?}, type declares {:?}",
                tag,
                codec.layout(),
                T::LAYOUT
            )));
        }
        Ok(codec)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.len())
            .finish()
    }
}
