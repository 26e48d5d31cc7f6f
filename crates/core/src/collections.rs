//! Collection codecs
//!
//! Lists, sets and maps share one encoding: a `u32` element count followed by
//! each element (each key then value, for maps) written with its own codec.
//! Element order on the wire is iteration order; hash-based collections
//! therefore round-trip by equality, not by order.

use crate::codec::{read_len, write_len, Data, LEN_PREFIX};
use crate::error::Result;
use crate::types::{Layout, TypeTag};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// Cap on pre-allocation driven by an untrusted count prefix
fn capacity_hint(count: usize, remaining: usize) -> usize {
    count.min(remaining)
}

impl<T: Data> Data for Vec<T> {
    const TYPE_TAG: TypeTag = TypeTag::List;
    const LAYOUT: Layout = Layout::Variable { min: LEN_PREFIX };

    fn encoded_len(&self) -> usize {
        LEN_PREFIX + self.iter().map(T::encoded_len).sum::<usize>()
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        write_len(out, self.len())?;
        for item in self {
            item.write_to(out)?;
        }
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let count = read_len(input)?;
        let mut items = Vec::with_capacity(capacity_hint(count, input.len()));
        for _ in 0..count {
            items.push(T::read_from(input)?);
        }
        Ok(items)
    }

    fn zero() -> Self {
        Vec::new()
    }

    fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = Self::decode(bytes)?;
        self.clear();
        self.extend(decoded);
        Ok(())
    }
}

impl<T: Data + Eq + Hash> Data for HashSet<T> {
    const TYPE_TAG: TypeTag = TypeTag::Set;
    const LAYOUT: Layout = Layout::Variable { min: LEN_PREFIX };

    fn encoded_len(&self) -> usize {
        LEN_PREFIX + self.iter().map(T::encoded_len).sum::<usize>()
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        write_len(out, self.len())?;
        for item in self {
            item.write_to(out)?;
        }
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let count = read_len(input)?;
        let mut items = HashSet::with_capacity(capacity_hint(count, input.len()));
        for _ in 0..count {
            items.insert(T::read_from(input)?);
        }
        Ok(items)
    }

    fn zero() -> Self {
        HashSet::new()
    }

    fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = Self::decode(bytes)?;
        self.clear();
        self.extend(decoded);
        Ok(())
    }
}

impl<T: Data + Ord> Data for BTreeSet<T> {
    const TYPE_TAG: TypeTag = TypeTag::Set;
    const LAYOUT: Layout = Layout::Variable { min: LEN_PREFIX };

    fn encoded_len(&self) -> usize {
        LEN_PREFIX + self.iter().map(T::encoded_len).sum::<usize>()
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        write_len(out, self.len())?;
        for item in self {
            item.write_to(out)?;
        }
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let count = read_len(input)?;
        let mut items = BTreeSet::new();
        for _ in 0..count {
            items.insert(T::read_from(input)?);
        }
        Ok(items)
    }

    fn zero() -> Self {
        BTreeSet::new()
    }
}

impl<K: Data + Eq + Hash, V: Data> Data for HashMap<K, V> {
    const TYPE_TAG: TypeTag = TypeTag::Map;
    const LAYOUT: Layout = Layout::Variable { min: LEN_PREFIX };

    fn encoded_len(&self) -> usize {
        LEN_PREFIX
            + self
                .iter()
                .map(|(k, v)| k.encoded_len() + v.encoded_len())
                .sum::<usize>()
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        write_len(out, self.len())?;
        for (k, v) in self {
            k.write_to(out)?;
            v.write_to(out)?;
        }
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let count = read_len(input)?;
        let mut entries = HashMap::with_capacity(capacity_hint(count, input.len()));
        for _ in 0..count {
            let k = K::read_from(input)?;
            let v = V::read_from(input)?;
            entries.insert(k, v);
        }
        Ok(entries)
    }

    fn zero() -> Self {
        HashMap::new()
    }

    fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = Self::decode(bytes)?;
        self.clear();
        self.extend(decoded);
        Ok(())
    }
}

impl<K: Data + Ord, V: Data> Data for BTreeMap<K, V> {
    const TYPE_TAG: TypeTag = TypeTag::Map;
    const LAYOUT: Layout = Layout::Variable { min: LEN_PREFIX };

    fn encoded_len(&self) -> usize {
        LEN_PREFIX
            + self
                .iter()
                .map(|(k, v)| k.encoded_len() + v.encoded_len())
                .sum::<usize>()
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        write_len(out, self.len())?;
        for (k, v) in self {
            k.write_to(out)?;
            v.write_to(out)?;
        }
        Ok(())
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let count = read_len(input)?;
        let mut entries = BTreeMap::new();
        for _ in 0..count {
            let k = K::read_from(input)?;
            let v = V::read_from(input)?;
            entries.insert(k, v);
        }
        Ok(entries)
    }

    fn zero() -> Self {
        BTreeMap::new()
    }
}
