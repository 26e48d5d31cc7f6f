//! The `flyweight!` generator

/// Generate a fixed-layout flyweight struct.
///
/// Each field gets a getter and a setter; numeric fields may also name an
/// "add and return" mutator. Fields are laid out in declaration order with
/// no padding, each in its little-endian transcription.
///
/// ```ignore
/// flymap_storage::flyweight! {
///     /// Position in a grid
///     pub struct Cell(TypeTag::Bean("Cell")) {
///         row: i32 => get_row, set_row, add_row;
///         col: i32 => get_col, set_col;
///         live: bool => is_live, set_live;
///     }
/// }
/// ```
///
/// The generated type supports both modes: `new_direct()` instances alias
/// entry bytes while bound, `new_heap()` instances hold their own copy.
/// Unbound instances of either mode use a local buffer.
#[macro_export]
macro_rules! flyweight {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($tag:expr) {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty => $get:ident, $set:ident $(, $add:ident)?
            );+ $(;)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            mode: $crate::__private::ValueMode,
            local: [u8; 0 $(+ <$ty as $crate::__private::Primitive>::SIZE)+],
            binding: ::std::option::Option<$crate::Binding>,
        }

        const _: () = {
            #[allow(unused_imports)]
            use $crate::__private::{Data, Error, Layout, Numeric, Primitive, Result, TypeTag, ValueMode};
            use $crate::{Binding, ExclusiveEntry, Flyweight, SharedEntry};

            #[allow(non_camel_case_types, dead_code)]
            #[derive(Clone, Copy)]
            enum Field {
                $($field),+
            }

            const SIZES: &[usize] = &[$(<$ty as Primitive>::SIZE),+];

            const fn offset(field: Field) -> usize {
                let idx = field as usize;
                let mut acc = 0;
                let mut i = 0;
                while i < idx {
                    acc += SIZES[i];
                    i += 1;
                }
                acc
            }

            impl $name {
                /// Encoded size in bytes
                pub const SIZE: usize = 0 $(+ <$ty as Primitive>::SIZE)+;

                /// Instance that aliases entry bytes while bound
                pub fn new_direct() -> Self {
                    Self {
                        mode: ValueMode::Direct,
                        local: [0; 0 $(+ <$ty as Primitive>::SIZE)+],
                        binding: None,
                    }
                }

                /// Instance that keeps a private copy
                pub fn new_heap() -> Self {
                    Self {
                        mode: ValueMode::Heap,
                        local: [0; 0 $(+ <$ty as Primitive>::SIZE)+],
                        binding: None,
                    }
                }

                /// Current bytes: the bound entry, or the local buffer
                pub fn as_bytes(&self) -> &[u8] {
                    match &self.binding {
                        Some(binding) => binding.bytes(),
                        None => &self.local,
                    }
                }

                fn as_bytes_mut(&mut self) -> &mut [u8] {
                    debug_assert!(
                        !matches!(self.binding, Some(Binding::Shared(_))),
                        "write through a read-only binding"
                    );
                    if let Some(Binding::Exclusive(entry)) = &mut self.binding {
                        return entry.bytes_mut();
                    }
                    &mut self.local
                }

                $(
                    #[doc = concat!("`", stringify!($field), "`")]
                    $(#[$fmeta])*
                    pub fn $get(&self) -> $ty {
                        let at = offset(Field::$field);
                        <$ty as Primitive>::load(&self.as_bytes()[at..at + <$ty as Primitive>::SIZE])
                    }

                    #[doc = concat!("Set `", stringify!($field), "`")]
                    pub fn $set(&mut self, value: $ty) {
                        let at = offset(Field::$field);
                        value.store(&mut self.as_bytes_mut()[at..at + <$ty as Primitive>::SIZE]);
                    }

                    $(
                        #[doc = concat!("Add `delta` to `", stringify!($field), "` and return the new value")]
                        pub fn $add(&mut self, delta: <$ty as Numeric>::Delta) -> $ty {
                            let value = self.$get().add_delta(delta);
                            self.$set(value);
                            value
                        }
                    )?
                )+
            }

            impl Data for $name {
                const TYPE_TAG: TypeTag = $tag;
                const LAYOUT: Layout = Layout::Fixed(<$name>::SIZE);

                fn encoded_len(&self) -> usize {
                    Self::SIZE
                }

                fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
                    out.extend_from_slice(self.as_bytes());
                    Ok(())
                }

                fn read_from(input: &mut &[u8]) -> Result<Self> {
                    let bytes = $crate::__private::take(input, Self::SIZE)?;
                    let mut value = Self::new_heap();
                    value.local.copy_from_slice(bytes);
                    Ok(value)
                }

                fn zero() -> Self {
                    Self::new_heap()
                }

                fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
                    if bytes.len() != Self::SIZE {
                        return Err(Error::Codec(format!(
                            "{} expects {} bytes, got {}",
                            stringify!($name),
                            Self::SIZE,
                            bytes.len()
                        )));
                    }
                    self.as_bytes_mut().copy_from_slice(bytes);
                    Ok(())
                }
            }

            impl Flyweight for $name {
                fn mode(&self) -> ValueMode {
                    self.mode
                }

                fn bind_shared(&mut self, entry: SharedEntry) -> Result<Option<SharedEntry>> {
                    match self.mode {
                        ValueMode::Heap => $crate::flyweight::decode_shared(self, entry),
                        ValueMode::Direct => {
                            check_len(entry.bytes())?;
                            self.binding = Some(Binding::Shared(entry));
                            Ok(None)
                        }
                    }
                }

                fn bind_exclusive(&mut self, entry: ExclusiveEntry) -> Result<Option<ExclusiveEntry>> {
                    match self.mode {
                        ValueMode::Heap => $crate::flyweight::decode_exclusive(self, entry),
                        ValueMode::Direct => {
                            check_len(entry.bytes())?;
                            self.binding = Some(Binding::Exclusive(entry));
                            Ok(None)
                        }
                    }
                }

                fn commit(&self, entry: &mut ExclusiveEntry) -> Result<()> {
                    match self.mode {
                        ValueMode::Heap => $crate::flyweight::encode_into(self, entry),
                        // writes already landed in the entry
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

            fn check_len(bytes: &[u8]) -> Result<()> {
                if bytes.len() != <$name>::SIZE {
                    return Err(Error::Codec(format!(
                        "{} expects {} bytes, entry holds {}",
                        stringify!($name),
                        <$name>::SIZE,
                        bytes.len()
                    )));
                }
                Ok(())
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new_heap()
                }
            }

            impl Clone for $name {
                /// Unbound copy with the same mode and content
                fn clone(&self) -> Self {
                    let mut copy = Self {
                        mode: self.mode,
                        local: [0; 0 $(+ <$ty as Primitive>::SIZE)+],
                        binding: None,
                    };
                    copy.local.copy_from_slice(self.as_bytes());
                    copy
                }
            }

            impl PartialEq for $name {
                fn eq(&self, other: &Self) -> bool {
                    self.as_bytes() == other.as_bytes()
                }
            }

            impl ::std::fmt::Debug for $name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.debug_struct(stringify!($name))
                        $(.field(stringify!($field), &self.$get()))+
                        .finish()
                }
            }

            impl ::std::fmt::Display for $name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    ::std::fmt::Debug::fmt(self, f)
                }
            }
        };
    };
}
