//! Single-field value flyweights and a sample multi-field bean

use flymap_core::TypeTag;

crate::flyweight! {
    /// `bool` flyweight
    pub struct BooleanValue(TypeTag::Bool) {
        value: bool => get_value, set_value;
    }
}

crate::flyweight! {
    /// Signed byte flyweight
    pub struct ByteValue(TypeTag::I8) {
        value: i8 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// Unsigned byte flyweight; `add_value` takes a signed delta and wraps
    pub struct UnsignedByteValue(TypeTag::U8) {
        value: u8 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `i16` flyweight
    pub struct ShortValue(TypeTag::I16) {
        value: i16 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `u16` flyweight
    pub struct UnsignedShortValue(TypeTag::U16) {
        value: u16 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `char` flyweight
    pub struct CharValue(TypeTag::Char) {
        value: char => get_value, set_value;
    }
}

crate::flyweight! {
    /// `i32` flyweight
    pub struct IntValue(TypeTag::I32) {
        value: i32 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `u32` flyweight
    pub struct UnsignedIntValue(TypeTag::U32) {
        value: u32 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `i64` flyweight
    pub struct LongValue(TypeTag::I64) {
        value: i64 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `f32` flyweight
    pub struct FloatValue(TypeTag::F32) {
        value: f32 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// `f64` flyweight
    pub struct DoubleValue(TypeTag::F64) {
        value: f64 => get_value, set_value, add_value;
    }
}

crate::flyweight! {
    /// Three-field bean: `i64`, `f64`, `i32`, 20 bytes
    pub struct SampleBean(TypeTag::Bean("SampleBean")) {
        long: i64 => get_long, set_long, add_long;
        double: f64 => get_double, set_double, add_double;
        int: i32 => get_int, set_int, add_int;
    }
}
