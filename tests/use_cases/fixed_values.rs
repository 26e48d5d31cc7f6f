//! Fixed-size values
//!
//! Every generated value type is exercised in both modes: an acquire on a
//! missing key creates the zero value, and updates inside the context are
//! visible to later readers.

use crate::*;

fn int_key(k: i32) -> IntValue {
    let mut key = IntValue::new_heap();
    key.set_value(k);
    key
}

// =============================================================================
// PLAIN PRIMITIVES (HEAP)
// =============================================================================

#[test]
fn test_integer_map() {
    let map = small_map::<i32, i32>();
    map.put(&1, &11).unwrap();
    map.put(&2, &22).unwrap();
    assert_eq!(map.get(&1).unwrap(), Some(11));

    let mut using = 0;
    {
        let mut ctx = map.acquire_using_locked(&3, &mut using).unwrap();
        assert_eq!(*ctx, 0);
        *ctx += 33;
    }
    assert_eq!(map.get(&3).unwrap(), Some(33));
}

#[test]
fn test_long_map() {
    let map = small_map::<i64, i64>();
    map.put(&1, &i64::MAX).unwrap();
    assert_eq!(map.put(&1, &-1).unwrap(), Some(i64::MAX));
    assert_eq!(map.get(&1).unwrap(), Some(-1));
}

#[test]
fn test_double_map() {
    let map = small_map::<f64, f64>();
    map.put(&1.5, &2.25).unwrap();
    let mut using = 0.0;
    assert_eq!(map.get_using(&1.5, &mut using).unwrap().copied(), Some(2.25));
    assert!(map.get(&-1.5).unwrap().is_none());
}

// =============================================================================
// ACCUMULATION ACROSS MODES
// =============================================================================

macro_rules! accumulate {
    ($name:ident, $ty:ty, zero = $zero:expr, set = $init:expr, add = $delta:expr, expect = $expected:expr) => {
        #[test]
        fn $name() {
            for direct in [true, false] {
                let map = small_map::<IntValue, $ty>();
                let key = int_key(1);
                let mut value = if direct { <$ty>::new_direct() } else { <$ty>::new_heap() };

                {
                    let mut ctx = map.acquire_using_locked(&key, &mut value).unwrap();
                    assert_eq!(ctx.get_value(), $zero);
                    ctx.set_value($init);
                }
                {
                    let mut ctx = map.acquire_using_locked(&key, &mut value).unwrap();
                    assert_eq!(ctx.get_value(), $init);
                    assert_eq!(ctx.add_value($delta), $expected);
                }

                let mut reader = if direct { <$ty>::new_direct() } else { <$ty>::new_heap() };
                assert_eq!(read(&map, &key, &mut reader, |v| v.get_value()), Some($expected));
                assert_eq!(map.get(&key).unwrap().map(|v| v.get_value()), Some($expected));
            }
        }
    };
}

accumulate!(test_int_value, IntValue, zero = 0, set = 123, add = 1107, expect = 1230);
accumulate!(test_unsigned_int_value, UnsignedIntValue, zero = 0, set = 123, add = 1107, expect = 1230);
accumulate!(test_short_value, ShortValue, zero = 0, set = 123, add = 1107, expect = 1230);
accumulate!(test_unsigned_short_value, UnsignedShortValue, zero = 0, set = 123, add = 1107, expect = 1230);
accumulate!(test_byte_value, ByteValue, zero = 0, set = 23, add = 100, expect = 123);
accumulate!(test_unsigned_byte_value, UnsignedByteValue, zero = 0, set = 234, add = -100, expect = 134);
accumulate!(test_long_value, LongValue, zero = 0, set = 123, add = 1107, expect = 1230);
accumulate!(test_float_value, FloatValue, zero = 0.0, set = 1.5, add = 2.25, expect = 3.75);
accumulate!(test_double_value, DoubleValue, zero = 0.0, set = 1.5, add = 2.25, expect = 3.75);

#[test]
fn test_unsigned_byte_value_wraps_below_max() {
    let map = small_map::<IntValue, UnsignedByteValue>();
    let key = int_key(7);
    let mut value = UnsignedByteValue::new_direct();
    update(&map, &key, &mut value, |v| v.set_value(123));
    update(&map, &key, &mut value, |v| {
        assert_eq!(v.add_value(-111), 12);
    });
    assert_eq!(map.get(&key).unwrap().map(|v| v.get_value()), Some(12));
}

#[test]
fn test_char_value() {
    for direct in [true, false] {
        let map = small_map::<IntValue, CharValue>();
        let key = int_key(1);
        let mut value = if direct { CharValue::new_direct() } else { CharValue::new_heap() };

        update(&map, &key, &mut value, |v| {
            assert_eq!(v.get_value(), '\0');
            v.set_value('@');
        });
        assert_eq!(read(&map, &key, &mut value, |v| v.get_value()), Some('@'));
    }
}

#[test]
fn test_boolean_value() {
    for direct in [true, false] {
        let map = small_map::<IntValue, BooleanValue>();
        let key = int_key(1);
        let mut value = if direct { BooleanValue::new_direct() } else { BooleanValue::new_heap() };

        update(&map, &key, &mut value, |v| {
            assert!(!v.get_value());
            v.set_value(true);
        });
        assert_eq!(read(&map, &key, &mut value, |v| v.get_value()), Some(true));
    }
}

#[test]
fn test_sample_bean() {
    let map = small_map::<String, SampleBean>();
    let key = "bean".to_string();
    let mut bean = SampleBean::new_direct();

    update(&map, &key, &mut bean, |b| {
        b.set_long(1);
        b.set_double(2.5);
        b.set_int(3);
    });
    update(&map, &key, &mut bean, |b| {
        b.add_long(10);
        b.add_double(0.5);
        b.add_int(-4);
    });

    let got = map.get(&key).unwrap().unwrap();
    assert_eq!(got.get_long(), 11);
    assert_eq!(got.get_double(), 3.0);
    assert_eq!(got.get_int(), -1);
    assert_eq!(got.as_bytes().len(), SampleBean::SIZE);
}

// =============================================================================
// KEY ACCESSORS
// =============================================================================

#[test]
fn test_absent_after_key_mutation() {
    let map = small_map::<IntValue, IntValue>();
    let mut key = IntValue::new_heap();
    let mut value = IntValue::new_heap();

    key.set_value(1);
    value.set_value(11);
    map.put(&key, &value).unwrap();

    key.set_value(2);
    value.set_value(22);
    map.put(&key, &value).unwrap();

    key.set_value(1);
    assert_eq!(map.get(&key).unwrap().map(|v| v.get_value()), Some(11));

    key.set_value(3);
    let mut using = IntValue::new_direct();
    assert!(map.get(&key).unwrap().is_none());
    assert!(map.get_using(&key, &mut using).unwrap().is_none());
    let ctx = map.get_using_locked(&key, &mut using).unwrap();
    assert!(!ctx.present());
}

#[test]
fn test_direct_read_context_sees_stored_bytes() {
    let map = small_map::<IntValue, IntValue>();
    let key = int_key(5);
    let mut value = IntValue::new_heap();
    value.set_value(500);
    map.put(&key, &value).unwrap();

    let mut direct = IntValue::new_direct();
    let ctx = map.get_using_locked(&key, &mut direct).unwrap();
    assert!(ctx.present());
    assert!(ctx.is_bound());
    assert_eq!(ctx.get_value(), 500);
    drop(ctx);

    // unbinding keeps a local copy of the last bound bytes
    assert!(!direct.is_bound());
    assert_eq!(direct.get_value(), 500);
}
