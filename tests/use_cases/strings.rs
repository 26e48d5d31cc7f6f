//! String keys and values
//!
//! Heap `String` values plus the bounded `StringValue` flyweight in both
//! modes.

use crate::*;

// =============================================================================
// STRING / STRING
// =============================================================================

#[test]
fn test_string_string_put_get() {
    let map = small_map::<String, String>();

    map.put(&"Hello".to_string(), &"World".to_string()).unwrap();
    assert_eq!(map.get(&"Hello".to_string()).unwrap(), Some("World".to_string()));
    assert_eq!(map.len().unwrap(), 1);
}

#[test]
fn test_string_string_get_using_and_remove() {
    let map = small_map::<String, String>();
    let key = "key".to_string();
    map.put(&key, &"value".to_string()).unwrap();

    let mut using = String::with_capacity(32);
    assert_eq!(
        map.get_using(&key, &mut using).unwrap().map(|s| s.as_str()),
        Some("value")
    );

    assert_eq!(map.remove(&key).unwrap(), Some("value".to_string()));
    assert_eq!(map.get(&key).unwrap(), None);
    assert!(map.get_using(&key, &mut using).unwrap().is_none());
}

#[test]
fn test_string_acquire_appends_in_heap_mode() {
    let map = small_map::<String, String>();
    let key = "log".to_string();
    let mut text = String::new();

    update(&map, &key, &mut text, |t| t.push_str("first"));
    update(&map, &key, &mut text, |t| t.push_str(", second"));

    assert_eq!(map.get(&key).unwrap().as_deref(), Some("first, second"));
}

#[test]
fn test_string_growth_relocates_entry() {
    let map = small_map::<String, String>();
    let key = "grow".to_string();
    map.put(&key, &"x".to_string()).unwrap();

    let long = "y".repeat(10_000);
    map.put(&key, &long).unwrap();
    assert_eq!(map.get(&key).unwrap(), Some(long));

    map.put(&key, &String::new()).unwrap();
    assert_eq!(map.get(&key).unwrap(), Some(String::new()));
}

// =============================================================================
// STRINGVALUE
// =============================================================================

#[test]
fn test_string_value_direct() {
    let map = small_map::<String, StringValue>();
    let key = "1".to_string();
    let mut value = StringValue::new_direct();

    update(&map, &key, &mut value, |v| v.set_value("Hello World").unwrap());

    let mut reader = StringValue::new_direct();
    assert_eq!(
        read(&map, &key, &mut reader, |v| v.get_value()).as_deref(),
        Some("Hello World")
    );

    let mut sb = String::new();
    let ctx = map.get_using_locked(&key, &mut reader).unwrap();
    ctx.get_using_value(&mut sb);
    assert_eq!(sb, "Hello World");
}

#[test]
fn test_string_value_heap() {
    let map = small_map::<String, StringValue>();
    let key = "1".to_string();
    let mut value = StringValue::new_heap();
    value.set_value("Hello World").unwrap();
    map.put(&key, &value).unwrap();

    let mut using = StringValue::new_heap();
    let got = map.get_using(&key, &mut using).unwrap().unwrap();
    assert_eq!(got.get_value(), "Hello World");

    update(&map, &key, &mut using, |v| v.set_value("Bye").unwrap());
    assert_eq!(map.get(&key).unwrap().unwrap().get_value(), "Bye");
}

#[test]
fn test_string_value_overflow_leaves_entry() {
    let map = small_map::<String, StringValue>();
    let key = "k".to_string();
    let mut value = StringValue::new_direct();
    update(&map, &key, &mut value, |v| v.set_value("short").unwrap());

    {
        let mut ctx = map.acquire_using_locked(&key, &mut value).unwrap();
        let err = Error::from(ctx.set_value(&"z".repeat(65)).unwrap_err());
        assert!(matches!(err, Error::Capacity { len: 65, capacity: 64 }));
    }
    assert_eq!(map.get(&key).unwrap().unwrap().get_value(), "short");
}
