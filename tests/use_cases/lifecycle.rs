//! Construction, limits and close
//!
//! Configuration errors surface at `create`, exhausted segments fail only
//! the triggering operation, and a closed map rejects everything.

use crate::*;

fn tiny_map<V: Flyweight>() -> FlyMap<String, V> {
    init_tracing();
    FlyMap::builder()
        .segments(1)
        .max_segment_bytes(4096)
        .create()
        .unwrap()
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_segments_must_be_power_of_two() {
    let err = FlyMap::<i32, i32>::builder().segments(3).create().unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_entry_size_below_fixed_layout_rejected() {
    let err = FlyMap::<IntValue, IntValue>::builder()
        .entry_size(4)
        .create()
        .unwrap_err();
    assert!(err.is_config());

    let map = FlyMap::<IntValue, IntValue>::builder()
        .entry_size(8)
        .create()
        .unwrap();
    assert_eq!(map.config().entry_size, Some(8));
}

#[test]
fn test_entry_size_must_fit_segment() {
    let err = FlyMap::<String, String>::builder()
        .entry_size(1024)
        .max_segment_bytes(1024)
        .create()
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_entry_size_accounts_for_block_rounding() {
    init_tracing();
    let err = FlyMap::<String, String>::builder()
        .entry_size(1013)
        .max_segment_bytes(1024)
        .create()
        .unwrap_err();
    assert!(err.is_config());

    // the largest hint that still fits one block is usable
    let map = FlyMap::<String, String>::builder()
        .segments(1)
        .entry_size(1012)
        .max_segment_bytes(1024)
        .create()
        .unwrap();
    map.put(&"k".to_string(), &"v".to_string()).unwrap();
    assert_eq!(map.get(&"k".to_string()).unwrap(), Some("v".to_string()));
}

#[test]
fn test_config_from_json() {
    let config = MapConfig::from_json(r#"{ "segments": 8, "entry_size": 32 }"#).unwrap();
    let map = FlyMap::<String, String>::builder().config(config).create().unwrap();
    assert_eq!(map.segment_count(), 8);
    assert_eq!(map.config().entry_size, Some(32));
}

// =============================================================================
// OUT OF MEMORY
// =============================================================================

#[test]
fn test_put_out_of_memory_keeps_previous() {
    let map = tiny_map::<String>();
    let k = "k".to_string();
    map.put(&k, &"old".to_string()).unwrap();

    let err = map.put(&k, &"x".repeat(10_000)).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(map.get(&k).unwrap().as_deref(), Some("old"));

    // the segment is still usable
    map.put(&"other".to_string(), &"fits".to_string()).unwrap();
    assert_eq!(map.len().unwrap(), 2);
}

#[test]
fn test_commit_out_of_memory_keeps_previous() {
    let map = tiny_map::<String>();
    let k = "k".to_string();
    map.put(&k, &"old".to_string()).unwrap();

    let mut text = String::new();
    let mut ctx = map.acquire_using_locked(&k, &mut text).unwrap();
    ctx.push_str(&"x".repeat(10_000));
    let err = Error::from(ctx.close().unwrap_err());
    assert!(err.is_out_of_memory());

    assert_eq!(map.get(&k).unwrap().as_deref(), Some("old"));
}

#[test]
fn test_removed_space_is_reused() {
    let map = tiny_map::<String>();
    for round in 0..100 {
        let k = format!("k{}", round);
        map.put(&k, &"v".repeat(512)).unwrap();
        map.remove(&k).unwrap();
    }
    assert!(map.is_empty().unwrap());
}

// =============================================================================
// CLEAR / STATS
// =============================================================================

#[test]
fn test_clear_keeps_map_open() {
    let map = small_map::<i64, i64>();
    for k in 0..100 {
        map.put(&k, &k).unwrap();
    }
    assert_eq!(map.stats().unwrap().entries, 100);

    map.clear().unwrap();
    assert!(map.is_empty().unwrap());
    assert!(!map.is_closed());
    map.put(&1, &1).unwrap();
    assert_eq!(map.len().unwrap(), 1);
}

// =============================================================================
// CLOSE
// =============================================================================

#[test]
fn test_operations_after_close_fail() {
    let map = small_map::<String, IntValue>();
    let k = "k".to_string();
    let mut v = IntValue::new_direct();
    update(&map, &k, &mut v, |v| v.set_value(1));

    map.close().unwrap();
    assert!(map.is_closed());

    assert!(map.get(&k).unwrap_err().is_closed());
    assert!(map.put(&k, &v).unwrap_err().is_closed());
    assert!(map.remove(&k).unwrap_err().is_closed());
    assert!(map.contains_key(&k).unwrap_err().is_closed());
    assert!(map.len().unwrap_err().is_closed());
    assert!(map.get_using(&k, &mut v).unwrap_err().is_closed());
    assert!(map.get_using_locked(&k, &mut v).unwrap_err().is_closed());
    assert!(map.acquire_using_locked(&k, &mut v).unwrap_err().is_closed());
    assert!(map.stats().unwrap_err().is_closed());

    // closing again is fine
    map.close().unwrap();
}

#[test]
fn test_close_with_open_context_is_busy() {
    let map = small_map::<String, IntValue>();
    let k = "k".to_string();
    let mut v = IntValue::new_direct();
    update(&map, &k, &mut v, |v| v.set_value(5));

    let ctx = map.get_using_locked(&k, &mut v).unwrap();
    let err = map.close().unwrap_err();
    assert!(err.is_busy());
    assert!(!map.is_closed());
    drop(ctx);

    assert_eq!(map.get(&k).unwrap().map(|v| v.get_value()), Some(5));
    map.close().unwrap();
}
