//! Lock release when caller code panics or returns early

use crate::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

#[test]
fn test_panicking_writer_releases_lock() {
    let map = single_segment_map::<i64, String>();
    map.put(&1, &"before".to_string()).unwrap();

    let result = thread::scope(|s| {
        s.spawn(|| {
            let mut text = String::new();
            let mut ctx = map.acquire_using_locked(&1, &mut text).unwrap();
            ctx.push_str(" and after");
            panic!("writer failed");
        })
        .join()
    });
    assert!(result.is_err());

    let mut text = String::new();
    let ctx = map
        .try_acquire_using_locked_for(&1, &mut text, GRANT)
        .unwrap()
        .expect("lock must be released after a panic");
    // Heap edits are committed while the scope unwinds
    assert_eq!(ctx.as_str(), "before and after");
}

/// Appends to the entry, then fails a later step and leaves through `?`
fn append_then_fail(map: &FlyMap<i64, String>, key: i64) -> Result<usize> {
    let mut text = String::new();
    let mut ctx = map.acquire_using_locked(&key, &mut text)?;
    ctx.push_str(" and after");
    let limit: usize = "unlimited"
        .parse()
        .map_err(|e: std::num::ParseIntError| Error::Config(e.to_string()))?;
    Ok(limit)
}

#[test]
fn test_early_error_return_commits_and_releases_lock() {
    let map = single_segment_map::<i64, String>();
    map.put(&1, &"before".to_string()).unwrap();

    let err = append_then_fail(&map, 1).unwrap_err();
    assert!(err.is_config());

    let seen = thread::scope(|s| {
        s.spawn(|| {
            let mut text = String::new();
            let ctx = map
                .try_acquire_using_locked_for(&1, &mut text, GRANT)
                .unwrap()
                .expect("lock must be released after an error return");
            let stored = ctx.as_str().to_owned();
            drop(ctx);
            stored
        })
        .join()
        .unwrap()
    });
    assert_eq!(seen, "before and after");
    map.close().unwrap();
}

#[test]
fn test_panicking_direct_writer_keeps_landed_writes() {
    let map = single_segment_map::<i64, LongValue>();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut value = LongValue::new_direct();
        let mut ctx = map.acquire_using_locked(&1, &mut value).unwrap();
        ctx.set_value(7);
        panic!("after the write");
    }));
    assert!(result.is_err());

    // Direct writes landed before the panic
    assert_eq!(map.get(&1).unwrap().map(|v| v.get_value()), Some(7));
    map.close().unwrap();
}

#[test]
fn test_panicking_reader_releases_lock() {
    let map = single_segment_map::<i64, LongValue>();
    map.put(&1, &LongValue::new_heap()).unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut value = LongValue::new_direct();
        let _ctx = map.get_using_locked(&1, &mut value).unwrap();
        panic!("reader failed");
    }));
    assert!(result.is_err());

    let mut value = LongValue::new_direct();
    assert!(map
        .try_acquire_using_locked_for(&1, &mut value, GRANT)
        .unwrap()
        .is_some());
}
