//! Segment lock granularity

use crate::*;
use std::thread;

#[test]
fn test_disjoint_segments_progress() {
    let map = map_with_segments::<LongValue>(8);
    let (a, b) = keys_in_different_segments(&map);

    let mut held = LongValue::new_direct();
    let _ctx = map.acquire_using_locked(&a, &mut held).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            let mut other = LongValue::new_direct();
            let mut ctx = map
                .try_acquire_using_locked_for(&b, &mut other, GRANT)
                .unwrap()
                .expect("different segment must not block");
            ctx.set_value(42);
        });
    });

    let mut reader = LongValue::new_heap();
    assert_eq!(map.get_using(&b, &mut reader).unwrap().map(|v| v.get_value()), Some(42));
}

#[test]
fn test_same_segment_writer_blocks_others() {
    let map = single_segment_map::<i64, LongValue>();
    let mut held = LongValue::new_direct();
    let ctx = map.acquire_using_locked(&1, &mut held).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            let mut other = LongValue::new_direct();
            assert!(map
                .try_acquire_using_locked_for(&2, &mut other, BLOCKED)
                .unwrap()
                .is_none());
            assert!(map
                .try_get_using_locked_for(&2, &mut other, BLOCKED)
                .unwrap()
                .is_none());
        });
    });

    drop(ctx);

    thread::scope(|s| {
        s.spawn(|| {
            let mut other = LongValue::new_direct();
            assert!(map
                .try_acquire_using_locked_for(&2, &mut other, GRANT)
                .unwrap()
                .is_some());
        });
    });
}

#[test]
fn test_readers_share_a_segment() {
    let map = single_segment_map::<i64, LongValue>();
    let mut v = LongValue::new_heap();
    v.set_value(9);
    map.put(&1, &v).unwrap();

    let mut first = LongValue::new_direct();
    let ctx = map.get_using_locked(&1, &mut first).unwrap();
    assert!(ctx.present());

    thread::scope(|s| {
        s.spawn(|| {
            let mut second = LongValue::new_direct();
            let other = map
                .try_get_using_locked_for(&1, &mut second, GRANT)
                .unwrap()
                .expect("readers must share");
            assert_eq!(other.get_value(), 9);

            let mut writer = LongValue::new_direct();
            assert!(map
                .try_acquire_using_locked_for(&1, &mut writer, BLOCKED)
                .unwrap()
                .is_none());
        });
    });
    assert_eq!(ctx.get_value(), 9);
}

#[test]
fn test_close_from_other_thread_is_busy() {
    let map = map_with_segments::<LongValue>(4);
    let mut v = LongValue::new_direct();
    let ctx = map.acquire_using_locked(&1, &mut v).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            assert!(map.close().unwrap_err().is_busy());
        });
    });

    drop(ctx);
    map.close().unwrap();
    assert!(map.is_closed());
}
