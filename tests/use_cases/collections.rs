//! Collection-valued entries
//!
//! Lists, sets and maps are Heap values: a write context decodes the
//! stored collection, the caller edits it, and the commit re-encodes it,
//! growing the entry when needed.

use crate::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

fn key(k: &str) -> String {
    k.to_string()
}

// =============================================================================
// LISTS
// =============================================================================

#[test]
fn test_list_values() {
    let map = small_map::<String, Vec<String>>();
    map.put(&key("1"), &vec![]).unwrap();
    map.put(&key("2"), &vec!["one".to_string()]).unwrap();

    let mut list = Vec::new();
    update(&map, &key("2"), &mut list, |l| l.push("three".to_string()));

    let mut reader = Vec::new();
    assert_eq!(
        read(&map, &key("2"), &mut reader, |l| l.clone()),
        Some(vec!["one".to_string(), "three".to_string()])
    );
    assert_eq!(map.get(&key("1")).unwrap(), Some(vec![]));
}

#[test]
fn test_list_created_empty_by_acquire() {
    let map = small_map::<String, Vec<i64>>();
    let mut list = vec![99];
    update(&map, &key("new"), &mut list, |l| {
        assert!(l.is_empty());
        l.extend(0..1000);
    });
    let stored = map.get(&key("new")).unwrap().unwrap();
    assert_eq!(stored.len(), 1000);
    assert_eq!(stored[999], 999);
}

#[test]
fn test_list_remove_then_absent() {
    let map = small_map::<String, Vec<String>>();
    map.put(&key("k"), &vec!["a".to_string()]).unwrap();
    assert!(map.remove(&key("k")).unwrap().is_some());

    let mut using = vec!["stale".to_string()];
    assert!(map.get_using(&key("k"), &mut using).unwrap().is_none());
    assert!(!map.contains_key(&key("k")).unwrap());
}

// =============================================================================
// SETS
// =============================================================================

#[test]
fn test_set_values() {
    let map = small_map::<String, HashSet<String>>();
    map.put(&key("1"), &HashSet::new()).unwrap();
    map.put(&key("2"), &HashSet::from(["one".to_string()])).unwrap();

    let mut set = HashSet::new();
    update(&map, &key("2"), &mut set, |s| {
        s.insert("three".to_string());
    });

    let expected = HashSet::from(["one".to_string(), "three".to_string()]);
    assert_eq!(map.get(&key("2")).unwrap(), Some(expected));
    assert_eq!(map.get(&key("1")).unwrap(), Some(HashSet::new()));
}

#[test]
fn test_ordered_set_values() {
    let map = small_map::<String, BTreeSet<i32>>();
    let mut set = BTreeSet::new();
    update(&map, &key("s"), &mut set, |s| {
        s.insert(3);
        s.insert(1);
    });
    update(&map, &key("s"), &mut set, |s| {
        s.insert(2);
    });
    let stored: Vec<i32> = map.get(&key("s")).unwrap().unwrap().into_iter().collect();
    assert_eq!(stored, vec![1, 2, 3]);
}

// =============================================================================
// MAPS
// =============================================================================

#[test]
fn test_map_values() {
    let map = small_map::<String, HashMap<String, String>>();
    map.put(&key("1"), &HashMap::new()).unwrap();
    map.put(
        &key("2"),
        &HashMap::from([("one".to_string(), "uni".to_string())]),
    )
    .unwrap();

    let mut inner = HashMap::new();
    update(&map, &key("2"), &mut inner, |m| {
        m.insert("three".to_string(), "tri".to_string());
    });

    let mut reader = HashMap::new();
    let got = read(&map, &key("2"), &mut reader, |m| m.clone()).unwrap();
    assert_eq!(got.len(), 2);
    assert_eq!(got.get("one").map(String::as_str), Some("uni"));
    assert_eq!(got.get("three").map(String::as_str), Some("tri"));
}

#[test]
fn test_ordered_map_values() {
    let map = small_map::<i64, BTreeMap<String, i64>>();
    let mut inner = BTreeMap::new();
    update(&map, &1, &mut inner, |m| {
        *m.entry("a".to_string()).or_insert(0) += 1;
    });
    update(&map, &1, &mut inner, |m| {
        *m.entry("a".to_string()).or_insert(0) += 1;
    });
    let stored = map.get(&1).unwrap().unwrap();
    assert_eq!(stored.get("a"), Some(&2));
}
