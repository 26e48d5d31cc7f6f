//! Round-trip law
//!
//! Whatever goes in through `put` comes back out of `get`, for every
//! supported value shape including empty ones.

use crate::small_map;
use flymap::{SampleBean, StringValue};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_string_round_trip(k in ".{0,16}", v in ".{0,256}") {
        let map = small_map::<String, String>();
        map.put(&k, &v).unwrap();
        prop_assert_eq!(map.get(&k).unwrap(), Some(v));
    }

    #[test]
    fn test_list_round_trip(v in prop::collection::vec(".{0,8}", 0..32)) {
        let map = small_map::<i64, Vec<String>>();
        map.put(&7, &v).unwrap();
        prop_assert_eq!(map.get(&7).unwrap(), Some(v));
    }

    #[test]
    fn test_set_round_trip(v in prop::collection::hash_set(any::<i32>(), 0..32)) {
        let map = small_map::<i64, HashSet<i32>>();
        map.put(&7, &v).unwrap();
        prop_assert_eq!(map.get(&7).unwrap(), Some(v));
    }

    #[test]
    fn test_map_round_trip(v in prop::collection::hash_map(".{0,8}", any::<i64>(), 0..32)) {
        let map = small_map::<i64, HashMap<String, i64>>();
        map.put(&7, &v).unwrap();
        prop_assert_eq!(map.get(&7).unwrap(), Some(v));
    }

    #[test]
    fn test_fixed_string_round_trip(text in "[a-z]{0,64}") {
        let map = small_map::<i64, StringValue>();
        let mut value = StringValue::new_heap();
        value.set_value(&text).unwrap();
        map.put(&1, &value).unwrap();
        prop_assert_eq!(map.get(&1).unwrap().map(|v| v.get_value()), Some(text));
    }

    #[test]
    fn test_bean_round_trip(l in any::<i64>(), d in -1e9f64..1e9, i in any::<i32>()) {
        let map = small_map::<i64, SampleBean>();
        let mut bean = SampleBean::new_heap();
        bean.set_long(l);
        bean.set_double(d);
        bean.set_int(i);
        map.put(&1, &bean).unwrap();
        let got = map.get(&1).unwrap().unwrap();
        prop_assert_eq!(got.get_long(), l);
        prop_assert_eq!(got.get_double(), d);
        prop_assert_eq!(got.get_int(), i);
    }
}
