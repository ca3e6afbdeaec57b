#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::HashSet;
use wideload_core::{Entries, WideLoad, WideLoadConfig, WideValue};

fn fresh() -> WideLoad {
    WideLoad::new(WideLoadConfig::default())
}

#[derive(Debug, Clone)]
enum Op {
    Add(String, i64),
    Forget(String),
    Flush,
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(str::to_string)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| Op::Add(k, v)),
        2 => key_strategy().prop_map(Op::Forget),
        1 => Just(Op::Flush),
    ]
}

proptest! {
    #[test]
    fn has_tracks_last_add_without_forget_or_flush(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut wide = fresh();
        let mut present: HashSet<String> = HashSet::new();

        for op in &ops {
            match op {
                Op::Add(k, v) => {
                    wide.add(k.as_str(), *v);
                    present.insert(k.clone());
                }
                Op::Forget(k) => {
                    wide.forget(k);
                    present.remove(k);
                }
                Op::Flush => {
                    wide.flush();
                    present.clear();
                }
            }
        }

        for key in ["a", "b", "c", "d", "e"] {
            prop_assert_eq!(wide.has(key), present.contains(key));
        }
    }

    #[test]
    fn flush_always_empties(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut wide = fresh();
        for op in &ops {
            if let Op::Add(k, v) = op {
                wide.add(k.as_str(), *v);
            }
        }
        wide.flush();
        prop_assert!(wide.all().is_empty());
        wide.flush();
        prop_assert!(wide.all().is_empty());
    }

    #[test]
    fn only_and_except_partition_all(
        entries in prop::collection::vec((key_strategy(), any::<i64>()), 0..10),
        selected in prop::collection::vec(key_strategy(), 0..5),
    ) {
        let mut wide = fresh();
        wide.add_many(entries);

        let only = wide.only(selected.as_slice());
        let except = wide.except(selected.as_slice());

        prop_assert_eq!(only.len() + except.len(), wide.len());
        for (key, value) in wide.all() {
            let side = if selected.contains(&key) { &only } else { &except };
            prop_assert_eq!(side.get(&key), Some(&value));
        }
    }

    #[test]
    fn increment_then_decrement_restores(start in -1_000_000i64..1_000_000, n in 0i64..1_000_000) {
        let mut wide = fresh();
        wide.add("count", start);
        wide.increment("count", n).unwrap();
        wide.decrement("count", n).unwrap();
        prop_assert_eq!(wide.get("count"), Some(&WideValue::Int(start)));
    }
}

#[test]
fn test_add_map_merges_and_overwrites() {
    let mut wide = fresh();
    wide.add("a", 1);

    let mut batch = Entries::new();
    batch.insert("a".to_string(), WideValue::from(10));
    batch.insert("b".to_string(), WideValue::from("two"));
    wide.add_many(batch);

    assert_eq!(wide.get("a"), Some(&WideValue::Int(10)));
    assert_eq!(wide.get("b"), Some(&WideValue::from("two")));
}

#[test]
fn test_pull_absent_key_leaves_map_unchanged() {
    let mut wide = fresh();
    wide.add("keep", true);
    let before = wide.all();

    assert_eq!(wide.pull_or("missing", "default"), WideValue::from("default"));
    assert_eq!(wide.pull("missing"), None);
    assert_eq!(wide.all(), before);
}

#[test]
fn test_pull_present_key_returns_value_and_removes() {
    let mut wide = fresh();
    wide.add("user_id", 42);
    assert_eq!(wide.pull("user_id"), Some(WideValue::Int(42)));
    assert!(!wide.has("user_id"));
}

#[test]
fn test_only_and_except_ignore_unknown_keys() {
    let mut wide = fresh();
    wide.add_many([("a", 1), ("b", 2), ("c", 3)]);

    let only = wide.only(&["a", "c", "nope"]);
    assert_eq!(only.keys().collect::<Vec<_>>(), vec!["a", "c"]);

    let except = wide.except(&["a", "nope"]);
    assert_eq!(except.keys().collect::<Vec<_>>(), vec!["b", "c"]);
}

#[test]
fn test_all_is_a_snapshot() {
    let mut wide = fresh();
    wide.add("a", 1);
    let snapshot = wide.all();
    wide.add("b", 2);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(wide.len(), 2);
}

#[test]
fn test_increment_absent_key_starts_from_zero() {
    let mut wide = fresh();
    wide.increment("hits", 3).unwrap();
    assert_eq!(wide.get("hits"), Some(&WideValue::Int(3)));

    wide.decrement("misses", 1).unwrap();
    assert_eq!(wide.get("misses"), Some(&WideValue::Int(-1)));
}

#[test]
fn test_increment_truncates_float_and_bool() {
    let mut wide = fresh();
    wide.add("ratio", 2.75).add("flag", true);
    wide.increment("ratio", 1).unwrap();
    wide.increment("flag", 1).unwrap();
    assert_eq!(wide.get("ratio"), Some(&WideValue::Int(3)));
    assert_eq!(wide.get("flag"), Some(&WideValue::Int(2)));
}

#[test]
fn test_nested_values_round_trip_through_json() {
    let mut wide = fresh();
    wide.add("user", serde_json::json!({"id": 7, "roles": ["admin", "ops"]}))
        .add("latency_ms", 12.5)
        .add("cache_hit", false)
        .add("parent", None::<String>);

    let json = serde_json::to_string(&wide.all()).unwrap();
    let back: Entries = serde_json::from_str(&json).unwrap();
    assert_eq!(back, wide.all());
}
