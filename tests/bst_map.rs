use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use bst_tree::{BstMap, CursorError};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 4_096;

/// Generates random keys in a range small enough to force collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -8_192i64..8_192i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
    ]
}

// ─── Randomized model tests against BTreeMap ─────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both BstMap and BTreeMap
    /// and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: BstMap<i64, i64> = BstMap::new();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(map.insert(*k, *v), model.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(map.remove(k), model.remove(k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(map.remove_entry(k), model.remove_entry(k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(map.get(k), model.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(map.contains_key(k), model.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(map.get_key_value(k), model.get_key_value(k), "get_key_value({})", k);
                }
            }
            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.is_empty(), model.is_empty());
        }
    }

    /// Iteration visits exactly the model's entries, in ascending key order.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: BstMap<i64, i64> = entries.iter().copied().collect();
        let model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert!(map.iter().eq(model.iter()));
        prop_assert!(map.keys().eq(model.keys()));
        prop_assert!(map.values().eq(model.values()));
        prop_assert!(map.into_iter().eq(model.into_iter()));
    }

    /// `size_hint` stays exact at every step of the walk.
    #[test]
    fn iter_size_hint_is_exact(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let map: BstMap<i64, i64> = entries.into_iter().collect();

        let mut iter = map.iter();
        let mut remaining = map.len();
        prop_assert_eq!(iter.size_hint(), (remaining, Some(remaining)));
        while iter.next().is_some() {
            remaining -= 1;
            prop_assert_eq!(iter.size_hint(), (remaining, Some(remaining)));
        }
        prop_assert_eq!(iter.next(), None);
    }

    /// Mutations through `get_mut` and `values_mut` are observable afterwards.
    #[test]
    fn mutation_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        keys_to_mutate in proptest::collection::vec(key_strategy(), 64),
    ) {
        let mut map: BstMap<i64, i64> = entries.iter().copied().collect();
        let mut model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for k in &keys_to_mutate {
            if let Some(v) = map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
            if let Some(v) = model.get_mut(k) {
                *v = v.wrapping_add(1);
            }
        }
        for v in map.values_mut() {
            *v = v.wrapping_mul(3);
        }
        for v in model.values_mut() {
            *v = v.wrapping_mul(3);
        }

        prop_assert!(map.iter().eq(model.iter()));
    }

    /// A cursor walk produces the model's entries in order, and selectively
    /// removing through the cursor matches `retain` on the model.
    #[test]
    fn cursor_retain_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut map: BstMap<i64, i64> = entries.iter().copied().collect();
        let mut model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let mut cursor = map.cursor();
        let mut seen = Vec::new();
        while let Some((&k, &v)) = cursor.next(&map).unwrap() {
            seen.push((k, v));
            if k % 3 == 0 {
                prop_assert_eq!(cursor.remove_current(&mut map), Ok((k, v)));
            }
        }
        prop_assert!(seen.into_iter().eq(model.iter().map(|(&k, &v)| (k, v))));

        model.retain(|k, _| k % 3 != 0);
        prop_assert!(map.iter().eq(model.iter()));
    }

    /// Removing every entry through a cursor leaves the map empty.
    #[test]
    fn cursor_drains_to_empty(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut map: BstMap<i64, i64> = entries.into_iter().collect();

        let mut cursor = map.cursor();
        while cursor.next(&map).unwrap().is_some() {
            cursor.remove_current(&mut map).unwrap();
        }
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.iter().next(), None);
        prop_assert_eq!(map.height(), 0);
    }

    /// The height is bounded by len - 1 and never below the balanced floor.
    #[test]
    fn height_stays_within_bounds(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let map: BstMap<i64, i64> = entries.into_iter().collect();

        let floor = (usize::BITS - map.len().leading_zeros() - 1) as usize;
        prop_assert!(map.height() <= map.len() - 1);
        prop_assert!(map.height() >= floor);
    }

    /// `PartialEq` agrees with entry-sequence equality.
    #[test]
    fn eq_matches_btreemap(
        entries_a in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 8),
        entries_b in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 8),
    ) {
        let map_a: BstMap<i64, i64> = entries_a.iter().copied().collect();
        let map_b: BstMap<i64, i64> = entries_b.iter().copied().collect();
        let model_a: BTreeMap<i64, i64> = entries_a.into_iter().collect();
        let model_b: BTreeMap<i64, i64> = entries_b.into_iter().collect();

        prop_assert_eq!(map_a == map_b, model_a == model_b);
    }

    /// `clear` empties the map and resets iteration.
    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut map: BstMap<i64, i64> = entries.into_iter().collect();

        map.clear();
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.len(), 0);
        prop_assert_eq!(map.iter().next(), None);
    }
}

// ─── Deterministic shape and ordering tests ──────────────────────────────────

#[test]
fn iteration_is_in_ascending_key_order() {
    let mut map = BstMap::new();
    for key in [5, 3, 8, 1, 4] {
        map.insert(key, key * 10);
    }

    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [1, 3, 4, 5, 8]);
    let entries: Vec<_> = map.into_iter().collect();
    assert_eq!(entries, [(1, 10), (3, 30), (4, 40), (5, 50), (8, 80)]);
}

#[test]
fn duplicate_insert_replaces_and_returns_old_value() {
    let mut map = BstMap::new();
    assert_eq!(map.insert(5, "a"), None);
    assert_eq!(map.insert(5, "b"), Some("a"));
    assert_eq!(map.get(&5), Some(&"b"));
    assert_eq!(map.len(), 1);
}

#[test]
fn two_child_root_removal_promotes_successor() {
    let mut map: BstMap<i32, i32> = [(5, 50), (3, 30), (8, 80)].into_iter().collect();

    // The root (5) has both children.
    assert_eq!(map.remove(&5), Some(50));
    assert!(!map.contains_key(&5));
    assert_eq!(map.len(), 2);
    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [3, 8]);
}

#[test]
fn removing_an_absent_key_is_a_noop() {
    let mut map: BstMap<i32, &str> = BstMap::new();
    assert_eq!(map.remove(&1), None);

    map.insert(1, "a");
    assert_eq!(map.remove(&2), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn comparator_reverses_iteration_order() {
    let mut map = BstMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    for key in [1, 3, 2] {
        map.insert(key, ());
    }

    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [3, 2, 1]);

    // Lookups and removals honor the same injected order.
    assert!(map.contains_key(&2));
    assert_eq!(map.remove(&2), Some(()));
    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [3, 1]);
}

#[test]
fn height_tracks_insertion_order() {
    let mut map = BstMap::new();
    assert_eq!(map.height(), 0);

    map.insert(4, ());
    assert_eq!(map.height(), 0);

    map.insert(2, ());
    map.insert(6, ());
    map.insert(1, ());
    map.insert(3, ());
    map.insert(5, ());
    map.insert(7, ());
    assert_eq!(map.height(), 2);

    // Sorted insertion degrades to a vine.
    let mut vine = BstMap::new();
    for key in 0..100 {
        vine.insert(key, ());
    }
    assert_eq!(vine.height(), 99);
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_panics_on_missing_key() {
    let map: BstMap<i32, &str> = BstMap::from([(1, "a")]);
    let _ = map[&2];
}

#[test]
fn debug_formats_like_a_map() {
    let map = BstMap::from([(2, "b"), (1, "a")]);
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
}

// ─── Cursor semantics ─────────────────────────────────────────────────────────

#[test]
fn cursor_fails_fast_on_outside_insert() {
    let mut map = BstMap::from([(1, "a"), (2, "b")]);
    let mut cursor = map.cursor();

    assert_eq!(cursor.next(&map), Ok(Some((&1, &"a"))));
    map.insert(3, "c");
    assert_eq!(cursor.next(&map), Err(CursorError::ConcurrentModification));
    // The cursor stays poisoned.
    assert_eq!(cursor.next(&map), Err(CursorError::ConcurrentModification));
    assert_eq!(
        cursor.remove_current(&mut map),
        Err(CursorError::ConcurrentModification)
    );
}

#[test]
fn cursor_fails_fast_on_outside_remove() {
    let mut map = BstMap::from([(1, "a"), (2, "b"), (3, "c")]);
    let mut cursor = map.cursor();

    assert_eq!(cursor.next(&map), Ok(Some((&1, &"a"))));
    map.remove(&3);
    assert_eq!(cursor.next(&map), Err(CursorError::ConcurrentModification));
}

#[test]
fn cursor_fails_fast_on_replacement_and_clear() {
    let mut map = BstMap::from([(1, "a"), (2, "b")]);

    // Replacing an existing key splices a fresh node in and counts as a
    // structural change.
    let mut cursor = map.cursor();
    map.insert(1, "z");
    assert_eq!(cursor.next(&map), Err(CursorError::ConcurrentModification));

    let mut cursor = map.cursor();
    map.clear();
    assert_eq!(cursor.next(&map), Err(CursorError::ConcurrentModification));
}

#[test]
fn cursor_remove_requires_a_current_entry() {
    let mut map = BstMap::from([(1, "a"), (2, "b")]);
    let mut cursor = map.cursor();

    // Nothing produced yet.
    assert_eq!(
        cursor.remove_current(&mut map),
        Err(CursorError::NoCurrentEntry)
    );

    assert_eq!(cursor.next(&map), Ok(Some((&1, &"a"))));
    assert_eq!(cursor.remove_current(&mut map), Ok((1, "a")));

    // The produced entry was already removed.
    assert_eq!(
        cursor.remove_current(&mut map),
        Err(CursorError::NoCurrentEntry)
    );

    // The walk continues past the removal.
    assert_eq!(cursor.next(&map), Ok(Some((&2, &"b"))));
    assert_eq!(cursor.next(&map), Ok(None));
}

#[test]
fn cursor_survives_removing_a_two_child_entry() {
    // 5 at the root, 8 with children 7 and 9.
    let mut map = BstMap::new();
    for key in [5, 3, 8, 7, 9] {
        map.insert(key, key * 10);
    }

    let mut cursor = map.cursor();
    assert_eq!(cursor.next(&map), Ok(Some((&3, &30))));
    assert_eq!(cursor.next(&map), Ok(Some((&5, &50))));
    assert_eq!(cursor.next(&map), Ok(Some((&7, &70))));
    assert_eq!(cursor.next(&map), Ok(Some((&8, &80))));

    // 8 has two children, so its successor (9, the entry the cursor has
    // queued) is the node physically spliced out.
    assert_eq!(cursor.remove_current(&mut map), Ok((8, 80)));
    assert_eq!(cursor.next(&map), Ok(Some((&9, &90))));
    assert_eq!(cursor.next(&map), Ok(None));

    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [3, 5, 7, 9]);
}

#[test]
fn cursor_can_remove_the_last_entry_after_exhaustion() {
    let mut map = BstMap::from([(1, "a")]);
    let mut cursor = map.cursor();

    assert_eq!(cursor.next(&map), Ok(Some((&1, &"a"))));
    assert_eq!(cursor.next(&map), Ok(None));

    // Exhaustion does not forget the entry last produced.
    assert_eq!(cursor.remove_current(&mut map), Ok((1, "a")));
    assert!(map.is_empty());
}

#[test]
fn cursor_on_an_empty_map_is_immediately_exhausted() {
    let map: BstMap<i32, i32> = BstMap::new();
    let mut cursor = map.cursor();
    assert_eq!(cursor.next(&map), Ok(None));
    assert_eq!(cursor.next(&map), Ok(None));
}

// ─── Trait plumbing ───────────────────────────────────────────────────────────

#[test]
fn extend_and_from_array_agree() {
    let mut extended: BstMap<i32, i32> = BstMap::new();
    extended.extend([(2, 20), (1, 10), (3, 30)]);

    let from_array = BstMap::from([(1, 10), (2, 20), (3, 30)]);
    assert_eq!(extended, from_array);

    // The by-reference flavor.
    let pairs = [(4, 40), (5, 50)];
    extended.extend(pairs.iter().map(|(k, v)| (k, v)));
    assert_eq!(extended.len(), 5);
    assert_eq!(extended[&4], 40);
}

#[test]
fn iter_mut_updates_values_in_place() {
    let mut map = BstMap::from([(1, 10), (2, 20), (3, 30)]);
    for (key, value) in &mut map {
        *value += *key;
    }
    let entries: Vec<_> = map.into_iter().collect();
    assert_eq!(entries, [(1, 11), (2, 22), (3, 33)]);
}

#[test]
fn default_is_empty() {
    let map: BstMap<i32, i32> = BstMap::default();
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
}
