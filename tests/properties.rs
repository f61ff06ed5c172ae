//! Property-based coverage of round-trip laws and boundary behaviours,
//! driven entirely through the public API (the tree is a black box from
//! here, same as any other crate consumer).

use ordmap::{BTree, OrderedMapError, Position};
use proptest::collection::vec;
use proptest::prelude::*;

fn distinct_keys() -> impl Strategy<Value = Vec<i32>> {
    vec(-500i32..500, 0..200).prop_map(|mut keys| {
        keys.sort_unstable();
        keys.dedup();
        keys
    })
}

fn tree_from_keys(keys: &[i32]) -> BTree<i32, i32> {
    let mut tree = BTree::with_order(5).unwrap();
    for &k in keys {
        tree.insert(k, k * 10).unwrap();
    }
    tree
}

proptest! {
    #[test]
    fn iteration_is_strictly_ascending(keys in distinct_keys()) {
        let tree = tree_from_keys(&keys);
        let collected: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
        for pair in collected.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert_eq!(collected.len(), keys.len());
    }

    #[test]
    fn count_matches_iteration_length(keys in distinct_keys()) {
        let tree = tree_from_keys(&keys);
        prop_assert_eq!(tree.len(), tree.iter().count());
    }

    #[test]
    fn get_reflects_last_write(keys in distinct_keys()) {
        let mut tree: BTree<i32, i32> = BTree::with_order(5).unwrap();
        for &k in &keys {
            tree.set(k, k);
            tree.set(k, k * 2);
        }
        for &k in &keys {
            prop_assert_eq!(tree.get(&k), Some(&(k * 2)));
        }
    }

    #[test]
    fn set_then_remove_restores_equality(keys in distinct_keys(), probe in -1000i32..1000) {
        prop_assume!(!keys.contains(&probe));
        let original = tree_from_keys(&keys);
        let mut mutated = original.clone();
        mutated.set(probe, probe);
        mutated.remove(&probe);
        prop_assert_eq!(mutated, original);
    }

    #[test]
    fn set_on_present_key_roundtrips(keys in distinct_keys()) {
        prop_assume!(!keys.is_empty());
        let original = tree_from_keys(&keys);
        let key = keys[keys.len() / 2];
        let previous_value = *original.get(&key).unwrap();

        let mut mutated = original.clone();
        let displaced = mutated.set(key, previous_value + 1);
        prop_assert_eq!(displaced, Some(previous_value));

        mutated.set(key, previous_value);
        prop_assert_eq!(mutated, original);
    }

    #[test]
    fn insertion_order_does_not_affect_iteration(keys in distinct_keys(), seed in any::<u64>()) {
        let mut shuffled = keys.clone();
        // simple deterministic shuffle so the test stays reproducible without pulling in `rand`.
        let len = shuffled.len();
        for i in (1..len).rev() {
            let j = (seed as usize ^ i.wrapping_mul(2654435761)) % (i + 1);
            shuffled.swap(i, j);
        }

        let a = tree_from_keys(&keys);
        let b = tree_from_keys(&shuffled);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn from_sorted_matches_incremental_insertion(keys in distinct_keys()) {
        let incremental = tree_from_keys(&keys);
        let pairs: Vec<(i32, i32)> = keys.iter().map(|&k| (k, k * 10)).collect();
        let from_sorted = BTree::from_sorted(pairs).unwrap();
        prop_assert_eq!(from_sorted, incremental);
    }

    #[test]
    fn append_sorted_on_empty_matches_from_sorted(keys in distinct_keys()) {
        let pairs: Vec<(i32, i32)> = keys.iter().map(|&k| (k, k * 10)).collect();
        let mut appended: BTree<i32, i32> = BTree::with_order(5).unwrap();
        appended.append_sorted(pairs.clone()).unwrap();
        let from_sorted = BTree::from_sorted(pairs).unwrap();
        prop_assert_eq!(appended, from_sorted);
    }

    #[test]
    fn rank_and_lookup_are_inverse(keys in distinct_keys()) {
        prop_assume!(!keys.is_empty());
        let tree = tree_from_keys(&keys);
        for rank in 0..tree.len() {
            let position = Position::new(rank);
            let (key, payload) = tree.get_at(position).unwrap();
            prop_assert_eq!(tree.index_of(key).map(Position::rank), Some(rank));
            prop_assert_eq!(tree.get(key), Some(payload));
        }
    }

    #[test]
    fn remove_by_key_then_lookup_is_absent(keys in distinct_keys()) {
        prop_assume!(!keys.is_empty());
        let mut tree = tree_from_keys(&keys);
        let target = keys[keys.len() / 3];
        let removed = tree.remove(&target);
        prop_assert_eq!(removed, Some(target * 10));
        prop_assert_eq!(tree.get(&target), None);
        prop_assert_eq!(tree.len(), keys.len() - 1);
    }
}

#[test]
fn remove_until_empty_drains_rank_zero() {
    let mut tree = tree_from_keys(&(0..250).collect::<Vec<_>>());
    while !tree.is_empty() {
        tree.remove_at(Position::new(0)).unwrap();
    }
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn get_at_rejects_out_of_range_rank() {
    let tree = tree_from_keys(&[1, 2, 3]);
    assert_eq!(
        tree.get_at(Position::new(3)),
        Err(OrderedMapError::RankOutOfRange { rank: 3, len: 3 })
    );
}

#[test]
fn append_out_of_order_leaves_tree_untouched() {
    let mut tree = tree_from_keys(&[1, 2, 3]);
    let before = tree.clone();
    let result = tree.append_sorted([(3, 30), (4, 40)]);
    assert_eq!(result, Err(OrderedMapError::AppendOutOfOrder));
    assert_eq!(tree, before);
}
