//! Recursive deletion: descent, predecessor substitution, and the
//! rotate/merge rebalancing that keeps every non-root node within
//! `[min_keys, max_keys]`.

use std::rc::Rc;

use crate::node::{unwrap_or_clone, Node};

/// Removes `key` from the subtree rooted at `node`, returning its payload
/// if present.
pub(crate) fn remove_and_collapse<K, V>(node: &mut Node<K, V>, min_keys: usize, key: &K) -> Option<V>
where
    K: Ord + Clone,
    V: Clone,
{
    let (slot, matched) = node.slot_of(key);

    if node.is_leaf() {
        if !matched {
            return None;
        }
        node.count -= 1;
        node.keys.remove(slot);
        return Some(node.payloads.remove(slot));
    }

    if matched {
        let child = Rc::make_mut(&mut node.children[slot]);
        let (predecessor_key, predecessor_payload) = remove_rightmost(child, min_keys);
        let previous = std::mem::replace(&mut node.payloads[slot], predecessor_payload);
        node.keys[slot] = predecessor_key;
        node.count -= 1;
        rebalance_child(node, min_keys, slot);
        Some(previous)
    } else {
        let child = Rc::make_mut(&mut node.children[slot]);
        let removed = remove_and_collapse(child, min_keys, key)?;
        node.count -= 1;
        rebalance_child(node, min_keys, slot);
        Some(removed)
    }
}

/// Removes and returns the largest (key, payload) pair in the subtree
/// rooted at `node`, rebalancing on the way back up. Used to supply the
/// in-order predecessor when an internal-node separator is deleted.
fn remove_rightmost<K, V>(node: &mut Node<K, V>, min_keys: usize) -> (K, V)
where
    K: Ord + Clone,
    V: Clone,
{
    if node.is_leaf() {
        node.count -= 1;
        let key = node.keys.pop().expect("leaf on a non-empty subtree must hold a key");
        let payload = node
            .payloads
            .pop()
            .expect("leaf on a non-empty subtree must hold a payload");
        (key, payload)
    } else {
        let last = node.children.len() - 1;
        let child = Rc::make_mut(&mut node.children[last]);
        let result = remove_rightmost(child, min_keys);
        node.count -= 1;
        rebalance_child(node, min_keys, last);
        result
    }
}

/// Restores the balance invariant for `parent.children[slot]` if it fell
/// below `min_keys`, by rotation from a sibling with keys to spare or, as
/// a last resort, a merge.
fn rebalance_child<K, V>(parent: &mut Node<K, V>, min_keys: usize, slot: usize)
where
    K: Clone,
    V: Clone,
{
    if parent.children[slot].keys.len() >= min_keys {
        return;
    }

    let left_has_spare = slot > 0 && parent.children[slot - 1].keys.len() > min_keys;
    let right_has_spare = slot + 1 < parent.children.len() && parent.children[slot + 1].keys.len() > min_keys;

    if left_has_spare {
        rotate_right(parent, slot);
    } else if right_has_spare {
        rotate_left(parent, slot);
    } else if slot > 0 {
        merge(parent, slot - 1);
    } else {
        merge(parent, slot);
    }
}

/// Moves the last key of `children[slot - 1]` up into the parent, and the
/// parent's old separator down to the front of `children[slot]`.
fn rotate_right<K, V>(parent: &mut Node<K, V>, slot: usize)
where
    K: Clone,
    V: Clone,
{
    let (left_part, right_part) = parent.children.split_at_mut(slot);
    let left = Rc::make_mut(&mut left_part[slot - 1]);
    let right = Rc::make_mut(&mut right_part[0]);

    let moved_key = left.keys.pop().expect("left sibling must have a spare key");
    let moved_payload = left
        .payloads
        .pop()
        .expect("left sibling must have a spare payload");

    let parent_key = std::mem::replace(&mut parent.keys[slot - 1], moved_key);
    let parent_payload = std::mem::replace(&mut parent.payloads[slot - 1], moved_payload);

    right.keys.insert(0, parent_key);
    right.payloads.insert(0, parent_payload);

    if !left.is_leaf() {
        let moved_child = left
            .children
            .pop()
            .expect("left sibling must have a child to move");
        right.children.insert(0, moved_child);
    }

    left.recompute_count();
    right.recompute_count();
}

/// Symmetric to [`rotate_right`]: moves the first key of `children[slot + 1]`
/// up into the parent, and the parent's old separator down to the end of
/// `children[slot]`.
fn rotate_left<K, V>(parent: &mut Node<K, V>, slot: usize)
where
    K: Clone,
    V: Clone,
{
    let (left_part, right_part) = parent.children.split_at_mut(slot + 1);
    let left = Rc::make_mut(&mut left_part[slot]);
    let right = Rc::make_mut(&mut right_part[0]);

    let moved_key = right.keys.remove(0);
    let moved_payload = right.payloads.remove(0);

    let parent_key = std::mem::replace(&mut parent.keys[slot], moved_key);
    let parent_payload = std::mem::replace(&mut parent.payloads[slot], moved_payload);

    left.keys.push(parent_key);
    left.payloads.push(parent_payload);

    if !right.is_leaf() {
        let moved_child = right.children.remove(0);
        left.children.push(moved_child);
    }

    left.recompute_count();
    right.recompute_count();
}

/// Merges `children[idx + 1]` into `children[idx]`, pulling the separating
/// key/payload down from the parent between the two halves.
fn merge<K, V>(parent: &mut Node<K, V>, idx: usize)
where
    K: Clone,
    V: Clone,
{
    let right = unwrap_or_clone(parent.children.remove(idx + 1));
    let key = parent.keys.remove(idx);
    let payload = parent.payloads.remove(idx);

    let left = Rc::make_mut(&mut parent.children[idx]);
    left.keys.push(key);
    left.payloads.push(payload);
    left.keys.extend(right.keys);
    left.payloads.extend(right.payloads);
    if !left.is_leaf() {
        left.children.extend(right.children);
    }
    left.recompute_count();
}
