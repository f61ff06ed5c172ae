//! Amortised O(1)-per-element append of an already-sorted stream.
//!
//! The naive approach re-descends from the root for every element; this
//! module instead decomposes the tree into the rightmost spine once,
//! mutates that spine directly as elements arrive, and reassembles it at
//! the end. Decomposing the spine gives every node on it unique ownership
//! for the duration of the call, so no spine node is shared with another
//! logically-distinct tree while it is being mutated outside the usual
//! `Rc::make_mut` descent.
//!
//! The whole input is validated (strictly ascending, first key past the
//! current maximum) before any mutation happens, so a rejected batch
//! leaves the tree completely untouched rather than partially appended.

use std::rc::Rc;

use crate::error::{OrderedMapError, Result};
use crate::node::{unwrap_or_clone, Node};

fn rightmost_key<K, V>(node: &Node<K, V>) -> Option<&K> {
    if node.is_leaf() {
        node.keys.last()
    } else {
        rightmost_key(node.children.last().expect("internal node has children"))
    }
}

/// Decomposes `root` into a bottom-up vector: `path[0]` is the rightmost
/// leaf, `path[last]` is the (former) root with its rightmost child
/// detached. Every level in between holds its keys/payloads/children but
/// with its own rightmost child surrendered to the level below it.
fn decompose_rightmost_spine<K, V>(root: Rc<Node<K, V>>) -> Vec<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    let mut top_down = Vec::new();
    let mut current = unwrap_or_clone(root);

    loop {
        if current.is_leaf() {
            top_down.push(current);
            break;
        }
        let rightmost_child = current
            .children
            .pop()
            .expect("internal node must have a rightmost child");
        top_down.push(current);
        current = unwrap_or_clone(rightmost_child);
    }

    top_down.reverse();
    top_down
}

/// Reassembles a decomposed spine back into a single root, reattaching
/// each level's detached rightmost child to the level above and
/// recomputing counts bottom-up.
fn reassemble_spine<K, V>(path: Vec<Node<K, V>>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    let mut levels = path.into_iter();
    let mut current = levels.next().expect("spine is never empty");
    current.recompute_count();

    for mut parent in levels {
        parent.children.push(Rc::new(current));
        parent.recompute_count();
        current = parent;
    }

    Rc::new(current)
}

/// Appends `items` (an already-sorted, strictly-ascending-by-key sequence
/// whose first key must exceed the tree's current maximum) to `root` in
/// amortised O(1) per element.
pub(crate) fn append_sorted<K, V, I>(root: &mut Rc<Node<K, V>>, max_keys: usize, items: I) -> Result<()>
where
    K: Ord + Clone,
    V: Clone,
    I: IntoIterator<Item = (K, V)>,
{
    let items: Vec<(K, V)> = items.into_iter().collect();
    if items.is_empty() {
        return Ok(());
    }

    if let Some(current_max) = rightmost_key(root) {
        if items[0].0 <= *current_max {
            return Err(OrderedMapError::AppendOutOfOrder);
        }
    }
    for i in 1..items.len() {
        if items[i].0 <= items[i - 1].0 {
            return Err(OrderedMapError::AppendOutOfOrder);
        }
    }

    let taken = std::mem::replace(root, Rc::new(Node::empty()));
    let mut path = decompose_rightmost_spine(taken);

    for (key, payload) in items {
        path[0].keys.push(key);
        path[0].payloads.push(payload);
        path[0].count += 1;

        let mut level = 0;
        while path[level].keys.len() > max_keys {
            if level > 0 {
                // Temporarily reattach the lower spine level so the
                // ordinary split primitive sees a normal internal node.
                let lower = std::mem::replace(&mut path[level - 1], Node::empty());
                path[level].children.push(Rc::new(lower));
            }

            let splinter = path[level].split();
            let finalized_left = std::mem::replace(&mut path[level], Node::empty());
            let mut continuing_right = unwrap_or_clone(splinter.right);

            if level > 0 {
                let reattached = continuing_right
                    .children
                    .pop()
                    .expect("right half retains the reattached lower spine level");
                path[level - 1] = unwrap_or_clone(reattached);
            }

            path[level] = continuing_right;

            if level + 1 == path.len() {
                path.push(Node::empty());
            }
            path[level + 1].keys.push(splinter.separator_key);
            path[level + 1].payloads.push(splinter.separator_payload);
            path[level + 1].children.push(Rc::new(finalized_left));

            level += 1;
        }
    }

    *root = reassemble_spine(path);
    Ok(())
}
