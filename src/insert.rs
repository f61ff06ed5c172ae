//! Recursive insertion: descent, leaf insertion or in-place replace, and
//! split-on-overflow propagated back up as a [`Splinter`].

use std::rc::Rc;

use crate::error::{OrderedMapError, Result};
use crate::node::{Node, Splinter};

/// The outcome of one level of `insert_and_split`: the payload that used
/// to live at `key` (if this call replaced rather than inserted), and a
/// splinter if this node overflowed and had to split.
pub(crate) struct InsertOutcome<K, V> {
    pub(crate) previous: Option<V>,
    pub(crate) splinter: Option<Splinter<K, V>>,
}

/// Inserts `key`/`payload` into the subtree rooted at `node`, or replaces
/// the existing payload in place when `replace` is true and `key` is
/// already present.
pub(crate) fn insert_and_split<K, V>(
    node: &mut Node<K, V>,
    max_keys: usize,
    key: K,
    payload: V,
    replace: bool,
) -> Result<InsertOutcome<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    let (slot, matched) = node.slot_of(&key);

    if matched {
        return if replace {
            let previous = std::mem::replace(&mut node.payloads[slot], payload);
            Ok(InsertOutcome {
                previous: Some(previous),
                splinter: None,
            })
        } else {
            Err(OrderedMapError::KeyAlreadyPresent)
        };
    }

    if node.is_leaf() {
        node.keys.insert(slot, key);
        node.payloads.insert(slot, payload);
        node.count += 1;
        let splinter = split_if_overfull(node, max_keys);
        return Ok(InsertOutcome {
            previous: None,
            splinter,
        });
    }

    let child = Rc::make_mut(&mut node.children[slot]);
    let outcome = insert_and_split(child, max_keys, key, payload, replace)?;

    if outcome.previous.is_none() {
        node.count += 1;
    }

    if let Some(splinter) = outcome.splinter {
        node.keys.insert(slot, splinter.separator_key);
        node.payloads.insert(slot, splinter.separator_payload);
        node.children.insert(slot + 1, splinter.right);
    }

    let splinter = split_if_overfull(node, max_keys);

    Ok(InsertOutcome {
        previous: outcome.previous,
        splinter,
    })
}

fn split_if_overfull<K, V>(node: &mut Node<K, V>, max_keys: usize) -> Option<Splinter<K, V>>
where
    K: Clone,
    V: Clone,
{
    if node.keys.len() > max_keys {
        Some(node.split())
    } else {
        None
    }
}
