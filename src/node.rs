//! The recursive node type shared by every mutation path.
//!
//! A [`Node`] is one level of the tree: an ascending run of keys, the
//! positionally-aligned payloads, and (for internal nodes) one more child
//! than it has keys. Children are held behind `Rc` so that copies of a
//! [`crate::BTree`] share storage until a mutation walks down and forks the
//! path it touches; see `unwrap_or_clone` below.

use std::rc::Rc;

/// One node of the tree, uniform across leaves and internal nodes: a leaf
/// is simply a node with no children.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) payloads: Vec<V>,
    pub(crate) children: Vec<Rc<Node<K, V>>>,
    pub(crate) count: usize,
}

impl<K, V> Clone for Node<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            payloads: self.payloads.clone(),
            children: self.children.clone(),
            count: self.count,
        }
    }
}

/// The right half produced by splitting an overfull node, together with
/// the separator key/payload promoted to the parent.
pub(crate) struct Splinter<K, V> {
    pub(crate) separator_key: K,
    pub(crate) separator_payload: V,
    pub(crate) right: Rc<Node<K, V>>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn empty() -> Self {
        Self {
            keys: Vec::new(),
            payloads: Vec::new(),
            children: Vec::new(),
            count: 0,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Recomputes `count` from `keys.len()` plus every child's `count`.
    /// Called after any structural change: split, merge, rotate.
    pub(crate) fn recompute_count(&mut self) {
        self.count = self.keys.len() + self.children.iter().map(|c| c.count).sum::<usize>();
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Binary search within this node's keys. Returns the first slot whose
    /// key is `>= key` (or `keys.len()` if none), and whether that slot is
    /// an exact match.
    pub(crate) fn slot_of(&self, key: &K) -> (usize, bool) {
        match self.keys.binary_search(key) {
            Ok(idx) => (idx, true),
            Err(idx) => (idx, false),
        }
    }
}

impl<K, V> Node<K, V> {
    /// Splits an overfull node in place: `self` is truncated to the left
    /// half and the separator/right half are returned as a [`Splinter`].
    /// Used directly by ordinary insertion and, with a temporary
    /// reattach/detach dance, by bulk append.
    pub(crate) fn split(&mut self) -> Splinter<K, V> {
        let k = self.keys.len();
        let m = k / 2;

        // `self` keeps `[0..m)`; `m` is the separator; `(m, k)` goes right.
        let mut right_keys = self.keys.split_off(m);
        let mut right_payloads = self.payloads.split_off(m);
        let separator_key = right_keys.remove(0);
        let separator_payload = right_payloads.remove(0);

        let mut right = Node {
            keys: right_keys,
            payloads: right_payloads,
            children: Vec::new(),
            count: 0,
        };

        if !self.is_leaf() {
            let right_children = self.children.split_off(m + 1);
            right.children = right_children;
        }

        self.recompute_count();
        right.recompute_count();

        Splinter {
            separator_key,
            separator_payload,
            right: Rc::new(right),
        }
    }
}

/// Unwraps an `Rc<Node>` without cloning when uniquely owned; clones the
/// node when the `Rc` is shared with another logically-distinct tree.
pub(crate) fn unwrap_or_clone<K: Clone, V: Clone>(rc: Rc<Node<K, V>>) -> Node<K, V> {
    Rc::try_unwrap(rc).unwrap_or_else(|rc| (*rc).clone())
}
