//! `BTree<K, V>`: the public handle. Ties together node, insert, remove,
//! bulk, iter, position, and error into one ordered-associative-container
//! surface.

use std::fmt;
use std::rc::Rc;

use crate::bulk;
use crate::error::{OrderedMapError, Result};
use crate::insert::insert_and_split;
use crate::iter::{IntoIter, Iter};
use crate::node::Node;
use crate::position::Position;
use crate::remove::remove_and_collapse;

/// Node-size budget the default fanout is tuned against: a fully loaded
/// node should fit comfortably in an 8 KiB-ish span. `8191` (`2^13 - 1`) is
/// deliberately not a power of two, so the backing `Vec`s don't reallocate
/// at exactly the moment a node overflows.
const DEFAULT_NODE_BUDGET_BYTES: usize = 8191;

/// Smallest order this container will construct; below 3 a "B-tree" can't
/// satisfy the balance invariants (`min_children = 2` is the floor).
const MIN_ORDER: usize = 3;

/// The default fanout for keys of type `K`: `max(8191 / size_of::<K>(), 32)`.
pub fn default_order<K>() -> usize {
    let key_size = std::mem::size_of::<K>().max(1);
    (DEFAULT_NODE_BUDGET_BYTES / key_size).max(32)
}

/// An in-memory, value-semantic, ordered B-tree mapping distinct keys `K`
/// to payloads `V`.
///
/// Keys are kept in strictly ascending order; duplicate keys are rejected.
/// Copying a `BTree` is `O(1)` and copy-on-write: the copy shares node
/// storage with the original until a mutation walks a path and forks it.
pub struct BTree<K, V> {
    root: Rc<Node<K, V>>,
    order: usize,
}

impl<K, V> Clone for BTree<K, V> {
    fn clone(&self) -> Self {
        BTree {
            root: Rc::clone(&self.root),
            order: self.order,
        }
    }
}

impl<K, V> BTree<K, V> {
    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.root.count
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.root.count == 0
    }

    /// The fanout fixed at construction for this tree's lifetime.
    pub fn order(&self) -> usize {
        self.order
    }

    fn max_keys(&self) -> usize {
        self.order - 1
    }

    fn min_children(&self) -> usize {
        (self.order + 1).div_ceil(2)
    }

    fn min_keys(&self) -> usize {
        self.min_children() - 1
    }

    /// Borrowing in-order iterator.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }
}

impl<K, V> Default for BTree<K, V> {
    fn default() -> Self {
        BTree {
            root: Rc::new(Node::empty()),
            order: default_order::<K>(),
        }
    }
}

impl<K, V> BTree<K, V> {
    /// An empty tree using the size-derived default fanout.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree with an explicit fanout.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::OrderTooSmall`] if `order < 3`.
    pub fn with_order(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(OrderedMapError::OrderTooSmall(order));
        }
        Ok(BTree {
            root: Rc::new(Node::empty()),
            order,
        })
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Looks up the payload stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut node = &*self.root;
        loop {
            let (slot, matched) = node.slot_of(key);
            if matched {
                return Some(&node.payloads[slot]);
            }
            if node.is_leaf() {
                return None;
            }
            node = node.children[slot].as_ref();
        }
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// The 0-based rank of `key` in ascending iteration order, or `None`
    /// if `key` is absent.
    pub fn index_of(&self, key: &K) -> Option<Position> {
        let mut node = &*self.root;
        let mut rank = 0usize;
        loop {
            let (slot, matched) = node.slot_of(key);
            let left_siblings_count: usize = node.children[..slot.min(node.children.len())]
                .iter()
                .map(|c| c.count)
                .sum();
            if matched {
                return Some(Position::new(rank + left_siblings_count + slot));
            }
            if node.is_leaf() {
                return None;
            }
            rank += left_siblings_count + slot;
            node = node.children[slot].as_ref();
        }
    }

    /// Returns the `(key, payload)` pair at the given rank.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::RankOutOfRange`] if `position.rank() >= self.len()`.
    pub fn get_at(&self, position: Position) -> Result<(&K, &V)> {
        let len = self.len();
        let mut rank = position.rank();
        if rank >= len {
            return Err(OrderedMapError::RankOutOfRange { rank: position.rank(), len });
        }

        let mut node = &*self.root;
        loop {
            if node.is_leaf() {
                return Ok((&node.keys[rank], &node.payloads[rank]));
            }
            let mut seen = 0usize;
            for (i, child) in node.children.iter().enumerate() {
                let c = seen + child.count;
                match rank.cmp(&c) {
                    std::cmp::Ordering::Less => {
                        rank -= seen;
                        node = child.as_ref();
                        break;
                    }
                    std::cmp::Ordering::Equal => {
                        return Ok((&node.keys[i], &node.payloads[i]));
                    }
                    std::cmp::Ordering::Greater => {
                        seen = c + 1;
                        if i + 1 == node.children.len() {
                            unreachable!("rank validated against total count above");
                        }
                    }
                }
            }
        }
    }
}

impl<K: Ord + Clone, V: Clone> BTree<K, V> {
    /// Inserts `key`/`payload`.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::KeyAlreadyPresent`] if `key` is already
    /// present; use [`BTree::set`] to insert-or-replace.
    pub fn insert(&mut self, key: K, payload: V) -> Result<()> {
        self.insert_impl(key, payload, false)?;
        Ok(())
    }

    /// Inserts `key`/`payload`, or replaces the existing payload in place
    /// and returns the one it displaced.
    pub fn set(&mut self, key: K, payload: V) -> Option<V> {
        self.insert_impl(key, payload, true)
            .expect("replace-in-place insertion cannot fail")
    }

    fn insert_impl(&mut self, key: K, payload: V, replace: bool) -> Result<Option<V>> {
        if !replace && self.contains_key(&key) {
            return Err(OrderedMapError::KeyAlreadyPresent);
        }
        let max_keys = self.max_keys();
        let root = Rc::make_mut(&mut self.root);
        let outcome = insert_and_split(root, max_keys, key, payload, replace)?;

        if let Some(splinter) = outcome.splinter {
            let old_root = std::mem::replace(&mut self.root, Rc::new(Node::empty()));
            let mut new_root = Node::empty();
            new_root.keys.push(splinter.separator_key);
            new_root.payloads.push(splinter.separator_payload);
            new_root.children.push(old_root);
            new_root.children.push(splinter.right);
            new_root.recompute_count();
            self.root = Rc::new(new_root);
        }

        debug_assert_eq!(self.root.count, self.iter().count());
        Ok(outcome.previous)
    }

    /// Removes and returns the payload stored for `key`, if present.
    ///
    /// An absent key is not an error and, since nothing would be mutated,
    /// never forks any shared node storage.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.contains_key(key) {
            return None;
        }
        let min_keys = self.min_keys();
        let root = Rc::make_mut(&mut self.root);
        let removed = remove_and_collapse(root, min_keys, key);
        self.collapse_root();
        debug_assert_eq!(self.root.count, self.iter().count());
        removed
    }

    /// Removes and returns the `(key, payload)` pair at the given rank.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::RankOutOfRange`] if `position.rank() >= self.len()`.
    pub fn remove_at(&mut self, position: Position) -> Result<(K, V)> {
        let (key, _) = self.get_at(position)?;
        let key = key.clone();
        let payload = self.remove(&key).expect("key just looked up by rank must be present");
        Ok((key, payload))
    }

    fn collapse_root(&mut self) {
        loop {
            let should_collapse = !self.root.is_leaf() && self.root.keys.is_empty();
            if !should_collapse {
                break;
            }
            let root = Rc::make_mut(&mut self.root);
            let only_child = root.children.pop().expect("internal root with no keys has one child");
            self.root = only_child;
        }
    }

    /// Appends `items`, an already-sorted sequence every one of whose keys
    /// must be strictly greater than the tree's current maximum key, in
    /// amortised `O(1)` per element.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::AppendOutOfOrder`] if any key fails that
    /// precondition; the tree is left completely unchanged in that case.
    pub fn append_sorted<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let max_keys = self.max_keys();
        bulk::append_sorted(&mut self.root, max_keys, items)?;
        debug_assert_eq!(self.root.count, self.iter().count());
        Ok(())
    }

    /// Builds a tree from a sequence already sorted in strictly ascending
    /// order by key.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::NotAscending`] if the sequence is not
    /// strictly ascending.
    pub fn from_sorted<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Self::new();
        match tree.append_sorted(items) {
            Ok(()) => Ok(tree),
            Err(OrderedMapError::AppendOutOfOrder) => Err(OrderedMapError::NotAscending),
            Err(other) => Err(other),
        }
    }

    /// Builds a tree from an arbitrary (not necessarily sorted) sequence
    /// of distinct-keyed pairs: sorts by key (stable, so the last pair
    /// written for equal keys would win if duplicates slipped through a
    /// custom `Ord`), then bulk-appends.
    ///
    /// # Errors
    /// Returns [`OrderedMapError::DuplicateKey`] if two pairs share a key.
    pub fn try_from_iter<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut pairs: Vec<(K, V)> = items.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        for window in pairs.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(OrderedMapError::DuplicateKey);
            }
        }
        Self::from_sorted(pairs)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(Iter::new(&self.root)).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        Iter::new(&self.root).eq(Iter::new(&other.root))
    }
}

impl<K: Eq, V: Eq> Eq for BTree<K, V> {}

impl<'a, K: Ord, V> IntoIterator for &'a BTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(&self.root)
    }
}

impl<K: Clone, V: Clone> IntoIterator for BTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root)
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, V)> for BTree<K, V> {
    /// Builds a tree from an arbitrary sequence of distinct-keyed pairs.
    ///
    /// # Panics
    /// Panics if two pairs share a key: `FromIterator` cannot report a
    /// `Result`, so a duplicate key is treated as an assertion failure,
    /// not a silently-tolerated precondition violation.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::try_from_iter(iter).expect("duplicate key in FromIterator source")
    }
}
