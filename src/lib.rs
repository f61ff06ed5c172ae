//! # ordmap
//!
//! An in-memory, value-semantic ordered B-tree mapping distinct,
//! comparable keys to arbitrary payloads.
//!
//! [`BTree`] embeds three concerns at once: the classical B-tree balance
//! invariants (split on overflow, rotate/merge on underflow), an implicit
//! order-statistic index (every subtree tracks its own element count, so
//! rank-based lookup is `O(log n)`), and value semantics with structural
//! sharing: copying a tree is `O(1)`, and a mutation clones only the
//! nodes on the path it touches.
//!
//! ```
//! use ordmap::BTree;
//!
//! let mut tree: BTree<i32, &str> = BTree::new();
//! tree.insert(5, "five").unwrap();
//! tree.insert(3, "three").unwrap();
//! tree.insert(7, "seven").unwrap();
//!
//! assert_eq!(tree.get(&3), Some(&"three"));
//! assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![3, 5, 7]);
//!
//! let snapshot = tree.clone();
//! tree.remove(&5);
//! assert_eq!(snapshot.get(&5), Some(&"five"));
//! assert_eq!(tree.get(&5), None);
//! ```

mod bulk;
mod error;
mod insert;
mod iter;
mod node;
mod position;
mod remove;
mod tree;

pub use error::{OrderedMapError, Result};
pub use iter::{IntoIter, Iter};
pub use position::Position;
pub use tree::{default_order, BTree};
