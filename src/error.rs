//! Precondition-violation errors.
//!
//! Every variant here corresponds to a "Fails when" row in the container's
//! external interface: an absent key is never an error (it surfaces as
//! `Option::None`), but these are all programmer errors that the container
//! reports rather than silently tolerating.

use thiserror::Error;

/// The reason a fallible operation on [`crate::BTree`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderedMapError {
    /// `BTree::with_order` was called with an order below the domain
    /// minimum of 3.
    #[error("order must be at least 3, got {0}")]
    OrderTooSmall(usize),

    /// `insert` was called with a key that is already present; use `set`
    /// to insert-or-replace instead.
    #[error("key is already present")]
    KeyAlreadyPresent,

    /// A rank-based operation was given a rank outside `[0, len)`.
    #[error("rank {rank} out of range for a tree of length {len}")]
    RankOutOfRange { rank: usize, len: usize },

    /// `append_sorted` received a key that was not strictly greater than
    /// the tree's current maximum key.
    #[error("appended key is not strictly greater than the current maximum key")]
    AppendOutOfOrder,

    /// Construction from an unsorted sequence encountered the same key
    /// twice.
    #[error("duplicate key encountered while constructing from an unordered sequence")]
    DuplicateKey,

    /// Construction from a sequence claimed to be sorted was not strictly
    /// ascending by key.
    #[error("input sequence is not strictly ascending by key")]
    NotAscending,
}

/// Result alias used throughout this crate for fallible, precondition-bearing operations.
pub type Result<T> = std::result::Result<T, OrderedMapError>;
