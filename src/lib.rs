//! # avl-forest
//!
//! Height-balanced (AVL) binary search trees stored in a shared node arena,
//! with logarithmic join, merge and split, and per-node augmentation kept
//! consistent under every structural change.
//!
//! An [`AvlForest`] owns the nodes and the comparator; each [`AvlTree`] is an
//! owning root handle into it. Because all trees of a forest live in the same
//! arena, moving a subtree from one tree to another is a matter of relinking
//! indices, which is what makes [`AvlForest::split`] and
//! [`AvlForest::merge`] O(log n). The flip side is that a tree cannot free
//! its nodes when dropped; [`AvlForest::clear`] releases them.
//!
//! ## Example
//!
//! ```rust
//! use avl_forest::{AvlForest, AvlTree, Side, Size};
//!
//! let mut forest: AvlForest<i32, Size> = AvlForest::new();
//! let mut tree = AvlTree::new();
//! for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
//!     forest.insert(&mut tree, k);
//! }
//!
//! let third = forest.nth_smallest(&tree, 2).unwrap();
//! assert_eq!(forest.key(third), Some(&3));
//!
//! let five = forest.get(&tree, &5).unwrap();
//! let mut high = forest.split(&mut tree, five, Side::Right).unwrap();
//! assert_eq!(forest.iter(&tree).copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
//! assert_eq!(forest.iter(&high).copied().collect::<Vec<_>>(), [5, 6, 7, 8, 9]);
//!
//! forest.merge(&mut tree, &mut high);
//! assert_eq!(forest.size(&tree), 9);
//!
//! // Trees hand their nodes back to the forest explicitly.
//! assert_eq!(forest.clear(&mut tree), 9);
//! assert!(forest.is_empty());
//! ```

mod arena;
mod augment;
mod compare;
mod error;
mod join;
mod stats;
mod traverse;
mod tree;

pub use arena::{NodeId, Side};
pub use augment::{Augment, HasSize, HasSum, Size, Sum};
pub use compare::{Compare, Natural};
pub use error::{Error, Result};
pub use traverse::{Iter, Traversal, Walk};
pub use tree::{AvlForest, AvlTree, NodeRef};

#[cfg(test)]
mod proptests;
