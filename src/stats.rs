//! Queries answered from augmentation alone: order statistics over [`Size`]
//! and range sums over [`Sum`].
//!
//! [`Size`]: crate::Size
//! [`Sum`]: crate::Sum

use std::cmp::Ordering;
use std::ops::Add;

use crate::arena::{NodeId, Side};
use crate::augment::{Augment, HasSize, HasSum};
use crate::compare::Compare;
use crate::error::{Error, Result};
use crate::tree::{AvlForest, AvlTree};

impl<K, A, C> AvlForest<K, A, C>
where
    A: Augment<K> + HasSize,
    C: Compare<K>,
{
    /// Number of keys in `tree`, read from the root's augmentation.
    pub fn size(&self, tree: &AvlTree) -> usize {
        self.size_of(tree.root)
    }

    /// Node holding the `index`-th smallest key (0-based).
    pub fn nth_smallest(&self, tree: &AvlTree, index: usize) -> Result<NodeId> {
        let size = self.size(tree);
        let out_of_range = Error::OutOfRange { index, size };
        let mut cur = match tree.root {
            Some(root) if index < size => root,
            _ => return Err(out_of_range),
        };
        let mut i = index;
        loop {
            let left = self.child(cur, Side::Left);
            let ls = self.size_of(left);
            let next = match i.cmp(&ls) {
                Ordering::Less => left,
                Ordering::Equal => return Ok(self.nodes.id(cur)),
                Ordering::Greater => {
                    i -= ls + 1;
                    self.child(cur, Side::Right)
                }
            };
            cur = next.ok_or(out_of_range)?;
        }
    }

    /// Number of keys ordered strictly before `key`.
    pub fn rank(&self, tree: &AvlTree, key: &K) -> usize {
        let mut rank = 0;
        let mut cur = tree.root;
        while let Some(i) = cur {
            let node = &self.nodes[i];
            if self.cmp.less(&node.key, key) {
                rank += self.size_of(node.child(Side::Left)) + 1;
                cur = node.child(Side::Right);
            } else {
                cur = node.child(Side::Left);
            }
        }
        rank
    }

    #[inline]
    fn size_of(&self, link: Option<u32>) -> usize {
        link.map_or(0, |i| self.nodes[i].aug.size())
    }
}

impl<K, A, C> AvlForest<K, A, C>
where
    K: Clone,
    A: Augment<K>,
    C: Compare<K>,
{
    /// Sum of the keys `k` with `lo <= k <= hi`; `S::default()` for an empty
    /// range or tree.
    pub fn range_sum<S>(&self, tree: &AvlTree, lo: &K, hi: &K) -> S
    where
        A: HasSum<S>,
        S: From<K> + Add<Output = S> + Clone + Default,
    {
        let Some(root) = tree.root else {
            return S::default();
        };
        if self.cmp.less(hi, lo) {
            return S::default();
        }
        let floor = &self.nodes[self.extreme(root, Side::Left)].key;
        let ceil = &self.nodes[self.extreme(root, Side::Right)].key;
        self.range_sum_at(root, floor, ceil, lo, hi)
    }

    /// Every key under `index` lies in `[floor, ceil]`.
    fn range_sum_at<S>(&self, index: u32, floor: &K, ceil: &K, lo: &K, hi: &K) -> S
    where
        A: HasSum<S>,
        S: From<K> + Add<Output = S> + Clone + Default,
    {
        let node = &self.nodes[index];
        if !self.cmp.less(floor, lo) && !self.cmp.less(hi, ceil) {
            return node.aug.sum().clone();
        }

        let key = &node.key;
        let mut total = S::default();
        if !self.cmp.less(key, lo) && !self.cmp.less(hi, key) {
            total = total + S::from(key.clone());
        }
        if let Some(l) = node.child(Side::Left) {
            if self.cmp.less(lo, key) && !self.cmp.less(hi, floor) {
                total = total + self.range_sum_at(l, floor, key, lo, hi);
            }
        }
        if let Some(r) = node.child(Side::Right) {
            if self.cmp.less(key, hi) && !self.cmp.less(ceil, lo) {
                total = total + self.range_sum_at(r, key, ceil, lo, hi);
            }
        }
        total
    }
}
