//! Join-based bulk operations: join, merge and split.
//!
//! `join_roots` glues two balanced trees around a bare pivot node by
//! descending the taller tree along its inner spine until the heights are
//! within one, hanging a new subtree there and rebalancing upward. Merge and
//! split are built from it: merge borrows the left tree's maximum as pivot,
//! split folds each ancestor of the split node (with its far subtree) into
//! one of two accumulators.

use std::cmp::Ordering;

use crate::arena::{NodeId, Side};
use crate::augment::Augment;
use crate::compare::Compare;
use crate::error::{Error, Result};
use crate::tree::{AvlForest, AvlTree};

impl<K, A, C> AvlForest<K, A, C>
where
    A: Augment<K>,
    C: Compare<K>,
{
    /// Builds the tree holding `left`, `key` and `right`.
    ///
    /// Every key of `left` must order before `key`, and `key` before every key
    /// of `right`.
    pub fn join(&mut self, mut left: AvlTree, key: K, mut right: AvlTree) -> AvlTree {
        debug_assert!(self
            .max(&left)
            .and_then(|m| self.key(m))
            .map_or(true, |m| self.cmp.less(m, &key)));
        debug_assert!(self
            .min(&right)
            .and_then(|m| self.key(m))
            .map_or(true, |m| self.cmp.less(&key, m)));
        tracing::trace!(
            left_height = self.height(&left),
            right_height = self.height(&right),
            "joining trees"
        );
        let pivot = self.alloc(key);
        AvlTree::from_root(self.join_roots(left.root.take(), pivot, right.root.take()))
    }

    /// Moves every node of `other` into `tree`, leaving `other` empty.
    ///
    /// Every key of `tree` must order before every key of `other`.
    pub fn merge(&mut self, tree: &mut AvlTree, other: &mut AvlTree) {
        debug_assert!(self.ordered_before(tree, other), "merge needs disjoint ascending trees");
        if tree.is_empty() {
            tree.swap(other);
            return;
        }
        if other.is_empty() {
            return;
        }
        tracing::trace!(
            left_height = self.height(tree),
            right_height = self.height(other),
            "merging trees"
        );
        let pivot = self.extract_max(&mut tree.root);
        tree.root = self.join_roots(tree.root, pivot, other.root.take());
    }

    /// Splits `tree` around `node`.
    ///
    /// Keys ordered before `node` stay in `tree`, keys after it move to the
    /// returned tree. `node`'s own key stays in `tree` for `Side::Left` and
    /// moves for `Side::Right`. Fails if `node` is not a live node of `tree`.
    pub fn split(&mut self, tree: &mut AvlTree, node: NodeId, pivot_side: Side) -> Result<AvlTree> {
        let Some(root) = tree.root else {
            return Ok(AvlTree::new());
        };
        let index = self.nodes.resolve(node).ok_or(Error::InvalidHandle)?;

        let mut top = index;
        let mut depth = 0usize;
        while let Some(p) = self.nodes[top].parent {
            top = p;
            depth += 1;
        }
        if top != root {
            return Err(Error::InvalidHandle);
        }
        tracing::trace!(depth, height = self.height(tree), "splitting tree");

        let mut from = self.side_in_parent(index);
        let mut parent = self.nodes[index].parent.take();
        let mut left = self.take_child(index, Side::Left);
        let mut right = self.take_child(index, Side::Right);
        match pivot_side {
            Side::Left => left = self.join_roots(left, index, None),
            Side::Right => right = self.join_roots(None, index, right),
        }

        while let (Some(p), Some(side)) = (parent, from) {
            from = self.side_in_parent(p);
            parent = self.nodes[p].parent.take();
            // The `side` child is the part already distributed.
            self.nodes[p].children[side as usize] = None;
            let far = self.take_child(p, side.opposite());
            match side {
                Side::Left => right = self.join_roots(right, p, far),
                Side::Right => left = self.join_roots(far, p, left),
            }
        }

        tree.root = left;
        Ok(AvlTree::from_root(right))
    }

    /// Moves every key ordered at or after `key` into the returned tree.
    pub fn split_off(&mut self, tree: &mut AvlTree, key: &K) -> AvlTree {
        let Some(at) = self.find(tree, key) else {
            return AvlTree::new();
        };
        let side = match self.key(at).map(|k| self.cmp.compare(key, k)) {
            Some(Ordering::Greater) => Side::Left,
            _ => Side::Right,
        };
        match self.split(tree, at, side) {
            Ok(right) => right,
            Err(_) => unreachable!("search path ends at a live node of the tree"),
        }
    }

    /// Joins two detached trees around the bare node `pivot`, returning the
    /// root of the result. The pivot's stale height and augmentation are
    /// never read; it is refreshed once it has its children.
    pub(crate) fn join_roots(
        &mut self,
        left: Option<u32>,
        pivot: u32,
        right: Option<u32>,
    ) -> Option<u32> {
        let bare = &self.nodes[pivot];
        debug_assert!(bare.children == [None, None] && bare.parent.is_none());
        let (hl, hr) = (self.height_of(left), self.height_of(right));

        if hl.abs_diff(hr) <= 1 {
            self.set_child(pivot, Side::Left, left);
            self.set_child(pivot, Side::Right, right);
            self.update(pivot);
            return Some(pivot);
        }

        // Descend the taller tree on the side facing the shorter one.
        let (tall, short, dir, h_min) = if hl > hr {
            (left, right, Side::Right, hr)
        } else {
            (right, left, Side::Left, hl)
        };
        let mut root = tall;
        let mut at = tall.expect("taller tree is non-empty");
        loop {
            let next = self.child(at, dir);
            let h = self.height_of(next);
            if h == h_min || h == h_min + 1 {
                let (l, r) = match dir {
                    Side::Right => (next, short),
                    Side::Left => (short, next),
                };
                self.set_child(pivot, Side::Left, l);
                self.set_child(pivot, Side::Right, r);
                self.update(pivot);
                self.set_child(at, dir, Some(pivot));
                self.rebalance(&mut root, Some(at));
                return root;
            }
            at = next.expect("spine stays taller than the short tree");
        }
    }

    /// Unlinks the maximum node of a non-empty tree and returns it bare, for
    /// use as a [`join_roots`](Self::join_roots) pivot.
    pub(crate) fn extract_max(&mut self, root: &mut Option<u32>) -> u32 {
        let max = self.extreme(root.expect("extract_max on an empty tree"), Side::Right);
        let parent = self.nodes[max].parent;
        let left = self.take_child(max, Side::Left);
        self.replace(root, max, left);
        self.nodes[max].parent = None;
        self.rebalance(root, parent);
        max
    }

    fn ordered_before(&self, tree: &AvlTree, other: &AvlTree) -> bool {
        match (self.max(tree), self.min(other)) {
            (Some(a), Some(b)) => match (self.key(a), self.key(b)) {
                (Some(a), Some(b)) => self.cmp.less(a, b),
                _ => false,
            },
            _ => true,
        }
    }
}
