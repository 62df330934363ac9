//! Forest of AVL trees sharing one node arena.
//!
//! Every mutation does a local edit and then walks parent links up to the
//! root, recomputing height and augmentation and rotating where the two
//! child heights differ by two.

use std::cmp::Ordering;
use std::fmt;

use crate::arena::{NodeArena, NodeId, Side};
use crate::augment::Augment;
use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};

/// Owns the nodes of any number of [`AvlTree`]s ordered by one comparator.
///
/// Trees of the same forest can be joined, merged and split without moving
/// nodes between allocations. Every `AvlTree` passed to a forest method must
/// have been built by that same forest.
pub struct AvlForest<K, A = (), C = Natural> {
    pub(crate) nodes: NodeArena<K, A>,
    pub(crate) cmp: C,
}

/// Root handle of one tree inside an [`AvlForest`].
///
/// The tree owns its nodes, but the forest holds their storage, so a tree
/// cannot free them on its own. Release a tree with [`AvlForest::clear`]
/// (or hand its nodes to another tree via join/merge) before dropping it.
/// Dropping a tree that still owns nodes trips a debug assertion; in release
/// builds those nodes stay allocated until the forest is dropped.
#[must_use]
#[derive(Debug, Default)]
pub struct AvlTree {
    pub(crate) root: Option<u32>,
}

impl Drop for AvlTree {
    fn drop(&mut self) {
        debug_assert!(
            self.root.is_none() || std::thread::panicking(),
            "AvlTree dropped while it still owns nodes; release it with AvlForest::clear"
        );
    }
}

impl AvlTree {
    pub fn new() -> Self {
        Self { root: None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub(crate) fn from_root(root: Option<u32>) -> Self {
        Self { root }
    }

    /// Swaps the contents of two trees.
    pub fn swap(&mut self, other: &mut AvlTree) {
        std::mem::swap(&mut self.root, &mut other.root);
    }
}

/// Read-only view of a live node.
pub struct NodeRef<'a, K, A> {
    nodes: &'a NodeArena<K, A>,
    index: u32,
}

impl<'a, K, A> NodeRef<'a, K, A> {
    pub fn id(&self) -> NodeId {
        self.nodes.id(self.index)
    }

    pub fn key(&self) -> &'a K {
        &self.nodes[self.index].key
    }

    pub fn augment(&self) -> &'a A {
        &self.nodes[self.index].aug
    }

    pub fn height(&self) -> usize {
        self.nodes[self.index].height as usize
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.nodes[self.index].parent.map(|p| self.nodes.id(p))
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        self.nodes[self.index].child(side).map(|c| self.nodes.id(c))
    }

    pub fn left(&self) -> Option<NodeId> {
        self.child(Side::Left)
    }

    pub fn right(&self) -> Option<NodeId> {
        self.child(Side::Right)
    }
}

impl<K: fmt::Debug, A: fmt::Debug> fmt::Debug for NodeRef<'_, K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("augment", self.augment())
            .field("height", &self.height())
            .finish()
    }
}

impl<K, A, C: Default> AvlForest<K, A, C> {
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            cmp: C::default(),
        }
    }
}

impl<K, A, C: Default> Default for AvlForest<K, A, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, A, C> AvlForest<K, A, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            cmp,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Live nodes across all trees of the forest.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub fn root(&self, tree: &AvlTree) -> Option<NodeId> {
        tree.root.map(|r| self.nodes.id(r))
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self, tree: &AvlTree) -> usize {
        self.height_of(tree.root) as usize
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K, A>> {
        let index = self.nodes.resolve(id)?;
        Some(NodeRef {
            nodes: &self.nodes,
            index,
        })
    }

    pub fn key(&self, id: NodeId) -> Option<&K> {
        let index = self.nodes.resolve(id)?;
        Some(&self.nodes[index].key)
    }

    pub fn min(&self, tree: &AvlTree) -> Option<NodeId> {
        tree.root
            .map(|r| self.nodes.id(self.extreme(r, Side::Left)))
    }

    pub fn max(&self, tree: &AvlTree) -> Option<NodeId> {
        tree.root
            .map(|r| self.nodes.id(self.extreme(r, Side::Right)))
    }

    /// In-order successor; `Ok(None)` when `id` holds the maximum.
    pub fn next(&self, id: NodeId) -> Result<Option<NodeId>> {
        let index = self.nodes.resolve(id).ok_or(Error::InvalidHandle)?;
        Ok(self.step(index, Side::Right).map(|i| self.nodes.id(i)))
    }

    /// In-order predecessor; `Ok(None)` when `id` holds the minimum.
    pub fn prev(&self, id: NodeId) -> Result<Option<NodeId>> {
        let index = self.nodes.resolve(id).ok_or(Error::InvalidHandle)?;
        Ok(self.step(index, Side::Left).map(|i| self.nodes.id(i)))
    }

    /// Frees every node of `tree`, leaving it empty. Returns the number of
    /// nodes released.
    ///
    /// This is the destructor of a tree: freed slots are reused by later
    /// inserts and handles to them go stale.
    pub fn clear(&mut self, tree: &mut AvlTree) -> usize {
        let mut stack: Vec<u32> = tree.root.take().into_iter().collect();
        let mut freed = 0usize;
        while let Some(index) = stack.pop() {
            let node = self.nodes.free(index);
            stack.extend(node.children.into_iter().flatten());
            freed += 1;
        }
        tracing::trace!(freed, "cleared tree");
        freed
    }

    #[inline]
    pub(crate) fn height_of(&self, link: Option<u32>) -> u32 {
        link.map_or(0, |i| self.nodes[i].height)
    }

    #[inline]
    pub(crate) fn child(&self, index: u32, side: Side) -> Option<u32> {
        self.nodes[index].child(side)
    }

    /// Which child of its parent `index` is; `None` for a root.
    pub(crate) fn side_in_parent(&self, index: u32) -> Option<Side> {
        let parent = self.nodes[index].parent?;
        if self.child(parent, Side::Left) == Some(index) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    pub(crate) fn extreme(&self, mut index: u32, side: Side) -> u32 {
        while let Some(c) = self.child(index, side) {
            index = c;
        }
        index
    }

    fn step(&self, index: u32, side: Side) -> Option<u32> {
        if let Some(c) = self.child(index, side) {
            return Some(self.extreme(c, side.opposite()));
        }
        let mut cur = index;
        while let Some(parent) = self.nodes[cur].parent {
            if self.child(parent, side.opposite()) == Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }
        None
    }

    #[inline]
    pub(crate) fn set_child(&mut self, parent: u32, side: Side, child: Option<u32>) {
        self.nodes[parent].children[side as usize] = child;
        if let Some(c) = child {
            self.nodes[c].parent = Some(parent);
        }
    }

    /// Unhooks a child from `parent`, leaving the child a detached root.
    pub(crate) fn take_child(&mut self, parent: u32, side: Side) -> Option<u32> {
        let child = self.nodes[parent].children[side as usize].take();
        if let Some(c) = child {
            self.nodes[c].parent = None;
        }
        child
    }

    /// Puts `new` where `old` hangs (under `old`'s parent, or as `root`).
    pub(crate) fn replace(&mut self, root: &mut Option<u32>, old: u32, new: Option<u32>) {
        let parent = self.nodes[old].parent;
        match (parent, self.side_in_parent(old)) {
            (Some(p), Some(side)) => self.nodes[p].children[side as usize] = new,
            _ => *root = new,
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }
}

impl<K, A, C> AvlForest<K, A, C>
where
    A: Augment<K>,
    C: Compare<K>,
{
    /// Walks the search path for `key`. Returns the node holding an equal key,
    /// or the last node visited, which is where `key` would be attached.
    /// `None` only for an empty tree.
    pub fn find(&self, tree: &AvlTree, key: &K) -> Option<NodeId> {
        self.search(tree.root, key).map(|(i, _)| self.nodes.id(i))
    }

    /// Node holding exactly `key`.
    pub fn get(&self, tree: &AvlTree, key: &K) -> Option<NodeId> {
        match self.search(tree.root, key)? {
            (i, Ordering::Equal) => Some(self.nodes.id(i)),
            _ => None,
        }
    }

    pub fn contains(&self, tree: &AvlTree, key: &K) -> bool {
        matches!(self.search(tree.root, key), Some((_, Ordering::Equal)))
    }

    /// Adds `key`; returns `false` (and changes nothing) if it was present.
    pub fn insert(&mut self, tree: &mut AvlTree, key: K) -> bool {
        let Some((at, ord)) = self.search(tree.root, &key) else {
            tree.root = Some(self.alloc(key));
            return true;
        };
        let side = match ord {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return false,
        };
        let leaf = self.alloc(key);
        self.set_child(at, side, Some(leaf));
        self.rebalance(&mut tree.root, Some(at));
        true
    }

    /// Removes `key`; returns `false` if it was absent.
    pub fn remove(&mut self, tree: &mut AvlTree, key: &K) -> bool {
        self.take(tree, key).is_some()
    }

    /// Removes `key` and hands back the stored key.
    pub fn take(&mut self, tree: &mut AvlTree, key: &K) -> Option<K> {
        let index = match self.search(tree.root, key)? {
            (i, Ordering::Equal) => i,
            _ => return None,
        };
        let root = &mut tree.root;
        let parent = self.nodes[index].parent;
        let left = self.child(index, Side::Left);

        match self.child(index, Side::Right) {
            None => {
                self.replace(root, index, left);
                self.rebalance(root, parent);
            }
            Some(right) => {
                let next = self.extreme(right, Side::Left);
                if next == right {
                    self.replace(root, index, Some(next));
                    self.set_child(next, Side::Left, left);
                    self.rebalance(root, Some(next));
                } else {
                    let next_parent = self.nodes[next].parent.expect("successor below right child");
                    let next_right = self.child(next, Side::Right);
                    self.set_child(next_parent, Side::Left, next_right);
                    self.replace(root, index, Some(next));
                    self.set_child(next, Side::Left, left);
                    self.set_child(next, Side::Right, Some(right));
                    self.rebalance(root, Some(next_parent));
                }
            }
        }
        Some(self.nodes.free(index).key)
    }

    /// Checks order, balance, height, parent links and augmentation of every
    /// node. Returns a description of the first violation found.
    pub fn assert_valid(&self, tree: &AvlTree) -> std::result::Result<(), String>
    where
        A: PartialEq,
    {
        let Some(root) = tree.root else {
            return Ok(());
        };
        if self.nodes[root].parent.is_some() {
            return Err(format!("root {root} has a parent"));
        }

        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            for c in node.children.into_iter().flatten() {
                if self.nodes[c].parent != Some(i) {
                    return Err(format!("child {c} does not point back to parent {i}"));
                }
                stack.push(c);
            }
            let [l, r] = node.children;
            let (hl, hr) = (self.height_of(l), self.height_of(r));
            if node.height != 1 + hl.max(hr) {
                return Err(format!(
                    "node {i}: height {} but children have {hl} and {hr}",
                    node.height
                ));
            }
            if hl.abs_diff(hr) > 1 {
                return Err(format!("node {i}: unbalanced children {hl} vs {hr}"));
            }
            let expected = A::compute(
                &node.key,
                l.map(|l| &self.nodes[l].aug),
                r.map(|r| &self.nodes[r].aug),
            );
            if expected != node.aug {
                return Err(format!("node {i}: stale augmentation"));
            }
        }

        let mut prev: Option<&K> = None;
        for key in self.iter(tree) {
            if let Some(p) = prev {
                if !self.cmp.less(p, key) {
                    return Err("in-order keys are not strictly ascending".to_string());
                }
            }
            prev = Some(key);
        }
        Ok(())
    }

    pub(crate) fn alloc(&mut self, key: K) -> u32 {
        let aug = A::compute(&key, None, None);
        self.nodes.alloc(key, aug)
    }

    /// Recomputes height and augmentation of one node from its children.
    pub(crate) fn update(&mut self, index: u32) {
        let node = &self.nodes[index];
        let [l, r] = node.children;
        let height = 1 + self.height_of(l).max(self.height_of(r));
        let aug = A::compute(
            &node.key,
            l.map(|l| &self.nodes[l].aug),
            r.map(|r| &self.nodes[r].aug),
        );
        let node = &mut self.nodes[index];
        node.height = height;
        node.aug = aug;
    }

    fn search(&self, root: Option<u32>, key: &K) -> Option<(u32, Ordering)> {
        let mut cur = root?;
        loop {
            let ord = self.cmp.compare(key, &self.nodes[cur].key);
            let side = match ord {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Some((cur, ord)),
            };
            match self.child(cur, side) {
                Some(c) => cur = c,
                None => return Some((cur, ord)),
            }
        }
    }

    /// Lifts the `side` child of `top` into its place. Returns the new subtree
    /// root.
    fn rotate(&mut self, root: &mut Option<u32>, top: u32, side: Side) -> u32 {
        let up = self.child(top, side).expect("rotation needs a child on the lifted side");
        let inner = self.child(up, side.opposite());
        self.replace(root, top, Some(up));
        self.set_child(top, side, inner);
        self.set_child(up, side.opposite(), Some(top));
        self.update(top);
        self.update(up);
        up
    }

    /// `side` is the taller side of `top`, two levels above the other.
    fn restore(&mut self, root: &mut Option<u32>, top: u32, side: Side) -> u32 {
        let tall = self.child(top, side).expect("taller side is non-empty");
        let outer = self.height_of(self.child(tall, side));
        let inner = self.height_of(self.child(tall, side.opposite()));
        if outer < inner {
            self.rotate(root, tall, side.opposite());
        }
        self.rotate(root, top, side)
    }

    /// Walks from `start` to the root, refreshing every node and rotating
    /// where the balance is off by two.
    pub(crate) fn rebalance(&mut self, root: &mut Option<u32>, start: Option<u32>) {
        let mut cur = start;
        while let Some(index) = cur {
            let hl = self.height_of(self.child(index, Side::Left));
            let hr = self.height_of(self.child(index, Side::Right));
            debug_assert!(hl.abs_diff(hr) <= 2, "imbalance beyond a single edit");
            let top = if hl > hr + 1 {
                self.restore(root, index, Side::Left)
            } else if hr > hl + 1 {
                self.restore(root, index, Side::Right)
            } else {
                self.update(index);
                index
            };
            cur = self.nodes[top].parent;
        }
    }
}
