//! Depth-first traversals driven by an explicit stack.

use crate::arena::{NodeArena, NodeId, Side};
use crate::tree::{AvlForest, AvlTree};

/// Order in which a traversal reports nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    PreOrder,
    InOrder,
    PostOrder,
}

#[derive(Clone, Copy)]
enum Frame {
    Expand(u32),
    Emit(u32),
}

/// Iterator over the nodes of one tree. Yields `(handle, key)` pairs.
pub struct Walk<'a, K, A> {
    nodes: &'a NodeArena<K, A>,
    order: Traversal,
    stack: Vec<Frame>,
}

impl<'a, K, A> Walk<'a, K, A> {
    fn new(nodes: &'a NodeArena<K, A>, root: Option<u32>, order: Traversal) -> Self {
        Self {
            nodes,
            order,
            stack: root.map(Frame::Expand).into_iter().collect(),
        }
    }

    fn push_child(&mut self, index: u32, side: Side) {
        if let Some(c) = self.nodes[index].child(side) {
            self.stack.push(Frame::Expand(c));
        }
    }
}

impl<'a, K, A> Iterator for Walk<'a, K, A> {
    type Item = (NodeId, &'a K);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(frame) = self.stack.pop() {
            let index = match frame {
                Frame::Emit(index) => return Some((nodes.id(index), &nodes[index].key)),
                Frame::Expand(index) => index,
            };
            // Pushed in reverse of the order they should come out.
            match self.order {
                Traversal::PreOrder => {
                    self.push_child(index, Side::Right);
                    self.push_child(index, Side::Left);
                    self.stack.push(Frame::Emit(index));
                }
                Traversal::InOrder => {
                    self.push_child(index, Side::Right);
                    self.stack.push(Frame::Emit(index));
                    self.push_child(index, Side::Left);
                }
                Traversal::PostOrder => {
                    self.stack.push(Frame::Emit(index));
                    self.push_child(index, Side::Right);
                    self.push_child(index, Side::Left);
                }
            }
        }
        None
    }
}

/// In-order iterator over the keys of one tree.
pub struct Iter<'a, K, A> {
    walk: Walk<'a, K, A>,
}

impl<'a, K, A> Iterator for Iter<'a, K, A> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|(_, k)| k)
    }
}

impl<K, A, C> AvlForest<K, A, C> {
    /// Keys of `tree` in ascending order.
    pub fn iter<'a>(&'a self, tree: &AvlTree) -> Iter<'a, K, A> {
        Iter {
            walk: self.walk(tree, Traversal::InOrder),
        }
    }

    pub fn walk<'a>(&'a self, tree: &AvlTree, order: Traversal) -> Walk<'a, K, A> {
        Walk::new(&self.nodes, tree.root, order)
    }

    pub fn visit_in_order(&self, tree: &AvlTree, mut f: impl FnMut(&K)) {
        self.walk(tree, Traversal::InOrder).for_each(|(_, k)| f(k));
    }

    pub fn visit_pre_order(&self, tree: &AvlTree, mut f: impl FnMut(&K)) {
        self.walk(tree, Traversal::PreOrder).for_each(|(_, k)| f(k));
    }

    pub fn visit_post_order(&self, tree: &AvlTree, mut f: impl FnMut(&K)) {
        self.walk(tree, Traversal::PostOrder).for_each(|(_, k)| f(k));
    }
}
