//! Slot arena holding the nodes of every tree in a forest.
//!
//! Links between nodes are plain `u32` slot indices. Freed slots go on a free
//! list and are reused; each slot carries a generation that is bumped on
//! free, so an external [`NodeId`] can tell whether it still names the node
//! it was issued for.

use std::ops::{Index, IndexMut};

/// Child direction, also used to say which side of a split a pivot joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Handle to a node, valid until that node is removed from the forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

pub(crate) struct Node<K, A> {
    pub(crate) key: K,
    pub(crate) aug: A,
    /// Leaf = 1; an absent child counts as 0.
    pub(crate) height: u32,
    pub(crate) parent: Option<u32>,
    pub(crate) children: [Option<u32>; 2],
}

impl<K, A> Node<K, A> {
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<u32> {
        self.children[side as usize]
    }
}

struct Slot<K, A> {
    generation: u32,
    node: Option<Node<K, A>>,
}

pub(crate) struct NodeArena<K, A> {
    slots: Vec<Slot<K, A>>,
    free: Vec<u32>,
    live: usize,
}

impl<K, A> NodeArena<K, A> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Slot<K, A>>()
            + self.free.capacity() * std::mem::size_of::<u32>()
    }

    /// Vacant slots are kept so their generations keep stale handles dead.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    /// Stores a detached node (no parent, no children) and returns its slot.
    pub(crate) fn alloc(&mut self, key: K, aug: A) -> u32 {
        let node = Node {
            key,
            aug,
            height: 1,
            parent: None,
            children: [None, None],
        };
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index as usize].node = Some(node);
            return index;
        }
        let index = u32::try_from(self.slots.len()).expect("node arena exceeds u32 slots");
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        index
    }

    pub(crate) fn free(&mut self, index: u32) -> Node<K, A> {
        let slot = &mut self.slots[index as usize];
        let node = slot.node.take().expect("freeing a vacant slot");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
        node
    }

    #[inline]
    pub(crate) fn id(&self, index: u32) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// Maps a handle back to its slot if the node it names is still live.
    #[inline]
    pub(crate) fn resolve(&self, id: NodeId) -> Option<u32> {
        let slot = self.slots.get(id.index as usize)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }
}

impl<K, A> Index<u32> for NodeArena<K, A> {
    type Output = Node<K, A>;

    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        match &self.slots[index as usize].node {
            Some(node) => node,
            None => panic!("link to vacant slot {index}"),
        }
    }
}

impl<K, A> IndexMut<u32> for NodeArena<K, A> {
    #[inline]
    fn index_mut(&mut self, index: u32) -> &mut Self::Output {
        match &mut self.slots[index as usize].node {
            Some(node) => node,
            None => panic!("link to vacant slot {index}"),
        }
    }
}
