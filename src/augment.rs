//! Per-node aggregate state.
//!
//! Every node stores an augmentation value derived from its own key and the
//! augmentation values of its two children. The tree recomputes it bottom-up
//! after every structural change, so an ancestor always reads fresh child
//! values. Queries that only need aggregates ([`Size`] for order statistics,
//! [`Sum`] for range sums) are built on top without touching balancing.

use std::ops::Add;

/// Recomputes a node's aggregate from its key and its children's aggregates.
///
/// `compute` must depend only on its arguments; the tree calls it for a new
/// leaf (both children `None`) and again whenever the node's subtree shape
/// changes.
pub trait Augment<K>: Sized {
    fn compute(key: &K, left: Option<&Self>, right: Option<&Self>) -> Self;
}

impl<K> Augment<K> for () {
    #[inline]
    fn compute(_: &K, _: Option<&Self>, _: Option<&Self>) -> Self {}
}

impl<K, A, B> Augment<K> for (A, B)
where
    A: Augment<K>,
    B: Augment<K>,
{
    fn compute(key: &K, left: Option<&Self>, right: Option<&Self>) -> Self {
        (
            A::compute(key, left.map(|l| &l.0), right.map(|r| &r.0)),
            B::compute(key, left.map(|l| &l.1), right.map(|r| &r.1)),
        )
    }
}

/// Number of nodes in the subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size(pub usize);

impl<K> Augment<K> for Size {
    #[inline]
    fn compute(_: &K, left: Option<&Self>, right: Option<&Self>) -> Self {
        Size(1 + left.map_or(0, |l| l.0) + right.map_or(0, |r| r.0))
    }
}

/// Sum of the keys in the subtree, accumulated in `S`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sum<S>(pub S);

impl<K, S> Augment<K> for Sum<S>
where
    K: Clone,
    S: From<K> + Add<Output = S> + Clone,
{
    fn compute(key: &K, left: Option<&Self>, right: Option<&Self>) -> Self {
        let mut sum = S::from(key.clone());
        if let Some(l) = left {
            sum = sum + l.0.clone();
        }
        if let Some(r) = right {
            sum = sum + r.0.clone();
        }
        Sum(sum)
    }
}

/// Augmentations that know their subtree size.
pub trait HasSize {
    fn size(&self) -> usize;
}

impl HasSize for Size {
    #[inline]
    fn size(&self) -> usize {
        self.0
    }
}

impl<S> HasSize for (Size, Sum<S>) {
    #[inline]
    fn size(&self) -> usize {
        self.0 .0
    }
}

impl<S> HasSize for (Sum<S>, Size) {
    #[inline]
    fn size(&self) -> usize {
        self.1 .0
    }
}

/// Augmentations that know the sum of their subtree's keys.
pub trait HasSum<S> {
    fn sum(&self) -> &S;
}

impl<S> HasSum<S> for Sum<S> {
    #[inline]
    fn sum(&self) -> &S {
        &self.0
    }
}

impl<S> HasSum<S> for (Size, Sum<S>) {
    #[inline]
    fn sum(&self) -> &S {
        &self.1 .0
    }
}

impl<S> HasSum<S> for (Sum<S>, Size) {
    #[inline]
    fn sum(&self) -> &S {
        &self.0 .0
    }
}
