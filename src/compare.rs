use std::cmp::Ordering;

/// Total order used to place keys.
///
/// Implemented by [`Natural`] and by any `Fn(&K, &K) -> Ordering`.
pub trait Compare<K> {
    fn compare(&self, a: &K, b: &K) -> Ordering;

    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
