use super::*;

use proptest::prelude::*;
use proptest::sample::Index;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

type Forest = AvlForest<i32, (Size, Sum<i64>)>;

fn validate_tree(f: &Forest, t: &AvlTree, model: &BTreeSet<i32>) {
    f.assert_valid(t).unwrap();

    let got: Vec<i32> = f.iter(t).copied().collect();
    let expected: Vec<i32> = model.iter().copied().collect();
    assert_eq!(got, expected);
    assert_eq!(f.size(t), model.len());

    let sum: i64 = model.iter().map(|&k| i64::from(k)).sum();
    let root_sum = f.root(t).and_then(|r| f.node(r)).map_or(0, |n| n.augment().1 .0);
    assert_eq!(root_sum, sum, "root sum must match a full rescan");

    let n = model.len() as f64;
    assert!(
        f.height(t) as f64 <= 1.45 * (n + 2.0).log2(),
        "height {} too large for {} nodes",
        f.height(t),
        model.len()
    );
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 6)]
    Insert(#[proptest(strategy = "-300i32..300")] i32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "-300i32..300")] i32),
    SplitAt(Index, bool),
    SplitOff(#[proptest(strategy = "-320i32..320")] i32),
    Query(
        #[proptest(strategy = "-320i32..320")] i32,
        #[proptest(strategy = "-320i32..320")] i32,
        Index,
    ),
}

fn side_of(goes_left: bool) -> Side {
    if goes_left {
        Side::Left
    } else {
        Side::Right
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut f = Forest::new();
        let mut t = AvlTree::new();
        let mut m: BTreeSet<i32> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    prop_assert_eq!(f.insert(&mut t, k), m.insert(k));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(f.remove(&mut t, &k), m.remove(&k));
                }
                Op::SplitAt(index, goes_left) => {
                    if m.is_empty() {
                        continue;
                    }
                    let i = index.index(m.len());
                    let node = f.nth_smallest(&t, i).unwrap();
                    let pivot = *f.key(node).unwrap();
                    let mut right = f.split(&mut t, node, side_of(goes_left)).unwrap();

                    let (lo, hi): (BTreeSet<i32>, BTreeSet<i32>) = m
                        .iter()
                        .partition(|&&k| k < pivot || (goes_left && k == pivot));
                    validate_tree(&f, &t, &lo);
                    validate_tree(&f, &right, &hi);

                    f.merge(&mut t, &mut right);
                    prop_assert!(right.is_empty());
                }
                Op::SplitOff(k) => {
                    let mut right = f.split_off(&mut t, &k);
                    let hi = m.split_off(&k);
                    validate_tree(&f, &t, &m);
                    validate_tree(&f, &right, &hi);
                    f.merge(&mut t, &mut right);
                    m.extend(hi);
                }
                Op::Query(a, b, index) => {
                    let expected: i64 = m.range(a..=b.max(a)).map(|&k| i64::from(k)).sum();
                    let expected = if a <= b { expected } else { 0 };
                    prop_assert_eq!(f.range_sum::<i64>(&t, &a, &b), expected);
                    prop_assert_eq!(f.rank(&t, &a), m.range(..a).count());
                    if !m.is_empty() {
                        let i = index.index(m.len());
                        let node = f.nth_smallest(&t, i).unwrap();
                        prop_assert_eq!(f.key(node), m.iter().nth(i));
                    }
                }
            }
            validate_tree(&f, &t, &m);
        }

        prop_assert_eq!(f.len(), m.len());
        f.clear(&mut t);
    }

    #[test]
    fn prop_split_merge_round_trip(
        keys in prop::collection::btree_set(-10_000i32..10_000, 1..300),
        at in any::<Index>(),
    ) {
        let mut f = Forest::new();
        let mut t = AvlTree::new();
        // Interleave both ends so the shape differs from an ascending build.
        let sorted: Vec<i32> = keys.iter().copied().collect();
        let (a, b) = sorted.split_at(sorted.len() / 2);
        for (x, y) in a.iter().zip(b.iter().rev()) {
            f.insert(&mut t, *y);
            f.insert(&mut t, *x);
        }
        for k in &sorted {
            f.insert(&mut t, *k);
        }
        validate_tree(&f, &t, &keys);

        let p = f.nth_smallest(&t, at.index(keys.len())).unwrap();
        let key = *f.key(p).unwrap();
        let mut right = f.split(&mut t, p, Side::Right).unwrap();
        prop_assert_eq!(f.take(&mut right, &key), Some(key));

        let mut single = AvlTree::new();
        f.insert(&mut single, key);
        f.merge(&mut t, &mut single);
        f.merge(&mut t, &mut right);
        validate_tree(&f, &t, &keys);
        prop_assert_eq!(f.clear(&mut t), keys.len());
    }

    #[test]
    fn prop_join_matches_union(
        left in prop::collection::btree_set(-5_000i32..0, 0..200),
        right in prop::collection::btree_set(1i32..5_000, 0..200),
    ) {
        let mut f = Forest::new();
        let mut lt = AvlTree::new();
        let mut rt = AvlTree::new();
        for &k in &left {
            f.insert(&mut lt, k);
        }
        for &k in &right {
            f.insert(&mut rt, k);
        }
        let mut t = f.join(lt, 0, rt);

        let mut all = left;
        all.insert(0);
        all.extend(right);
        validate_tree(&f, &t, &all);
        f.clear(&mut t);
    }
}

#[test]
fn exhaustive_delete_from_every_small_tree() {
    for n in 1..=32 {
        for victim in 0..n {
            let mut f = Forest::new();
            let mut t = AvlTree::new();
            let mut m = BTreeSet::new();
            for k in (0..n).rev() {
                f.insert(&mut t, k);
                m.insert(k);
            }
            assert!(f.remove(&mut t, &victim));
            m.remove(&victim);
            validate_tree(&f, &t, &m);
            f.clear(&mut t);
        }
    }
}
