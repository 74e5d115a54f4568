use univerify::{AnyTree, Dictionary, Key, Variant};

use std::collections::{HashMap, HashSet};

use crate::Op;

type Tree = AnyTree<(Key, i8)>;

/// Applies a set of operations to a tree and a hashmap.
/// Returns `false` as soon as the tree answers differently from the map.
fn do_ops(ops: &[Op<i8, i8>], tree: &mut Tree, map: &mut HashMap<Key, i8>) -> bool {
    for op in ops {
        let agrees = match *op {
            Op::Insert(k, v) => {
                let k = Key::from(k);
                let fresh = !map.contains_key(&k);
                map.entry(k).or_insert(v);
                tree.insert((k, v)) == fresh
            }
            Op::Update(k, v) => {
                let k = Key::from(k);
                let expected = map.get_mut(&k).map(|old| {
                    *old = v;
                    (k, v)
                });
                tree.update(k, v).copied() == expected
            }
            Op::Remove(k) => {
                let k = Key::from(k);
                tree.delete(k) == map.remove(&k).is_some()
            }
            Op::Search(k) => {
                let k = Key::from(k);
                tree.search(k).map(|r| r.1) == map.get(&k).copied()
            }
        };
        if !agrees || tree.len() != map.len() {
            return false;
        }
    }

    true
}

fn build(variant: Variant, xs: &[i8]) -> Tree {
    let mut tree = AnyTree::new(variant);
    for x in xs {
        tree.insert((Key::from(*x), *x));
    }

    tree
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
        Variant::ALL.into_iter().all(|variant| {
            let mut tree = AnyTree::new(variant);
            let mut map = HashMap::new();

            do_ops(&ops, &mut tree, &mut map)
                && map.iter().all(|(k, v)| tree.search(*k) == Some(&(*k, *v)))
        })
    }

    fn iteration_is_sorted_and_unique(ops: Vec<Op<i8, i8>>) -> bool {
        Variant::ALL.into_iter().all(|variant| {
            let mut tree = AnyTree::new(variant);
            let mut map = HashMap::new();
            do_ops(&ops, &mut tree, &mut map);

            let keys: Vec<Key> = tree.iter().map(|r| r.0).collect();
            let mut expected: Vec<Key> = map.keys().copied().collect();
            expected.sort_unstable();

            keys == expected
        })
    }

    fn contains(xs: Vec<i8>) -> bool {
        Variant::ALL.into_iter().all(|variant| {
            let mut tree = build(variant, &xs);
            xs.iter().all(|x| tree.search(Key::from(*x)) == Some(&(Key::from(*x), *x)))
        })
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let added: HashSet<_> = xs.iter().copied().collect();
        let nots: HashSet<_> = nots.into_iter().collect();

        Variant::ALL.into_iter().all(|variant| {
            let mut tree = build(variant, &xs);
            nots.difference(&added).all(|x| tree.search(Key::from(*x)).is_none())
        })
    }

    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut still_present = xs.clone();
        for delete in &deletes {
            // We may have inserted the same value multiple times - delete each one.
            while let Some(pos) = still_present.iter().position(|x| x == delete) {
                still_present.swap_remove(pos);
            }
        }

        Variant::ALL.into_iter().all(|variant| {
            let mut tree = build(variant, &xs);
            for delete in &deletes {
                tree.delete(Key::from(*delete));
            }

            deletes.iter().all(|x| tree.search(Key::from(*x)).is_none())
                && still_present.iter().all(|x| tree.search(Key::from(*x)).is_some())
        })
    }

    fn refused_insert_keeps_first_record(xs: Vec<i8>) -> bool {
        Variant::ALL.into_iter().all(|variant| {
            let mut tree = build(variant, &xs);
            xs.iter().all(|x| {
                let k = Key::from(*x);
                !tree.insert((k, x.wrapping_add(1))) && tree.search(k) == Some(&(k, *x))
            })
        })
    }

    fn avl_height_is_logarithmic(xs: Vec<i16>) -> bool {
        let mut tree = AnyTree::new(Variant::Avl);
        for x in &xs {
            tree.insert((Key::from(*x), 0i8));
        }

        let bound = 1.44 * ((tree.len() + 2) as f64).log2();
        tree.height() as f64 <= bound
    }

    fn splay_brings_hits_to_root(xs: Vec<i8>, lookups: Vec<i8>) -> bool {
        let mut tree = build(Variant::Splay, &xs);
        lookups.iter().all(|p| {
            let k = Key::from(*p);
            let hit = tree.search(k).is_some();
            !hit || tree.root().map(|r| r.0) == Some(k)
        })
    }
}
