//! A plain, unbalanced BST. Nothing is ever rotated so the shape of the tree
//! is decided entirely by insertion order: inserting keys in ascending order
//! gives a tree that is really a linked list. Every walk here is a loop rather
//! than a recursive call so that such a tree doesn't blow the stack.
//!
//! # Examples
//!
//! ```
//! use univerify::bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.search(1), None);
//!
//! assert!(tree.insert((1, "pending")));
//! assert_eq!(tree.search(1), Some(&(1, "pending")));
//!
//! // Keys are unique. A second insert is refused and changes nothing.
//! assert!(!tree.insert((1, "new")));
//! assert_eq!(tree.search(1), Some(&(1, "pending")));
//!
//! // Updates happen in place.
//! assert_eq!(tree.update(1, "verified"), Some(&(1, "verified")));
//!
//! assert!(tree.delete(1));
//! assert!(!tree.delete(1));
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;

use crate::record::{Key, Record};
use crate::util::{self, BinaryNode, InOrder};

type Link<R> = util::Link<Node<R>>;

/// An unbalanced Binary Search Tree over records with integer keys.
pub struct Tree<R> {
    root: Link<R>,
    len: usize,
}

impl<R> Default for Tree<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Drop for Tree<R> {
    fn drop(&mut self) {
        util::drop_iteratively(self.root.take());
    }
}

impl<R> Tree<R> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        util::height(self.root.as_deref())
    }

    /// The record at the root of the tree, if any.
    pub fn root(&self) -> Option<&R> {
        self.root.as_ref().map(|root| &root.record)
    }

    /// Iterates over the records in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        InOrder::new(self.root.as_deref())
    }
}

impl<R: Record> Tree<R> {
    /// Attaches `record` as a new leaf. Returns `false`, leaving the tree
    /// untouched, if a record with the same key is already present.
    pub fn insert(&mut self, record: R) -> bool {
        let link = seek(&mut self.root, record.key());
        if link.is_some() {
            return false;
        }

        *link = Some(Node::new_boxed(record));
        self.len += 1;
        true
    }

    /// Finds the record stored under `key`.
    pub fn search(&self, key: Key) -> Option<&R> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match key.cmp(&n.key) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Equal => return Some(&n.record),
                Ordering::Greater => n.right.as_deref(),
            };
        }
        None
    }

    /// Applies `payload` to the record stored under `key` and returns the
    /// updated record.
    pub fn update(&mut self, key: Key, payload: R::Payload) -> Option<&R> {
        let node = seek(&mut self.root, key).as_deref_mut()?;
        node.record.apply(payload);
        Some(&node.record)
    }

    /// Removes the record stored under `key`. Returns `false` if there was none.
    ///
    /// A node with two children isn't unlinked itself. Instead it takes over the
    /// record of its in-order successor (the smallest key in its right subtree)
    /// and the successor's node, which has no left child, is unlinked.
    pub fn delete(&mut self, key: Key) -> bool {
        let link = seek(&mut self.root, key);
        let Some(mut node) = link.take() else {
            return false;
        };

        *link = match (node.left.take(), node.right.take()) {
            (None, right) => right,
            (left, None) => left,
            (left, mut right) => {
                if let Some(successor) = take_min(&mut right) {
                    let Node { key, record, .. } = *successor;
                    node.key = key;
                    node.record = record;
                }
                node.left = left;
                node.right = right;
                Some(node)
            }
        };
        self.len -= 1;
        true
    }
}

/// Walks down from `link` to the link that holds `key`, or to the empty link
/// where `key` would be attached.
fn seek<R>(mut link: &mut Link<R>, key: Key) -> &mut Link<R> {
    loop {
        match link.as_deref().map(|node| key.cmp(&node.key)) {
            None | Some(Ordering::Equal) => return link,
            Some(ordering) => {
                if let Some(node) = link {
                    link = match ordering {
                        Ordering::Less => &mut node.left,
                        _ => &mut node.right,
                    };
                }
            }
        }
    }
}

/// Unlinks the node with the smallest key under `link`, splicing its right
/// child into its place.
fn take_min<R>(mut link: &mut Link<R>) -> Option<Box<Node<R>>> {
    while link.as_ref().map_or(false, |node| node.left.is_some()) {
        if let Some(node) = link {
            link = &mut node.left;
        }
    }

    let mut min = link.take()?;
    *link = min.right.take();
    Some(min)
}

struct Node<R> {
    key: Key,
    record: R,
    left: Link<R>,
    right: Link<R>,
}

impl<R: Record> Node<R> {
    fn new_boxed(record: R) -> Box<Self> {
        Box::new(Self {
            key: record.key(),
            record,
            left: None,
            right: None,
        })
    }
}

impl<R> BinaryNode for Node<R> {
    type Record = R;

    fn record(&self) -> &R {
        &self.record
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn take_children(&mut self) -> (Link<R>, Link<R>) {
        (self.left.take(), self.right.take())
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::HashMap;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a hashmap, checking every
    /// answer the tree gives against the map as we go.
    fn do_ops(ops: &[Op<i8, i8>], bst: &mut Tree<(Key, i8)>, map: &mut HashMap<Key, i8>) {
        for op in ops {
            match *op {
                Op::Insert(k, v) => {
                    let k = Key::from(k);
                    let fresh = !map.contains_key(&k);
                    assert_eq!(bst.insert((k, v)), fresh);
                    map.entry(k).or_insert(v);
                }
                Op::Update(k, v) => {
                    let k = Key::from(k);
                    let expected = map.get_mut(&k).map(|old| {
                        *old = v;
                        (k, v)
                    });
                    assert_eq!(bst.update(k, v).copied(), expected);
                }
                Op::Remove(k) => {
                    let k = Key::from(k);
                    assert_eq!(bst.delete(k), map.remove(&k).is_some());
                }
                Op::Search(k) => {
                    let k = Key::from(k);
                    assert_eq!(bst.search(k).map(|r| r.1), map.get(&k).copied());
                }
            }
            assert_eq!(bst.len(), map.len());
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = Tree::new();
            let mut map = HashMap::new();

            do_ops(&ops, &mut tree, &mut map);
            map.iter().all(|(key, value)| tree.search(*key) == Some(&(*key, *value)))
        }
    }

    quickcheck::quickcheck! {
        fn in_order_is_strictly_increasing(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = Tree::new();
            let mut map = HashMap::new();

            do_ops(&ops, &mut tree, &mut map);
            let keys: Vec<Key> = tree.iter().map(|r| r.0).collect();
            keys.windows(2).all(|w| w[0] < w[1]) && keys.len() == map.len()
        }
    }
}
