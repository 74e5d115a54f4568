//! A self-balancing BST (specifically, an AVL tree). After every insert or
//! delete the nodes on the path back up to the root have their heights fixed
//! and, where the two subtrees differ in height by more than one, are rotated
//! back into shape. The height of the whole tree therefore stays within about
//! `1.44 * lg N`, so the recursion below never goes deep.
//!
//! Structural changes are passed back up as return values: each recursive call
//! takes ownership of a subtree and hands back its (possibly new) root.
//!
//! # Examples
//!
//! ```
//! use univerify::avl::Tree;
//!
//! let mut tree = Tree::new();
//! for key in 1..=7 {
//!     tree.insert((key, key * 10));
//! }
//!
//! // Ascending inserts don't produce a list here.
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.root(), Some(&(4, 40)));
//!
//! assert_eq!(tree.search(6), Some(&(6, 60)));
//! assert!(tree.delete(6));
//! assert_eq!(tree.search(6), None);
//! ```

use crate::record::{Key, Record};
use crate::util::{self, BinaryNode, InOrder};

type Link<R> = util::Link<Node<R>>;

/// A height-balanced Binary Search Tree over records with integer keys.
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

    /// Number of nodes on the longest path from the root to a leaf. This is
    /// cached on the root so it's `O(1)`.
    pub fn height(&self) -> usize {
        height(&self.root)
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
    /// Inserts `record` and rebalances. Returns `false`, leaving the tree
    /// untouched, if a record with the same key is already present.
    pub fn insert(&mut self, record: R) -> bool {
        if self.search(record.key()).is_some() {
            return false;
        }

        self.root = Some(insert(self.root.take(), record));
        self.len += 1;
        true
    }

    /// Finds the record stored under `key`.
    pub fn search(&self, key: Key) -> Option<&R> {
        self.find(key).map(|node| &node.record)
    }

    /// Applies `payload` to the record stored under `key` and returns the
    /// updated record. The shape of the tree doesn't change.
    pub fn update(&mut self, key: Key, payload: R::Payload) -> Option<&R> {
        let mut node = self.root.as_deref_mut();
        while let Some(n) = node {
            if key == n.key {
                n.record.apply(payload);
                return Some(&n.record);
            }
            node = if key < n.key {
                n.left.as_deref_mut()
            } else {
                n.right.as_deref_mut()
            };
        }
        None
    }

    /// Removes the record stored under `key` and rebalances. Returns `false`
    /// if there was none.
    pub fn delete(&mut self, key: Key) -> bool {
        if self.find(key).is_none() {
            return false;
        }

        self.root = delete(self.root.take(), key);
        self.len -= 1;
        true
    }

    fn find(&self, key: Key) -> Option<&Node<R>> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            if key == n.key {
                return Some(n);
            }
            node = if key < n.key {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
        }
        None
    }
}

fn height<R>(link: &Link<R>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// Inserts `record` under `link`, which must not already hold its key, and
/// returns the new root of the subtree.
fn insert<R: Record>(link: Link<R>, record: R) -> Box<Node<R>> {
    let Some(mut node) = link else {
        return Node::new_boxed(record);
    };

    let key = record.key();
    if key < node.key {
        node.left = Some(insert(node.left.take(), record));
    } else {
        node.right = Some(insert(node.right.take(), record));
    }

    node.fix_height();
    rebalance_after_insert(node, key)
}

/// Restores the AVL invariant at `node` after `key` was inserted below it.
/// Which rotation is needed depends on which grandchild subtree the new key
/// went into.
///
/// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
fn rebalance_after_insert<R>(mut node: Box<Node<R>>, key: Key) -> Box<Node<R>> {
    let balance = node.balance_factor();
    if balance > 1 {
        // Left-Right: straighten the kink first.
        if node.left.as_ref().is_some_and(|left| key > left.key) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        // Right-Left
        if node.right.as_ref().is_some_and(|right| key < right.key) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

/// Removes `key` from under `link` and returns the new root of the subtree.
fn delete<R>(link: Link<R>, key: Key) -> Link<R> {
    let mut node = link?;

    if key < node.key {
        node.left = delete(node.left.take(), key);
    } else if key > node.key {
        node.right = delete(node.right.take(), key);
    } else {
        match (node.left.take(), node.right.take()) {
            (None, right) => return right,
            (left, None) => return left,
            (left, Some(right)) => {
                // Two children: take over the successor's record and unlink
                // the successor's node from the right subtree instead.
                let (successor, right) = take_min(right);
                let Node { key, record, .. } = *successor;
                node.key = key;
                node.record = record;
                node.left = left;
                node.right = right;
            }
        }
    }

    Some(rebalance(node))
}

/// Detaches the smallest node under `node`, rebalancing on the way back up.
/// Returns the detached node and what's left of the subtree.
fn take_min<R>(mut node: Box<Node<R>>) -> (Box<Node<R>>, Link<R>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = take_min(left);
            node.left = rest;
            (min, Some(rebalance(node)))
        }
    }
}

/// Restores the AVL invariant at `node` after something below it was removed.
/// The removed key is gone so the direction of the fix is chosen from the
/// balance of the taller child instead.
fn rebalance<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    node.fix_height();

    let balance = node.balance_factor();
    if balance > 1 {
        if node.left.as_ref().map_or(0, |left| left.balance_factor()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if node.right.as_ref().map_or(0, |right| right.balance_factor()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

/// Rotates `node` to the right, lifting its left child into its place.
/// Returns `node` as is if it has no left child.
///
/// ```text
///        node              pivot
///       /    \            /     \
///    pivot    z  --->    x      node
///    /   \                     /    \
///   x     y                   y      z
/// ```
fn rotate_right<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };

    node.left = pivot.right.take();
    node.fix_height();

    pivot.right = Some(node);
    pivot.fix_height();
    pivot
}

/// Mirror image of [`rotate_right`].
fn rotate_left<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };

    node.right = pivot.left.take();
    node.fix_height();

    pivot.left = Some(node);
    pivot.fix_height();
    pivot
}

struct Node<R> {
    key: Key,
    record: R,
    left: Link<R>,
    right: Link<R>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<R: Record> Node<R> {
    fn new_boxed(record: R) -> Box<Self> {
        Box::new(Self {
            key: record.key(),
            record,
            left: None,
            right: None,
            height: 1,
        })
    }
}

impl<R> Node<R> {
    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// Height of the left subtree minus height of the right subtree.
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
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
impl<R> Tree<R> {
    /// Panics unless every node is ordered, has a correct cached height and
    /// is balanced.
    fn assert_invariants(&self) {
        fn check<R>(link: &Link<R>, lower: Option<Key>, upper: Option<Key>) -> usize {
            let Some(node) = link else {
                return 0;
            };
            assert!(lower.map_or(true, |lower| lower < node.key));
            assert!(upper.map_or(true, |upper| node.key < upper));

            let left = check(&node.left, lower, Some(node.key));
            let right = check(&node.right, Some(node.key), upper);
            assert_eq!(node.height, left.max(right) + 1);
            assert!(left.abs_diff(right) <= 1, "unbalanced at {}", node.key);
            node.height
        }

        check(&self.root, None, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[Key]) -> Tree<(Key, Key)> {
        let mut tree = Tree::new();
        for &key in keys {
            assert!(tree.insert((key, key * 2)));
            tree.assert_invariants();
        }
        tree
    }

    /// Assert the key at the root and the keys of its two children.
    macro_rules! assert_shape {
        ($link:expr, $key:expr, $left:expr, $right:expr) => {{
            let node = $link.as_ref().expect("missing node");
            assert_eq!(node.key, $key);
            assert_eq!(node.left.as_ref().map(|n| n.key), $left);
            assert_eq!(node.right.as_ref().map(|n| n.key), $right);
        }};
    }

    /// Assert the heights of the root, left child, and right child of a tree.
    macro_rules! assert_heights {
        ($tree:ident, $height:expr, $left_height:expr, $right_height:expr) => {{
            match &$tree.root {
                Some(n) => {
                    assert_eq!(n.height, $height);
                    assert_eq!(height(&n.left), $left_height);
                    assert_eq!(height(&n.right), $right_height);
                }
                None => assert_eq!(0, $height),
            }
        }};
    }

    #[test]
    fn no_rotation_while_balanced() {
        // Inserting 20 only takes 50's balance to +1, so nothing rotates.
        let tree = tree_of(&[50, 30, 70, 20, 40]);

        assert_shape!(tree.root, 50, Some(30), Some(70));
        assert_shape!(tree.root.as_ref().unwrap().left, 30, Some(20), Some(40));
        assert_heights!(tree, 3, 2, 1);
    }

    #[test]
    fn left_left_rotates_right() {
        // 10 makes 50 left-heavy by two via its left child's left subtree.
        let tree = tree_of(&[50, 30, 70, 20, 40, 10]);

        assert_shape!(tree.root, 30, Some(20), Some(50));
        let root = tree.root.as_ref().unwrap();
        assert_shape!(root.left, 20, Some(10), None);
        assert_shape!(root.right, 50, Some(40), Some(70));
        assert_heights!(tree, 3, 2, 2);
    }

    #[test]
    fn right_right_rotates_left() {
        let tree = tree_of(&[1, 2, 3]);

        assert_shape!(tree.root, 2, Some(1), Some(3));
        assert_heights!(tree, 2, 1, 1);
    }

    #[test]
    fn test_left_right_rebalance() {
        let tree = tree_of(&[0, -2, -1]);

        assert_shape!(tree.root, -1, Some(-2), Some(0));
        assert_heights!(tree, 2, 1, 1);
    }

    #[test]
    fn test_right_left_rebalance() {
        let tree = tree_of(&[0, 2, 1]);

        assert_shape!(tree.root, 1, Some(0), Some(2));
        assert_heights!(tree, 2, 1, 1);
    }

    #[test]
    fn always_adding_left() {
        let keys: Vec<Key> = (1..=10).rev().collect();
        let tree = tree_of(&keys);

        for key in keys {
            assert_eq!(tree.search(key), Some(&(key, key * 2)));
        }
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn always_adding_right() {
        let keys: Vec<Key> = (1..=10).collect();
        let tree = tree_of(&keys);

        for key in keys {
            assert_eq!(tree.search(key), Some(&(key, key * 2)));
        }
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn delete_rebalances_using_child_balance() {
        // Removing 8 leaves 5 left-heavy by two with a left child of balance
        // zero. No key points the way so the child's balance picks a single
        // right rotation.
        let mut tree = tree_of(&[5, 3, 8, 2, 4]);
        assert!(tree.delete(8));
        tree.assert_invariants();
        assert_shape!(tree.root, 3, Some(2), Some(5));
        assert_shape!(tree.root.as_ref().unwrap().right, 5, Some(4), None);

        let mut tree = tree_of(&[3, 2, 4, 1]);
        assert!(tree.delete(4));
        tree.assert_invariants();
        assert_shape!(tree.root, 2, Some(1), Some(3));
    }

    #[test]
    fn delete_left_right_case() {
        // After removing 4, 3 is left-heavy and its left child leans right.
        let mut tree = tree_of(&[3, 1, 4, 2]);
        assert!(tree.delete(4));

        tree.assert_invariants();
        assert_shape!(tree.root, 2, Some(1), Some(3));
    }

    #[test]
    fn delete_two_children_promotes_successor() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);

        assert!(tree.delete(4));
        tree.assert_invariants();
        assert_shape!(tree.root, 5, Some(2), Some(6));
        assert_eq!(tree.root(), Some(&(5, 10)));
        assert_eq!(tree.search(4), None);
    }

    #[test]
    fn delete_missing_leaves_tree_alone() {
        let mut tree = tree_of(&[2, 1, 3]);

        assert!(!tree.delete(9));
        assert_eq!(tree.len(), 3);
        assert_shape!(tree.root, 2, Some(1), Some(3));
    }

    #[test]
    fn duplicate_insert_is_refused() {
        let mut tree = tree_of(&[2, 1, 3]);

        assert!(!tree.insert((1, 0)));
        assert_eq!(tree.search(1), Some(&(1, 2)));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn update_in_place() {
        let mut tree = tree_of(&[2, 1, 3]);

        assert_eq!(tree.update(1, 100), Some(&(1, 100)));
        assert_eq!(tree.update(5, 100), None);
        assert_shape!(tree.root, 2, Some(1), Some(3));
    }

    #[test]
    fn test_height() {
        let mut tree = Tree::new();
        assert_eq!(tree.height(), 0);

        tree.insert((1, 1));
        assert_heights!(tree, 1, 0, 0);

        // Insert a value to the right making it taller.
        tree.insert((2, 2));
        assert_heights!(tree, 2, 0, 1);

        // Insert a value to the left not changing the overall height.
        tree.insert((0, 0));
        assert_heights!(tree, 2, 1, 1);

        // Delete that left value to get to the previous heights.
        tree.delete(0);
        assert_heights!(tree, 2, 0, 1);

        // Put it back and delete the root. Its successor takes its place.
        tree.insert((0, 0));
        tree.delete(1);
        assert_heights!(tree, 2, 1, 0);
    }

    #[test]
    fn quickcheck_found_invalid_height_after_deletion() {
        let mut tree = Tree::new();

        for key in [77, -22, 0, -127, 5, 109, -58, -105, -65, -86, 45, -11, -39] {
            tree.insert((key, key));
            tree.assert_invariants();
        }
        assert!(tree.delete(0));
        tree.assert_invariants();
        assert!(!tree.delete(-122));
        tree.assert_invariants();
    }

    #[test]
    fn height_stays_logarithmic() {
        let n = 100_000;
        let mut tree = Tree::new();
        for key in 0..n {
            tree.insert((key, ()));
        }

        let bound = 1.44 * ((n + 2) as f64).log2();
        assert!((tree.height() as f64) <= bound);
        tree.assert_invariants();
    }
}
