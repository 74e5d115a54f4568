//! A self-adjusting BST (a splay tree). Every access, whether it's an insert,
//! a search or a delete, ends by rotating the node it touched up to the root.
//! No single operation is guaranteed to be cheap but any sequence of `m`
//! operations costs `O(m lg N)`, and keys that were used recently stay close
//! to the top.
//!
//! Because of this, `search` needs `&mut self`.
//!
//! # Examples
//!
//! ```
//! use univerify::splay::Tree;
//!
//! let mut tree = Tree::new();
//! for key in [10, 20, 30] {
//!     tree.insert((key, "new"));
//!     // Each insert leaves the new key at the root.
//!     assert_eq!(tree.root(), Some(&(key, "new")));
//! }
//!
//! // A successful search brings its key to the root too.
//! assert_eq!(tree.search(10), Some(&(10, "new")));
//! assert_eq!(tree.root(), Some(&(10, "new")));
//!
//! // A miss still restructures the tree.
//! assert_eq!(tree.search(25), None);
//! assert_ne!(tree.root(), Some(&(10, "new")));
//! ```

use std::cmp::Ordering;

use crate::record::{Key, Record};
use crate::util::{self, BinaryNode, InOrder};

type Link<R> = util::Link<Node<R>>;

/// A splay tree over records with integer keys.
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

    /// The record at the root of the tree, if any. This doesn't splay.
    pub fn root(&self) -> Option<&R> {
        self.root.as_ref().map(|root| &root.record)
    }

    /// Iterates over the records in ascending key order. This doesn't splay.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        InOrder::new(self.root.as_deref())
    }
}

impl<R: Record> Tree<R> {
    /// Inserts `record` as the new root. Returns `false` if a record with the
    /// same key is already present; that record is splayed to the root but
    /// otherwise nothing changes.
    pub fn insert(&mut self, record: R) -> bool {
        let key = record.key();
        let Some(mut root) = splay(self.root.take(), key) else {
            self.root = Some(Node::new_boxed(record));
            self.len += 1;
            return true;
        };

        if root.key == key {
            self.root = Some(root);
            return false;
        }

        // The splayed root is the neighbour of `key`. Split it so everything
        // smaller ends up to the left of the new node and everything larger to
        // the right.
        let mut node = Node::new_boxed(record);
        if key < root.key {
            node.left = root.left.take();
            node.right = Some(root);
        } else {
            node.right = root.right.take();
            node.left = Some(root);
        }

        self.root = Some(node);
        self.len += 1;
        true
    }

    /// Splays the tree at `key` and returns the record if it is now at the
    /// root. On a miss the last node visited on the way down is left at the
    /// root instead.
    pub fn search(&mut self, key: Key) -> Option<&R> {
        self.root = splay(self.root.take(), key);
        self.root
            .as_deref()
            .filter(|root| root.key == key)
            .map(|root| &root.record)
    }

    /// Searches for `key` and, if found, applies `payload` to its record.
    pub fn update(&mut self, key: Key, payload: R::Payload) -> Option<&R> {
        self.root = splay(self.root.take(), key);
        let root = self.root.as_deref_mut().filter(|root| root.key == key)?;
        root.record.apply(payload);
        Some(&root.record)
    }

    /// Removes the record stored under `key`. Returns `false` if there was none.
    ///
    /// The key is splayed to the root and the root is dropped. Splaying its
    /// left subtree at the same key then brings that subtree's largest key to
    /// the top; it has no right child so the old right subtree hangs off it.
    pub fn delete(&mut self, key: Key) -> bool {
        let Some(mut root) = splay(self.root.take(), key) else {
            return false;
        };
        if root.key != key {
            self.root = Some(root);
            return false;
        }

        self.root = match root.left.take() {
            None => root.right.take(),
            Some(left) => {
                let right = root.right.take();
                let mut predecessor = splay(Some(left), key);
                if let Some(predecessor) = predecessor.as_mut() {
                    predecessor.right = right;
                }
                predecessor
            }
        };
        self.len -= 1;
        true
    }
}

/// Which grandchild of a node the splay descended into.
#[derive(Clone, Copy, Debug)]
enum Path {
    LeftLeft,
    LeftRight,
    RightLeft,
    RightRight,
}

/// Splays the subtree under `root` at `key`, returning its new root. This is
/// the node holding `key` or, if there is none, the last node visited while
/// looking for it.
///
/// The descent moves two levels at a time. Each grandchild it moves into is
/// detached and splayed first, then reattached, after which two rotations
/// lift it the rest of the way:
///
/// * zig-zig (left-left or right-right): rotate the node, then rotate again.
/// * zig-zag (left-right or right-left): rotate the child the opposite way,
///   then rotate the node.
/// * zig (the key is at a child): a single rotation.
///
/// The pending frames live on a `Vec` rather than the call stack since a
/// splay tree can be as deep as it is long.
fn splay<R>(root: Link<R>, key: Key) -> Link<R> {
    let mut frames: Vec<(Box<Node<R>>, Path)> = Vec::new();
    let mut subtree = root;

    let mut splayed = loop {
        let Some(mut node) = subtree else {
            break None;
        };

        let path = match key.cmp(&node.key) {
            Ordering::Equal => break Some(node),
            Ordering::Less => {
                let Some(left) = node.left.as_mut() else {
                    break Some(node);
                };
                match key.cmp(&left.key) {
                    Ordering::Equal => break Some(rotate_right(node)),
                    Ordering::Less => {
                        subtree = left.left.take();
                        Path::LeftLeft
                    }
                    Ordering::Greater => {
                        subtree = left.right.take();
                        Path::LeftRight
                    }
                }
            }
            Ordering::Greater => {
                let Some(right) = node.right.as_mut() else {
                    break Some(node);
                };
                match key.cmp(&right.key) {
                    Ordering::Equal => break Some(rotate_left(node)),
                    Ordering::Less => {
                        subtree = right.left.take();
                        Path::RightLeft
                    }
                    Ordering::Greater => {
                        subtree = right.right.take();
                        Path::RightRight
                    }
                }
            }
        };
        frames.push((node, path));
    };

    // Rotations are no-ops when the child they'd lift is missing, which is
    // what happens when the grandchild subtree came back empty.
    while let Some((mut node, path)) = frames.pop() {
        splayed = Some(match path {
            Path::LeftLeft => {
                if let Some(left) = node.left.as_mut() {
                    left.left = splayed;
                }
                rotate_right(rotate_right(node))
            }
            Path::LeftRight => {
                if let Some(left) = node.left.as_mut() {
                    left.right = splayed;
                }
                node.left = node.left.take().map(rotate_left);
                rotate_right(node)
            }
            Path::RightLeft => {
                if let Some(right) = node.right.as_mut() {
                    right.left = splayed;
                }
                node.right = node.right.take().map(rotate_right);
                rotate_left(node)
            }
            Path::RightRight => {
                if let Some(right) = node.right.as_mut() {
                    right.right = splayed;
                }
                rotate_left(rotate_left(node))
            }
        });
    }

    splayed
}

/// Lifts the left child of `node` into its place. Returns `node` as is if it
/// has no left child.
fn rotate_right<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    pivot.right = Some(node);
    pivot
}

/// Lifts the right child of `node` into its place. Returns `node` as is if it
/// has no right child.
fn rotate_left<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    pivot.left = Some(node);
    pivot
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
