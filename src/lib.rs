//! Ordered dictionaries over integer keys, and a small document registry
//! built on top of them.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are defined recursively
//! using the notion of a `Node`. A `Node` stores one record, keyed by an
//! integer, and has up to two child `Node`s. The invariants every tree in
//! this crate keeps are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have a key less
//!    than its own key.
//! 2. For every `Node`, all the `Node`s in its right subtree have a key
//!    greater than its own key.
//!
//! > Keys are unique: inserting a key that is already present is refused.
//!
//! Searching takes `O(height)`, where `height` is the number of nodes on the
//! longest path from the root to a leaf. The three trees differ only in how
//! they keep that height in check:
//!
//! - [`bst::Tree`] does nothing about it. Sorted input turns it into a list.
//! - [`avl::Tree`] rotates after every insert and delete so that sibling
//!   subtrees never differ in height by more than one.
//! - [`splay::Tree`] moves every accessed key to the root, so recently used
//!   keys are cheap to reach again.
//!
//! [`Dictionary`] is the contract they share and [`AnyTree`] picks one at
//! runtime. [`app::App`] keeps [`Document`]s in one of them, mirrored to a
//! directory of JSON files by [`store::Store`]. [`workload`] times inserts
//! and searches across the three, and [`chart`] draws the results.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod app;
pub mod avl;
pub mod bst;
pub mod chart;
pub mod dictionary;
pub mod document;
pub mod logger;
pub mod record;
pub mod splay;
pub mod store;
pub mod workload;

mod util;

pub use dictionary::{AnyTree, Dictionary, Variant};
pub use document::Document;
pub use record::{Key, Record};
