//! The operations every tree in this crate offers, and a way to pick one of
//! them at runtime.
//!
//! # Examples
//!
//! ```
//! use univerify::{AnyTree, Dictionary, Document, Variant};
//!
//! for variant in Variant::ALL {
//!     let mut tree = AnyTree::new(variant);
//!     assert!(tree.insert(Document::new(7, "A7", "pdf")));
//!
//!     let updated = tree.update(7, "verified".to_string()).unwrap();
//!     assert_eq!(updated.status, "verified");
//!
//!     assert!(tree.delete(7));
//!     assert!(tree.search(7).is_none());
//! }
//! ```

use std::fmt;

use clap::ValueEnum;

use crate::record::{Key, Record};
use crate::{avl, bst, splay};

/// An ordered dictionary over records with unique integer keys.
///
/// Each call either completes or leaves the tree as it was: a refused insert
/// or a delete of a missing key doesn't mutate anything observable. Nothing
/// in here logs or does I/O.
pub trait Dictionary<R: Record> {
    /// Adds `record`. Returns `false` if its key is already present.
    fn insert(&mut self, record: R) -> bool;

    /// Looks `key` up. Takes `&mut self` because some trees restructure on
    /// every access.
    fn search(&mut self, key: Key) -> Option<&R>;

    /// Applies `payload` to the record under `key` and returns it.
    fn update(&mut self, key: Key, payload: R::Payload) -> Option<&R>;

    /// Removes the record under `key`. Returns `false` if there was none.
    fn delete(&mut self, key: Key) -> bool;

    /// The record currently at the root.
    fn root(&self) -> Option<&R>;

    /// Number of records stored.
    fn len(&self) -> usize;

    /// Whether no records are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes on the longest root-to-leaf path.
    fn height(&self) -> usize;
}

macro_rules! impl_dictionary {
    ($($tree:ty),* $(,)?) => {$(
        impl<R: Record> Dictionary<R> for $tree {
            fn insert(&mut self, record: R) -> bool {
                <$tree>::insert(self, record)
            }

            fn search(&mut self, key: Key) -> Option<&R> {
                <$tree>::search(self, key)
            }

            fn update(&mut self, key: Key, payload: R::Payload) -> Option<&R> {
                <$tree>::update(self, key, payload)
            }

            fn delete(&mut self, key: Key) -> bool {
                <$tree>::delete(self, key)
            }

            fn root(&self) -> Option<&R> {
                <$tree>::root(self)
            }

            fn len(&self) -> usize {
                <$tree>::len(self)
            }

            fn height(&self) -> usize {
                <$tree>::height(self)
            }
        }
    )*};
}

impl_dictionary!(bst::Tree<R>, avl::Tree<R>, splay::Tree<R>);

/// The kinds of tree on offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Variant {
    /// Unbalanced binary search tree.
    Bst,
    /// Height-balanced AVL tree.
    Avl,
    /// Self-adjusting splay tree.
    Splay,
}

impl Variant {
    /// Every variant, in a fixed order.
    pub const ALL: [Variant; 3] = [Variant::Bst, Variant::Avl, Variant::Splay];

    /// Lower-case name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Bst => "bst",
            Variant::Avl => "avl",
            Variant::Splay => "splay",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three trees, chosen when it's constructed.
pub enum AnyTree<R> {
    /// See [`bst::Tree`].
    Bst(bst::Tree<R>),
    /// See [`avl::Tree`].
    Avl(avl::Tree<R>),
    /// See [`splay::Tree`].
    Splay(splay::Tree<R>),
}

/// Runs the same expression against whichever tree is inside.
macro_rules! each {
    ($self:expr, $tree:ident => $body:expr) => {
        match $self {
            AnyTree::Bst($tree) => $body,
            AnyTree::Avl($tree) => $body,
            AnyTree::Splay($tree) => $body,
        }
    };
}

impl<R> AnyTree<R> {
    /// Creates an empty tree of the given kind.
    pub fn new(variant: Variant) -> Self {
        match variant {
            Variant::Bst => AnyTree::Bst(bst::Tree::new()),
            Variant::Avl => AnyTree::Avl(avl::Tree::new()),
            Variant::Splay => AnyTree::Splay(splay::Tree::new()),
        }
    }

    /// Which kind of tree this is.
    pub fn variant(&self) -> Variant {
        match self {
            AnyTree::Bst(_) => Variant::Bst,
            AnyTree::Avl(_) => Variant::Avl,
            AnyTree::Splay(_) => Variant::Splay,
        }
    }

    /// Iterates over the records in ascending key order without restructuring.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &R> + '_> {
        each!(self, tree => Box::new(tree.iter()))
    }
}

impl<R: Record> Dictionary<R> for AnyTree<R> {
    fn insert(&mut self, record: R) -> bool {
        each!(self, tree => tree.insert(record))
    }

    fn search(&mut self, key: Key) -> Option<&R> {
        each!(self, tree => tree.search(key))
    }

    fn update(&mut self, key: Key, payload: R::Payload) -> Option<&R> {
        each!(self, tree => tree.update(key, payload))
    }

    fn delete(&mut self, key: Key) -> bool {
        each!(self, tree => tree.delete(key))
    }

    fn root(&self) -> Option<&R> {
        each!(self, tree => tree.root())
    }

    fn len(&self) -> usize {
        each!(self, tree => tree.len())
    }

    fn height(&self) -> usize {
        each!(self, tree => tree.height())
    }
}
