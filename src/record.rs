//! The values stored in the trees.
//!
//! Every tree in this crate is keyed by a plain integer. The thing stored
//! under that key is a [`Record`]: it knows its own key and how to absorb an
//! update to its payload. The key is read once when the record is inserted
//! and is never changed afterwards.

/// The key type shared by every tree variant.
pub type Key = i64;

/// A value with a unique integer key and some mutable payload.
pub trait Record {
    /// The fields that an update replaces.
    type Payload;

    /// The record's key. Must not change while the record is in a tree.
    fn key(&self) -> Key;

    /// Overwrites the payload fields in place. The key is left untouched.
    fn apply(&mut self, payload: Self::Payload);
}

/// A bare key/value pair. Updating it replaces the value.
impl<V> Record for (Key, V) {
    type Payload = V;

    fn key(&self) -> Key {
        self.0
    }

    fn apply(&mut self, payload: V) {
        self.1 = payload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_key() {
        let mut pair: (Key, &str) = (7, "old");
        pair.apply("new");

        assert_eq!(pair.key(), 7);
        assert_eq!(pair, (7, "new"));
    }
}
