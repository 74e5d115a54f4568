use quickcheck::{Arbitrary, Gen};

mod dictionary;

/// An enum for the various kinds of "things" to do to
/// a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<K, V> {
    /// Insert a record with key K and payload V
    Insert(K, V),
    /// Replace the payload of the record at K
    Update(K, V),
    /// Remove the K from the data structure
    Remove(K),
    /// Look the K up
    Search(K),
}

impl<K, V> Arbitrary for Op<K, V>
where
    K: Arbitrary,
    V: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1, 2, 3]).unwrap() {
            0 => Op::Insert(K::arbitrary(g), V::arbitrary(g)),
            1 => Op::Update(K::arbitrary(g), V::arbitrary(g)),
            2 => Op::Remove(K::arbitrary(g)),
            3 => Op::Search(K::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}
