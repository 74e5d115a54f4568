//! Plumbing shared by the three tree variants. Everything in here walks the
//! tree with an explicit stack rather than recursion, so it is safe to use on
//! trees that have degenerated into a list.

/// An owned, possibly empty, subtree.
pub(crate) type Link<N> = Option<Box<N>>;

/// What the shared helpers need to know about a node.
pub(crate) trait BinaryNode: Sized {
    type Record;

    fn record(&self) -> &Self::Record;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;
    /// Detaches both children, leaving `self` a leaf.
    fn take_children(&mut self) -> (Link<Self>, Link<Self>);
}

/// In-order traversal yielding records in ascending key order.
pub(crate) struct InOrder<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: BinaryNode> InOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a N>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, N: BinaryNode> Iterator for InOrder<'a, N> {
    type Item = &'a N::Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.record())
    }
}

/// Number of nodes on the longest root-to-leaf path. An empty tree has height 0.
pub(crate) fn height<N: BinaryNode>(root: Option<&N>) -> usize {
    let mut max = 0;
    let mut stack: Vec<(&N, usize)> = root.map(|n| (n, 1)).into_iter().collect();
    while let Some((node, depth)) = stack.pop() {
        max = max.max(depth);
        stack.extend(node.left().map(|n| (n, depth + 1)));
        stack.extend(node.right().map(|n| (n, depth + 1)));
    }
    max
}

/// Frees a subtree one node at a time. The default drop glue for `Box` recurses
/// once per level which overflows the stack on long spines.
pub(crate) fn drop_iteratively<N: BinaryNode>(root: Link<N>) {
    let mut stack: Vec<Box<N>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        let (left, right) = node.take_children();
        stack.extend(left);
        stack.extend(right);
    }
}
