use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{node::Node, EditTree};

/// An in-order iterator over the characters of an [`EditTree`].
///
/// Created by [`EditTree::iter`].
pub struct Iter<'tree> {
    // Nodes whose left subtree has been exhausted but which have not been yielded yet. The top of
    // the stack is the next node to yield.
    stack: Vec<&'tree Node>,

    len: usize,
}

impl<'tree> Iter<'tree> {
    pub(crate) fn new(tree: &'tree EditTree) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            len: tree.len(),
        };

        iter.descend(tree.root.as_deref());
        iter
    }

    // Upon entering a new subtree, push the path down to its minimum element.
    fn descend(&mut self, mut opt_cur: Option<&'tree Node>) {
        while let Some(cur) = opt_cur {
            self.stack.push(cur);
            opt_cur = cur.left();
        }
    }
}

impl<'tree> Iterator for Iter<'tree> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.stack.pop()?;

        // The successor is the minimum of the right subtree, if there is one; otherwise it is
        // already on the stack.
        self.descend(cur.right());
        self.len -= 1;

        Some(cur.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::{string::String, vec::Vec};

    use crate::EditTree;

    #[test]
    fn empty() {
        let tree = EditTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().len(), 0);
    }

    #[test]
    fn in_order_after_edits() {
        let mut tree = EditTree::from("hello world");
        tree.delete(5).unwrap();
        tree.insert(5, '_').unwrap();
        tree.push('!');

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 12);
        assert_eq!(iter.next(), Some('h'));
        assert_eq!(iter.len(), 11);

        assert_eq!(iter.collect::<String>(), "ello_world!");
        let mut reversed: Vec<char> = (&tree).into_iter().collect();
        reversed.reverse();
        assert_eq!(reversed.into_iter().collect::<String>(), "!dlrow_olleh");
    }
}
