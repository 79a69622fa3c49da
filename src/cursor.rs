use alloc::vec::Vec;

use crate::{node::Node, Balance};

/// A read-only cursor over the nodes of an [`EditTree`](crate::EditTree).
///
/// A cursor always points to a node. It starts at the root and can move to either child, and back
/// up toward the root along the path it came down. It exposes only structural accessors; the tree
/// cannot be modified through it.
pub struct Cursor<'tree> {
    cur: &'tree Node,

    // Position of the first node of the current subtree within the whole sequence.
    offset: usize,

    // The nodes above `cur`, with their subtree offsets, root first.
    ancestors: Vec<(&'tree Node, usize)>,
}

impl<'tree> Cursor<'tree> {
    pub(crate) fn new(root: &'tree Node) -> Cursor<'tree> {
        Cursor {
            cur: root,
            offset: 0,
            ancestors: Vec::new(),
        }
    }

    /// Returns the character stored in the current node.
    pub fn value(&self) -> char {
        self.cur.value
    }

    /// Returns the rank of the current node: the number of nodes in its left subtree.
    pub fn rank(&self) -> usize {
        self.cur.rank
    }

    /// Returns the balance code of the current node.
    pub fn balance(&self) -> Balance {
        self.cur.balance
    }

    /// Returns the position of the current node within the whole sequence.
    pub fn position(&self) -> usize {
        self.offset + self.cur.rank
    }

    /// Returns the number of edges between the root and the current node.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    pub fn has_left(&self) -> bool {
        self.cur.left().is_some()
    }

    pub fn has_right(&self) -> bool {
        self.cur.right().is_some()
    }

    pub fn has_parent(&self) -> bool {
        !self.ancestors.is_empty()
    }

    /// Moves the cursor to the left child of the current node.
    ///
    /// Returns `false`, leaving the cursor in place, if there is no left child.
    pub fn move_left(&mut self) -> bool {
        let Some(left) = self.cur.left() else {
            return false;
        };

        self.ancestors.push((self.cur, self.offset));
        self.cur = left;
        true
    }

    /// Moves the cursor to the right child of the current node.
    ///
    /// Returns `false`, leaving the cursor in place, if there is no right child.
    pub fn move_right(&mut self) -> bool {
        let Some(right) = self.cur.right() else {
            return false;
        };

        self.ancestors.push((self.cur, self.offset));
        self.offset += self.cur.rank + 1;
        self.cur = right;
        true
    }

    /// Moves the cursor to the parent of the current node.
    ///
    /// Returns `false`, leaving the cursor in place, if the cursor is at the root.
    pub fn move_parent(&mut self) -> bool {
        let Some((parent, offset)) = self.ancestors.pop() else {
            return false;
        };

        self.cur = parent;
        self.offset = offset;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{Balance, EditTree};

    #[test]
    fn empty_tree_has_no_cursor() {
        assert!(EditTree::new().cursor().is_none());
    }

    #[test]
    fn walk_balanced_tree() {
        // d(b(a, c), f(e, -))
        let tree = EditTree::from("abcdef");
        let mut curs = tree.cursor().unwrap();

        assert_eq!(curs.value(), 'd');
        assert_eq!(curs.rank(), 3);
        assert_eq!(curs.position(), 3);
        assert_eq!(curs.balance(), Balance::Same);
        assert!(!curs.has_parent());
        assert!(!curs.move_parent());

        assert!(curs.move_right());
        assert_eq!(curs.value(), 'f');
        assert_eq!(curs.balance(), Balance::Left);
        assert!(!curs.has_right());
        assert!(!curs.move_right());
        assert_eq!(curs.value(), 'f');

        assert!(curs.move_left());
        assert_eq!(curs.value(), 'e');
        assert_eq!(curs.position(), 4);
        assert_eq!(curs.depth(), 2);

        assert!(curs.move_parent());
        assert!(curs.move_parent());
        assert_eq!(curs.value(), 'd');

        assert!(curs.move_left());
        assert!(curs.move_right());
        assert_eq!(curs.value(), 'c');
        assert_eq!(curs.position(), 2);
        assert!(!curs.has_left() && !curs.has_right());
    }

    #[test]
    fn positions_match_in_order() {
        let tree = EditTree::from("the quick brown fox");

        fn visit(curs: &mut crate::Cursor<'_>, tree: &EditTree) {
            assert_eq!(tree.get(curs.position()), Ok(curs.value()));

            if curs.move_left() {
                visit(curs, tree);
                curs.move_parent();
            }

            if curs.move_right() {
                visit(curs, tree);
                curs.move_parent();
            }
        }

        visit(&mut tree.cursor().unwrap(), &tree);
    }
}
