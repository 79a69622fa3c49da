use alloc::{format, string::String, vec::Vec};

use crate::{
    node::{Balance, Node},
    EditTree,
};

/// Diagnostics that recompute the tree's structure in _O(n)_ time, independently of the ranks and
/// balance codes they verify.
impl EditTree {
    /// Returns the height of the tree computed by a full traversal.
    pub fn slow_height(&self) -> isize {
        slow_height(self.root.as_deref())
    }

    /// Returns the number of nodes in the tree computed by a full traversal.
    pub fn slow_size(&self) -> usize {
        slow_size(self.root.as_deref())
    }

    /// Returns `true` if every node's rank equals the size of its left subtree.
    pub fn ranks_match_left_subtree_size(&self) -> bool {
        sized_ranks(self.root.as_deref()).is_some()
    }

    /// Returns `true` if every node's balance code matches the heights of its subtrees.
    pub fn balance_codes_are_correct(&self) -> bool {
        balanced_height(self.root.as_deref()).is_some()
    }

    /// Returns the characters and ranks of the nodes in pre-order.
    ///
    /// For the tree with root `b` and children `a` and `c`, this is `[b1, a0, c0]`.
    pub fn to_rank_string(&self) -> String {
        let mut entries = Vec::with_capacity(self.len);
        pre_order(self.root.as_deref(), &mut |node| {
            entries.push(format!("{}{}", node.value, node.rank));
        });

        format!("[{}]", entries.join(", "))
    }

    /// Returns the characters, ranks and balance codes of the nodes in pre-order.
    ///
    /// For the tree with root `b` and a left child `a`, this is `[b1/, a0=]`.
    pub fn to_debug_string(&self) -> String {
        let mut entries = Vec::with_capacity(self.len);
        pre_order(self.root.as_deref(), &mut |node| {
            entries.push(format!("{}{}{}", node.value, node.rank, node.balance));
        });

        format!("[{}]", entries.join(", "))
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let (size, height) = assert_invariants_at(self.root.as_deref(), 0);

        assert_eq!(size, self.len, "cached length does not match node count");
        assert_eq!(self.height(), height, "fast height does not match full traversal");
    }
}

fn slow_height(node: Option<&Node>) -> isize {
    node.map_or(-1, |node| {
        slow_height(node.left()).max(slow_height(node.right())) + 1
    })
}

fn slow_size(node: Option<&Node>) -> usize {
    node.map_or(0, |node| slow_size(node.left()) + slow_size(node.right()) + 1)
}

// Returns the size of the subtree, or `None` if any rank within it is wrong.
fn sized_ranks(node: Option<&Node>) -> Option<usize> {
    let Some(node) = node else {
        return Some(0);
    };

    let left = sized_ranks(node.left())?;
    let right = sized_ranks(node.right())?;

    (left == node.rank).then_some(left + right + 1)
}

// Returns the height of the subtree, or `None` if any balance code within it is wrong.
fn balanced_height(node: Option<&Node>) -> Option<isize> {
    let Some(node) = node else {
        return Some(-1);
    };

    let left = balanced_height(node.left())?;
    let right = balanced_height(node.right())?;

    let valid = (left - right).abs() <= 1 && node.balance == Balance::from_heights(left, right);
    valid.then_some(left.max(right) + 1)
}

fn pre_order<'a, F: FnMut(&'a Node)>(node: Option<&'a Node>, visit: &mut F) {
    if let Some(node) = node {
        visit(node);
        pre_order(node.left(), visit);
        pre_order(node.right(), visit);
    }
}

// Returns the size and height of the subtree.
fn assert_invariants_at(node: Option<&Node>, depth: usize) -> (usize, isize) {
    let Some(node) = node else {
        return (0, -1);
    };

    let (left_size, left_height) = assert_invariants_at(node.left(), depth + 1);
    let (right_size, right_height) = assert_invariants_at(node.right(), depth + 1);

    assert_eq!(
        node.rank, left_size,
        "rank of {:?} at depth {depth} does not match its left subtree",
        node.value
    );

    assert!(
        (left_height - right_height).abs() <= 1,
        "{:?} at depth {depth} has subtrees of heights {left_height} and {right_height}",
        node.value
    );

    assert_eq!(
        node.balance,
        Balance::from_heights(left_height, right_height),
        "balance code of {:?} at depth {depth} does not match its subtrees",
        node.value
    );

    (left_size + right_size + 1, left_height.max(right_height) + 1)
}

#[cfg(test)]
mod tests {
    use crate::EditTree;

    #[test]
    fn empty_dumps() {
        let tree = EditTree::new();
        assert_eq!(tree.to_rank_string(), "[]");
        assert_eq!(tree.to_debug_string(), "[]");
        assert_eq!(tree.slow_height(), -1);
        assert_eq!(tree.slow_size(), 0);
        assert!(tree.ranks_match_left_subtree_size());
        assert!(tree.balance_codes_are_correct());
        tree.assert_invariants();
    }

    #[test]
    fn dumps_are_pre_order() {
        let tree = EditTree::from("abc");
        assert_eq!(tree.to_rank_string(), "[b1, a0, c0]");
        assert_eq!(tree.to_debug_string(), "[b1=, a0=, c0=]");

        let tree = EditTree::from("ab");
        assert_eq!(tree.to_debug_string(), "[b1/, a0=]");
    }

    #[test]
    fn validators_catch_corruption() {
        let mut tree = EditTree::from("abcdefg");
        assert!(tree.ranks_match_left_subtree_size());
        assert!(tree.balance_codes_are_correct());

        if let Some(root) = tree.root.as_deref_mut() {
            root.rank += 1;
            root.balance = crate::Balance::Right;
        }

        assert!(!tree.ranks_match_left_subtree_size());
        assert!(!tree.balance_codes_are_correct());
    }

    #[test]
    #[should_panic(expected = "does not match its left subtree")]
    fn assert_invariants_reports_rank() {
        let mut tree = EditTree::from("abc");

        if let Some(root) = tree.root.as_deref_mut() {
            root.rank = 0;
        }

        tree.assert_invariants();
    }
}
