//! A height-balanced binary tree with rank, storing a sequence of characters by position.
//!
//! [`EditTree`] is meant as the backing store of a text editor buffer: every character is a node,
//! and the in-order traversal of the tree is the text. Each node records its rank (the size of its
//! left subtree) and a balance code, so that positional insertion, deletion and lookup complete in
//! _O(log(n))_ time.
//!
//! ```
//! use edit_tree::EditTree;
//!
//! let mut tree = EditTree::from("abc");
//! tree.insert(1, 'x').unwrap();
//! assert_eq!(tree.to_string(), "axbc");
//!
//! assert_eq!(tree.delete(0), Ok('a'));
//! assert_eq!(tree.get_range(1, 2).unwrap(), "bc");
//! assert!(tree.get(3).is_err());
//! ```
#![no_std]

// The fundamental invariants of the tree are:
// 1. The rank of every node equals the number of nodes in its left subtree.
// 2. The heights of the two subtrees of every node differ by at most one, and the node's balance
//    code records which one, if either, is taller.
// 3. The in-order traversal of the tree is the sequence, and `len` is the number of nodes.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

use alloc::{string::String, vec::Vec};
use core::fmt::{self, Write};

use log::trace;

mod cursor;
mod debug;
mod error;
mod iter;
mod node;

#[cfg(any(test, feature = "model"))]
pub mod model;


pub use cursor::Cursor;
pub use error::Error;
pub use iter::Iter;
pub use node::Balance;

use node::{Link, Node};

/// A rank-augmented AVL tree holding a sequence of characters.
///
/// Positions are zero-based. Every positional operation validates its arguments before touching
/// the tree, so an operation that returns an [`Error`] leaves the tree unchanged.
#[derive(Debug, Default)]
pub struct EditTree {
    root: Link,
    len: usize,
    rotations: usize,
}

impl EditTree {
    /// Returns a new empty tree.
    pub const fn new() -> EditTree {
        EditTree {
            root: None,
            len: 0,
            rotations: 0,
        }
    }

    /// Returns `true` if the tree contains no characters.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of characters in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of primitive rotations performed since this tree was created.
    ///
    /// A double rotation counts as two.
    pub const fn total_rotations(&self) -> usize {
        self.rotations
    }

    /// Returns the height of the tree, relying on balance codes.
    ///
    /// The empty tree has height -1 and a single node has height 0. This operation completes in
    /// _O(log(n))_ time.
    pub fn height(&self) -> isize {
        self.root.as_deref().map_or(-1, Node::height)
    }

    /// Appends `value` to the end of the sequence.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn push(&mut self, value: char) {
        self.insert_unchecked(self.len, value);
    }

    /// Inserts `value` so that it ends up at `position`.
    ///
    /// Valid positions range from 0 to [`len()`](EditTree::len), inclusive. This operation
    /// completes in _O(log(n))_ time.
    pub fn insert(&mut self, position: usize, value: char) -> Result<(), Error> {
        if position > self.len {
            return Err(self.out_of_range("insert", position));
        }

        self.insert_unchecked(position, value);
        Ok(())
    }

    fn insert_unchecked(&mut self, position: usize, value: char) {
        let (root, outcome) = Node::insert(self.root.take(), position, value);

        self.root = Some(root);
        self.rotations += outcome.rotations;
        self.len += 1;
    }

    /// Returns the character at `position`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn get(&self, position: usize) -> Result<char, Error> {
        if position >= self.len {
            return Err(self.out_of_range("get", position));
        }

        self.root
            .as_deref()
            .and_then(|root| root.get(position))
            .ok_or(Error::OutOfRange {
                position,
                len: self.len,
            })
    }

    /// Returns the `length` characters starting at `position`.
    ///
    /// `position + length` must not exceed [`len()`](EditTree::len). Only the nodes contributing
    /// to the result are visited, so this completes in _O(log(n) + length)_ time.
    pub fn get_range(&self, position: usize, length: usize) -> Result<String, Error> {
        let end = match position.checked_add(length) {
            Some(end) if end <= self.len => end,
            _ => return Err(self.out_of_range("get_range", position.saturating_add(length))),
        };

        let mut out = String::with_capacity(length);

        if let Some(root) = self.root.as_deref().filter(|_| length > 0) {
            root.collect_range(position, end - 1, &mut out);
        }

        Ok(out)
    }

    /// Removes the character at `position` and returns it.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn delete(&mut self, position: usize) -> Result<char, Error> {
        if position >= self.len {
            return Err(self.out_of_range("delete", position));
        }

        let Some(root) = self.root.take() else {
            unreachable!("tree of length {} has no root", self.len);
        };

        let (root, detached, outcome) = root.detach(position);

        self.root = root;
        self.rotations += outcome.rotations;
        self.len -= 1;

        Ok(detached.value)
    }

    /// Returns an iterator over the characters of the tree, in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Returns a read-only cursor positioned at the root, or `None` if the tree is empty.
    pub fn cursor(&self) -> Option<Cursor<'_>> {
        self.root.as_deref().map(Cursor::new)
    }

    fn out_of_range(&self, operation: &str, position: usize) -> Error {
        log::debug!(
            "rejected {operation} at position {position}: tree holds {} characters",
            self.len
        );

        Error::OutOfRange {
            position,
            len: self.len,
        }
    }
}

/// Copies the tree node by node, keeping its shape. The copy starts with no rotation history.
impl Clone for EditTree {
    fn clone(&self) -> Self {
        EditTree {
            root: self.root.clone(),
            len: self.len,
            rotations: 0,
        }
    }
}

impl From<char> for EditTree {
    fn from(value: char) -> Self {
        EditTree {
            root: Some(Node::leaf(value)),
            len: 1,
            rotations: 0,
        }
    }
}

impl From<&str> for EditTree {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

/// Builds a balanced tree in _O(n)_ time, without rotations.
impl FromIterator<char> for EditTree {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let values: Vec<char> = iter.into_iter().collect();
        let (root, height) = Node::build(&values);

        trace!("built tree of {} characters with height {height}", values.len());

        EditTree {
            root,
            len: values.len(),
            rotations: 0,
        }
    }
}

impl Extend<char> for EditTree {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<'tree> IntoIterator for &'tree EditTree {
    type Item = char;
    type IntoIter = Iter<'tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two trees are equal if they hold the same sequence, whatever their shapes.
impl PartialEq for EditTree {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for EditTree {}

/// Writes the sequence in order.
impl fmt::Display for EditTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|value| f.write_char(value))
    }
}
