// Conventions used in comments:
// - `h(x)` is the height of the subtree rooted at `x`. An empty subtree has height -1.
// - The rank of a node is the number of nodes in its left subtree.
// - A node tilts toward its taller side. In a valid tree no node tilts by more than one level.
//
// Every recursive mutation returns the new subtree root together with an `Outcome`, which records
// whether the height of that subtree changed and how many primitive rotations were performed
// below it. Ancestors only rebalance while `height_changed` is set.

use alloc::{boxed::Box, string::String};
use core::{cmp::Ordering, fmt, ops::Not};

use log::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// The balance code of a node: which of its subtrees, if any, is taller.
///
/// Displayed as `/`, `=` and `\` respectively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Balance {
    Left,
    Same,
    Right,
}

impl Balance {
    #[inline]
    pub(crate) fn toward(dir: Dir) -> Balance {
        match dir {
            Dir::Left => Balance::Left,
            Dir::Right => Balance::Right,
        }
    }

    #[inline]
    pub(crate) fn tilt(self) -> Option<Dir> {
        match self {
            Balance::Left => Some(Dir::Left),
            Balance::Same => None,
            Balance::Right => Some(Dir::Right),
        }
    }

    pub(crate) fn from_heights(left: isize, right: isize) -> Balance {
        match left.cmp(&right) {
            Ordering::Greater => Balance::Left,
            Ordering::Equal => Balance::Same,
            Ordering::Less => Balance::Right,
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Balance::Left => "/",
            Balance::Same => "=",
            Balance::Right => "\\",
        })
    }
}

pub(crate) type Link = Option<Box<Node>>;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) value: char,
    pub(crate) children: [Link; 2],
    pub(crate) rank: usize,
    pub(crate) balance: Balance,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Outcome {
    /// The subtree grew (insertion) or shrank (deletion) by one level.
    pub(crate) height_changed: bool,
    pub(crate) rotations: usize,
}

impl Outcome {
    const fn changed(rotations: usize) -> Outcome {
        Outcome {
            height_changed: true,
            rotations,
        }
    }

    const fn settled(rotations: usize) -> Outcome {
        Outcome {
            height_changed: false,
            rotations,
        }
    }
}

impl Node {
    pub(crate) fn leaf(value: char) -> Box<Node> {
        Box::new(Node {
            value,
            children: [None, None],
            rank: 0,
            balance: Balance::Same,
        })
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Option<&Node> {
        self.children[dir as usize].as_deref()
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<&Node> {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<&Node> {
        self.child(Dir::Right)
    }

    #[inline]
    fn take_child(&mut self, dir: Dir) -> Link {
        self.children[dir as usize].take()
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link) {
        self.children[dir as usize] = child;
    }

    // The empty subtree counts as balanced.
    #[inline]
    fn child_balance(&self, dir: Dir) -> Balance {
        self.child(dir).map_or(Balance::Same, |child| child.balance)
    }

    #[inline]
    fn set_child_balance(&mut self, dir: Dir, balance: Balance) {
        if let Some(child) = self.children[dir as usize].as_deref_mut() {
            child.balance = balance;
        }
    }

    /// Builds a balanced subtree holding `values` in order and returns it with its height.
    ///
    /// This completes in _O(n)_ time and performs no rotations.
    pub(crate) fn build(values: &[char]) -> (Link, isize) {
        if values.is_empty() {
            return (None, -1);
        }

        let mid = values.len() / 2;
        let (left, left_height) = Node::build(&values[..mid]);
        let (right, right_height) = Node::build(&values[mid + 1..]);

        let node = Box::new(Node {
            value: values[mid],
            children: [left, right],
            rank: mid,
            balance: Balance::from_heights(left_height, right_height),
        });

        (Some(node), left_height.max(right_height) + 1)
    }

    /// Returns the height of this subtree by following balance codes toward the taller side.
    ///
    /// This completes in _O(log(n))_ time.
    pub(crate) fn height(&self) -> isize {
        let mut height = 0;
        let mut cur = self;

        loop {
            let next = match cur.balance {
                Balance::Right => cur.right(),
                Balance::Left | Balance::Same => cur.left(),
            };

            match next {
                Some(next) => {
                    height += 1;
                    cur = next;
                }
                None => return height,
            }
        }
    }

    /// Returns the value at `position` within this subtree.
    pub(crate) fn get(&self, mut position: usize) -> Option<char> {
        let mut cur = self;

        loop {
            match position.cmp(&cur.rank) {
                Ordering::Less => cur = cur.left()?,
                Ordering::Equal => return Some(cur.value),
                Ordering::Greater => {
                    position -= cur.rank + 1;
                    cur = cur.right()?;
                }
            }
        }
    }

    /// Appends the values at positions `first..=last` of this subtree to `out`.
    ///
    /// Only nodes intersecting the interval are visited.
    pub(crate) fn collect_range(&self, first: usize, last: usize, out: &mut String) {
        if first < self.rank {
            if let Some(left) = self.left() {
                left.collect_range(first, last.min(self.rank - 1), out);
            }
        }

        if first <= self.rank && self.rank <= last {
            out.push(self.value);
        }

        if last > self.rank {
            if let Some(right) = self.right() {
                let offset = self.rank + 1;
                right.collect_range(first.saturating_sub(offset), last - offset, out);
            }
        }
    }

    /// Inserts `value` at `position` of the subtree `link`, which may be empty.
    ///
    /// `position` must be at most the size of the subtree.
    pub(crate) fn insert(link: Link, position: usize, value: char) -> (Box<Node>, Outcome) {
        let Some(mut node) = link else {
            return (Node::leaf(value), Outcome::changed(0));
        };

        let (dir, position) = if position <= node.rank {
            // The new node joins the left subtree.
            node.rank += 1;
            (Dir::Left, position)
        } else {
            (Dir::Right, position - node.rank - 1)
        };

        let (child, outcome) = Node::insert(node.take_child(dir), position, value);
        node.set_child(dir, Some(child));

        if !outcome.height_changed {
            return (node, outcome);
        }

        node.grew(dir, outcome.rotations)
    }

    // Rebalances after the `dir` subtree grew by one level.
    fn grew(mut self: Box<Self>, dir: Dir, rotations: usize) -> (Box<Node>, Outcome) {
        match self.balance.tilt() {
            None => {
                self.balance = Balance::toward(dir);
                (self, Outcome::changed(rotations))
            }

            Some(tilt) if tilt != dir => {
                self.balance = Balance::Same;
                (self, Outcome::settled(rotations))
            }

            // h(child) == h(sibling) + 2. Either rotation restores the height the subtree had
            // before the insertion, so propagation always stops here.
            Some(_) => {
                if self.child_balance(dir) == Balance::toward(dir) {
                    self.balance = Balance::Same;
                    self.set_child_balance(dir, Balance::Same);
                    (self.rotate(dir), Outcome::settled(rotations + 1))
                } else {
                    (self.rotate_twice(dir), Outcome::settled(rotations + 2))
                }
            }
        }
    }

    /// Detaches the node at `position` of this subtree.
    ///
    /// Returns the new subtree root, the detached node (with no children) and the outcome.
    /// `position` must be less than the size of the subtree.
    pub(crate) fn detach(mut self: Box<Self>, position: usize) -> (Link, Box<Node>, Outcome) {
        let (dir, position) = match position.cmp(&self.rank) {
            Ordering::Less => {
                // The detached node leaves the left subtree.
                self.rank -= 1;
                (Dir::Left, position)
            }
            Ordering::Equal => return self.detach_root(),
            Ordering::Greater => (Dir::Right, position - self.rank - 1),
        };

        let Some(child) = self.take_child(dir) else {
            unreachable!("position {position} lies outside the subtree");
        };

        let (child, detached, outcome) = child.detach(position);
        self.set_child(dir, child);

        if !outcome.height_changed {
            return (Some(self), detached, outcome);
        }

        let (root, outcome) = self.shrank(dir, outcome.rotations);
        (Some(root), detached, outcome)
    }

    fn detach_root(mut self: Box<Self>) -> (Link, Box<Node>, Outcome) {
        match (self.take_child(Dir::Left), self.take_child(Dir::Right)) {
            (None, child) | (child, None) => (child, self, Outcome::changed(0)),

            (Some(left), Some(right)) => {
                // The successor is the minimum of the right subtree. It has no left child, so
                // detaching it falls into the arm above, and it then takes this node's place.
                let (right, mut successor, outcome) = right.detach(0);

                successor.set_child(Dir::Left, Some(left));
                successor.set_child(Dir::Right, right);
                successor.rank = self.rank;
                successor.balance = self.balance;

                self.rank = 0;
                self.balance = Balance::Same;

                if !outcome.height_changed {
                    return (Some(successor), self, outcome);
                }

                let (root, outcome) = successor.shrank(Dir::Right, outcome.rotations);
                (Some(root), self, outcome)
            }
        }
    }

    // Rebalances after the `dir` subtree shrank by one level.
    fn shrank(mut self: Box<Self>, dir: Dir, rotations: usize) -> (Box<Node>, Outcome) {
        let heavy = !dir;

        match self.balance.tilt() {
            // The taller side shrank, so this subtree shrank too.
            Some(tilt) if tilt == dir => {
                self.balance = Balance::Same;
                (self, Outcome::changed(rotations))
            }

            // The other side still holds the height.
            None => {
                self.balance = Balance::toward(heavy);
                (self, Outcome::settled(rotations))
            }

            // h(sibling) == h(shrunk) + 2.
            Some(_) => match self.child_balance(heavy).tilt() {
                // The sibling's outer subtree is the tallest. After rotating, both nodes are
                // balanced and the subtree is one level shorter.
                Some(tilt) if tilt == heavy => {
                    self.balance = Balance::Same;
                    self.set_child_balance(heavy, Balance::Same);
                    (self.rotate(heavy), Outcome::changed(rotations + 1))
                }

                // Both of the sibling's subtrees are tallest. This node keeps its tilt, the
                // sibling tilts back toward it, and the height is unchanged.
                None => {
                    self.set_child_balance(heavy, Balance::toward(dir));
                    (self.rotate(heavy), Outcome::settled(rotations + 1))
                }

                // The sibling's inner subtree is the tallest.
                Some(_) => (self.rotate_twice(heavy), Outcome::changed(rotations + 2)),
            },
        }
    }

    // Performs a single rotation, moving the `up` child of this node up and this node down.
    //
    // Ranks are updated. Balance codes are not.
    fn rotate(mut self: Box<Self>, up: Dir) -> Box<Node> {
        let Some(mut child) = self.take_child(up) else {
            unreachable!("rotation requires a child on the {up:?} side");
        };

        trace!("rotating {:?} up over {:?}", child.value, self.value);

        // The inner subtree of `child` crosses over to this node.
        self.set_child(up, child.take_child(!up));

        match up {
            Dir::Left => self.rank -= child.rank + 1,
            Dir::Right => child.rank += self.rank + 1,
        }

        child.set_child(!up, Some(self));
        child
    }

    // Performs a double rotation, lifting the inner grandchild on the `heavy` side into this
    // node's place.
    //
    // Balance codes of the three nodes involved are recomputed from the grandchild's code.
    fn rotate_twice(mut self: Box<Self>, heavy: Dir) -> Box<Node> {
        let Some(mut child) = self.take_child(heavy) else {
            unreachable!("double rotation requires a child on the {heavy:?} side");
        };

        // The grandchild's `heavy` subtree ends up under `self`, its other subtree under `child`.
        let (outer, near) = match child.child_balance(!heavy).tilt() {
            None => (Balance::Same, Balance::Same),
            Some(tilt) if tilt == heavy => (Balance::toward(!heavy), Balance::Same),
            Some(_) => (Balance::Same, Balance::toward(heavy)),
        };

        self.balance = outer;
        child.balance = near;

        self.set_child(heavy, Some(child.rotate(!heavy)));

        let mut root = self.rotate(heavy);
        root.balance = Balance::Same;
        root
    }
}
