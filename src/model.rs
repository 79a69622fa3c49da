extern crate std;

use std::{prelude::v1::*, vec::Vec};

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{EditTree, Error};

/// A position argument, resolved against the length of the sequence when the operation runs.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Position {
    /// Wrapped into the valid range of the operation.
    Index(usize),
    /// Used verbatim, so it may be out of range.
    Random(usize),
}

impl Position {
    fn resolve(self, bound: usize) -> usize {
        match self {
            Position::Index(idx) => idx % bound.max(1),
            Position::Random(pos) => pos,
        }
    }
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> Position {
        Position::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0usize..100,
    ) -> Position {
        Position::Random(random)
    }
}

fn position_strategy() -> impl Strategy<Value = Position> {
    proptest::prop_oneof![3 => index_strategy(), 1 => random_strategy()]
}

fn value_strategy() -> impl Strategy<Value = char> {
    proptest::char::range('a', 'z')
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Push(char),
    Insert(Position, char),
    Get(Position),
    GetRange(Position, u8),
    Delete(Position),
    DeleteAndReinsert(Position),
    Snapshot,
}

impl Op {
    fn finalize(self, len: usize) -> FinalOp {
        match self {
            Op::Push(value) => FinalOp::Push(value),
            Op::Insert(pos, value) => FinalOp::Insert(pos.resolve(len + 1), value),
            Op::Get(pos) => FinalOp::Get(pos.resolve(len)),
            Op::GetRange(pos, length) => FinalOp::GetRange(pos.resolve(len + 1), length.into()),
            Op::Delete(pos) => FinalOp::Delete(pos.resolve(len)),
            Op::DeleteAndReinsert(pos) => FinalOp::DeleteAndReinsert(pos.resolve(len)),
            Op::Snapshot => FinalOp::Snapshot,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Push(char),
    Insert(usize, char),
    Get(usize),
    GetRange(usize, usize),
    Delete(usize),
    DeleteAndReinsert(usize),
    Snapshot,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Push),
        (position_strategy(), value_strategy()).prop_map(|(pos, value)| Op::Insert(pos, value)),
        position_strategy().prop_map(Op::Get),
        (position_strategy(), 0u8..16).prop_map(|(pos, length)| Op::GetRange(pos, length)),
        position_strategy().prop_map(Op::Delete),
        position_strategy().prop_map(Op::DeleteAndReinsert),
        Just(Op::Snapshot),
    ]
}

/// Runs `ops` against an initially empty tree and a `Vec<char>`, asserting that both agree after
/// every operation.
pub fn run_vec_equivalence(ops: Vec<Op>) {
    run_build_equivalence(Vec::new(), ops);
}

/// Like [`run_vec_equivalence`], but starts from a tree built from `values`.
pub fn run_build_equivalence(values: Vec<char>, ops: Vec<Op>) {
    let mut tree: EditTree = values.iter().copied().collect();
    let mut vec = values;

    tree.assert_invariants();
    assert_eq!(tree.total_rotations(), 0, "building must not rotate");
    assert!(tree.iter().eq(vec.iter().copied()));

    fn out_of_range(position: usize, len: usize) -> Error {
        Error::OutOfRange { position, len }
    }

    let mut final_ops = Vec::with_capacity(ops.len());
    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(vec.len());
        final_ops.push(final_op);

        let rotations = tree.total_rotations();
        let len = vec.len();

        let rejected = match final_op {
            FinalOp::Push(value) => {
                vec.push(value);
                tree.push(value);
                false
            }

            FinalOp::Insert(pos, value) => {
                let from_vec = if pos <= len {
                    vec.insert(pos, value);
                    Ok(())
                } else {
                    Err(out_of_range(pos, len))
                };
                let from_tree = tree.insert(pos, value);

                assert_eq!(from_vec, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree.is_err()
            }

            FinalOp::Get(pos) => {
                let from_vec = vec.get(pos).copied().ok_or(out_of_range(pos, len));
                let from_tree = tree.get(pos);

                assert_eq!(from_vec, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree.is_err()
            }

            FinalOp::GetRange(pos, length) => {
                let from_vec = match pos.checked_add(length) {
                    Some(end) if end <= len => Ok(vec[pos..end].iter().collect::<String>()),
                    _ => Err(out_of_range(pos.saturating_add(length), len)),
                };
                let from_tree = tree.get_range(pos, length);

                assert_eq!(from_vec, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree.is_err()
            }

            FinalOp::Delete(pos) => {
                let from_vec = if pos < len {
                    Ok(vec.remove(pos))
                } else {
                    Err(out_of_range(pos, len))
                };
                let from_tree = tree.delete(pos);

                assert_eq!(from_vec, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree.is_err()
            }

            FinalOp::DeleteAndReinsert(pos) => match tree.delete(pos) {
                Ok(value) => {
                    assert_eq!(Some(&value), vec.get(pos), "FinalOp #{op_id}: {final_op:?}");
                    tree.assert_invariants();
                    assert_eq!(tree.insert(pos, value), Ok(()));
                    false
                }
                Err(err) => {
                    assert_eq!(err, out_of_range(pos, len), "FinalOp #{op_id}: {final_op:?}");
                    true
                }
            },

            FinalOp::Snapshot => {
                let copy = tree.clone();

                copy.assert_invariants();
                assert_eq!(copy.total_rotations(), 0);
                assert_eq!(copy.to_debug_string(), tree.to_debug_string());
                assert_eq!(copy, tree);
                false
            }
        };

        if rejected {
            assert_eq!(tree.total_rotations(), rotations, "FinalOp #{op_id}: {final_op:?}");
        } else {
            assert!(tree.total_rotations() >= rotations);
        }

        tree.assert_invariants();
        assert_eq!(vec.len(), tree.len());
        assert!(
            tree.iter().eq(vec.iter().copied()),
            "FinalOp #{op_id}: {final_op:?}, ops so far: {final_ops:?}"
        );
    }
}

#[derive(Clone, Debug)]
pub struct BuildEquivalenceInput {
    pub values: Vec<char>,
    pub ops: Vec<Op>,
}

impl<'a> arbitrary::Arbitrary<'a> for BuildEquivalenceInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        fn value(u: &mut arbitrary::Unstructured<'_>) -> char {
            char::arbitrary(u).unwrap_or('a')
        }

        fn op(u: &mut arbitrary::Unstructured<'_>) -> Op {
            Op::arbitrary(u).unwrap_or(Op::Snapshot)
        }

        let num_values = u8::arbitrary(u)? % 100;
        let num_ops = u16::arbitrary(u)? % 1000;

        let values = core::iter::repeat_with(|| value(u))
            .take(num_values.into())
            .collect();

        let ops = core::iter::repeat_with(|| op(u))
            .take(num_ops.into())
            .collect();

        Ok(BuildEquivalenceInput { values, ops })
    }
}
