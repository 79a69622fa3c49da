/// The error type for positional operations on an [`EditTree`](crate::EditTree).
///
/// Operations that return this error leave the tree unchanged.
#[derive(Copy, Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A position, or the end of a requested range, falls outside the tree.
    #[error("position {position} is out of range for a tree of length {len}")]
    OutOfRange { position: usize, len: usize },
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn display() {
        let err = Error::OutOfRange {
            position: 4,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "position 4 is out of range for a tree of length 3"
        );
    }
}
