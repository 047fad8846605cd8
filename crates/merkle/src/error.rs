/// Failure kinds for the Merkle accumulator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MerkleError {
    /// `build` was called with more leaves than the tree's capacity
    /// (`2^depth`).
    #[error("too many leaves: {got} exceeds capacity {capacity}")]
    TooManyLeaves {
        /// Number of leaves supplied.
        got: usize,
        /// `2^depth` for this tree.
        capacity: usize,
    },
    /// A leaf index fell outside `[0, 2^depth)`.
    #[error("leaf index {index} out of range for depth {depth}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The tree's depth.
        depth: usize,
    },
    /// `append` was called on a tree with no remaining zero-leaf slots.
    #[error("tree is full: capacity {capacity} reached")]
    Full {
        /// `2^depth` for this tree.
        capacity: usize,
    },
}
