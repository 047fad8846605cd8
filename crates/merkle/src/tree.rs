use std::collections::HashMap;

use poseidon::{poseidon2, Fq};

use crate::error::MerkleError;

/// Depth the circuit is compiled for. Trees built at any other depth
/// produce proofs the circuit cannot consume, but the type itself is
/// depth-generic so tests can exercise small trees cheaply.
pub const CIRCUIT_DEPTH: usize = 20;

/// A Merkle inclusion proof: the leaf, its sibling path, the direction
/// bits, and the root it was generated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// The leaf value this proof attests membership for.
    pub leaf: Fq,
    /// Sibling hashes from the leaf level up to (not including) the root.
    pub path_elements: Vec<Fq>,
    /// Direction bit per level: `false` means the sibling is to the right
    /// (current node is the left child); `true` means the sibling is to
    /// the left.
    pub path_indices: Vec<bool>,
    /// The root this proof was generated against.
    pub root: Fq,
}

/// An append-only, fixed-depth Merkle accumulator over [`poseidon2`].
///
/// Unused leaves are [`Fq::zero`]. Internal nodes are only materialized
/// where an actual leaf has been written beneath them; everywhere else the
/// precomputed all-zero subtree hash for that level is used, so the tree's
/// memory footprint tracks the number of leaves written, not `2^depth`.
pub struct MerkleTree {
    depth: usize,
    zero_hashes: Vec<Fq>,
    nodes: Vec<HashMap<usize, Fq>>,
    next_index: usize,
}

impl MerkleTree {
    /// Builds an empty tree of the given depth, precomputing the all-zero
    /// subtree hash at every level.
    pub fn new(depth: usize) -> Self {
        let mut zero_hashes = Vec::with_capacity(depth.saturating_add(1));
        zero_hashes.push(Fq::zero());
        for level in 0..depth {
            let prev = zero_hashes[level];
            zero_hashes.push(poseidon2(prev, prev));
        }
        MerkleTree {
            depth,
            zero_hashes,
            nodes: vec![HashMap::new(); depth.saturating_add(1)],
            next_index: 0,
        }
    }

    /// Builds a tree of the given depth from a full leaf sequence, in
    /// order, starting at index 0.
    pub fn build(depth: usize, leaves: &[Fq]) -> Result<Self, MerkleError> {
        let capacity = 1usize
            .checked_shl(u32::try_from(depth).unwrap_or(u32::MAX))
            .unwrap_or(usize::MAX);
        if leaves.len() > capacity {
            return Err(MerkleError::TooManyLeaves {
                got: leaves.len(),
                capacity,
            });
        }
        let mut tree = MerkleTree::new(depth);
        for (index, leaf) in leaves.iter().enumerate() {
            tree.nodes[0].insert(index, *leaf);
        }
        for index in 0..leaves.len() {
            tree.recompute_ancestors(index);
        }
        tree.next_index = leaves.len();
        Ok(tree)
    }

    /// This tree's depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `2^depth`.
    pub fn capacity(&self) -> usize {
        1usize
            .checked_shl(u32::try_from(self.depth).unwrap_or(u32::MAX))
            .unwrap_or(usize::MAX)
    }

    /// Number of leaves written so far (the next append's index).
    pub fn leaf_count(&self) -> usize {
        self.next_index
    }

    /// The current root.
    pub fn root(&self) -> Fq {
        self.node(self.depth, 0)
    }

    /// Writes `leaf` at the first unused slot. Fails once the tree is at
    /// capacity.
    pub fn append(&mut self, leaf: Fq) -> Result<usize, MerkleError> {
        let capacity = self.capacity();
        if self.next_index >= capacity {
            return Err(MerkleError::Full { capacity });
        }
        let index = self.next_index;
        self.nodes[0].insert(index, leaf);
        self.recompute_ancestors(index);
        self.next_index = self.next_index.saturating_add(1);
        Ok(index)
    }

    /// Builds an inclusion proof for `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleError> {
        if index >= self.capacity() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                depth: self.depth,
            });
        }
        let leaf = self.node(0, index);
        let mut path_elements = Vec::with_capacity(self.depth);
        let mut path_indices = Vec::with_capacity(self.depth);
        let mut current = index;
        for level in 0..self.depth {
            let is_right = current & 1 == 1;
            let sibling_index = current ^ 1;
            path_elements.push(self.node(level, sibling_index));
            path_indices.push(is_right);
            current /= 2;
        }
        Ok(MerkleProof {
            leaf,
            path_elements,
            path_indices,
            root: self.root(),
        })
    }

    /// Recomputes the root implied by `proof` and checks it equals
    /// `proof.root`. Returns `false` on any shape mismatch or on
    /// disagreement.
    pub fn verify(proof: &MerkleProof) -> bool {
        if proof.path_elements.len() != proof.path_indices.len() {
            return false;
        }
        let mut current = proof.leaf;
        for (sibling, is_right) in proof.path_elements.iter().zip(proof.path_indices.iter()) {
            current = if *is_right {
                poseidon2(*sibling, current)
            } else {
                poseidon2(current, *sibling)
            };
        }
        current.ct_eq(&proof.root)
    }

    fn node(&self, level: usize, index: usize) -> Fq {
        self.nodes
            .get(level)
            .and_then(|layer| layer.get(&index))
            .copied()
            .unwrap_or(self.zero_hashes[level])
    }

    fn recompute_ancestors(&mut self, leaf_index: usize) {
        let mut current = leaf_index;
        for level in 0..self.depth {
            let parent_index = current / 2;
            let left = self.node(level, parent_index.saturating_mul(2));
            let right = self.node(level, parent_index.saturating_mul(2).saturating_add(1));
            let parent = poseidon2(left, right);
            self.nodes[level.saturating_add(1)].insert(parent_index, parent);
            current = parent_index;
        }
    }
}
