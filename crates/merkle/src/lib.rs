//! Fixed-depth append-only Merkle membership accumulator, one per ticketed
//! event, plus the bounded root-history ring the verifier consults to
//! tolerate in-flight proofs across a root rotation.

#![forbid(unsafe_code)]

mod error;
mod history;
mod tree;

pub use error::MerkleError;
pub use history::{RootHistory, DEFAULT_HISTORY_SIZE};
pub use tree::{MerkleProof, MerkleTree, CIRCUIT_DEPTH};

use poseidon::{poseidon5, Fq};

/// The five ticket attributes hashed together to produce a leaf.
#[derive(Debug, Clone, Copy)]
pub struct TicketLeaf {
    /// Unique token identifier.
    pub token_id: Fq,
    /// The event this ticket belongs to.
    pub event_id: Fq,
    /// Tier, a small integer cast up to a field element.
    pub tier: Fq,
    /// Original sale price, in integer units.
    pub original_price: Fq,
    /// Uniformly random 256-bit value known only to the holder; defeats
    /// cross-event and cross-verifier correlation of leaves.
    pub salt: Fq,
}

impl TicketLeaf {
    /// `Poseidon5(tokenId, eventId, tier, originalPrice, salt)`.
    pub fn hash(&self) -> Fq {
        poseidon5([
            self.token_id,
            self.event_id,
            self.tier,
            self.original_price,
            self.salt,
        ])
    }
}
