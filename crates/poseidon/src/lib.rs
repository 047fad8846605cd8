//! BN128 scalar field element type and a Poseidon permutation family
//! supporting the fixed arities this workspace needs (2, 5 and 16).
//!
//! The round constants and MDS matrix are generated deterministically from
//! a fixed seed rather than taken from an external parameter table, because
//! no vendored instance covers the arities this workspace requires. See
//! [`params`] for the generation procedure and [`params::PoseidonParams::digest`]
//! for the versioning/compatibility check.

#![forbid(unsafe_code)]

mod error;
mod field;
mod params;
mod permutation;

pub use error::ParamsError;
pub use field::{Fq, FQ_BYTE_LEN};
pub use params::{PoseidonParams, PARAMS_VERSION};
pub use permutation::Poseidon;

/// Hash two field elements into one, Davies-Meyer feed-forward over the
/// width-2 Poseidon permutation. Used for Merkle sibling compression.
pub fn poseidon2(left: Fq, right: Fq) -> Fq {
    Poseidon::for_arity(2).hash(&[left, right])
}

/// Hash exactly five field elements into one. Used for ticket leaf hashing.
pub fn poseidon5(inputs: [Fq; 5]) -> Fq {
    Poseidon::for_arity(5).hash(&inputs)
}

/// Hash exactly sixteen field elements into one. Used to collapse a
/// biometric template chunk and to combine the sixteen chunk hashes.
pub fn poseidon16(inputs: [Fq; 16]) -> Fq {
    Poseidon::for_arity(16).hash(&inputs)
}

/// Hash a slice of up to sixteen field elements, zero-padding up to the
/// smallest arity in [`Poseidon::SUPPORTED_ARITIES`] that fits it and
/// hashing at that width.
///
/// An input whose length already matches a supported arity is padded
/// with nothing. This mirrors the per-chunk collapse in the biometric
/// template processor, where chunk and fold-group lengths are whatever
/// falls out of the raw template's size, not necessarily 2, 5 or 16.
pub fn poseidon_variable(inputs: &[Fq]) -> Fq {
    assert!(!inputs.is_empty(), "poseidon_variable requires at least one input");
    assert!(inputs.len() <= 16, "poseidon_variable supports at most 16 inputs");
    let arity = Poseidon::SUPPORTED_ARITIES
        .into_iter()
        .find(|&a| a >= inputs.len())
        .unwrap_or(16);
    let mut padded = inputs.to_vec();
    padded.resize(arity, Fq::zero());
    Poseidon::for_arity(arity).hash(&padded)
}
