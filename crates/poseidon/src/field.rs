use ark_ff::{BigInteger, PrimeField};
use ark_std::{rand::RngCore, UniformRand};
use std::fmt;
use subtle::ConstantTimeEq;

/// A canonical element of the BN128 (BN254) scalar field.
///
/// Wraps [`ark_bn254::Fr`] and guarantees every value handed to callers is
/// already reduced modulo the field order: construction from bytes rejects
/// inputs that are not the field's canonical little-endian representation,
/// and every other constructor routes through arkworks' own reduced
/// arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fq(ark_bn254::Fr);

/// Fixed-width canonical serialization: 32 bytes, big-endian.
pub const FQ_BYTE_LEN: usize = 32;

impl Fq {
    /// The additive identity, used as the zero-leaf value throughout the
    /// Merkle accumulator.
    pub fn zero() -> Self {
        Fq(ark_bn254::Fr::from(0u64))
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Fq(ark_bn254::Fr::from(1u64))
    }

    /// Builds a field element from a `u64`, reducing modulo the field order
    /// (never fails, since every `u64` is already less than the order).
    pub fn from_u64(value: u64) -> Self {
        Fq(ark_bn254::Fr::from(value))
    }

    /// Parses a 32-byte big-endian buffer as a field element, rejecting any
    /// value that is not already in canonical (reduced) form.
    ///
    /// This is the gate ticket data, salts and proof public signals pass
    /// through on the way into the rest of the system: a non-canonical
    /// encoding is treated as malformed input rather than silently reduced.
    pub fn from_be_bytes_canonical(bytes: &[u8; FQ_BYTE_LEN]) -> Result<Self, NonCanonicalError> {
        let mut le = *bytes;
        le.reverse();
        let value = ark_bn254::Fr::from_le_bytes_mod_order(&le);
        let mut roundtrip = value.into_bigint().to_bytes_le();
        roundtrip.resize(FQ_BYTE_LEN, 0);
        if roundtrip != le {
            return Err(NonCanonicalError);
        }
        Ok(Fq(value))
    }

    /// Builds a field element from a 32-byte big-endian buffer, reducing
    /// modulo the field order rather than rejecting non-canonical input.
    ///
    /// Reserved for trust boundaries where the bytes are already known to
    /// come from a reduced source, e.g. re-importing an
    /// [`ark_bn254::Fr`] this crate itself produced. External input
    /// should go through [`Fq::from_be_bytes_canonical`] instead.
    pub fn from_be_bytes_reduced(bytes: &[u8; FQ_BYTE_LEN]) -> Self {
        let mut le = *bytes;
        le.reverse();
        Fq(ark_bn254::Fr::from_le_bytes_mod_order(&le))
    }

    /// Serializes to a 32-byte big-endian buffer.
    pub fn to_be_bytes(self) -> [u8; FQ_BYTE_LEN] {
        let mut le = self.0.into_bigint().to_bytes_le();
        le.resize(FQ_BYTE_LEN, 0);
        let mut be: [u8; FQ_BYTE_LEN] = le.try_into().unwrap_or([0u8; FQ_BYTE_LEN]);
        be.reverse();
        be
    }

    /// Samples a uniformly random field element using a cryptographic RNG.
    pub fn random(rng: &mut impl RngCore) -> Self {
        Fq(ark_bn254::Fr::rand(rng))
    }

    /// Builds a field element from a signed integer, reducing negative
    /// values to their additive inverse (the field has no native sign).
    pub fn from_i64(value: i64) -> Self {
        if value >= 0 {
            Fq::from_u64(value.unsigned_abs())
        } else {
            Fq::from_u64(value.unsigned_abs()).neg()
        }
    }

    /// Addition, used by callers assembling commitments outside the
    /// permutation (e.g. the Davies-Meyer feed-forward step).
    pub fn add(self, other: Self) -> Self {
        Fq(self.0 + other.0)
    }

    /// Subtraction.
    pub fn sub(self, other: Self) -> Self {
        Fq(self.0 - other.0)
    }

    /// Multiplication.
    pub fn mul(self, other: Self) -> Self {
        Fq(self.0 * other.0)
    }

    /// Additive inverse.
    pub fn neg(self) -> Self {
        Fq(-self.0)
    }

    /// Multiplicative inverse. `None` only for zero.
    pub fn inverse(self) -> Option<Self> {
        ark_ff::Field::inverse(&self.0).map(Fq)
    }

    /// Constant-time equality over the canonical 32-byte representation.
    ///
    /// Used anywhere an equality check gates acceptance of externally
    /// supplied data (a Merkle root recomputation, a biometric
    /// commitment) rather than arkworks' own variable-time `PartialEq`.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.to_be_bytes().ct_eq(&other.to_be_bytes()).into()
    }

    pub(crate) fn inner(self) -> ark_bn254::Fr {
        self.0
    }

    pub(crate) fn from_inner(inner: ark_bn254::Fr) -> Self {
        Fq(inner)
    }
}

/// A byte buffer was not the canonical reduced representation of a field
/// element.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("bytes are not a canonical BN128 scalar field element")]
pub struct NonCanonicalError;

impl fmt::Debug for Fq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fq({})", hex::encode(self.to_be_bytes()))
    }
}

impl fmt::Display for Fq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_be_bytes()))
    }
}
