use ark_bn254::Bn254;
use ark_groth16::Proof;
use ark_serialize::CanonicalDeserialize;
use num_bigint::BigUint;
use poseidon::{Fq, FQ_BYTE_LEN};

use crate::error::VerifyError;

/// The wire form of a proof package and its request: a Groth16 proof
/// (compressed arkworks serialization, hex-encoded) and the seven public
/// signals as canonical decimal strings, plus the event the request is
/// scoped to and an optional ticket id carried purely for the caller's
/// own audit linkage (never bound into the proof, and never recorded by
/// this crate's own audit log — see [`crate::ledger::TICKET_ID_PLACEHOLDER`]).
#[derive(Debug, Clone)]
pub struct WireVerificationRequest {
    /// The event this request is scoped to, as a decimal string.
    pub event_id: String,
    /// Caller-side audit linkage only.
    pub ticket_id: Option<String>,
    /// Compressed arkworks Groth16 proof serialization, hex-encoded.
    pub proof_hex: String,
    /// The seven public signals, in statement order, as decimal
    /// strings.
    pub public_signals: [String; 7],
}

/// A parsed, strongly-typed verification request: gate 1 (signal shape)
/// has already passed by the time this type exists.
#[derive(Clone)]
pub struct VerificationRequest {
    pub(crate) event_id: Fq,
    pub(crate) proof: Proof<Bn254>,
    pub(crate) public_signals: [Fq; 7],
}

impl WireVerificationRequest {
    /// Parses the wire request, performing gate 1 (signal shape): the
    /// event id and every public signal must be a canonical field
    /// element, and the proof bytes must deserialize.
    pub fn parse(&self) -> Result<VerificationRequest, VerifyError> {
        let event_id = decimal_to_fq(&self.event_id)
            .ok_or_else(|| VerifyError::InputShape("eventId is not a field element".into()))?;

        let mut public_signals = [Fq::zero(); 7];
        for (slot, raw) in public_signals.iter_mut().zip(self.public_signals.iter()) {
            *slot = decimal_to_fq(raw)
                .ok_or_else(|| VerifyError::InputShape(format!("public signal {raw:?} is not a field element")))?;
        }

        let proof_bytes = hex::decode(&self.proof_hex)
            .map_err(|e| VerifyError::InputShape(format!("proof is not valid hex: {e}")))?;
        let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes.as_slice())
            .map_err(|e| VerifyError::InputShape(format!("proof did not deserialize: {e}")))?;

        Ok(VerificationRequest { event_id, proof, public_signals })
    }
}

/// Parses a decimal string into a canonical field element. Returns
/// `None` on a parse failure or a value that reduces to something other
/// than itself (non-canonical).
fn decimal_to_fq(raw: &str) -> Option<Fq> {
    let value = raw.parse::<BigUint>().ok()?;
    let mut be = value.to_bytes_be();
    if be.len() > FQ_BYTE_LEN {
        return None;
    }
    let mut padded = vec![0u8; FQ_BYTE_LEN.saturating_sub(be.len())];
    padded.append(&mut be);
    let array: [u8; FQ_BYTE_LEN] = padded.try_into().ok()?;
    Fq::from_be_bytes_canonical(&array).ok()
}
