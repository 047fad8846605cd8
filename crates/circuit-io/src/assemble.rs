use std::collections::BTreeMap;

use merkle::CIRCUIT_DEPTH;
use num_bigint::BigUint;
use poseidon::Fq;
use serde::{Deserialize, Serialize};

use crate::error::AssemblerError;
use crate::inputs::{PrivateInputs, PublicInputs};

/// A named circuit input value: either one field element or an ordered
/// array of them. Mirrors how a circom witness calculator expects its
/// input object shaped (one entry per named signal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// A single field element, as its canonical decimal string.
    Single(String),
    /// An ordered array of field elements, each a canonical decimal
    /// string.
    Array(Vec<String>),
}

/// The ordered public signals (six at this stage; `valid` is added once
/// the prover has run) plus the full named-signal map the prover backend
/// consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledInputs {
    /// `(merkleRoot, biometricCommitment, eventId, currentTimestamp,
    /// nonce, nonceExpiry)`, in this exact order, as canonical decimal
    /// strings. Reordering this is a soundness bug, not a style choice.
    pub public_signals: [String; 6],
    /// All signals (public and private), keyed by name, in the layout
    /// the prover driver forwards to the witness calculator.
    pub signals: BTreeMap<String, InputValue>,
}

impl AssembledInputs {
    /// Renders the named-signal map as the JSON object a circom witness
    /// calculator's input file expects: `{ "merkleRoot": "123", ... }`.
    pub fn to_json(&self) -> Result<String, AssemblerError> {
        serde_json::to_string(&self.signals).map_err(|e| AssemblerError::Serialization(e.to_string()))
    }
}

const SIGNAL_MERKLE_ROOT: &str = "merkleRoot";
const SIGNAL_BIOMETRIC_COMMITMENT: &str = "biometricCommitment";
const SIGNAL_EVENT_ID: &str = "eventId";
const SIGNAL_CURRENT_TIMESTAMP: &str = "currentTimestamp";
const SIGNAL_NONCE: &str = "nonce";
const SIGNAL_NONCE_EXPIRY: &str = "nonceExpiry";
const SIGNAL_TICKET_DATA: &str = "ticketData";
const SIGNAL_TICKET_SALT: &str = "ticketSalt";
const SIGNAL_MERKLE_PATH_ELEMENTS: &str = "merklePathElements";
const SIGNAL_MERKLE_PATH_INDICES: &str = "merklePathIndices";
const SIGNAL_BIOMETRIC_TEMPLATE: &str = "biometricTemplate";
const SIGNAL_BIOMETRIC_SALT: &str = "biometricSalt";

/// Assembles the exact input object the circuit expects from a ticket's
/// Merkle proof, its biometric commitment materials, and the
/// verification-session bookkeeping (event, timestamp, nonce, expiry).
///
/// Rejects semantically inconsistent inputs before any call reaches the
/// prover: a private `eventId` that disagrees with the public one, a
/// proof timestamp already past its own claimed expiry, or a Merkle path
/// whose arrays don't match [`CIRCUIT_DEPTH`].
pub fn assemble(
    public: &PublicInputs,
    private: &PrivateInputs,
) -> Result<AssembledInputs, AssemblerError> {
    if private.ticket_data.event_id != public.event_id {
        return Err(AssemblerError::EventMismatch);
    }
    if public.current_timestamp > public.nonce_expiry {
        return Err(AssemblerError::TimestampAfterExpiry {
            current_timestamp: public.current_timestamp,
            nonce_expiry: public.nonce_expiry,
        });
    }
    if private.merkle_path_elements.len() != CIRCUIT_DEPTH
        || private.merkle_path_indices.len() != CIRCUIT_DEPTH
    {
        return Err(AssemblerError::PathLengthMismatch {
            elements: private.merkle_path_elements.len(),
            indices: private.merkle_path_indices.len(),
            depth: CIRCUIT_DEPTH,
        });
    }

    let current_timestamp_fq = Fq::from_u64(public.current_timestamp);
    let nonce_expiry_fq = Fq::from_u64(public.nonce_expiry);

    let public_signals = [
        decimal(public.merkle_root),
        decimal(public.biometric_commitment),
        decimal(public.event_id),
        decimal(current_timestamp_fq),
        decimal(public.nonce),
        decimal(nonce_expiry_fq),
    ];

    let mut signals = BTreeMap::new();
    signals.insert(
        SIGNAL_MERKLE_ROOT.to_string(),
        InputValue::Single(public_signals[0].clone()),
    );
    signals.insert(
        SIGNAL_BIOMETRIC_COMMITMENT.to_string(),
        InputValue::Single(public_signals[1].clone()),
    );
    signals.insert(
        SIGNAL_EVENT_ID.to_string(),
        InputValue::Single(public_signals[2].clone()),
    );
    signals.insert(
        SIGNAL_CURRENT_TIMESTAMP.to_string(),
        InputValue::Single(public_signals[3].clone()),
    );
    signals.insert(
        SIGNAL_NONCE.to_string(),
        InputValue::Single(public_signals[4].clone()),
    );
    signals.insert(
        SIGNAL_NONCE_EXPIRY.to_string(),
        InputValue::Single(public_signals[5].clone()),
    );
    signals.insert(
        SIGNAL_TICKET_DATA.to_string(),
        InputValue::Array(vec![
            decimal(private.ticket_data.token_id),
            decimal(private.ticket_data.event_id),
            decimal(private.ticket_data.tier),
            decimal(private.ticket_data.original_price),
        ]),
    );
    signals.insert(
        SIGNAL_TICKET_SALT.to_string(),
        InputValue::Single(decimal(private.ticket_salt)),
    );
    signals.insert(
        SIGNAL_MERKLE_PATH_ELEMENTS.to_string(),
        InputValue::Array(private.merkle_path_elements.iter().copied().map(decimal).collect()),
    );
    signals.insert(
        SIGNAL_MERKLE_PATH_INDICES.to_string(),
        InputValue::Array(
            private
                .merkle_path_indices
                .iter()
                .map(|bit| if *bit { "1".to_string() } else { "0".to_string() })
                .collect(),
        ),
    );
    signals.insert(
        SIGNAL_BIOMETRIC_TEMPLATE.to_string(),
        InputValue::Array(private.biometric_template.iter().copied().map(decimal).collect()),
    );
    signals.insert(
        SIGNAL_BIOMETRIC_SALT.to_string(),
        InputValue::Single(decimal(private.biometric_salt)),
    );

    Ok(AssembledInputs { public_signals, signals })
}

/// Canonical decimal-string serialization of a field element, the form
/// every circom-family prover backend expects at its JSON boundary.
fn decimal(value: Fq) -> String {
    BigUint::from_bytes_be(&value.to_be_bytes()).to_str_radix(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_public(event_id: u64) -> PublicInputs {
        PublicInputs {
            merkle_root: Fq::from_u64(1),
            biometric_commitment: Fq::from_u64(2),
            event_id: Fq::from_u64(event_id),
            current_timestamp: 1_000,
            nonce: Fq::from_u64(3),
            nonce_expiry: 1_060,
        }
    }

    fn sample_private(event_id: u64) -> PrivateInputs {
        PrivateInputs {
            ticket_data: crate::inputs::TicketData {
                token_id: Fq::from_u64(1),
                event_id: Fq::from_u64(event_id),
                tier: Fq::from_u64(0),
                original_price: Fq::from_u64(100_000_000_000_000_000),
            },
            ticket_salt: Fq::from_u64(7),
            merkle_path_elements: vec![Fq::zero(); CIRCUIT_DEPTH],
            merkle_path_indices: vec![false; CIRCUIT_DEPTH],
            biometric_template: [Fq::from_u64(9); 16],
            biometric_salt: Fq::from_u64(11),
        }
    }

    #[test]
    fn assembles_well_formed_inputs() {
        let assembled = assemble(&sample_public(12345), &sample_private(12345)).expect("valid");
        assert_eq!(assembled.public_signals[2], "12345");
        assert_eq!(assembled.signals.len(), 12);
    }

    #[test]
    fn to_json_renders_every_named_signal() {
        let assembled = assemble(&sample_public(12345), &sample_private(12345)).expect("valid");
        let json = assembled.to_json().expect("signal map serializes");
        assert!(json.contains("\"eventId\":\"12345\""));
        assert!(json.contains("\"ticketData\":["));
    }

    #[test]
    fn rejects_event_id_mismatch() {
        let err = assemble(&sample_public(12345), &sample_private(99999)).unwrap_err();
        assert_eq!(err, AssemblerError::EventMismatch);
    }

    #[test]
    fn rejects_timestamp_after_expiry() {
        let mut public = sample_public(12345);
        public.current_timestamp = public.nonce_expiry.saturating_add(1);
        let err = assemble(&public, &sample_private(12345)).unwrap_err();
        assert!(matches!(err, AssemblerError::TimestampAfterExpiry { .. }));
    }

    #[test]
    fn rejects_short_merkle_path() {
        let mut private = sample_private(12345);
        private.merkle_path_elements.truncate(CIRCUIT_DEPTH - 1);
        let err = assemble(&sample_public(12345), &private).unwrap_err();
        assert!(matches!(err, AssemblerError::PathLengthMismatch { .. }));
    }

    #[test]
    fn decimal_round_trips_zero() {
        assert_eq!(decimal(Fq::zero()), "0");
    }
}
