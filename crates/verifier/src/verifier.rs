use ark_bn254::{Bn254, Fr};
use ark_ff::PrimeField;
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use poseidon::{Fq, FQ_BYTE_LEN};
use sha2::{Digest, Sha256};

use crate::config::VerifierConfig;
use crate::error::VerifyError;
use crate::ledger::{CommitOutcome, Storage};
use crate::request::VerificationRequest;
use crate::roots::RootRegistry;

/// Index of each public signal within the seven-element statement
/// `(valid, merkleRoot, biometricCommitment, eventId, currentTimestamp,
/// nonce, nonceExpiry)`.
mod signal {
    pub const VALID: usize = 0;
    pub const MERKLE_ROOT: usize = 1;
    pub const EVENT_ID: usize = 3;
    pub const CURRENT_TIMESTAMP: usize = 4;
    pub const NONCE: usize = 5;
    pub const NONCE_EXPIRY: usize = 6;
}

/// A successfully accepted proof's receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedReceipt {
    /// `proofHash`: a deduplication/audit-only digest of the proof
    /// bytes and public signals. Not cryptographically meaningful on
    /// its own.
    pub proof_hash: [u8; 32],
}

/// The hard-state verifier: an immutable, event-agnostic verification
/// key plus the mutable per-event root histories and the nonce
/// ledger/audit log.
///
/// Built once per process (or per long-running service) and shared by
/// reference; every field it owns is either immutable after
/// construction or internally synchronized, so concurrent
/// [`Verifier::verify`] calls across different events never contend,
/// and calls for the *same* nonce race only at the ledger's atomic
/// commit (gate 9).
pub struct Verifier {
    config: VerifierConfig,
    prepared_vk: PreparedVerifyingKey<Bn254>,
    roots: RootRegistry,
    storage: Storage,
}

impl Verifier {
    /// Builds a verifier from a compressed, canonically-serialized
    /// Groth16 verifying key and an explicit [`VerifierConfig`].
    ///
    /// The verifying key must match the on-chain verifier's byte-for-byte
    /// (§6); this constructor does not itself enforce that beyond
    /// accepting whatever bytes it is given; operators are responsible
    /// for deploying the same key to both sides.
    pub fn new(config: VerifierConfig, verifying_key_bytes: &[u8], storage: Storage) -> Result<Self, VerifyError> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(verifying_key_bytes)
            .map_err(|e| VerifyError::InputShape(format!("verifying key did not deserialize: {e}")))?;
        let prepared_vk = <Groth16<Bn254> as SNARK<Fr>>::process_vk(&vk)
            .map_err(|e| VerifyError::InputShape(format!("verifying key could not be processed: {e}")))?;
        Ok(Verifier { config, prepared_vk, roots: RootRegistry::new(config.history_size), storage })
    }

    /// The sink the ticketing pipeline pushes new Merkle roots through
    /// (§6): called once per mint-triggered root rotation.
    pub fn record_root(&self, event: Fq, root: Fq) {
        self.roots.record_root(event, root);
    }

    /// Sweeps the nonce ledger, deleting entries whose `expiry +
    /// safety_margin_secs` is already in the past relative to `now`.
    /// A separate maintenance operation from proof verification.
    pub fn purge_expired_nonces(&self, now: u64, safety_margin_secs: u64) -> Result<usize, VerifyError> {
        self.storage.purge_expired(now, safety_margin_secs)
    }

    /// Runs the nine-gate verification pipeline against `request`,
    /// observing wall-clock time `now` (Unix seconds). Gates execute in
    /// order 1 → 9; the first failing gate's reason is returned.
    pub fn verify(&self, request: &VerificationRequest, now: u64) -> Result<VerifiedReceipt, VerifyError> {
        // Gate 1 (signal shape) already passed: `request` only exists
        // because `WireVerificationRequest::parse` succeeded.

        // Gate 2: the circuit's own `valid` output.
        if request.public_signals[signal::VALID] != Fq::one() {
            log::warn!("gate 2 rejected event {}: circuit reported valid=0", request.event_id);
            return Err(VerifyError::InvalidProof);
        }

        // Gate 3: event binding.
        if request.public_signals[signal::EVENT_ID] != request.event_id {
            log::warn!("gate 3 rejected request for event {}: proof bound to a different event", request.event_id);
            return Err(VerifyError::EventMismatch);
        }

        // Gate 4: expiry, with clock skew subtracted (never added).
        let nonce_expiry = fq_to_u64(request.public_signals[signal::NONCE_EXPIRY])
            .ok_or_else(|| VerifyError::InputShape("nonceExpiry does not fit in 64 bits".into()))?;
        let skew_adjusted_now = now.saturating_sub(self.config.clock_skew_margin_secs);
        if skew_adjusted_now > nonce_expiry {
            log::info!("gate 4 rejected event {}: nonce already past its expiry", request.event_id);
            return Err(VerifyError::Expired);
        }

        // Gate 5: freshness of the proved timestamp.
        let current_timestamp = fq_to_u64(request.public_signals[signal::CURRENT_TIMESTAMP])
            .ok_or_else(|| VerifyError::InputShape("currentTimestamp does not fit in 64 bits".into()))?;
        let drift = current_timestamp.abs_diff(now);
        if drift > self.config.freshness_window_secs {
            log::info!("gate 5 rejected event {}: proof timestamp drifted {drift}s from wall-clock", request.event_id);
            return Err(VerifyError::Expired);
        }

        // Gate 6: root acceptance.
        let merkle_root = request.public_signals[signal::MERKLE_ROOT];
        if !self.roots.is_known(request.event_id, merkle_root) {
            log::info!("gate 6 rejected event {}: merkle root outside the retained history", request.event_id);
            return Err(VerifyError::StaleRoot);
        }

        // Gate 7: replay fast-path (authoritative check is gate 9's
        // atomic insert).
        let nonce = request.public_signals[signal::NONCE];
        if self.storage.contains_nonce(nonce)? {
            log::warn!("gate 7 rejected event {}: nonce already present in the ledger", request.event_id);
            return Err(VerifyError::Replay);
        }

        // Gate 8: the expensive cryptographic check. Any internal
        // failure (malformed curve points, pairing mismatch) is
        // flattened to the same `InvalidProof` the `valid=0` case uses.
        let public_inputs: Vec<Fr> = request.public_signals.iter().map(|fq| fq_to_fr(*fq)).collect();
        let verified = Groth16::<Bn254>::verify_with_processed_vk(&self.prepared_vk, &public_inputs, &request.proof)
            .unwrap_or(false);
        if !verified {
            log::warn!("gate 8 rejected event {}: pairing check failed", request.event_id);
            return Err(VerifyError::InvalidProof);
        }

        // Gate 9: atomic commit of nonce + audit entry.
        let canonical_signals = canonical_signal_string(&request.public_signals);
        let hash = proof_hash(&request.proof, &request.public_signals)?;
        let outcome = self.storage.commit(nonce, nonce_expiry, request.event_id, hash, &canonical_signals, now)?;
        match outcome {
            CommitOutcome::Committed => {
                log::info!("accepted proof for event {}, proofHash {}", request.event_id, hex::encode(hash));
                Ok(VerifiedReceipt { proof_hash: hash })
            }
            CommitOutcome::AlreadySpent => {
                log::warn!("gate 9 rejected event {}: nonce committed by a concurrent verification", request.event_id);
                Err(VerifyError::Replay)
            }
        }
    }
}

fn fq_to_u64(value: Fq) -> Option<u64> {
    let bytes = value.to_be_bytes();
    let (high, low) = bytes.split_at(FQ_BYTE_LEN.saturating_sub(8));
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut array = [0u8; 8];
    array.copy_from_slice(low);
    Some(u64::from_be_bytes(array))
}

fn fq_to_fr(value: Fq) -> Fr {
    Fr::from_le_bytes_mod_order(&{
        let mut le = value.to_be_bytes();
        le.reverse();
        le
    })
}

fn canonical_signal_string(signals: &[Fq; 7]) -> String {
    signals.iter().map(|fq| hex::encode(fq.to_be_bytes())).collect::<Vec<_>>().join(",")
}

fn proof_hash(proof: &Proof<Bn254>, public_signals: &[Fq; 7]) -> Result<[u8; 32], VerifyError> {
    let mut proof_bytes = Vec::new();
    proof
        .serialize_compressed(&mut proof_bytes)
        .map_err(|e| VerifyError::InputShape(format!("proof did not re-serialize: {e}")))?;

    let mut hasher = Sha256::new();
    hasher.update(&proof_bytes);
    for signal in public_signals {
        hasher.update(signal.to_be_bytes());
    }
    Ok(hasher.finalize().into())
}
