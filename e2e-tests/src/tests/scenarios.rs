//! End-to-end acceptance scenarios for the nine-gate verifier.
//!
//! Each scenario assembles a ticket-validity statement the way a real
//! holder's device would — Merkle inclusion proof, biometric
//! commitment, nonce/expiry bookkeeping — proves it with the toy
//! circuit described in [`super::utils`], and submits it to a real
//! [`Verifier`]. Only the statement values are varied between
//! scenarios; the verification pipeline itself is never mocked.

use ark_serialize::CanonicalSerialize;
use biometric::{make_commitment, process_template};
use circuit_io::{assemble, PrivateInputs, PublicInputs, TicketData};
use merkle::{MerkleTree, TicketLeaf, CIRCUIT_DEPTH};
use poseidon::Fq;
use rand::rngs::OsRng;
use verifier::{Storage, Verifier, VerifierConfig, VerifyError, WireVerificationRequest};

use super::utils::{prove, setup, wire_request};

const EVENT_ID: u64 = 424_242;
const OTHER_EVENT_ID: u64 = 99_999;

/// Everything one scenario needs: a live verifier (with its own
/// in-memory ledger and root history) and the wire request a holder's
/// client would have submitted.
struct Environment {
    verifier: Verifier,
    request: WireVerificationRequest,
}

/// Builds a complete environment: mints one ticket into a fresh tree,
/// enrolls one biometric commitment, assembles and proves a statement
/// binding them together, and registers the resulting Merkle root with
/// the verifier unless `register_root` is `false`.
fn build_environment(now: u64, nonce: u64, valid_signal: bool, register_root: bool) -> Environment {
    let event_id = Fq::from_u64(EVENT_ID);

    let leaf = TicketLeaf {
        token_id: Fq::from_u64(1),
        event_id,
        tier: Fq::from_u64(0),
        original_price: Fq::from_u64(50_000_000),
        salt: Fq::from_u64(777),
    };
    let mut tree = MerkleTree::new(CIRCUIT_DEPTH);
    let index = tree.append(leaf.hash()).expect("tree has capacity");
    let merkle_proof = tree.proof(index).expect("just-appended index is valid");

    let template_hash = process_template(&[0.12, 0.34, 0.56, 0.78]).expect("non-empty template");
    let biometric_salt = Fq::from_u64(888);
    let commitment_record = make_commitment(template_hash, Some(biometric_salt), &mut OsRng);

    let public = PublicInputs {
        merkle_root: merkle_proof.root,
        biometric_commitment: commitment_record.commitment,
        event_id,
        current_timestamp: now,
        nonce: Fq::from_u64(nonce),
        nonce_expiry: now.saturating_add(60),
    };
    let private = PrivateInputs {
        ticket_data: TicketData {
            token_id: leaf.token_id,
            event_id: leaf.event_id,
            tier: leaf.tier,
            original_price: leaf.original_price,
        },
        ticket_salt: leaf.salt,
        merkle_path_elements: merkle_proof.path_elements.clone(),
        merkle_path_indices: merkle_proof.path_indices.clone(),
        biometric_template: template_hash,
        biometric_salt,
    };
    // Exercise the same pre-prove validation a real driver runs before
    // ever reaching the prover.
    assemble(&public, &private).expect("statement is internally consistent");

    let public_signals: [Fq; 7] = [
        if valid_signal { Fq::one() } else { Fq::zero() },
        public.merkle_root,
        public.biometric_commitment,
        public.event_id,
        Fq::from_u64(public.current_timestamp),
        public.nonce,
        Fq::from_u64(public.nonce_expiry),
    ];

    let (pk, vk) = setup();
    let mut vk_bytes = Vec::new();
    vk.serialize_compressed(&mut vk_bytes).expect("verifying key serializes");

    let storage = Storage::open_in_memory().expect("in-memory ledger opens");
    let config = VerifierConfig { history_size: 4, freshness_window_secs: 300, clock_skew_margin_secs: 0 };
    let verifier = Verifier::new(config, &vk_bytes, storage).expect("verifier constructs from toy vk");
    if register_root {
        verifier.record_root(event_id, public.merkle_root);
    }

    let proof = prove(&pk, public_signals);
    let request = wire_request(event_id, Some("t-1"), &proof, public_signals);

    Environment { verifier, request }
}

/// S1: a well-formed, freshly-minted proof against a known root is
/// accepted exactly once.
#[test]
fn happy_path_is_accepted() {
    let env = build_environment(1_000, 1, true, true);
    let parsed = env.request.parse().expect("gate 1 passes");
    let receipt = env.verifier.verify(&parsed, 1_000).expect("every gate passes");
    assert_ne!(receipt.proof_hash, [0u8; 32]);
}

/// S2: the same nonce cannot be spent twice, even though every other
/// gate still passes on the second attempt.
#[test]
fn replayed_proof_is_rejected() {
    let env = build_environment(1_000, 2, true, true);
    let parsed = env.request.parse().expect("gate 1 passes");
    env.verifier.verify(&parsed, 1_000).expect("first submission succeeds");
    let replay = env.verifier.verify(&parsed, 1_000);
    assert_eq!(replay, Err(VerifyError::Replay));
}

/// S3: a request whose wire-level `eventId` disagrees with the event
/// baked into the statement is rejected before any cryptography runs.
#[test]
fn wrong_event_binding_is_rejected() {
    let mut env = build_environment(1_000, 3, true, true);
    env.request.event_id = OTHER_EVENT_ID.to_string();
    let parsed = env.request.parse().expect("gate 1 passes: still a valid field element");
    let result = env.verifier.verify(&parsed, 1_000);
    assert_eq!(result, Err(VerifyError::EventMismatch));
}

/// S4: a proof submitted after its own claimed `nonceExpiry` is
/// rejected, even though it was perfectly valid at mint time.
#[test]
fn expired_proof_is_rejected() {
    let env = build_environment(1_000, 4, true, true);
    let parsed = env.request.parse().expect("gate 1 passes");
    let result = env.verifier.verify(&parsed, 10_000);
    assert_eq!(result, Err(VerifyError::Expired));
}

/// S5: a statement whose circuit-side `valid` output is `0` — the
/// shape a real circuit would produce on a biometric mismatch — is
/// rejected at gate 2, collapsed to the same opaque `InvalidProof` a
/// failed pairing check at gate 8 would get.
#[test]
fn failed_biometric_match_is_rejected() {
    let env = build_environment(1_000, 5, false, true);
    let parsed = env.request.parse().expect("gate 1 passes");
    let result = env.verifier.verify(&parsed, 1_000);
    assert_eq!(result, Err(VerifyError::InvalidProof));
}

/// S6: a statement built against a root the verifier never learned
/// about (or that has since rotated out of the retained history) is
/// rejected without ever reaching the cryptographic gate.
#[test]
fn stale_root_is_rejected() {
    let env = build_environment(1_000, 6, true, false);
    let parsed = env.request.parse().expect("gate 1 passes");
    let result = env.verifier.verify(&parsed, 1_000);
    assert_eq!(result, Err(VerifyError::StaleRoot));
}

/// Property 7: mutating a single public signal the proof was never
/// generated for is caught at the cryptographic gate. The nonce is the
/// one signal every earlier gate tolerates unchanged (it is a fresh,
/// never-before-seen value either way), so this is the one tamper that
/// can only be caught by gate 8 rather than an earlier one.
#[test]
fn tampered_public_signal_fails_cryptographic_verification() {
    let env = build_environment(1_000, 7, true, true);
    let mut tampered = env.request.clone();
    tampered.public_signals[5] = "987654321".to_string();
    let parsed = tampered.parse().expect("gate 1 passes: still a valid field element");
    let result = env.verifier.verify(&parsed, 1_000);
    assert_eq!(result, Err(VerifyError::InvalidProof));
}

/// Property 10: under concurrent verification of the same nonce by N
/// workers, exactly one commits and the rest are rejected as replays.
#[test]
fn concurrent_verification_of_same_nonce_has_exactly_one_winner() {
    let env = build_environment(1_000, 9, true, true);
    let verifier = std::sync::Arc::new(env.verifier);
    let parsed = std::sync::Arc::new(env.request.parse().expect("gate 1 passes"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let verifier = std::sync::Arc::clone(&verifier);
            let parsed = std::sync::Arc::clone(&parsed);
            std::thread::spawn(move || verifier.verify(&parsed, 1_000))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("verification worker does not panic"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let replays = results.iter().filter(|r| matches!(r, Err(VerifyError::Replay))).count();
    assert_eq!(successes, 1);
    assert_eq!(replays, results.len().saturating_sub(1));
}
