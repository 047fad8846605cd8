//! Test-only Groth16 circuit and wiring helpers.
//!
//! No compiled circom artifacts live in this workspace, so these tests
//! drive a real setup/prove/verify cycle against [`ToyTicketCircuit`]
//! instead of going through `prover`. The circuit only constrains each
//! public signal to equal a matching witness value; it says nothing
//! about ticket ownership, Merkle inclusion or biometric matching.
//! `verifier::Verifier` cannot tell the difference — it only ever sees
//! a proof and the seven public signals — so exercising it against a
//! trivial circuit still exercises every one of its nine gates
//! faithfully.

use ark_bn254::{Bn254, Fr};
use ark_ff::PrimeField;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_serialize::CanonicalSerialize;
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use num_bigint::BigUint;
use poseidon::Fq;
use verifier::WireVerificationRequest;

/// Seven public signals in statement order: `(valid, merkleRoot,
/// biometricCommitment, eventId, currentTimestamp, nonce,
/// nonceExpiry)`.
#[derive(Clone)]
pub struct ToyTicketCircuit {
    pub public_signals: [Option<Fr>; 7],
}

impl ConstraintSynthesizer<Fr> for ToyTicketCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        for value in self.public_signals {
            let public = FpVar::new_input(cs.clone(), || value.ok_or(SynthesisError::AssignmentMissing))?;
            let witness = FpVar::new_witness(cs.clone(), || value.ok_or(SynthesisError::AssignmentMissing))?;
            public.enforce_equal(&witness)?;
        }
        Ok(())
    }
}

/// A deterministic test RNG. Not suitable for anything but tests.
fn test_rng() -> StdRng {
    StdRng::seed_from_u64(0x71CC_E7)
}

/// Runs the trusted-setup ceremony for [`ToyTicketCircuit`] once.
pub fn setup() -> (ProvingKey<Bn254>, VerifyingKey<Bn254>) {
    let circuit = ToyTicketCircuit { public_signals: [None; 7] };
    Groth16::<Bn254>::setup(circuit, &mut test_rng()).expect("toy circuit setup succeeds")
}

/// Proves the seven-signal statement `signals` satisfied, returning the
/// proof in the same shape a real circom-derived proof would take.
pub fn prove(pk: &ProvingKey<Bn254>, signals: [Fq; 7]) -> Proof<Bn254> {
    let witness: [Option<Fr>; 7] = signals.map(|fq| Some(fq_to_fr(fq)));
    let circuit = ToyTicketCircuit { public_signals: witness };
    Groth16::<Bn254>::prove(pk, circuit, &mut test_rng()).expect("toy circuit proof generation succeeds")
}

/// Converts a [`poseidon::Fq`] scalar to the arkworks `Fr` the toy
/// circuit and its SNARK machinery operate on natively. Both wrap the
/// same BN254 scalar field, so this never reduces a value.
pub fn fq_to_fr(value: Fq) -> Fr {
    let mut le = value.to_be_bytes();
    le.reverse();
    Fr::from_le_bytes_mod_order(&le)
}

fn decimal(value: Fq) -> String {
    BigUint::from_bytes_be(&value.to_be_bytes()).to_str_radix(10)
}

/// Assembles the wire form of a verification request: hex-encodes the
/// proof and decimal-encodes every public signal, exactly as a real
/// holder's client would before submitting it for verification.
pub fn wire_request(
    event_id: Fq,
    ticket_id: Option<&str>,
    proof: &Proof<Bn254>,
    public_signals: [Fq; 7],
) -> WireVerificationRequest {
    let mut proof_bytes = Vec::new();
    proof.serialize_compressed(&mut proof_bytes).expect("proof serializes");

    WireVerificationRequest {
        event_id: decimal(event_id),
        ticket_id: ticket_id.map(str::to_owned),
        proof_hex: hex::encode(proof_bytes),
        public_signals: public_signals.map(decimal),
    }
}
