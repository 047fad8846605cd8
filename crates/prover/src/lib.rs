//! Groth16 proof generation against the ticket-ownership/biometric
//! relation, and formatting of the resulting proof for the on-chain
//! verifier ABI.
//!
//! Artifact loading (the witness-calculator WASM, its R1CS, and the
//! proving key from the trusted setup) is lazy and process-lifetime
//! cached inside a [`ProverContext`]; building one does no I/O.

#![forbid(unsafe_code)]

mod context;
mod error;
mod types;

pub use context::{format_for_contract, ProverConfig, ProverContext};
pub use error::ProverError;
pub use types::{ContractProof, ProofPackage};

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ark_bn254::{Bn254, Fr, G1Projective, G2Projective};
    use ark_ec::{CurveGroup, Group};
    use ark_groth16::Proof;
    use ark_std::UniformRand;
    use poseidon::Fq;

    use super::*;

    fn dummy_proof() -> Proof<Bn254> {
        let mut rng = ark_std::test_rng();
        Proof {
            a: (G1Projective::generator() * Fr::rand(&mut rng)).into_affine(),
            b: (G2Projective::generator() * Fr::rand(&mut rng)).into_affine(),
            c: (G1Projective::generator() * Fr::rand(&mut rng)).into_affine(),
        }
    }

    #[test]
    fn missing_artifact_is_an_artifact_error() {
        let config = ProverConfig {
            wasm_path: PathBuf::from("/nonexistent/circuit.wasm"),
            r1cs_path: PathBuf::from("/nonexistent/circuit.r1cs"),
            proving_key_path: PathBuf::from("/nonexistent/proving.key"),
            expected_digest: None,
        };
        let ctx = ProverContext::new(config);
        let err = ctx.artifact_digest().expect_err("artifacts do not exist");
        assert!(matches!(err, ProverError::ArtifactError(_)));
    }

    #[test]
    fn estimated_latency_is_within_a_sane_bound() {
        let ctx = ProverContext::new(ProverConfig {
            wasm_path: PathBuf::from("/nonexistent/circuit.wasm"),
            r1cs_path: PathBuf::from("/nonexistent/circuit.r1cs"),
            proving_key_path: PathBuf::from("/nonexistent/proving.key"),
            expected_digest: None,
        });
        let latency = ctx.estimated_latency_seconds();
        assert!(latency >= 2.0 && latency <= 15.0);
    }

    #[test]
    fn format_for_contract_orders_public_signals() {
        let public_signals = [
            Fq::one(),
            Fq::from_u64(1),
            Fq::from_u64(2),
            Fq::from_u64(12345),
            Fq::from_u64(1_000),
            Fq::from_u64(3),
            Fq::from_u64(1_060),
        ];
        let pkg = ProofPackage { proof: dummy_proof(), public_signals };
        let contract = format_for_contract(&pkg);
        assert_eq!(contract.pub_signals[0], "1");
        assert_eq!(contract.pub_signals[3], "12345");
        assert_eq!(contract.p_a.len(), 2);
        assert_eq!(contract.p_b.len(), 2);
    }
}
