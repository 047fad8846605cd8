use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::thread;

use ark_bn254::{Bn254, Fr};
use ark_circom::{CircomBuilder, CircomConfig, CircomReduction};
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::{Groth16, ProvingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use circuit_io::{AssembledInputs, InputValue};
use num_bigint::BigUint;
use poseidon::Fq;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::ProverError;
use crate::types::{ContractProof, ProofPackage};

/// Filesystem locations of the three artifacts a deployed circuit version
/// ships: the witness-calculator WASM, its paired R1CS, and the Groth16
/// proving key produced by the trusted setup.
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// Path to `circuit.wasm`.
    pub wasm_path: PathBuf,
    /// Path to the matching `.r1cs` file.
    pub r1cs_path: PathBuf,
    /// Path to `proving.key`.
    pub proving_key_path: PathBuf,
    /// If set, the SHA-256 digest over `(wasm bytes || r1cs bytes ||
    /// proving key bytes)` the caller expects. A mismatch at load time
    /// fails loudly rather than silently proving against an
    /// unrecognized artifact triple.
    pub expected_digest: Option<[u8; 32]>,
}

struct Artifacts {
    circom_config: CircomConfig<Fr>,
    proving_key: ProvingKey<Bn254>,
    digest: [u8; 32],
}

/// Owns one circuit version's artifacts, loading them on first use and
/// keeping them for as long as the context itself lives.
///
/// This is an explicit, caller-constructed object rather than a
/// process-wide singleton: a long-running service builds one at startup
/// and shares it by reference; a short-lived CLI invocation builds one
/// per run. Either way there is exactly one load per `ProverContext`,
/// and concurrent [`ProverContext::prove`] calls are safe because the
/// cached artifacts are read-only once populated.
pub struct ProverContext {
    config: ProverConfig,
    artifacts: OnceLock<Artifacts>,
}

impl ProverContext {
    /// Builds a context around `config`. No I/O happens until the first
    /// [`ProverContext::prove`] or [`ProverContext::artifact_digest`]
    /// call.
    pub fn new(config: ProverConfig) -> Self {
        ProverContext { config, artifacts: OnceLock::new() }
    }

    /// The loaded artifact set's digest, loading it first if necessary.
    pub fn artifact_digest(&self) -> Result<[u8; 32], ProverError> {
        Ok(self.artifacts()?.digest)
    }

    fn artifacts(&self) -> Result<&Artifacts, ProverError> {
        if let Some(artifacts) = self.artifacts.get() {
            return Ok(artifacts);
        }
        let loaded = Self::load(&self.config)?;
        Ok(self.artifacts.get_or_init(|| loaded))
    }

    fn load(config: &ProverConfig) -> Result<Artifacts, ProverError> {
        log::info!("loading circuit artifacts from {}", config.wasm_path.display());
        let wasm_bytes = read_artifact(&config.wasm_path)?;
        let r1cs_bytes = read_artifact(&config.r1cs_path)?;
        let pk_bytes = read_artifact(&config.proving_key_path)?;

        let digest = digest_artifacts(&wasm_bytes, &r1cs_bytes, &pk_bytes);
        if let Some(expected) = config.expected_digest {
            if expected != digest {
                return Err(ProverError::ArtifactError(
                    "circuit artifact digest does not match the expected parameter hash".into(),
                ));
            }
        }

        let circom_config = CircomConfig::<Fr>::new(&config.wasm_path, &config.r1cs_path)
            .map_err(|e| ProverError::ArtifactError(format!("loading circom config: {e}")))?;
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(pk_bytes.as_slice())
            .map_err(|e| ProverError::ArtifactError(format!("deserializing proving key: {e}")))?;

        log::info!("circuit artifacts loaded, digest {}", hex::encode(digest));
        Ok(Artifacts { circom_config, proving_key, digest })
    }

    /// Generates a Groth16 proof for `assembled` against this context's
    /// circuit.
    ///
    /// This is the long CPU-bound operation in the pipeline: typically
    /// seconds on commodity hardware. The proof itself does not consult
    /// any root history or nonce ledger state; those are the verifier's
    /// concern.
    pub fn prove(&self, assembled: &AssembledInputs) -> Result<ProofPackage, ProverError> {
        let artifacts = self.artifacts()?;
        let mut builder = CircomBuilder::new(artifacts.circom_config.clone());
        for (name, value) in &assembled.signals {
            match value {
                InputValue::Single(raw) => builder.push_input(name, parse_decimal(raw)?),
                InputValue::Array(values) => {
                    for raw in values {
                        builder.push_input(name, parse_decimal(raw)?);
                    }
                }
            }
        }

        let circuit = builder
            .build()
            .map_err(|e| ProverError::WitnessError(format!("building witness: {e}")))?;
        let public_inputs = circuit
            .get_public_inputs()
            .ok_or_else(|| ProverError::WitnessError("circuit exposed no public inputs".into()))?;
        if public_inputs.len() != 7 {
            return Err(ProverError::UnexpectedPublicSignalCount { got: public_inputs.len() });
        }

        let mut rng = OsRng;
        let proof = Groth16::<Bn254, CircomReduction>::prove(&artifacts.proving_key, circuit, &mut rng)
            .map_err(|e| ProverError::ProvingError(e.to_string()))?;

        let mut public_signals = [Fq::zero(); 7];
        for (slot, value) in public_signals.iter_mut().zip(public_inputs.iter()) {
            *slot = fr_to_fq(*value);
        }

        Ok(ProofPackage { proof, public_signals })
    }

    /// A purely informational estimate of how long [`Self::prove`] will
    /// take, based on available parallelism. Not used for any control
    /// flow; callers may use it to decide whether to show a progress
    /// indicator.
    pub fn estimated_latency_seconds(&self) -> f64 {
        let parallelism = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / (parallelism.min(16) as f64).sqrt();
        (12.0 * scale).max(2.0)
    }
}

/// Reformats a [`ProofPackage`] into the on-chain verifier ABI layout:
/// `pA`, transposed `pB`, `pC`, and the seven public signals, all as
/// canonical decimal strings.
pub fn format_for_contract(pkg: &ProofPackage) -> ContractProof {
    let a = pkg.proof.a;
    let b = pkg.proof.b;
    let c = pkg.proof.c;

    ContractProof {
        p_a: [decimal_of(a.x), decimal_of(a.y)],
        p_b: [
            [decimal_of(b.x.c1), decimal_of(b.x.c0)],
            [decimal_of(b.y.c1), decimal_of(b.y.c0)],
        ],
        p_c: [decimal_of(c.x), decimal_of(c.y)],
        pub_signals: pkg.public_signals.map(|fq| BigUint::from_bytes_be(&fq.to_be_bytes()).to_str_radix(10)),
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ProverError> {
    std::fs::read(path)
        .map_err(|e| ProverError::ArtifactError(format!("reading {}: {e}", path.display())))
}

fn digest_artifacts(wasm: &[u8], r1cs: &[u8], proving_key: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(wasm);
    hasher.update(r1cs);
    hasher.update(proving_key);
    hasher.finalize().into()
}

fn parse_decimal(raw: &str) -> Result<num_bigint::BigInt, ProverError> {
    num_bigint::BigInt::from_str(raw)
        .map_err(|e| ProverError::WitnessError(format!("signal {raw:?} is not a decimal integer: {e}")))
}

fn fr_to_fq(fr: Fr) -> Fq {
    let mut be = fr.into_bigint().to_bytes_be();
    if be.len() < poseidon::FQ_BYTE_LEN {
        let mut padded = vec![0u8; poseidon::FQ_BYTE_LEN.saturating_sub(be.len())];
        padded.extend_from_slice(&be);
        be = padded;
    }
    let array: [u8; poseidon::FQ_BYTE_LEN] = be[..poseidon::FQ_BYTE_LEN].try_into().unwrap_or([0u8; poseidon::FQ_BYTE_LEN]);
    Fq::from_be_bytes_reduced(&array)
}

fn decimal_of(value: impl PrimeField) -> String {
    BigUint::from_bytes_be(&value.into_bigint().to_bytes_be()).to_str_radix(10)
}
