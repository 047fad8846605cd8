/// Failure kinds for the prover driver.
#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    /// Loading `circuit.wasm`, `proving.key`, or the paired R1CS failed,
    /// or the artifacts' computed parameter hash disagreed with the one
    /// the caller expected.
    #[error("circuit artifact error: {0}")]
    ArtifactError(String),
    /// Pushing the assembled signals through the circom witness
    /// calculator failed (a malformed or out-of-range signal value).
    #[error("witness generation failed: {0}")]
    WitnessError(String),
    /// The Groth16 proving algorithm itself failed.
    #[error("proof generation failed: {0}")]
    ProvingError(String),
    /// The circuit exposed a different number of public signals than the
    /// seven this workspace's statement always carries.
    #[error("expected 7 public signals, circuit exposed {got}")]
    UnexpectedPublicSignalCount {
        /// The number of public signals the circuit actually exposed.
        got: usize,
    },
}
