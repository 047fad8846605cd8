/// Errors produced while validating a Poseidon parameter set.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// The caller's compiled-in parameter digest does not match the one
    /// generated at runtime for the requested arity.
    #[error("poseidon parameter digest mismatch for arity {arity}: expected {expected}, got {actual}")]
    DigestMismatch {
        /// The requested state width.
        arity: usize,
        /// The digest the caller expected.
        expected: String,
        /// The digest actually produced.
        actual: String,
    },
    /// A state width outside the supported set ({2, 5, 16}) was requested.
    #[error("unsupported poseidon arity: {0}")]
    UnsupportedArity(usize),
}
