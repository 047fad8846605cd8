/// Failure kinds for circuit input assembly.
///
/// Every variant here corresponds to a pre-prove rejection the assembler
/// must make before the (expensive) prover is ever invoked.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssemblerError {
    /// The private `eventId` disagrees with the public `eventId` the
    /// request is bound to.
    #[error("private eventId does not match public eventId")]
    EventMismatch,
    /// `currentTimestamp` is after `nonceExpiry`; such a proof could never
    /// pass the verifier's expiry gate, so it is rejected before proving.
    #[error("currentTimestamp {current_timestamp} is after nonceExpiry {nonce_expiry}")]
    TimestampAfterExpiry {
        /// The proposed proof timestamp.
        current_timestamp: u64,
        /// The proposed nonce expiry.
        nonce_expiry: u64,
    },
    /// The Merkle path elements/indices did not both have length
    /// [`merkle::CIRCUIT_DEPTH`](merkle::CIRCUIT_DEPTH).
    #[error("merkle path length mismatch: {elements} elements, {indices} indices, depth {depth}")]
    PathLengthMismatch {
        /// Number of path elements supplied.
        elements: usize,
        /// Number of path indices supplied.
        indices: usize,
        /// Expected depth.
        depth: usize,
    },
    /// Rendering the signal map as JSON failed. Never expected in
    /// practice since every value is a plain string or array of
    /// strings, but surfaced rather than unwrapped.
    #[error("failed to serialize assembled inputs: {0}")]
    Serialization(String),
}
