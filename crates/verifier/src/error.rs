/// Failure kinds for a verification attempt, one per §4.F gate family.
///
/// Gates 1-7 are non-cryptographic and may be surfaced with their
/// specific reason; gate 2 and gate 8 failures are both flattened to
/// [`VerifyError::InvalidProof`] so a caller can never distinguish "the
/// circuit said invalid" from "the pairing check failed", which would
/// otherwise leak validator internals.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Gate 1: the public signals were not exactly seven valid field
    /// elements, or the proof bytes did not parse.
    #[error("malformed request: {0}")]
    InputShape(String),
    /// Gate 3: the proof's bound `eventId` does not match the request's
    /// event.
    #[error("wrong event")]
    EventMismatch,
    /// Gate 4 or 5: the nonce has already expired, or the proof's
    /// claimed timestamp is outside the freshness window.
    #[error("proof expired")]
    Expired,
    /// Gate 6: the proof's Merkle root is not the event's current root
    /// nor within the retained history window.
    #[error("ticket state changed; retry")]
    StaleRoot,
    /// Gate 7 or the gate-9 commit race: this nonce has already been
    /// spent.
    #[error("already used")]
    Replay,
    /// Gate 2 (`valid` output was zero) or gate 8 (pairing check
    /// failed). Deliberately generic.
    #[error("invalid")]
    InvalidProof,
    /// Gate 9: the nonce ledger could not be read or written. The only
    /// retryable failure kind.
    #[error("temporarily unavailable: {0}")]
    LedgerUnavailable(String),
}
