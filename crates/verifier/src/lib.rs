//! Verification of ticket-validity proofs: the nine-gate pipeline that
//! turns a wire-format proof package into an accept/reject decision,
//! plus the per-event root history and the nonce ledger/audit log that
//! back it.

mod config;
mod error;
mod ledger;
mod request;
mod roots;
mod verifier;

pub use config::VerifierConfig;
pub use error::VerifyError;
pub use ledger::{AuditEntry, CommitOutcome, Storage, TICKET_ID_PLACEHOLDER};
pub use request::{VerificationRequest, WireVerificationRequest};
pub use roots::RootRegistry;
pub use verifier::{VerifiedReceipt, Verifier};
