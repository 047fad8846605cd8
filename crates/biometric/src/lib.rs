//! Biometric template reduction and commitment construction.
//!
//! Maps a raw, device-captured biometric template (a vector of real-valued
//! measurements) into the fixed sixteen-element field vector the circuit
//! consumes, and builds/opens the hiding commitment stored server-side.

#![forbid(unsafe_code)]

mod commitment;
mod error;
mod template;

pub use commitment::{make_commitment, verify_commitment, BiometricCommitment};
pub use error::BiometricError;
pub use template::{compare_templates, process_template, CHUNKS, MATCH_THRESHOLD, SCALE_FACTOR};
