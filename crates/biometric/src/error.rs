/// Failure kinds for biometric template processing and comparison.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BiometricError {
    /// `compareTemplates` was called with vectors of different lengths.
    #[error("template length mismatch: {a} vs {b}")]
    LengthMismatch {
        /// Length of the first vector.
        a: usize,
        /// Length of the second vector.
        b: usize,
    },
}
