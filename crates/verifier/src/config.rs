use merkle::DEFAULT_HISTORY_SIZE;

/// Verifier-wide tunables, constructed explicitly and passed by
/// reference rather than read from a global: the number of historical
/// roots to tolerate, the proof-freshness window, and the clock-skew
/// margin subtracted (never added) from the expiry check.
#[derive(Debug, Clone, Copy)]
pub struct VerifierConfig {
    /// `H`: how many of the most recent roots per event remain
    /// acceptable. A source that only checks the current root would
    /// reject in-flight proofs across a root rotation; this defaults to
    /// at least 16 to tolerate that.
    pub history_size: usize,
    /// Gate 5: the maximum allowed distance between a proof's claimed
    /// `currentTimestamp` and wall-clock time, in either direction.
    pub freshness_window_secs: u64,
    /// Gate 4: subtracted from wall-clock time before comparing against
    /// `nonceExpiry`, to tolerate clock skew between holder and
    /// verifier. Never added.
    pub clock_skew_margin_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            history_size: DEFAULT_HISTORY_SIZE,
            freshness_window_secs: 300,
            clock_skew_margin_secs: 0,
        }
    }
}
