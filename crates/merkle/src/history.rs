use std::collections::VecDeque;

use poseidon::Fq;

/// Default retained root-history depth, `H` in the design: a proof against
/// any of the last 16 roots is still accepted.
pub const DEFAULT_HISTORY_SIZE: usize = 16;

/// A bounded, append-only ring of recently published roots for one event.
///
/// The verifier accepts a proof whose `merkleRoot` signal equals the
/// current root or any of the retained historical roots, so that proofs
/// already in flight remain verifiable across a root rotation caused by a
/// concurrent ticket mint.
pub struct RootHistory {
    bound: usize,
    roots: VecDeque<Fq>,
}

impl RootHistory {
    /// Builds an empty history retaining at most `bound` roots.
    ///
    /// # Panics
    /// Panics if `bound` is zero: a history that retains nothing could
    /// never accept any proof, including one against the just-recorded
    /// root.
    pub fn new(bound: usize) -> Self {
        assert!(bound > 0, "root history bound must be at least 1");
        RootHistory {
            bound,
            roots: VecDeque::with_capacity(bound),
        }
    }

    /// Appends `root`, evicting the oldest entry if the history is at its
    /// bound.
    pub fn record(&mut self, root: Fq) {
        if self.roots.len() == self.bound {
            self.roots.pop_front();
        }
        self.roots.push_back(root);
    }

    /// The most recently recorded root, if any.
    pub fn current(&self) -> Option<Fq> {
        self.roots.back().copied()
    }

    /// Whether `root` is the current root or within the retained window.
    pub fn is_known(&self, root: Fq) -> bool {
        self.roots.contains(&root)
    }

    /// Number of roots currently retained.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether no root has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_beyond_bound() {
        let mut history = RootHistory::new(2);
        let r0 = Fq::from_u64(1);
        let r1 = Fq::from_u64(2);
        let r2 = Fq::from_u64(3);
        history.record(r0);
        history.record(r1);
        history.record(r2);
        assert!(!history.is_known(r0));
        assert!(history.is_known(r1));
        assert!(history.is_known(r2));
    }

    #[test]
    fn unknown_root_is_rejected() {
        let mut history = RootHistory::new(16);
        history.record(Fq::from_u64(1));
        assert!(!history.is_known(Fq::from_u64(42)));
    }
}
