use std::collections::HashMap;
use std::sync::Mutex;

use merkle::RootHistory;
use poseidon::{Fq, FQ_BYTE_LEN};

/// Per-event root histories, keyed by event id.
///
/// Append-only per event (§5): pushing a new root never removes an
/// entry except by the history's own bound, and a short mutex is
/// sufficient since root publication is infrequent relative to
/// verification traffic.
pub struct RootRegistry {
    bound: usize,
    events: Mutex<HashMap<[u8; FQ_BYTE_LEN], RootHistory>>,
}

impl RootRegistry {
    /// Builds an empty registry; every event's history will retain at
    /// most `bound` roots.
    pub fn new(bound: usize) -> Self {
        RootRegistry { bound, events: Mutex::new(HashMap::new()) }
    }

    /// Publishes a new root for `event`, the sink the ticketing pipeline
    /// calls on mint. Creates the event's history on first use.
    pub fn record_root(&self, event: Fq, root: Fq) {
        let mut events = self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        events.entry(event.to_be_bytes()).or_insert_with(|| RootHistory::new(self.bound)).record(root);
    }

    /// Gate 6: whether `root` is the current root of `event` or within
    /// its retained history window.
    pub fn is_known(&self, event: Fq, root: Fq) -> bool {
        let events = self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        events.get(&event.to_be_bytes()).is_some_and(|history| history.is_known(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_event_has_no_known_roots() {
        let registry = RootRegistry::new(4);
        assert!(!registry.is_known(Fq::from_u64(1), Fq::from_u64(2)));
    }

    #[test]
    fn records_and_recognizes_roots_per_event() {
        let registry = RootRegistry::new(2);
        let event = Fq::from_u64(12345);
        registry.record_root(event, Fq::from_u64(1));
        registry.record_root(event, Fq::from_u64(2));
        registry.record_root(event, Fq::from_u64(3));

        assert!(!registry.is_known(event, Fq::from_u64(1)));
        assert!(registry.is_known(event, Fq::from_u64(2)));
        assert!(registry.is_known(event, Fq::from_u64(3)));
        assert!(!registry.is_known(Fq::from_u64(99999), Fq::from_u64(3)));
    }
}
