use std::sync::Arc;

use betslip::application::{build_snapshot, BetSlipStore};
use betslip::domain::{EventId, OutcomeId, Snapshot};
use betslip::testkit::catalogue::sample_raw_events;

/// Shared store initialized with `snapshot`.
pub fn store_with(snapshot: Snapshot) -> Arc<BetSlipStore> {
    let store = Arc::new(BetSlipStore::new());
    store.initialize(snapshot);
    store
}

/// Shared store built from the testkit sample payload.
///
/// Event `1` holds outcomes `101`..`103` (2.1, 3.4, 3.6); event `2` holds
/// `201`..`203` (1.45, 4.2, 6.75).
pub fn sample_store() -> Arc<BetSlipStore> {
    store_with(build_snapshot(&sample_raw_events()))
}

pub fn ids(event: &str, outcome: &str) -> (EventId, OutcomeId) {
    (EventId::from(event), OutcomeId::from(outcome))
}
