//! Timed display effects.
//!
//! Pulses and the replacement marker are transient: a presentation layer
//! shows them briefly and then they go away. [`DisplayEffects`] watches the
//! store's change notifications and clears each one after its display time.
//!
//! ```text
//! BetSlipStore --(broadcast)--> DisplayEffects
//!                                    |
//!                                    +-- OddsUpdated      -> clear pulse after 700 ms
//!                                    +-- marker set       -> clear marker after 800 ms
//! ```
//!
//! A newer pulse on the same outcome restarts its timer, and a new marker
//! replaces the pending marker timer. Timers expire by stamp, so one that
//! fires before its replacement is scheduled still leaves the newer pulse or
//! marker alone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::lifecycle::{ActiveGate, KeyedTasks};
use super::store::{BetSlipStore, StoreChange};
use crate::domain::{EventId, OutcomeId};

/// Default time a pulse stays visible.
pub const PULSE_CLEAR_MS: u64 = 700;

/// Default time the replacement marker stays visible.
pub const REPLACEMENT_CLEAR_MS: u64 = 800;

/// How long each transient indicator stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTimings {
    pub pulse_clear: Duration,
    pub replacement_clear: Duration,
}

impl Default for DisplayTimings {
    fn default() -> Self {
        Self {
            pulse_clear: Duration::from_millis(PULSE_CLEAR_MS),
            replacement_clear: Duration::from_millis(REPLACEMENT_CLEAR_MS),
        }
    }
}

/// Background service clearing pulses and the replacement marker.
pub struct DisplayEffects {
    timings: DisplayTimings,
}

impl DisplayEffects {
    #[must_use]
    pub fn new(timings: DisplayTimings) -> Self {
        Self { timings }
    }

    /// Subscribe to `store` and spawn the effects loop.
    ///
    /// Must be called from within a tokio runtime. The subscription is taken
    /// before returning, so no change made after `start` is missed.
    pub fn start(self, store: Arc<BetSlipStore>) -> DisplayEffectsHandle {
        let shared = Arc::new(EffectsShared {
            gate: ActiveGate::new(),
            pulse_timers: KeyedTasks::new(),
            marker_timer: KeyedTasks::new(),
            timings: self.timings,
        });
        let rx = store.subscribe();

        debug!(
            pulse_clear_ms = self.timings.pulse_clear.as_millis() as u64,
            replacement_clear_ms = self.timings.replacement_clear.as_millis() as u64,
            "Display effects started"
        );

        let task = tokio::spawn(run_loop(rx, store, Arc::clone(&shared)));
        DisplayEffectsHandle {
            shared,
            task: Some(task),
        }
    }
}

impl Default for DisplayEffects {
    fn default() -> Self {
        Self::new(DisplayTimings::default())
    }
}

struct EffectsShared {
    gate: ActiveGate,
    pulse_timers: KeyedTasks<OutcomeId>,
    /// Single slot; the key is unit.
    marker_timer: KeyedTasks<()>,
    timings: DisplayTimings,
}

async fn run_loop(
    mut rx: broadcast::Receiver<StoreChange>,
    store: Arc<BetSlipStore>,
    shared: Arc<EffectsShared>,
) {
    loop {
        match rx.recv().await {
            Ok(change) => {
                let handled = shared.gate.run(|| handle_change(&change, &store, &shared));
                if handled.is_none() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Display effects lagged, some changes missed");
            }
            Err(RecvError::Closed) => {
                info!("Store change channel closed");
                break;
            }
        }
    }
}

fn handle_change(change: &StoreChange, store: &Arc<BetSlipStore>, shared: &Arc<EffectsShared>) {
    match change {
        StoreChange::OddsUpdated { movements } => {
            for movement in movements {
                match movement.pulse_stamp {
                    Some(stamp) => {
                        schedule_pulse_clear(movement.outcome_id.clone(), stamp, store, shared);
                    }
                    None => shared.pulse_timers.abort(&movement.outcome_id),
                }
            }
        }
        StoreChange::ReplacementMarkerChanged {
            event_id: Some(event_id),
            stamp,
        } => schedule_marker_clear(event_id.clone(), *stamp, store, shared),
        StoreChange::ReplacementMarkerChanged { event_id: None, .. } => {
            shared.marker_timer.abort(&());
        }
        StoreChange::Initialized { .. } => {
            shared.pulse_timers.abort_all();
            shared.marker_timer.abort_all();
        }
        _ => {}
    }
}

fn schedule_pulse_clear(
    outcome_id: OutcomeId,
    stamp: u64,
    store: &Arc<BetSlipStore>,
    shared: &Arc<EffectsShared>,
) {
    let delay = shared.timings.pulse_clear;
    let store = Arc::clone(store);
    let task_shared = Arc::clone(shared);
    let key = outcome_id.clone();

    let timer = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(true) = task_shared
            .gate
            .run(|| store.expire_outcome_pulse(&outcome_id, stamp))
        {
            trace!(outcome = %outcome_id, "Pulse cleared");
        }
    });
    shared.pulse_timers.replace(key, timer);
}

fn schedule_marker_clear(
    event_id: EventId,
    stamp: u64,
    store: &Arc<BetSlipStore>,
    shared: &Arc<EffectsShared>,
) {
    let delay = shared.timings.replacement_clear;
    let store = Arc::clone(store);
    let task_shared = Arc::clone(shared);

    let timer = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(true) = task_shared
            .gate
            .run(|| store.expire_replacement_marker(stamp))
        {
            trace!(event = %event_id, "Replacement marker cleared");
        }
    });
    shared.marker_timer.replace((), timer);
}

/// Handle controlling a running [`DisplayEffects`] service.
///
/// Dropping the handle cancels the service and every pending timer.
pub struct DisplayEffectsHandle {
    shared: Arc<EffectsShared>,
    task: Option<JoinHandle<()>>,
}

impl DisplayEffectsHandle {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.gate.is_active()
    }

    /// Stop the service; no pending timer mutates the store afterwards.
    pub fn cancel(&self) {
        if self.shared.gate.close() {
            debug!("Display effects cancelled");
        }
        self.shared.pulse_timers.abort_all();
        self.shared.marker_timer.abort_all();
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Cancel and wait for the loop task to finish.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for DisplayEffectsHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OddsPulse, OddsUpdate};
    use crate::testkit::catalogue::{event_id, outcome_id, two_event_snapshot};

    fn store() -> Arc<BetSlipStore> {
        let store = Arc::new(BetSlipStore::new());
        store.initialize(two_event_snapshot());
        store
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn clears_pulse_after_display_time() {
        let store = store();
        let _effects = DisplayEffects::default().start(Arc::clone(&store));

        store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 1.8)]);
        sleep_ms(699).await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), Some(OddsPulse::Up));

        sleep_ms(2).await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), None);
        assert_eq!(store.state().live_odds(&outcome_id("outcome-1")), Some(1.8));
    }

    #[tokio::test(start_paused = true)]
    async fn newer_pulse_restarts_timer() {
        let store = store();
        let _effects = DisplayEffects::default().start(Arc::clone(&store));

        store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 1.8)]);
        sleep_ms(500).await;
        store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 1.6)]);
        sleep_ms(500).await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), Some(OddsPulse::Down));

        sleep_ms(201).await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn clears_replacement_marker_after_display_time() {
        let store = store();
        let _effects = DisplayEffects::default().start(Arc::clone(&store));

        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-1"));
        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-2"));
        sleep_ms(799).await;
        assert_eq!(store.state().last_replaced_event_id(), Some(&event_id("event-1")));

        sleep_ms(2).await;
        assert!(store.state().last_replaced_event_id().is_none());
        assert_eq!(store.state().selection_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiring_timer_keeps_a_pulse_raised_at_the_same_instant() {
        let store = store();
        let _effects = DisplayEffects::default().start(Arc::clone(&store));

        store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 1.8)]);
        sleep_ms(700).await;
        store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 1.6)]);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), Some(OddsPulse::Down));

        sleep_ms(699).await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), Some(OddsPulse::Down));
        sleep_ms(2).await;
        assert_eq!(store.state().pulse(&outcome_id("outcome-1")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn second_replacement_on_same_event_restarts_marker_timer() {
        let store = store();
        let _effects = DisplayEffects::default().start(Arc::clone(&store));

        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-1"));
        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-2"));
        sleep_ms(500).await;
        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-3"));

        sleep_ms(500).await;
        assert_eq!(store.state().last_replaced_event_id(), Some(&event_id("event-1")));
        sleep_ms(301).await;
        assert!(store.state().last_replaced_event_id().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_leaves_state_alone() {
        let store = store();
        let effects = DisplayEffects::default().start(Arc::clone(&store));

        store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 1.8)]);
        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-1"));
        store.select_outcome(&event_id("event-1"), &outcome_id("outcome-2"));
        sleep_ms(100).await;

        effects.cancel();
        assert!(!effects.is_active());

        sleep_ms(5_000).await;
        let state = store.state();
        assert_eq!(state.pulse(&outcome_id("outcome-1")), Some(OddsPulse::Up));
        assert_eq!(state.last_replaced_event_id(), Some(&event_id("event-1")));
    }
}
