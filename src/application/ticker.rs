//! Background odds ticker.
//!
//! Simulates a live feed by repeatedly locking a random subset of outcomes
//! and, after a short lock duration, applying new odds to them.
//!
//! # Architecture
//!
//! ```text
//! loop task:   sleep(interval) -> build updates -> lock targets -> spawn apply -> repeat
//!                                                                      |
//! apply task:                                  sleep(lock duration) -> apply updates
//! ```
//!
//! The next interval starts as soon as the apply task is spawned, so one
//! tick's lock wait can overlap the next tick's interval wait.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use super::lifecycle::{ActiveGate, TaskSet};
use super::store::BetSlipStore;
use crate::domain::{OddsEngine, OddsUpdate, RandomSource, StdRandom};

/// Periodic odds mutator driven by an [`OddsEngine`].
pub struct OddsTicker<R = StdRandom> {
    engine: OddsEngine<R>,
}

impl<R: RandomSource + 'static> OddsTicker<R> {
    pub fn new(engine: OddsEngine<R>) -> Self {
        Self { engine }
    }

    /// Spawn the ticker loop against `store`.
    ///
    /// Must be called from within a tokio runtime. The loop runs until the
    /// returned handle is cancelled, shut down or dropped.
    pub fn start(self, store: Arc<BetSlipStore>) -> TickerHandle {
        let shared = Arc::new(TickerShared {
            gate: ActiveGate::new(),
            pending: TaskSet::default(),
        });

        let bounds = self.engine.bounds();
        info!(
            min_interval_ms = bounds.min_interval_ms,
            max_interval_ms = bounds.max_interval_ms,
            min_lock_ms = bounds.min_lock_ms,
            max_lock_ms = bounds.max_lock_ms,
            "Odds ticker started"
        );

        let task = tokio::spawn(run_loop(self.engine, store, Arc::clone(&shared)));
        TickerHandle {
            shared,
            task: Some(task),
        }
    }
}

struct TickerShared {
    gate: ActiveGate,
    /// In-flight apply continuations.
    pending: TaskSet,
}

async fn run_loop<R: RandomSource>(
    mut engine: OddsEngine<R>,
    store: Arc<BetSlipStore>,
    shared: Arc<TickerShared>,
) {
    loop {
        let interval_ms = engine.random_interval_ms();
        tokio::time::sleep(Duration::from_millis(interval_ms)).await;

        let ticked = shared.gate.run(|| {
            let updates = engine.build_random_updates(&store.odds_snapshot());
            if updates.is_empty() {
                trace!("Tick skipped, no outcomes");
                return;
            }

            let lock_ms = engine.random_lock_duration_ms();
            store.set_outcome_locks(updates.iter().map(|update| &update.outcome_id), true);
            debug!(targets = updates.len(), lock_ms, "Tick locked outcomes");

            let apply = tokio::spawn(apply_after(
                Duration::from_millis(lock_ms),
                updates,
                Arc::clone(&store),
                Arc::clone(&shared),
            ));
            shared.pending.push(apply);
        });

        if ticked.is_none() {
            break;
        }
    }
}

async fn apply_after(
    delay: Duration,
    updates: Vec<OddsUpdate>,
    store: Arc<BetSlipStore>,
    shared: Arc<TickerShared>,
) {
    tokio::time::sleep(delay).await;
    if shared
        .gate
        .run(|| store.apply_odds_updates(&updates))
        .is_some()
    {
        trace!(updates = updates.len(), "Tick applied odds");
    }
}

/// Handle controlling a running [`OddsTicker`].
///
/// Dropping the handle cancels the ticker.
pub struct TickerHandle {
    shared: Arc<TickerShared>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.gate.is_active()
    }

    /// Number of lock-duration continuations still waiting to apply.
    #[must_use]
    pub fn pending_applies(&self) -> usize {
        self.shared.pending.len()
    }

    /// Stop the ticker.
    ///
    /// Once this returns the store will not be touched by the ticker again,
    /// even by a timer that has already elapsed.
    pub fn cancel(&self) {
        if self.shared.gate.close() {
            info!("Odds ticker cancelled");
        }
        self.shared.pending.abort_all();
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Cancel and wait for the loop task to finish.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            // Aborted tasks resolve to a cancellation error.
            let _ = task.await;
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OddsPulse, TimingBounds};
    use crate::testkit::catalogue::{outcome_id, single_event_snapshot};
    use crate::testkit::random::ConstantRandom;

    // A constant 0.0 picks the minimum interval (10 s), the minimum lock
    // (300 ms) and the 0.9 multiplier on every draw.
    fn start_ticker(store: &Arc<BetSlipStore>) -> TickerHandle {
        OddsTicker::new(OddsEngine::new(ConstantRandom::new(0.0))).start(Arc::clone(store))
    }

    fn store() -> Arc<BetSlipStore> {
        let store = Arc::new(BetSlipStore::new());
        store.initialize(single_event_snapshot());
        store
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_happens_before_the_first_interval() {
        let store = store();
        let _ticker = start_ticker(&store);

        sleep_ms(9_999).await;
        let state = store.state();
        assert!(state.locked_outcomes().is_empty());
        assert!(state.pulses().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn locks_then_applies() {
        let store = store();
        let before = store.odds_snapshot();
        let ticker = start_ticker(&store);

        sleep_ms(10_001).await;
        let locked: Vec<_> = store.state().locked_outcomes().iter().cloned().collect();
        assert_eq!(locked.len(), 1, "a quarter of three outcomes rounds up to one");
        let target = locked[0].clone();
        assert_eq!(store.state().live_odds(&target), before.get(&target).copied());
        assert_eq!(ticker.pending_applies(), 1);

        sleep_ms(300).await;
        let state = store.state();
        assert!(state.locked_outcomes().is_empty());
        let expected = crate::domain::round_odds(before[&target] * 0.9);
        assert_eq!(state.live_odds(&target), Some(expected));
        assert_eq!(state.pulse(&target), Some(OddsPulse::Down));

        for (id, odds) in &before {
            if id != &target {
                assert_eq!(state.live_odds(id), Some(*odds));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_ticking() {
        let store = store();
        let _ticker = start_ticker(&store);

        sleep_ms(10_301).await;
        let first = store.odds_snapshot();
        sleep_ms(10_000).await;
        assert_ne!(store.odds_snapshot(), first);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_in_flight_apply() {
        let store = store();
        let ticker = start_ticker(&store);

        sleep_ms(10_001).await;
        let locked = store.state().locked_outcomes().clone();
        let odds = store.odds_snapshot();
        assert_eq!(locked.len(), 1);

        ticker.cancel();
        assert!(!ticker.is_active());

        sleep_ms(60_000).await;
        let state = store.state();
        assert_eq!(state.locked_outcomes(), &locked);
        assert_eq!(store.odds_snapshot(), odds);
        assert!(state.pulses().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels() {
        let store = store();
        drop(start_ticker(&store));

        sleep_ms(60_000).await;
        assert!(store.state().locked_outcomes().is_empty());
        assert!(store.state().pulses().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_the_loop() {
        let store = store();
        let ticker = start_ticker(&store);
        ticker.shutdown().await;

        sleep_ms(60_000).await;
        assert!(store.state().locked_outcomes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_store_skips_ticks() {
        let store = Arc::new(BetSlipStore::new());
        let _ticker = start_ticker(&store);

        sleep_ms(30_000).await;
        assert!(store.odds_snapshot().is_empty());
        assert!(store.state().locked_outcomes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_bounds_are_honoured() {
        let store = store();
        let bounds = TimingBounds {
            min_interval_ms: 50,
            max_interval_ms: 50,
            min_lock_ms: 10,
            max_lock_ms: 10,
        };
        let _ticker = OddsTicker::new(OddsEngine::with_bounds(ConstantRandom::new(0.0), bounds))
            .start(Arc::clone(&store));

        sleep_ms(51).await;
        assert_eq!(store.state().locked_outcomes().len(), 1);
        sleep_ms(10).await;
        assert!(store.state().locked_outcomes().is_empty());
        assert_eq!(store.state().pulses().len(), 1);
        assert_eq!(store.state().pulse(&outcome_id("outcome-2")), Some(OddsPulse::Down));
    }
}
