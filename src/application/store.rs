//! Thread-safe bet-slip store with change notifications.
//!
//! [`BetSlipStore`] is the single source of truth for the catalogue, live
//! odds, locks, pulses, selections and stake. Every action takes the write
//! lock once, computes its result from that one consistent view of the prior
//! state, and publishes what changed on a broadcast channel before releasing
//! the lock.
//!
//! ```text
//! user actions ----+
//!                  +--> BetSlipStore --(broadcast)--> StoreChange subscribers
//! OddsTicker ------+
//! ```
//!
//! User-facing actions never fail: invalid input is coerced or ignored.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use super::selectors;
use crate::domain::odds::is_valid_live_odds;
use crate::domain::{
    is_valid_odds, BetId, BetSelection, Catalogue, EventId, OddsMap, OddsPulse, OddsUpdate,
    OutcomeId, PlacedBet, Snapshot,
};

/// Default broadcast buffer for change notifications.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 1024;

/// One applied odds change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsMovement {
    pub outcome_id: OutcomeId,
    /// Odds before the update, if the outcome had any.
    pub previous: Option<f64>,
    pub odds: f64,
    pub pulse: Option<OddsPulse>,
    /// Stamp of the raised pulse, for [`BetSlipStore::expire_outcome_pulse`].
    pub pulse_stamp: Option<u64>,
    /// Whether the update released a lock.
    pub unlocked: bool,
}

/// Notification published after a store action changed state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreChange {
    Initialized { events: usize, outcomes: usize },
    SelectionsChanged { count: usize },
    StakeChanged { stake: f64 },
    LocksChanged { outcome_ids: Vec<OutcomeId>, locked: bool },
    OddsUpdated { movements: Vec<OddsMovement> },
    PulseCleared { outcome_id: OutcomeId },
    /// `stamp` identifies this marker for [`BetSlipStore::expire_replacement_marker`].
    ReplacementMarkerChanged { event_id: Option<EventId>, stamp: u64 },
    BetPlaced { bet_id: BetId },
}

/// Complete store state.
///
/// Obtained as a consistent clone through [`BetSlipStore::state`] or
/// borrowed inside [`BetSlipStore::read`].
#[derive(Debug, Clone, Default)]
pub struct BetSlipState {
    catalogue: Arc<Catalogue>,
    odds: OddsMap,
    pulses: HashMap<OutcomeId, OddsPulse>,
    locked: HashSet<OutcomeId>,
    selections: BTreeMap<EventId, BetSelection>,
    stake: f64,
    last_replaced_event_id: Option<EventId>,
    /// Last stamp handed out to a pulse or marker. Never reset.
    stamp: u64,
    pulse_stamps: HashMap<OutcomeId, u64>,
    marker_stamp: u64,
}

impl BetSlipState {
    /// Build a fresh state from a snapshot, everything else empty.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            catalogue: Arc::new(snapshot.catalogue),
            odds: snapshot.odds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Live odds for every outcome.
    #[must_use]
    pub const fn odds(&self) -> &OddsMap {
        &self.odds
    }

    /// Live odds for one outcome.
    #[must_use]
    pub fn live_odds(&self, outcome_id: &OutcomeId) -> Option<f64> {
        self.odds.get(outcome_id).copied()
    }

    #[must_use]
    pub fn pulse(&self, outcome_id: &OutcomeId) -> Option<OddsPulse> {
        self.pulses.get(outcome_id).copied()
    }

    #[must_use]
    pub const fn pulses(&self) -> &HashMap<OutcomeId, OddsPulse> {
        &self.pulses
    }

    #[must_use]
    pub fn is_locked(&self, outcome_id: &OutcomeId) -> bool {
        self.locked.contains(outcome_id)
    }

    #[must_use]
    pub const fn locked_outcomes(&self) -> &HashSet<OutcomeId> {
        &self.locked
    }

    /// Current selections, ordered by event id.
    pub fn selections(&self) -> impl Iterator<Item = &BetSelection> {
        self.selections.values()
    }

    #[must_use]
    pub fn selection(&self, event_id: &EventId) -> Option<&BetSelection> {
        self.selections.get(event_id)
    }

    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub const fn stake(&self) -> f64 {
        self.stake
    }

    /// Event whose selection was most recently replaced by another outcome.
    #[must_use]
    pub const fn last_replaced_event_id(&self) -> Option<&EventId> {
        self.last_replaced_event_id.as_ref()
    }

    fn next_stamp(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }

    fn initialize(&mut self, snapshot: Snapshot, changes: &mut Vec<StoreChange>) {
        // Stamps survive re-initialization so a stale timer can never match.
        let stamp = self.stamp;
        *self = Self::from_snapshot(snapshot);
        self.stamp = stamp;
        changes.push(StoreChange::Initialized {
            events: self.catalogue.event_ids.len(),
            outcomes: self.catalogue.outcomes.len(),
        });
    }

    /// Setting a marker always restamps it, even for the same event.
    fn set_replacement_marker(&mut self, marker: Option<EventId>, changes: &mut Vec<StoreChange>) {
        if marker.is_none() && self.last_replaced_event_id.is_none() {
            return;
        }
        let stamp = self.next_stamp();
        self.marker_stamp = stamp;
        self.last_replaced_event_id.clone_from(&marker);
        changes.push(StoreChange::ReplacementMarkerChanged {
            event_id: marker,
            stamp,
        });
    }

    fn expire_replacement_marker(&mut self, stamp: u64, changes: &mut Vec<StoreChange>) -> bool {
        if self.last_replaced_event_id.is_none() || self.marker_stamp != stamp {
            return false;
        }
        self.set_replacement_marker(None, changes);
        true
    }

    fn selections_changed(&self, changes: &mut Vec<StoreChange>) {
        changes.push(StoreChange::SelectionsChanged {
            count: self.selections.len(),
        });
    }

    fn select_outcome(
        &mut self,
        event_id: &EventId,
        outcome_id: &OutcomeId,
        now: i64,
        changes: &mut Vec<StoreChange>,
    ) -> bool {
        if !self.catalogue.outcome_belongs_to_event(event_id, outcome_id) {
            return false;
        }
        if self.is_locked(outcome_id) {
            return false;
        }
        let Some(odds) = self.live_odds(outcome_id).filter(|odds| is_valid_odds(*odds)) else {
            return false;
        };

        let previous = self.selections.insert(
            event_id.clone(),
            BetSelection {
                event_id: event_id.clone(),
                outcome_id: outcome_id.clone(),
                selected_odds_snapshot: odds,
                added_at: now,
            },
        );
        self.selections_changed(changes);

        let replaced = previous.is_some_and(|previous| &previous.outcome_id != outcome_id);
        self.set_replacement_marker(replaced.then(|| event_id.clone()), changes);
        true
    }

    fn toggle_outcome(
        &mut self,
        event_id: &EventId,
        outcome_id: &OutcomeId,
        now: i64,
        changes: &mut Vec<StoreChange>,
    ) -> bool {
        if self.is_locked(outcome_id) {
            return false;
        }

        let already_selected = self
            .selections
            .get(event_id)
            .is_some_and(|selection| &selection.outcome_id == outcome_id);
        if already_selected {
            self.selections.remove(event_id);
            self.selections_changed(changes);
            self.set_replacement_marker(None, changes);
            return true;
        }

        self.select_outcome(event_id, outcome_id, now, changes)
    }

    fn remove_selection(&mut self, event_id: &EventId, changes: &mut Vec<StoreChange>) -> bool {
        if self.selections.remove(event_id).is_none() {
            return false;
        }
        self.selections_changed(changes);
        self.set_replacement_marker(None, changes);
        true
    }

    fn clear_selections(&mut self, changes: &mut Vec<StoreChange>) {
        if !self.selections.is_empty() {
            self.selections.clear();
            self.selections_changed(changes);
        }
        self.set_replacement_marker(None, changes);
    }

    fn set_stake(&mut self, value: f64, changes: &mut Vec<StoreChange>) {
        let stake = if value.is_finite() { value.max(0.0) } else { 0.0 };
        if stake == self.stake {
            return;
        }
        self.stake = stake;
        changes.push(StoreChange::StakeChanged { stake });
    }

    fn accept_all_changes(&mut self, changes: &mut Vec<StoreChange>) {
        let mut changed = false;
        for selection in self.selections.values_mut() {
            let live = self.odds.get(&selection.outcome_id).copied();
            if !is_valid_live_odds(live) {
                continue;
            }
            if let Some(live) = live {
                if live != selection.selected_odds_snapshot {
                    selection.selected_odds_snapshot = live;
                    changed = true;
                }
            }
        }
        if changed {
            self.selections_changed(changes);
        }
    }

    fn set_outcome_locks<'a>(
        &mut self,
        outcome_ids: impl IntoIterator<Item = &'a OutcomeId>,
        locked: bool,
        changes: &mut Vec<StoreChange>,
    ) {
        let mut touched = Vec::new();
        for outcome_id in outcome_ids {
            let flipped = if locked {
                self.locked.insert(outcome_id.clone())
            } else {
                self.locked.remove(outcome_id)
            };
            if flipped {
                touched.push(outcome_id.clone());
            }
        }
        if !touched.is_empty() {
            changes.push(StoreChange::LocksChanged {
                outcome_ids: touched,
                locked,
            });
        }
    }

    fn clear_outcome_pulse(&mut self, outcome_id: &OutcomeId, changes: &mut Vec<StoreChange>) {
        self.pulse_stamps.remove(outcome_id);
        if self.pulses.remove(outcome_id).is_some() {
            changes.push(StoreChange::PulseCleared {
                outcome_id: outcome_id.clone(),
            });
        }
    }

    fn apply_odds_updates(&mut self, updates: &[OddsUpdate], changes: &mut Vec<StoreChange>) {
        if updates.is_empty() {
            return;
        }

        // Every pulse compares against the odds as they were before this call.
        let previous: Vec<Option<f64>> = updates
            .iter()
            .map(|update| self.live_odds(&update.outcome_id))
            .collect();

        let mut movements = Vec::with_capacity(updates.len());
        for (update, previous) in updates.iter().zip(previous) {
            self.odds.insert(update.outcome_id.clone(), update.odds);
            let unlocked = self.locked.remove(&update.outcome_id);

            let pulse = OddsPulse::between(previous, update.odds);
            let pulse_stamp = match pulse {
                Some(pulse) => {
                    let stamp = self.next_stamp();
                    self.pulses.insert(update.outcome_id.clone(), pulse);
                    self.pulse_stamps.insert(update.outcome_id.clone(), stamp);
                    Some(stamp)
                }
                None => {
                    self.pulses.remove(&update.outcome_id);
                    self.pulse_stamps.remove(&update.outcome_id);
                    None
                }
            };

            movements.push(OddsMovement {
                outcome_id: update.outcome_id.clone(),
                previous,
                odds: update.odds,
                pulse,
                pulse_stamp,
                unlocked,
            });
        }

        changes.push(StoreChange::OddsUpdated { movements });
    }

    fn place_bet(&mut self, now: i64, changes: &mut Vec<StoreChange>) -> Option<PlacedBet> {
        if !selectors::can_place_bet(self) {
            return None;
        }

        let bet = PlacedBet {
            id: BetId::new(),
            placed_at: now,
            selections: self.selections.values().cloned().collect(),
            total_odds: selectors::total_odds(self),
            stake: self.stake,
            potential_win: selectors::potential_win(self),
        };
        self.clear_selections(changes);
        changes.push(StoreChange::BetPlaced {
            bet_id: bet.id.clone(),
        });
        Some(bet)
    }
}

/// Shared, lock-protected bet-slip store.
pub struct BetSlipStore {
    state: RwLock<BetSlipState>,
    tx: broadcast::Sender<StoreChange>,
}

impl BetSlipStore {
    /// Create an empty store with the default notification buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NOTIFICATION_CAPACITY)
    }

    /// Create an empty store whose broadcast channel buffers `capacity`
    /// notifications per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            state: RwLock::new(BetSlipState::default()),
            tx,
        }
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.tx.subscribe()
    }

    /// Clone of the full current state.
    #[must_use]
    pub fn state(&self) -> BetSlipState {
        self.state.read().clone()
    }

    /// Evaluate `f` against the current state under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&BetSlipState) -> T) -> T {
        f(&*self.state.read())
    }

    /// Clone of the live odds map.
    #[must_use]
    pub fn odds_snapshot(&self) -> OddsMap {
        self.state.read().odds.clone()
    }

    /// Replace the whole state with `snapshot`; selections, locks, pulses,
    /// stake and the replacement marker are reset.
    pub fn initialize(&self, snapshot: Snapshot) {
        self.mutate("initialize", |state, changes| {
            state.initialize(snapshot, changes);
        });
    }

    /// Put `outcome_id` on the slip for `event_id`.
    ///
    /// Ignored if the outcome is not part of the event, is locked, or has
    /// invalid odds. Returns whether a selection was made.
    pub fn select_outcome(&self, event_id: &EventId, outcome_id: &OutcomeId) -> bool {
        let now = now_millis();
        self.mutate("select_outcome", |state, changes| {
            state.select_outcome(event_id, outcome_id, now, changes)
        })
    }

    /// Select the outcome, or remove it if it is already the event's pick.
    ///
    /// Ignored while the outcome is locked. Returns whether state changed.
    pub fn toggle_outcome(&self, event_id: &EventId, outcome_id: &OutcomeId) -> bool {
        let now = now_millis();
        self.mutate("toggle_outcome", |state, changes| {
            state.toggle_outcome(event_id, outcome_id, now, changes)
        })
    }

    /// Drop the selection for `event_id`, if any.
    pub fn remove_selection(&self, event_id: &EventId) -> bool {
        self.mutate("remove_selection", |state, changes| {
            state.remove_selection(event_id, changes)
        })
    }

    pub fn clear_selections(&self) {
        self.mutate("clear_selections", |state, changes| {
            state.clear_selections(changes);
        });
    }

    pub fn clear_replacement_marker(&self) {
        self.mutate("clear_replacement_marker", |state, changes| {
            state.set_replacement_marker(None, changes);
        });
    }

    /// Clear the marker only if it is still the one published with `stamp`.
    ///
    /// Timed display effects use this so an expiring timer never clears a
    /// marker set again in the meantime, even for the same event.
    pub fn expire_replacement_marker(&self, stamp: u64) -> bool {
        self.mutate("expire_replacement_marker", |state, changes| {
            state.expire_replacement_marker(stamp, changes)
        })
    }

    /// Store the stake; negative values become 0, non-finite values become 0.
    pub fn set_stake(&self, value: f64) {
        self.mutate("set_stake", |state, changes| state.set_stake(value, changes));
    }

    /// Re-capture live odds on every selection whose live odds are valid.
    ///
    /// Selections with invalid live odds keep their old snapshot and stay
    /// flagged as changed.
    pub fn accept_all_changes(&self) {
        self.mutate("accept_all_changes", |state, changes| {
            state.accept_all_changes(changes);
        });
    }

    pub fn set_outcome_lock(&self, outcome_id: &OutcomeId, locked: bool) {
        self.set_outcome_locks(std::iter::once(outcome_id), locked);
    }

    /// Set the lock flag on several outcomes in one action.
    pub fn set_outcome_locks<'a>(
        &self,
        outcome_ids: impl IntoIterator<Item = &'a OutcomeId>,
        locked: bool,
    ) {
        self.mutate("set_outcome_locks", |state, changes| {
            state.set_outcome_locks(outcome_ids, locked, changes);
        });
    }

    pub fn clear_outcome_pulse(&self, outcome_id: &OutcomeId) {
        self.mutate("clear_outcome_pulse", |state, changes| {
            state.clear_outcome_pulse(outcome_id, changes);
        });
    }

    /// Clear the pulse on `outcome_id` only if it is still the one raised
    /// with `stamp`. A newer update restamps the pulse and keeps it up.
    pub fn expire_outcome_pulse(&self, outcome_id: &OutcomeId, stamp: u64) -> bool {
        self.mutate("expire_outcome_pulse", |state, changes| {
            if state.pulse_stamps.get(outcome_id) != Some(&stamp) {
                return false;
            }
            state.clear_outcome_pulse(outcome_id, changes);
            true
        })
    }

    /// Record new odds, release their locks and set pulses.
    pub fn apply_odds_updates(&self, updates: &[OddsUpdate]) {
        self.mutate("apply_odds_updates", |state, changes| {
            state.apply_odds_updates(updates, changes);
        });
    }

    /// Place the slip if it is placeable, clearing the selections.
    ///
    /// Returns `None` (and changes nothing) when
    /// [`can_place_bet`](selectors::can_place_bet) does not hold.
    pub fn place_bet(&self) -> Option<PlacedBet> {
        let now = now_millis();
        self.mutate("place_bet", |state, changes| state.place_bet(now, changes))
    }

    fn mutate<T>(
        &self,
        action: &'static str,
        f: impl FnOnce(&mut BetSlipState, &mut Vec<StoreChange>) -> T,
    ) -> T {
        let mut state = self.state.write();
        let mut changes = Vec::new();
        let result = f(&mut *state, &mut changes);

        trace!(action, changes = changes.len(), "Store action");
        // Published under the write lock so subscribers see changes in order.
        for change in changes {
            // No receivers is fine.
            let _ = self.tx.send(change);
        }
        result
    }
}

impl Default for BetSlipStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
