//! Derived values over [`BetSlipState`].
//!
//! All functions are pure reads. Pair them with [`BetSlipStore::read`] to
//! evaluate against a consistent view:
//!
//! ```ignore
//! let placeable = store.read(selectors::can_place_bet);
//! ```
//!
//! [`BetSlipStore::read`]: super::store::BetSlipStore::read

use std::fmt;

use serde::Serialize;

use super::store::BetSlipState;
use crate::domain::odds::is_valid_live_odds;
use crate::domain::{
    self, group_events_by_league, EventGroup, EventId, Market, MarketId, OutcomeId,
};

/// Market name of the home/draw/away market.
pub const ONE_X_TWO_MARKET: &str = "1x2";

/// True if any selection's live odds are invalid or differ from its snapshot.
#[must_use]
pub fn has_odds_changes(state: &BetSlipState) -> bool {
    state.selections().any(|selection| {
        let live = state.live_odds(&selection.outcome_id);
        !is_valid_live_odds(live) || live != Some(selection.selected_odds_snapshot)
    })
}

/// Product of the selection snapshots; 0 for an empty slip.
#[must_use]
pub fn total_odds(state: &BetSlipState) -> f64 {
    domain::total_odds(state.selections())
}

#[must_use]
pub fn potential_win(state: &BetSlipState) -> f64 {
    domain::potential_win(state.selections(), state.stake())
}

#[must_use]
pub fn selection_count(state: &BetSlipState) -> usize {
    state.selection_count()
}

/// Event ids in display order.
#[must_use]
pub fn event_ids(state: &BetSlipState) -> &[EventId] {
    &state.catalogue().event_ids
}

/// Market ids of an event in display order; empty for unknown events.
#[must_use]
pub fn market_ids_for_event<'a>(state: &'a BetSlipState, event_id: &EventId) -> &'a [MarketId] {
    state
        .catalogue()
        .event(event_id)
        .map_or(&[][..], |event| event.market_ids.as_slice())
}

/// First market of the event whose name matches, ignoring ASCII case.
#[must_use]
pub fn market_by_name<'a>(
    state: &'a BetSlipState,
    event_id: &EventId,
    name: &str,
) -> Option<&'a Market> {
    let catalogue = state.catalogue();
    market_ids_for_event(state, event_id)
        .iter()
        .filter_map(|market_id| catalogue.market(market_id))
        .find(|market| market.name.eq_ignore_ascii_case(name))
}

/// Display label for an outcome: `"Event [1]"` for outcomes of the event's
/// 1x2 market, `"Event [Name]"` otherwise, the bare id if unknown.
#[must_use]
pub fn outcome_label(state: &BetSlipState, outcome_id: &OutcomeId) -> String {
    let catalogue = state.catalogue();
    let Some(outcome) = catalogue.outcome(outcome_id) else {
        return outcome_id.to_string();
    };
    let event = catalogue
        .event(&outcome.event_id)
        .map_or("?", |event| event.name.as_str());
    let in_one_x_two = market_by_name(state, &outcome.event_id, ONE_X_TWO_MARKET)
        .is_some_and(|market| market.id == outcome.market_id);
    let name = in_one_x_two
        .then(|| outcome.one_x_two_label())
        .flatten()
        .unwrap_or(outcome.name.as_str());
    format!("{event} [{name}]")
}

/// Why a slip cannot be placed, in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementBlocker {
    NoSelections,
    /// A selected outcome has missing or invalid live odds. Accepting
    /// changes cannot clear this.
    InvalidOdds,
    /// Live odds moved away from a selection's snapshot.
    OddsChanged,
    NoStake,
}

impl PlacementBlocker {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoSelections => "the slip has no selections",
            Self::InvalidOdds => "a selected outcome has invalid live odds",
            Self::OddsChanged => "odds changed since selection; accept them first",
            Self::NoStake => "stake must be positive",
        }
    }
}

impl fmt::Display for PlacementBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// First reason the slip cannot be placed, or `None` if it can.
#[must_use]
pub fn placement_blocker(state: &BetSlipState) -> Option<PlacementBlocker> {
    if state.selection_count() == 0 {
        return Some(PlacementBlocker::NoSelections);
    }
    let invalid = state
        .selections()
        .any(|selection| !is_valid_live_odds(state.live_odds(&selection.outcome_id)));
    if invalid {
        return Some(PlacementBlocker::InvalidOdds);
    }
    if has_odds_changes(state) {
        return Some(PlacementBlocker::OddsChanged);
    }
    let stake = state.stake();
    if !(stake.is_finite() && stake > 0.0) {
        return Some(PlacementBlocker::NoStake);
    }
    None
}

/// The slip can be placed: at least one selection, nothing stale, and a
/// positive finite stake.
#[must_use]
pub fn can_place_bet(state: &BetSlipState) -> bool {
    placement_blocker(state).is_none()
}

/// Events grouped by league, in display order.
#[must_use]
pub fn event_groups(state: &BetSlipState) -> Vec<EventGroup> {
    let catalogue = state.catalogue();
    group_events_by_league(&catalogue.event_ids, &catalogue.events)
}

/// Point-in-time view of the slip for logging and output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipSummary {
    pub selections: usize,
    pub stake: f64,
    pub total_odds: f64,
    pub potential_win: f64,
    pub has_odds_changes: bool,
    pub can_place_bet: bool,
}

#[must_use]
pub fn slip_summary(state: &BetSlipState) -> SlipSummary {
    SlipSummary {
        selections: state.selection_count(),
        stake: state.stake(),
        total_odds: total_odds(state),
        potential_win: potential_win(state),
        has_odds_changes: has_odds_changes(state),
        can_place_bet: can_place_bet(state),
    }
}
