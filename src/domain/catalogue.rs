//! Normalized catalogue of events, markets and outcomes.
//!
//! - [`Event`] - A sporting event with its category triple and ordered markets
//! - [`Market`] - A typed grouping of mutually exclusive outcomes
//! - [`Outcome`] - A single wagerable result
//! - [`Catalogue`] - Index of all three by id plus the default event order
//! - [`Snapshot`] - A catalogue together with the odds it was delivered with
//!
//! Entities and their cross-references never change for the lifetime of a
//! snapshot. Odds live in a separate [`OddsMap`] because they move
//! independently and far more often.

use std::collections::HashMap;

use serde::Serialize;

use super::id::{EventId, MarketId, OutcomeId};

/// Live odds keyed by outcome.
pub type OddsMap = HashMap<OutcomeId, f64>;

/// Labels shown for the three positions of a 1x2 market.
const ONE_X_TWO_LABELS: [&str; 3] = ["1", "X", "2"];

/// A single wagerable result within a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub id: OutcomeId,
    pub market_id: MarketId,
    /// Denormalized owner event for O(1) lookups.
    pub event_id: EventId,
    pub name: String,
    pub position: i64,
}

impl Outcome {
    /// The `1` / `X` / `2` label for this outcome's position, if it has one.
    #[must_use]
    pub fn one_x_two_label(&self) -> Option<&'static str> {
        usize::try_from(self.position)
            .ok()
            .and_then(|index| ONE_X_TWO_LABELS.get(index).copied())
    }
}

/// A named, typed grouping of outcomes for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Market {
    pub id: MarketId,
    pub event_id: EventId,
    pub name: String,
    pub market_type: i64,
    /// Display order; stable for the lifetime of the snapshot.
    pub outcome_ids: Vec<OutcomeId>,
}

/// Category id/name pair (sport, region or league).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A sporting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    /// Start time in epoch milliseconds.
    pub start_at: i64,
    pub event_type: i64,
    pub sport: Category,
    pub region: Category,
    pub league: Category,
    pub games_count: i64,
    pub is_custom_bet_available: bool,
    pub market_ids: Vec<MarketId>,
}

/// Index of all catalogue entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalogue {
    /// Default display order of events.
    pub event_ids: Vec<EventId>,
    pub events: HashMap<EventId, Event>,
    pub markets: HashMap<MarketId, Market>,
    pub outcomes: HashMap<OutcomeId, Outcome>,
}

impl Catalogue {
    /// Look up an event by id.
    #[must_use]
    pub fn event(&self, event_id: &EventId) -> Option<&Event> {
        self.events.get(event_id)
    }

    /// Look up a market by id.
    #[must_use]
    pub fn market(&self, market_id: &MarketId) -> Option<&Market> {
        self.markets.get(market_id)
    }

    /// Look up an outcome by id.
    #[must_use]
    pub fn outcome(&self, outcome_id: &OutcomeId) -> Option<&Outcome> {
        self.outcomes.get(outcome_id)
    }

    /// Whether `outcome_id` belongs to a market that belongs to `event_id`.
    ///
    /// Both hops (outcome to market, market to event) must resolve.
    #[must_use]
    pub fn outcome_belongs_to_event(&self, event_id: &EventId, outcome_id: &OutcomeId) -> bool {
        let Some(outcome) = self.outcomes.get(outcome_id) else {
            return false;
        };
        if &outcome.event_id != event_id {
            return false;
        }
        self.markets
            .get(&outcome.market_id)
            .is_some_and(|market| &market.event_id == event_id)
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    /// Returns true if there are no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }
}

/// A catalogue paired with the odds it arrived with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub catalogue: Catalogue,
    pub odds: OddsMap,
}
