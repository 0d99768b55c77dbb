//! Bet-slip selections and the payout arithmetic over them.

use serde::Serialize;

use super::id::{BetId, EventId, OutcomeId};

/// One pick on the slip. At most one exists per event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetSelection {
    pub event_id: EventId,
    pub outcome_id: OutcomeId,
    /// Odds captured when the pick was made (or last accepted).
    pub selected_odds_snapshot: f64,
    /// Creation time in epoch milliseconds.
    pub added_at: i64,
}

/// Product of all captured odds, or 0 for an empty slip.
pub fn total_odds<'a>(selections: impl IntoIterator<Item = &'a BetSelection>) -> f64 {
    let mut selections = selections.into_iter().peekable();
    if selections.peek().is_none() {
        return 0.0;
    }
    selections.fold(1.0, |product, selection| {
        product * selection.selected_odds_snapshot
    })
}

/// [`total_odds`] multiplied by the stake.
pub fn potential_win<'a>(
    selections: impl IntoIterator<Item = &'a BetSelection>,
    stake: f64,
) -> f64 {
    total_odds(selections) * stake
}

/// Summary of a slip at the moment it was placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBet {
    pub id: BetId,
    pub placed_at: i64,
    pub selections: Vec<BetSelection>,
    pub total_odds: f64,
    pub stake: f64,
    pub potential_win: f64,
}
