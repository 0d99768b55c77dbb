//! Raw events to normalized snapshot.

use tracing::debug;

use crate::domain::{Category, Event, EventId, Market, MarketId, Outcome, OutcomeId, RawEvent, Snapshot};

/// Build a normalized [`Snapshot`] from validated raw events.
///
/// Input order becomes display order at every level: events, markets within
/// an event, and outcomes within a market. Back-references are filled in the
/// same pass. The payload guard is expected to have run already, and numeric
/// ids are assumed unique within their scope.
pub fn build_snapshot(raw_events: &[RawEvent]) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for raw_event in raw_events {
        let event_id = EventId::from_source(raw_event.event_id);
        let mut market_ids = Vec::with_capacity(raw_event.event_games.len());

        for raw_game in &raw_event.event_games {
            let market_id = MarketId::from_source(raw_game.game_id);
            let mut outcome_ids = Vec::with_capacity(raw_game.outcomes.len());

            for raw_outcome in &raw_game.outcomes {
                let outcome_id = OutcomeId::from_source(raw_outcome.outcome_id);
                snapshot.catalogue.outcomes.insert(
                    outcome_id.clone(),
                    Outcome {
                        id: outcome_id.clone(),
                        market_id: market_id.clone(),
                        event_id: event_id.clone(),
                        name: raw_outcome.outcome_name.clone(),
                        position: raw_outcome.outcome_position,
                    },
                );
                snapshot
                    .odds
                    .insert(outcome_id.clone(), raw_outcome.outcome_odds);
                outcome_ids.push(outcome_id);
            }

            snapshot.catalogue.markets.insert(
                market_id.clone(),
                Market {
                    id: market_id.clone(),
                    event_id: event_id.clone(),
                    name: raw_game.game_name.clone(),
                    market_type: raw_game.game_type,
                    outcome_ids,
                },
            );
            market_ids.push(market_id);
        }

        snapshot.catalogue.events.insert(
            event_id.clone(),
            Event {
                id: event_id.clone(),
                name: raw_event.event_name.clone(),
                start_at: raw_event.event_start,
                event_type: raw_event.event_type,
                sport: Category {
                    id: raw_event.category1_id,
                    name: raw_event.category1_name.clone(),
                },
                region: Category {
                    id: raw_event.category2_id,
                    name: raw_event.category2_name.clone(),
                },
                league: Category {
                    id: raw_event.category3_id,
                    name: raw_event.category3_name.clone(),
                },
                games_count: raw_event.games_count,
                is_custom_bet_available: raw_event.is_custom_bet_available,
                market_ids,
            },
        );
        snapshot.catalogue.event_ids.push(event_id);
    }

    debug!(
        events = snapshot.catalogue.events.len(),
        markets = snapshot.catalogue.markets.len(),
        outcomes = snapshot.catalogue.outcomes.len(),
        "Built snapshot"
    );

    snapshot
}
