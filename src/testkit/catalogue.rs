//! Builders for catalogue fixtures used across tests.
//!
//! Raw builders (`raw_event`, `raw_game`, `raw_outcome`) produce payload
//! shapes for the guard and the snapshot builder. The fixture snapshots skip
//! the raw layer and use readable string ids such as `event-1`.

use crate::domain::{
    Catalogue, Category, Event, EventId, Market, MarketId, OddsMap, Outcome, OutcomeId, RawEvent,
    RawGame, RawOutcome, Snapshot,
};

/// Create an [`EventId`] from a string.
pub fn event_id(id: &str) -> EventId {
    EventId::from(id)
}

/// Create a [`MarketId`] from a string.
pub fn market_id(id: &str) -> MarketId {
    MarketId::from(id)
}

/// Create an [`OutcomeId`] from a string.
pub fn outcome_id(id: &str) -> OutcomeId {
    OutcomeId::from(id)
}

/// Raw outcome with the given id, name, odds and position.
pub fn raw_outcome(id: i64, name: &str, odds: f64, position: i64) -> RawOutcome {
    RawOutcome {
        outcome_id: id,
        outcome_name: name.to_string(),
        outcome_odds: odds,
        outcome_position: position,
    }
}

/// Raw game of type 1 with the given outcomes.
pub fn raw_game(id: i64, name: &str, outcomes: Vec<RawOutcome>) -> RawGame {
    RawGame {
        game_id: id,
        game_name: name.to_string(),
        game_type: 1,
        outcomes,
    }
}

/// Raw football event in the English Premier League.
pub fn raw_event(id: i64, name: &str, games: Vec<RawGame>) -> RawEvent {
    RawEvent {
        event_id: id,
        event_name: name.to_string(),
        event_start: 1_767_225_600_000,
        event_type: 1,
        category1_id: 1,
        category2_id: 44,
        category3_id: 17,
        category1_name: "Football".to_string(),
        category2_name: "England".to_string(),
        category3_name: "Premier League".to_string(),
        games_count: games.len() as i64,
        event_games: games,
        is_custom_bet_available: false,
    }
}

/// Two events in two leagues, each with a 1x2 market.
pub fn sample_raw_events() -> Vec<RawEvent> {
    let mut cup = raw_event(
        2,
        "Barcelona vs Sevilla",
        vec![raw_game(
            20,
            "1x2",
            vec![
                raw_outcome(201, "Home", 1.45, 0),
                raw_outcome(202, "Draw", 4.2, 1),
                raw_outcome(203, "Away", 6.75, 2),
            ],
        )],
    );
    cup.category2_id = 34;
    cup.category2_name = "Spain".to_string();
    cup.category3_id = 8;
    cup.category3_name = "La Liga".to_string();

    vec![
        raw_event(
            1,
            "Arsenal vs Chelsea",
            vec![raw_game(
                10,
                "1x2",
                vec![
                    raw_outcome(101, "Home", 2.1, 0),
                    raw_outcome(102, "Draw", 3.4, 1),
                    raw_outcome(103, "Away", 3.6, 2),
                ],
            )],
        ),
        cup,
    ]
}

/// [`sample_raw_events`] serialized as a JSON payload.
pub fn sample_payload_json() -> String {
    serde_json::to_string_pretty(&sample_raw_events()).unwrap_or_default()
}

/// One event (`event-1`) with a 1x2 market (`market-1`) whose outcomes
/// `outcome-1`..`outcome-3` start at 2.0, 3.0 and 4.0.
pub fn single_event_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::default();
    insert_event(
        &mut snapshot,
        "event-1",
        "market-1",
        &[("outcome-1", 2.0), ("outcome-2", 3.0), ("outcome-3", 4.0)],
    );
    snapshot
}

/// `event-1` (`market-1`: `outcome-1` 1.5, `outcome-2` 3.2, `outcome-3` 6.4)
/// and `event-2` (`market-2`: `outcome-4` 1.9).
pub fn two_event_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::default();
    insert_event(
        &mut snapshot,
        "event-1",
        "market-1",
        &[("outcome-1", 1.5), ("outcome-2", 3.2), ("outcome-3", 6.4)],
    );
    insert_event(&mut snapshot, "event-2", "market-2", &[("outcome-4", 1.9)]);
    snapshot
}

fn insert_event(snapshot: &mut Snapshot, event: &str, market: &str, outcomes: &[(&str, f64)]) {
    let Snapshot { catalogue, odds } = snapshot;
    insert_outcomes(catalogue, odds, event, market, outcomes);

    catalogue.events.insert(
        event_id(event),
        Event {
            id: event_id(event),
            name: format!("{event} fixture"),
            start_at: 0,
            event_type: 1,
            sport: Category {
                id: 1,
                name: "Football".to_string(),
            },
            region: Category {
                id: 44,
                name: "England".to_string(),
            },
            league: Category {
                id: 17,
                name: "Premier League".to_string(),
            },
            games_count: 1,
            is_custom_bet_available: false,
            market_ids: vec![market_id(market)],
        },
    );
    catalogue.event_ids.push(event_id(event));
}

fn insert_outcomes(
    catalogue: &mut Catalogue,
    odds: &mut OddsMap,
    event: &str,
    market: &str,
    outcomes: &[(&str, f64)],
) {
    const NAMES: [&str; 3] = ["Home", "Draw", "Away"];

    for (position, (id, value)) in outcomes.iter().enumerate() {
        catalogue.outcomes.insert(
            outcome_id(id),
            Outcome {
                id: outcome_id(id),
                market_id: market_id(market),
                event_id: event_id(event),
                name: NAMES.get(position).copied().unwrap_or("Other").to_string(),
                position: position as i64,
            },
        );
        odds.insert(outcome_id(id), *value);
    }

    catalogue.markets.insert(
        market_id(market),
        Market {
            id: market_id(market),
            event_id: event_id(event),
            name: "1x2".to_string(),
            market_type: 1,
            outcome_ids: outcomes.iter().map(|(id, _)| outcome_id(id)).collect(),
        },
    );
}
