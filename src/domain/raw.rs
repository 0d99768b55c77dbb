//! Raw event payload shapes, field-for-field with the upstream feed.
//!
//! These types are only produced by the payload guard and only consumed by
//! the snapshot builder. Integer fields also accept whole-number floats
//! (`0.0`), since the feed does not distinguish the two.

use serde::{de, Deserialize, Deserializer, Serialize};

/// One outcome inside a raw game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutcome {
    #[serde(deserialize_with = "whole_number")]
    pub outcome_id: i64,
    pub outcome_name: String,
    pub outcome_odds: f64,
    #[serde(deserialize_with = "whole_number")]
    pub outcome_position: i64,
}

/// One game (market) inside a raw event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGame {
    #[serde(deserialize_with = "whole_number")]
    pub game_id: i64,
    pub game_name: String,
    #[serde(deserialize_with = "whole_number")]
    pub game_type: i64,
    pub outcomes: Vec<RawOutcome>,
}

/// A raw event as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(deserialize_with = "whole_number")]
    pub event_id: i64,
    pub event_name: String,
    /// Start time in epoch milliseconds.
    #[serde(deserialize_with = "whole_number")]
    pub event_start: i64,
    #[serde(deserialize_with = "whole_number")]
    pub event_type: i64,
    #[serde(deserialize_with = "whole_number")]
    pub category1_id: i64,
    #[serde(deserialize_with = "whole_number")]
    pub category2_id: i64,
    #[serde(deserialize_with = "whole_number")]
    pub category3_id: i64,
    pub category1_name: String,
    pub category2_name: String,
    pub category3_name: String,
    #[serde(deserialize_with = "whole_number")]
    pub games_count: i64,
    pub event_games: Vec<RawGame>,
    pub is_custom_bet_available: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
}

/// Largest magnitude an `f64` can hold and still convert to `i64` exactly.
const MAX_WHOLE_FLOAT: f64 = 9_007_199_254_740_992.0;

fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Number::deserialize(deserializer)? {
        Number::Int(value) => Ok(value),
        Number::Float(value) if value.fract() == 0.0 && value.abs() <= MAX_WHOLE_FLOAT => {
            Ok(value as i64)
        }
        Number::Float(value) => Err(de::Error::custom(format!(
            "expected a whole number, got {value}"
        ))),
    }
}
