//! Event payload guard.
//!
//! Turns untrusted JSON into [`RawEvent`]s before anything reaches the
//! snapshot builder. The top level must be an array; each element must carry
//! every event, game and outcome field with the right type. The first element
//! that does not is reported by index.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::domain::RawEvent;
use crate::error::PayloadError;

/// Parse a JSON document into raw events.
pub fn parse_events(content: &str) -> Result<Vec<RawEvent>, PayloadError> {
    let value: Value = serde_json::from_str(content).map_err(PayloadError::Json)?;
    events_from_value(value)
}

/// Validate an already-parsed JSON value.
pub fn events_from_value(value: Value) -> Result<Vec<RawEvent>, PayloadError> {
    let Value::Array(items) = value else {
        return Err(PayloadError::NotArray);
    };

    let events = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RawEvent>(item)
                .map_err(|source| PayloadError::InvalidEvent { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(events = events.len(), "Event payload accepted");
    Ok(events)
}

/// Read and validate an event file.
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<RawEvent>, PayloadError> {
    let content = std::fs::read_to_string(path).map_err(PayloadError::ReadFile)?;
    parse_events(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::catalogue::{sample_payload_json, sample_raw_events};
    use serde_json::json;

    #[test]
    fn accepts_well_formed_payload() {
        let events = parse_events(&sample_payload_json()).unwrap();
        assert_eq!(events, sample_raw_events());
    }

    #[test]
    fn accepts_empty_array() {
        assert!(parse_events("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        let err = parse_events(r#"{"eventId": 1}"#).unwrap_err();
        assert!(matches!(err, PayloadError::NotArray));
        assert!(err.to_string().contains("expected an array of events"));
    }

    #[test]
    fn reports_first_bad_index() {
        let mut payload = serde_json::to_value(sample_raw_events()).unwrap();
        payload[1]["eventGames"][0]["outcomes"][2]["outcomeOdds"] = json!("6.75");
        payload.as_array_mut().unwrap().push(json!(null));

        let err = events_from_value(payload).unwrap_err();
        assert_eq!(err.index(), Some(1));
        assert!(err
            .to_string()
            .contains("event at index 1 has unexpected shape"));
    }

    #[test]
    fn rejects_missing_field() {
        let mut payload = serde_json::to_value(sample_raw_events()).unwrap();
        payload[0]
            .as_object_mut()
            .unwrap()
            .remove("isCustomBetAvailable");

        let err = events_from_value(payload).unwrap_err();
        assert_eq!(err.index(), Some(0));
    }

    #[test]
    fn accepts_whole_number_floats() {
        let mut payload = serde_json::to_value(sample_raw_events()).unwrap();
        payload[0]["eventId"] = json!(1.0);
        payload[0]["eventGames"][0]["outcomes"][0]["outcomePosition"] = json!(0.0);

        let events = events_from_value(payload).unwrap();
        assert_eq!(events, sample_raw_events());
    }

    #[test]
    fn rejects_fractional_ids() {
        let mut payload = serde_json::to_value(sample_raw_events()).unwrap();
        payload[1]["eventGames"][0]["gameId"] = json!(20.5);

        let err = events_from_value(payload).unwrap_err();
        assert_eq!(err.index(), Some(1));
    }

    #[test]
    fn rejects_non_object_element() {
        let err = parse_events("[42]").unwrap_err();
        assert_eq!(err.index(), Some(0));
    }

    #[test]
    fn syntax_errors_are_not_shape_errors() {
        let err = parse_events("[{").unwrap_err();
        assert!(matches!(err, PayloadError::Json(_)));
        assert_eq!(err.index(), None);
    }
}
