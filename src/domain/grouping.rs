//! League grouping of events for display.

use std::collections::HashMap;

use serde::Serialize;

use super::catalogue::Event;
use super::id::EventId;

/// Events sharing the same sport, region and league names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventGroup {
    /// `sport::region::league`
    pub id: String,
    pub sport_name: String,
    pub region_name: String,
    pub league_name: String,
    pub event_ids: Vec<EventId>,
}

/// Group `event_ids` by league.
///
/// Groups appear in the order their first event appears; events keep their
/// input order inside a group. Ids missing from `events` are skipped.
pub fn group_events_by_league(
    event_ids: &[EventId],
    events: &HashMap<EventId, Event>,
) -> Vec<EventGroup> {
    let mut groups: Vec<EventGroup> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for event_id in event_ids {
        let Some(event) = events.get(event_id) else {
            continue;
        };

        let key = format!(
            "{}::{}::{}",
            event.sport.name, event.region.name, event.league.name
        );
        let index = *index_by_key.entry(key.clone()).or_insert_with(|| {
            groups.push(EventGroup {
                id: key,
                sport_name: event.sport.name.clone(),
                region_name: event.region.name.clone(),
                league_name: event.league.name.clone(),
                event_ids: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].event_ids.push(event_id.clone());
    }

    groups
}
