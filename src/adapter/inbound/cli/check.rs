//! Input validation command handlers.

use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::payload;
use crate::application::{build_snapshot, selectors, BetSlipState};
use crate::domain::EventGroup;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate a configuration file without starting anything.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);
    output::field(
        "Tick interval",
        format!(
            "{}-{} ms",
            config.ticker.min_interval_ms, config.ticker.max_interval_ms
        ),
    );
    output::field(
        "Lock duration",
        format!("{}-{} ms", config.ticker.min_lock_ms, config.ticker.max_lock_ms),
    );
    match config.ticker.seed {
        Some(seed) => output::field("Seed", seed),
        None => output::field("Seed", output::muted("entropy")),
    }
    output::field("Pulse clear", format!("{} ms", config.display.pulse_clear_ms));
    output::field(
        "Marker clear",
        format!("{} ms", config.display.replacement_clear_ms),
    );

    if !config.ticker.enabled {
        output::warning("Ticker disabled; odds will not move");
    }

    output::success("Configuration check complete");
    Ok(())
}

#[derive(Debug, Tabled, Serialize)]
struct GroupRow {
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "League")]
    league: String,
    #[tabled(rename = "Events")]
    events: usize,
}

impl From<EventGroup> for GroupRow {
    fn from(group: EventGroup) -> Self {
        Self {
            sport: group.sport_name,
            region: group.region_name,
            league: group.league_name,
            events: group.event_ids.len(),
        }
    }
}

/// Validate an event payload and summarize the catalogue it produces.
pub fn execute_events<P: AsRef<Path>>(events_path: P) -> Result<()> {
    let path = events_path.as_ref();
    let raw_events = payload::load_events(path)?;
    let snapshot = build_snapshot(&raw_events);
    let state = BetSlipState::from_snapshot(snapshot);
    let catalogue = state.catalogue();

    output::section("Event Payload Check");
    output::field("Events file", path.display());
    output::success("Payload shape is valid");

    output::section("Catalogue");
    output::field("Events", catalogue.events.len());
    output::field("Markets", catalogue.markets.len());
    output::field("Outcomes", catalogue.outcomes.len());

    let invalid_odds = state
        .odds()
        .values()
        .filter(|odds| !crate::domain::is_valid_odds(**odds))
        .count();
    if invalid_odds > 0 {
        output::warning(&format!(
            "{invalid_odds} outcome(s) start with odds below {}; they cannot be selected",
            crate::domain::MIN_ODDS
        ));
    }

    let groups = selectors::event_groups(&state);
    output::section("Leagues");
    output::table(
        "groups",
        groups.into_iter().map(GroupRow::from).collect::<Vec<_>>(),
    );

    output::success("Event check complete");
    Ok(())
}
