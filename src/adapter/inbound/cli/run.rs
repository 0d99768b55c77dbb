//! Handler for the `run` command.
//!
//! Loads the catalogue, starts the odds ticker and the display effects, and
//! logs every store change until Ctrl-C (or `--duration`) stops it.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::payload;
use crate::application::{
    build_snapshot, selectors, BetSlipStore, DisplayEffects, OddsTicker, StoreChange,
    TickerHandle,
};
use crate::domain::{OddsEngine, OutcomeId, Snapshot, StdRandom};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::ticker::TickerConfig;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    config.init_logging();

    let raw_events = payload::load_events(&args.events)?;
    let snapshot = build_snapshot(&raw_events);
    print_startup(&config, &snapshot);

    let store = Arc::new(BetSlipStore::with_capacity(
        config.store.notification_capacity,
    ));
    let mut changes = store.subscribe();
    store.initialize(snapshot);
    info!(events = raw_events.len(), "Catalogue loaded");

    if let Some(stake) = args.stake {
        store.set_stake(stake);
    }
    apply_picks(&store, &args.picks);

    let ticker = if config.ticker.enabled {
        Some(start_ticker(&config.ticker, &store))
    } else {
        warn!("Ticker disabled by configuration");
        None
    };
    let effects = DisplayEffects::new(config.display.timings()).start(Arc::clone(&store));

    let stop = shutdown_signal(args.duration);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            () = &mut stop => break,
            change = changes.recv() => match change {
                Ok(change) => log_change(&store, &change),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change log lagged, some changes missed");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Some(ticker) = ticker {
        ticker.shutdown().await;
    }
    effects.shutdown().await;
    info!("Services stopped");

    if args.place {
        place(&store);
    }
    print_summary(&store);
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || output::is_json() {
        config.logging.format = "json".to_string();
    }
    if args.seed.is_some() {
        config.ticker.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn start_ticker(config: &TickerConfig, store: &Arc<BetSlipStore>) -> TickerHandle {
    let random = config.seed.map_or_else(StdRandom::from_entropy, StdRandom::seeded);
    let engine = OddsEngine::with_bounds(random, config.bounds());
    OddsTicker::new(engine).start(Arc::clone(store))
}

/// Select each picked outcome on its own event.
fn apply_picks(store: &BetSlipStore, picks: &[String]) {
    for pick in picks {
        let outcome_id = OutcomeId::new(pick.as_str());
        let event_id = store.read(|state| {
            state
                .catalogue()
                .outcome(&outcome_id)
                .map(|outcome| outcome.event_id.clone())
        });

        let Some(event_id) = event_id else {
            output::warning(&format!("Unknown outcome {pick}; skipped"));
            continue;
        };
        if store.select_outcome(&event_id, &outcome_id) {
            debug!(event = %event_id, outcome = %outcome_id, "Picked outcome");
        } else {
            output::warning(&format!("Outcome {pick} cannot be selected; skipped"));
        }
    }
}

async fn shutdown_signal(duration: Option<u64>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    match duration {
        Some(secs) => {
            tokio::select! {
                () = ctrl_c => {}
                () = tokio::time::sleep(Duration::from_secs(secs)) => {
                    info!(secs, "Run duration elapsed");
                }
            }
        }
        None => ctrl_c.await,
    }
}

fn log_change(store: &BetSlipStore, change: &StoreChange) {
    output::record("change", change);

    match change {
        StoreChange::Initialized { events, outcomes } => {
            info!(events, outcomes, "Store initialized");
        }
        StoreChange::OddsUpdated { movements } => {
            for movement in movements {
                let label = store.read(|state| selectors::outcome_label(state, &movement.outcome_id));
                info!(
                    outcome = %label,
                    previous = ?movement.previous,
                    odds = movement.odds,
                    pulse = movement.pulse.map_or("none", |pulse| pulse.as_str()),
                    "Odds moved"
                );
            }
            let summary = store.read(selectors::slip_summary);
            if summary.has_odds_changes {
                warn!(
                    selections = summary.selections,
                    "Slip odds changed; accept before placing"
                );
            }
        }
        StoreChange::LocksChanged {
            outcome_ids,
            locked,
        } => {
            debug!(outcomes = outcome_ids.len(), locked, "Outcome locks changed");
        }
        StoreChange::SelectionsChanged { count } => {
            info!(selections = count, "Selections changed");
        }
        StoreChange::StakeChanged { stake } => info!(stake, "Stake changed"),
        StoreChange::PulseCleared { outcome_id } => {
            debug!(outcome = %outcome_id, "Pulse cleared");
        }
        StoreChange::ReplacementMarkerChanged { event_id, .. } => {
            debug!(event = ?event_id.as_ref().map(ToString::to_string), "Replacement marker changed");
        }
        StoreChange::BetPlaced { bet_id } => info!(bet = %bet_id, "Bet placed"),
    }
}

fn place(store: &BetSlipStore) {
    if store.read(selectors::has_odds_changes) {
        info!("Accepting pending odds changes before placing");
        store.accept_all_changes();
    }

    match store.place_bet() {
        Some(bet) => {
            output::section("Placed Bet");
            output::field("Bet", &bet.id);
            output::field("Selections", bet.selections.len());
            output::field("Total odds", output::odds(bet.total_odds));
            output::field("Potential win", output::positive(output::odds(bet.potential_win)));
            output::record("bet", &bet);
        }
        None => match store.read(selectors::placement_blocker) {
            Some(blocker) => output::warning(&format!("Slip not placed: {blocker}")),
            None => output::warning("Slip not placed"),
        },
    }
}

fn print_startup(config: &Config, snapshot: &Snapshot) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Events", snapshot.catalogue.events.len());
    output::field("Outcomes", snapshot.catalogue.outcomes.len());
    if config.ticker.enabled {
        output::field(
            "Tick interval",
            format!(
                "{}-{} ms",
                config.ticker.min_interval_ms, config.ticker.max_interval_ms
            ),
        );
    } else {
        output::field("Ticker", output::muted("disabled"));
    }
    if let Some(seed) = config.ticker.seed {
        output::field("Seed", seed);
    }
}

fn print_summary(store: &BetSlipStore) {
    let summary = store.read(selectors::slip_summary);
    info!(
        selections = summary.selections,
        stake = summary.stake,
        total_odds = summary.total_odds,
        potential_win = summary.potential_win,
        "Final slip"
    );

    output::section("Slip");
    output::field("Selections", summary.selections);
    output::field("Stake", output::odds(summary.stake));
    output::field("Total odds", output::odds(summary.total_odds));
    output::field("Potential win", output::odds(summary.potential_win));
    if summary.has_odds_changes {
        output::field("Odds", output::negative("changed"));
    }
    output::record("summary", &summary);
}
