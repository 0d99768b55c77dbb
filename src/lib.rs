//! Betslip - A live-updating bet-slip engine with a simulated odds feed.
//!
//! The crate keeps a normalized catalogue of events, markets and outcomes,
//! tracks a user's selections and stake, and moves odds on a randomized
//! schedule to mimic a live market.
//!
//! # Architecture
//!
//! - **`domain`** - Plain values and pure functions: catalogue types, odds
//!   arithmetic, the randomized odds engine, selections and grouping
//! - **`application`** - The shared [`BetSlipStore`](application::BetSlipStore),
//!   selectors over its state, and the background services that drive it
//!   (odds ticker, display effects)
//! - **`adapter::inbound`** - Event payload guard and the CLI
//! - **`infrastructure`** - TOML configuration and logging setup
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use betslip::adapter::inbound::payload;
//! use betslip::application::{build_snapshot, BetSlipStore, OddsTicker};
//! use betslip::domain::{OddsEngine, StdRandom};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let events = payload::load_events("events.json")?;
//! let store = Arc::new(BetSlipStore::new());
//! store.initialize(build_snapshot(&events));
//!
//! let ticker = OddsTicker::new(OddsEngine::new(StdRandom::default())).start(Arc::clone(&store));
//! // ... user actions against `store` ...
//! ticker.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
