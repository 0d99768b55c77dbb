//! Transport-agnostic domain logic.
//!
//! Nothing in here knows about tasks, locks or I/O. The catalogue types,
//! odds arithmetic and randomized engine are all plain values and functions.

pub mod catalogue;
pub mod engine;
pub mod grouping;
pub mod id;
pub mod odds;
pub mod random;
pub mod raw;
pub mod selection;

pub use catalogue::{Catalogue, Category, Event, Market, OddsMap, Outcome, Snapshot};
pub use engine::{OddsEngine, TimingBounds};
pub use grouping::{group_events_by_league, EventGroup};
pub use id::{BetId, EventId, MarketId, OutcomeId};
pub use odds::{clamp_min_odds, is_valid_odds, round_odds, OddsPulse, OddsUpdate, MIN_ODDS};
pub use random::{RandomSource, StdRandom};
pub use raw::{RawEvent, RawGame, RawOutcome};
pub use selection::{potential_win, total_odds, BetSelection, PlacedBet};
