//! Application services.
//!
//! The store owns all mutable state; the ticker and the display effects are
//! background services that drive it, and the selectors derive read-only
//! values from it.

mod lifecycle;

pub mod effects;
pub mod selectors;
pub mod snapshot;
pub mod store;
pub mod ticker;

pub use effects::{DisplayEffects, DisplayEffectsHandle, DisplayTimings};
pub use selectors::{PlacementBlocker, SlipSummary};
pub use snapshot::build_snapshot;
pub use store::{BetSlipState, BetSlipStore, OddsMovement, StoreChange};
pub use ticker::{OddsTicker, TickerHandle};
