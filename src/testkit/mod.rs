//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`catalogue`] — Raw payload builders, id helpers and fixture snapshots.
//! - [`random`] — Deterministic [`RandomSource`](crate::domain::RandomSource)
//!   implementations: `ConstantRandom`, `ScriptedRandom`.

pub mod catalogue;
pub mod random;
