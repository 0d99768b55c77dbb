//! Randomized odds engine.
//!
//! Produces tick intervals, lock durations and new odds for a random subset
//! of outcomes. All randomness comes from the injected [`RandomSource`], so a
//! scripted or seeded source makes every method deterministic.

use super::catalogue::OddsMap;
use super::id::OutcomeId;
use super::odds::{clamp_min_odds, round_odds, OddsUpdate};
use super::random::{RandomSource, StdRandom};

pub const MIN_TICK_INTERVAL_MS: u64 = 10_000;
pub const MAX_TICK_INTERVAL_MS: u64 = 15_000;
pub const MIN_LOCK_DURATION_MS: u64 = 300;
pub const MAX_LOCK_DURATION_MS: u64 = 800;
pub const MIN_MULTIPLIER: f64 = 0.9;
pub const MAX_MULTIPLIER: f64 = 1.1;

/// Share of outcomes touched by one tick, as a divisor (1/4 = 25%).
const SUBSET_DIVISOR: usize = 4;

/// Inclusive millisecond ranges for tick intervals and lock durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingBounds {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub min_lock_ms: u64,
    pub max_lock_ms: u64,
}

impl Default for TimingBounds {
    fn default() -> Self {
        Self {
            min_interval_ms: MIN_TICK_INTERVAL_MS,
            max_interval_ms: MAX_TICK_INTERVAL_MS,
            min_lock_ms: MIN_LOCK_DURATION_MS,
            max_lock_ms: MAX_LOCK_DURATION_MS,
        }
    }
}

/// Odds engine over a pluggable random source.
#[derive(Debug, Clone)]
pub struct OddsEngine<R = StdRandom> {
    random: R,
    bounds: TimingBounds,
}

impl<R: RandomSource> OddsEngine<R> {
    /// Create an engine with the default timing bounds.
    pub fn new(random: R) -> Self {
        Self::with_bounds(random, TimingBounds::default())
    }

    /// Create an engine with custom timing bounds.
    pub fn with_bounds(random: R, bounds: TimingBounds) -> Self {
        Self { random, bounds }
    }

    #[must_use]
    pub const fn bounds(&self) -> TimingBounds {
        self.bounds
    }

    /// Delay before the next tick, uniform over the inclusive interval range.
    pub fn random_interval_ms(&mut self) -> u64 {
        let TimingBounds {
            min_interval_ms,
            max_interval_ms,
            ..
        } = self.bounds;
        self.uniform_ms(min_interval_ms, max_interval_ms)
    }

    /// Delay between locking outcomes and applying their new odds.
    pub fn random_lock_duration_ms(&mut self) -> u64 {
        let TimingBounds {
            min_lock_ms,
            max_lock_ms,
            ..
        } = self.bounds;
        self.uniform_ms(min_lock_ms, max_lock_ms)
    }

    /// Uniform multiplier in `[0.9, 1.1)`.
    pub fn random_multiplier(&mut self) -> f64 {
        MIN_MULTIPLIER + self.random.next_unit() * (MAX_MULTIPLIER - MIN_MULTIPLIER)
    }

    /// Move `current` by a random multiplier, rounded and floored.
    pub fn next_odds(&mut self, current: f64) -> f64 {
        clamp_min_odds(round_odds(current * self.random_multiplier()))
    }

    /// Pick roughly a quarter of the outcomes (at least one) and price them.
    ///
    /// Ids are sorted before the Fisher-Yates shuffle so the result depends
    /// only on the random source, never on map iteration order.
    pub fn build_random_updates(&mut self, odds: &OddsMap) -> Vec<OddsUpdate> {
        if odds.is_empty() {
            return Vec::new();
        }

        let mut outcome_ids: Vec<&OutcomeId> = odds.keys().collect();
        outcome_ids.sort();

        for index in (1..outcome_ids.len()).rev() {
            let swap_with = self.uniform_index(index + 1);
            outcome_ids.swap(index, swap_with);
        }

        let subset_size = outcome_ids.len().div_ceil(SUBSET_DIVISOR).max(1);
        outcome_ids
            .into_iter()
            .take(subset_size)
            .map(|outcome_id| {
                let current = odds[outcome_id];
                OddsUpdate {
                    outcome_id: outcome_id.clone(),
                    odds: self.next_odds(current),
                }
            })
            .collect()
    }

    fn uniform_ms(&mut self, min: u64, max: u64) -> u64 {
        let span = max.saturating_sub(min) + 1;
        let offset = (self.random.next_unit() * span as f64).floor() as u64;
        (min + offset).min(max)
    }

    fn uniform_index(&mut self, len: usize) -> usize {
        let index = (self.random.next_unit() * len as f64).floor() as usize;
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::random::{ConstantRandom, ScriptedRandom};

    fn odds_map(count: usize) -> OddsMap {
        (0..count)
            .map(|i| (OutcomeId::from(format!("o{i}")), 1.5 + i as f64 * 0.25))
            .collect()
    }

    #[test]
    fn interval_covers_inclusive_range() {
        let mut low = OddsEngine::new(ConstantRandom::new(0.0));
        let mut high = OddsEngine::new(ConstantRandom::new(0.999_999_999));
        assert_eq!(low.random_interval_ms(), 10_000);
        assert_eq!(high.random_interval_ms(), 15_000);
    }

    #[test]
    fn lock_duration_covers_inclusive_range() {
        let mut low = OddsEngine::new(ConstantRandom::new(0.0));
        let mut mid = OddsEngine::new(ConstantRandom::new(0.5));
        let mut high = OddsEngine::new(ConstantRandom::new(0.999_999_999));
        assert_eq!(low.random_lock_duration_ms(), 300);
        assert_eq!(mid.random_lock_duration_ms(), 550);
        assert_eq!(high.random_lock_duration_ms(), 800);
    }

    #[test]
    fn multiplier_stays_in_band() {
        let mut low = OddsEngine::new(ConstantRandom::new(0.0));
        let mut mid = OddsEngine::new(ConstantRandom::new(0.5));
        assert!((low.random_multiplier() - 0.9).abs() < 1e-12);
        assert!((mid.random_multiplier() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn next_odds_is_rounded_and_clamped() {
        let mut engine = OddsEngine::new(ConstantRandom::new(0.0));
        // 1.05 * 0.9 = 0.945 -> 0.95 -> clamped
        assert_eq!(engine.next_odds(1.05), 1.01);
        // 2.0 * 0.9 = 1.8
        assert_eq!(engine.next_odds(2.0), 1.8);
    }

    #[test]
    fn empty_map_yields_no_updates() {
        let mut engine = OddsEngine::new(ConstantRandom::new(0.3));
        assert!(engine.build_random_updates(&OddsMap::new()).is_empty());
    }

    #[test]
    fn single_outcome_is_always_picked() {
        let mut engine = OddsEngine::new(ConstantRandom::new(0.5));
        let updates = engine.build_random_updates(&odds_map(1));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].outcome_id, OutcomeId::from("o0"));
        assert_eq!(updates[0].odds, 1.5);
    }

    #[test]
    fn subset_is_quarter_rounded_up_without_duplicates() {
        for count in [2usize, 4, 5, 8, 9, 17] {
            let mut engine = OddsEngine::new(crate::domain::StdRandom::seeded(count as u64));
            let updates = engine.build_random_updates(&odds_map(count));
            assert_eq!(updates.len(), count.div_ceil(4));

            let mut ids: Vec<_> = updates.iter().map(|u| u.outcome_id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), updates.len());
        }
    }

    #[test]
    fn updates_are_valid_two_decimal_odds() {
        let mut engine = OddsEngine::new(crate::domain::StdRandom::seeded(99));
        let odds = odds_map(40);
        for _ in 0..50 {
            for update in engine.build_random_updates(&odds) {
                assert!(update.odds >= 1.01);
                let cents = update.odds * 100.0;
                assert!((cents - cents.round()).abs() < 1e-6, "{}", update.odds);
            }
        }
    }

    #[test]
    fn shuffle_is_driven_by_the_random_source() {
        // Sorted ids o0..o3. Index 3 swaps with floor(0.0 * 4) = 0, then
        // indices 2 and 1 swap with themselves at 0.99.
        let mut engine = OddsEngine::new(ScriptedRandom::new(vec![0.0, 0.99, 0.99, 0.5]));
        let updates = engine.build_random_updates(&odds_map(4));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].outcome_id, OutcomeId::from("o3"));
    }
}
