//! Odds arithmetic shared by the engine, the store and the selectors.

use serde::{Deserialize, Serialize};

use super::id::OutcomeId;

/// Lowest odds an outcome may ever carry.
pub const MIN_ODDS: f64 = 1.01;

/// Round to two decimal places, half-up.
///
/// `f64::EPSILON` is added first so values such as `2.005`, which are stored
/// slightly below the decimal boundary, still round up.
#[must_use]
pub fn round_odds(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0 + 0.5).floor() / 100.0
}

/// Floor odds at [`MIN_ODDS`].
#[must_use]
pub fn clamp_min_odds(value: f64) -> f64 {
    value.max(MIN_ODDS)
}

/// True iff `value` is finite and at least [`MIN_ODDS`].
#[must_use]
pub fn is_valid_odds(value: f64) -> bool {
    value.is_finite() && value >= MIN_ODDS
}

/// Like [`is_valid_odds`] but for a lookup that may have missed.
#[must_use]
pub fn is_valid_live_odds(value: Option<f64>) -> bool {
    value.is_some_and(is_valid_odds)
}

/// New odds for one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsUpdate {
    pub outcome_id: OutcomeId,
    pub odds: f64,
}

impl OddsUpdate {
    pub fn new(outcome_id: impl Into<OutcomeId>, odds: f64) -> Self {
        Self {
            outcome_id: outcome_id.into(),
            odds,
        }
    }
}

/// Direction of the most recent odds move on an outcome.
///
/// Absence of a pulse is modelled as `Option::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsPulse {
    Up,
    Down,
}

impl OddsPulse {
    /// Pulse for a move from `previous` to `next`.
    ///
    /// `None` when the value is unchanged, incomparable, or there was no
    /// previous value.
    #[must_use]
    pub fn between(previous: Option<f64>, next: f64) -> Option<Self> {
        let previous = previous?;
        if next > previous {
            Some(Self::Up)
        } else if next < previous {
            Some(Self::Down)
        } else {
            None
        }
    }

    /// Stable name used in logs and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_on_the_decimal_boundary() {
        assert_eq!(round_odds(2.005), 2.01);
        assert_eq!(round_odds(3.554), 3.55);
        assert_eq!(round_odds(3.555), 3.56);
        assert_eq!(round_odds(1.0), 1.0);
    }

    #[test]
    fn clamps_below_minimum() {
        assert_eq!(clamp_min_odds(0.99), 1.01);
        assert_eq!(clamp_min_odds(1.8), 1.8);
        assert_eq!(clamp_min_odds(MIN_ODDS), MIN_ODDS);
    }

    #[test]
    fn validity_requires_finite_and_floor() {
        assert!(is_valid_odds(1.01));
        assert!(is_valid_odds(25.0));
        assert!(!is_valid_odds(1.0));
        assert!(!is_valid_odds(f64::NAN));
        assert!(!is_valid_odds(f64::INFINITY));
        assert!(!is_valid_live_odds(None));
        assert!(is_valid_live_odds(Some(2.0)));
    }

    #[test]
    fn pulse_follows_sign_of_change() {
        assert_eq!(OddsPulse::between(Some(2.0), 2.2), Some(OddsPulse::Up));
        assert_eq!(OddsPulse::between(Some(2.0), 1.8), Some(OddsPulse::Down));
        assert_eq!(OddsPulse::between(Some(2.0), 2.0), None);
        assert_eq!(OddsPulse::between(None, 2.0), None);
        assert_eq!(OddsPulse::between(Some(f64::NAN), 2.0), None);
    }
}
