//! # Maturity Levels
//!
//! Classification of a composite AI IQ into one of five maturity levels.
//!
//! ## Level Definitions
//!
//! | Level | Name | Lower bound (inclusive) |
//! |-------|------|-------------------------|
//! | 1 | Initial | - |
//! | 2 | Emerging | 1.5 |
//! | 3 | Managing | 2.5 |
//! | 4 | Innovating | 3.5 |
//! | 5 | Optimizing | 4.5 |
//!
//! Classification is a pure, total function of the score. A NaN score
//! falls through every comparison and is classified as Level 1.

use serde::{Deserialize, Serialize};

// =============================================================================
// LEVEL THRESHOLDS
// =============================================================================

/// Lower bound of Level 2: Emerging
pub const EMERGING_THRESHOLD: f64 = 1.5;

/// Lower bound of Level 3: Managing
pub const MANAGING_THRESHOLD: f64 = 2.5;

/// Lower bound of Level 4: Innovating
pub const INNOVATING_THRESHOLD: f64 = 3.5;

/// Lower bound of Level 5: Optimizing
pub const OPTIMIZING_THRESHOLD: f64 = 4.5;

// =============================================================================
// MATURITY LEVEL
// =============================================================================

/// Maturity level derived from the composite AI IQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    /// Level 1: Initial
    Initial,
    /// Level 2: Emerging
    Emerging,
    /// Level 3: Managing
    Managing,
    /// Level 4: Innovating
    Innovating,
    /// Level 5: Optimizing
    Optimizing,
}

impl MaturityLevel {
    /// All levels, lowest first.
    pub const ALL: [MaturityLevel; 5] = [
        MaturityLevel::Initial,
        MaturityLevel::Emerging,
        MaturityLevel::Managing,
        MaturityLevel::Innovating,
        MaturityLevel::Optimizing,
    ];

    /// Classify a composite score.
    #[must_use]
    pub fn classify(ai_iq: f64) -> Self {
        if ai_iq >= OPTIMIZING_THRESHOLD {
            MaturityLevel::Optimizing
        } else if ai_iq >= INNOVATING_THRESHOLD {
            MaturityLevel::Innovating
        } else if ai_iq >= MANAGING_THRESHOLD {
            MaturityLevel::Managing
        } else if ai_iq >= EMERGING_THRESHOLD {
            MaturityLevel::Emerging
        } else {
            MaturityLevel::Initial
        }
    }

    /// Level number, 1 through 5.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            MaturityLevel::Initial => 1,
            MaturityLevel::Emerging => 2,
            MaturityLevel::Managing => 3,
            MaturityLevel::Innovating => 4,
            MaturityLevel::Optimizing => 5,
        }
    }

    /// Get the level name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MaturityLevel::Initial => "Initial",
            MaturityLevel::Emerging => "Emerging",
            MaturityLevel::Managing => "Managing",
            MaturityLevel::Innovating => "Innovating",
            MaturityLevel::Optimizing => "Optimizing",
        }
    }

    /// Inclusive lower bound of this level (0 for Level 1).
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        match self {
            MaturityLevel::Initial => 0.0,
            MaturityLevel::Emerging => EMERGING_THRESHOLD,
            MaturityLevel::Managing => MANAGING_THRESHOLD,
            MaturityLevel::Innovating => INNOVATING_THRESHOLD,
            MaturityLevel::Optimizing => OPTIMIZING_THRESHOLD,
        }
    }

    /// Get the next level, if any.
    #[must_use]
    pub fn next(&self) -> Option<MaturityLevel> {
        match self {
            MaturityLevel::Initial => Some(MaturityLevel::Emerging),
            MaturityLevel::Emerging => Some(MaturityLevel::Managing),
            MaturityLevel::Managing => Some(MaturityLevel::Innovating),
            MaturityLevel::Innovating => Some(MaturityLevel::Optimizing),
            MaturityLevel::Optimizing => None,
        }
    }

    /// Get the previous level, if any.
    #[must_use]
    pub fn previous(&self) -> Option<MaturityLevel> {
        match self {
            MaturityLevel::Initial => None,
            MaturityLevel::Emerging => Some(MaturityLevel::Initial),
            MaturityLevel::Managing => Some(MaturityLevel::Emerging),
            MaturityLevel::Innovating => Some(MaturityLevel::Managing),
            MaturityLevel::Optimizing => Some(MaturityLevel::Innovating),
        }
    }

    /// Check if this level is the top one.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, MaturityLevel::Optimizing)
    }

    /// Score still needed to reach the next level (`None` at the top).
    #[must_use]
    pub fn gap_to_next(&self, ai_iq: f64) -> Option<f64> {
        self.next()
            .map(|next| crate::scoring::round_score((next.lower_bound() - ai_iq).max(0.0)))
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level {}: {}", self.number(), self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_on_the_lower_bound() {
        assert_eq!(MaturityLevel::classify(4.5), MaturityLevel::Optimizing);
        assert_eq!(MaturityLevel::classify(4.49), MaturityLevel::Innovating);
        assert_eq!(MaturityLevel::classify(3.5), MaturityLevel::Innovating);
        assert_eq!(MaturityLevel::classify(3.49), MaturityLevel::Managing);
        assert_eq!(MaturityLevel::classify(2.5), MaturityLevel::Managing);
        assert_eq!(MaturityLevel::classify(2.49), MaturityLevel::Emerging);
        assert_eq!(MaturityLevel::classify(1.5), MaturityLevel::Emerging);
        assert_eq!(MaturityLevel::classify(1.49), MaturityLevel::Initial);
    }

    #[test]
    fn extremes_classify() {
        assert_eq!(MaturityLevel::classify(0.0), MaturityLevel::Initial);
        assert_eq!(MaturityLevel::classify(5.0), MaturityLevel::Optimizing);
        assert_eq!(MaturityLevel::classify(f64::NAN), MaturityLevel::Initial);
    }

    #[test]
    fn display_format() {
        assert_eq!(
            MaturityLevel::Optimizing.to_string(),
            "Level 5: Optimizing"
        );
        assert_eq!(MaturityLevel::Initial.to_string(), "Level 1: Initial");
    }

    #[test]
    fn level_progression() {
        assert_eq!(MaturityLevel::Initial.next(), Some(MaturityLevel::Emerging));
        assert_eq!(MaturityLevel::Optimizing.next(), None);
        assert_eq!(MaturityLevel::Initial.previous(), None);
        assert!(MaturityLevel::Optimizing.is_terminal());

        for pair in MaturityLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
    }

    #[test]
    fn lower_bound_classifies_to_itself() {
        for level in MaturityLevel::ALL {
            assert_eq!(MaturityLevel::classify(level.lower_bound()), level);
        }
    }

    #[test]
    fn gap_to_next_level() {
        let level = MaturityLevel::classify(3.2);
        assert_eq!(level.gap_to_next(3.2), Some(0.3));
        assert_eq!(MaturityLevel::Optimizing.gap_to_next(4.8), None);
    }
}
