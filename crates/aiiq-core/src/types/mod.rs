//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the survey engine:
//! - Respondent identifiers (`RespondentId`)
//! - The Likert scale (`ScaleChoice`)
//! - Per-dimension results (`DimensionScore`)
//! - Error types (`AiIqError`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// RESPONDENT IDENTIFIER
// =============================================================================

/// Stable identifier of a stored submission.
///
/// Assigned by the store as `1 + max(existing)`, never reused while the
/// row with the current maximum survives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RespondentId(pub u64);

impl RespondentId {
    /// The identifier given to the first submission of an empty store.
    pub const FIRST: Self = Self(1);

    /// The identifier following this one, saturating at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RespondentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SCALE CHOICE
// =============================================================================

/// One of the five ordinal answers of the Likert scale.
///
/// Each choice carries a numeric value (1..=5) and a signed weight used by
/// the signed-weight scoring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScaleChoice {
    #[serde(rename = "Strongly Agree", alias = "strongly_agree")]
    StronglyAgree,
    #[serde(rename = "Agree", alias = "agree")]
    Agree,
    #[serde(rename = "Neutral", alias = "neutral")]
    Neutral,
    #[serde(rename = "Disagree", alias = "disagree")]
    Disagree,
    #[serde(rename = "Strongly Disagree", alias = "strongly_disagree")]
    StronglyDisagree,
}

impl ScaleChoice {
    /// All choices in presentation order (most to least agreeable).
    pub const ALL: [ScaleChoice; 5] = [
        ScaleChoice::StronglyAgree,
        ScaleChoice::Agree,
        ScaleChoice::Neutral,
        ScaleChoice::Disagree,
        ScaleChoice::StronglyDisagree,
    ];

    /// The selection a form pre-fills before the respondent answers.
    pub const DEFAULT: ScaleChoice = ScaleChoice::Neutral;

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ScaleChoice::StronglyAgree => "Strongly Agree",
            ScaleChoice::Agree => "Agree",
            ScaleChoice::Neutral => "Neutral",
            ScaleChoice::Disagree => "Disagree",
            ScaleChoice::StronglyDisagree => "Strongly Disagree",
        }
    }

    /// Numeric value on the 1..=5 scale.
    #[must_use]
    pub fn value(&self) -> u8 {
        match self {
            ScaleChoice::StronglyAgree => 5,
            ScaleChoice::Agree => 4,
            ScaleChoice::Neutral => 3,
            ScaleChoice::Disagree => 2,
            ScaleChoice::StronglyDisagree => 1,
        }
    }

    /// Signed weight used by the signed-weight ratio policy.
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            ScaleChoice::StronglyAgree => 1.5,
            ScaleChoice::Agree => 1.0,
            ScaleChoice::Neutral => 0.0,
            ScaleChoice::Disagree => -1.5,
            ScaleChoice::StronglyDisagree => -3.0,
        }
    }
}

impl Default for ScaleChoice {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ScaleChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScaleChoice {
    type Err = AiIqError;

    /// Parse a display label ("Strongly Agree") or its snake_case form.
    /// Case and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', " ");
        ScaleChoice::ALL
            .into_iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| AiIqError::InvalidInput(format!("Unknown scale choice: '{}'", s)))
    }
}

// =============================================================================
// DIMENSION SCORE
// =============================================================================

/// The score one dimension received, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: String,
    pub score: f64,
}

impl DimensionScore {
    #[must_use]
    pub fn new(dimension: impl Into<String>, score: f64) -> Self {
        Self {
            dimension: dimension.into(),
            score,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the survey engine.
///
/// - No silent failures: an incomplete sheet is rejected, never scored
/// - Deleting an unknown respondent is not an error (see `SubmissionStore`)
#[derive(Debug, Error)]
pub enum AiIqError {
    /// The survey definition is unusable (no dimensions, duplicates, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A response sheet is missing answers or references unknown dimensions.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing the persistent store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored columns or rows do not match the configured dimensions.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// No submission carries the requested identifier.
    #[error("Submission not found: {0}")]
    NotFound(RespondentId),

    /// I/O outside the store (input files, sockets).
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
