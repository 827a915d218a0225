//! # Scoring Engine
//!
//! Converts a validated [`ResponseSheet`] into per-dimension scores, the
//! composite AI IQ and a maturity level.
//!
//! ## Policies
//!
//! | Policy | Dimension score | Range |
//! |--------|-----------------|-------|
//! | `Unweighted` | mean of the numeric values | [1, 5] |
//! | `Weighted` | positive / (positive + negative) * 5 | [0, 5] |
//!
//! The signed-weight formula is reproduced exactly so that newly computed
//! scores stay comparable with previously stored ones.
//!
//! All scores are rounded to two decimals of their exact binary value.

use crate::maturity::MaturityLevel;
use crate::model::SurveyModel;
use crate::primitives::{NEUTRAL_MIDPOINT, SCALE_MAX, SCALE_MIN, SCORE_CEILING, SCORE_DECIMALS};
use crate::response::ResponseSheet;
use crate::{AiIqError, DimensionScore, ScaleChoice};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ROUNDING
// =============================================================================

/// Round to `SCORE_DECIMALS` places.
///
/// Rounds the exact binary value, so `3.335` (stored as `3.33499..`) gives
/// `3.33`, and only exactly representable halves such as `0.125` tie to
/// even. Scaling by 100 first would round the product and disagree with
/// the stored scores.
#[must_use]
pub fn round_score(value: f64) -> f64 {
    // Decimal output of a float always parses back; non-finite input passes through.
    format!("{:.*}", SCORE_DECIMALS, value)
        .parse()
        .unwrap_or(value)
}

// =============================================================================
// SCORING POLICY
// =============================================================================

/// How a dimension's answers become a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Arithmetic mean of the 1..=5 values.
    #[default]
    #[serde(alias = "mean")]
    Unweighted,
    /// Signed-weight ratio of agreeing to disagreeing contributions.
    #[serde(alias = "signed_weight")]
    Weighted,
}

impl ScoringPolicy {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ScoringPolicy::Unweighted => "unweighted",
            ScoringPolicy::Weighted => "weighted",
        }
    }

    /// Inclusive range every dimension score falls into.
    #[must_use]
    pub fn score_range(&self) -> (f64, f64) {
        match self {
            ScoringPolicy::Unweighted => (f64::from(SCALE_MIN), f64::from(SCALE_MAX)),
            ScoringPolicy::Weighted => (0.0, SCORE_CEILING),
        }
    }

    /// Score one dimension's answers.
    pub fn score_dimension(&self, answers: &[ScaleChoice]) -> Result<f64, AiIqError> {
        match self {
            ScoringPolicy::Unweighted => unweighted_score(answers),
            ScoringPolicy::Weighted => weighted_score(answers),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringPolicy {
    type Err = AiIqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unweighted" | "mean" => Ok(ScoringPolicy::Unweighted),
            "weighted" | "signed_weight" => Ok(ScoringPolicy::Weighted),
            other => Err(AiIqError::Configuration(format!(
                "Unknown scoring policy: '{}' (expected 'unweighted' or 'weighted')",
                other
            ))),
        }
    }
}

// =============================================================================
// DIMENSION SCORING
// =============================================================================

fn require_answers(answers: &[ScaleChoice]) -> Result<(), AiIqError> {
    if answers.is_empty() {
        return Err(AiIqError::InvalidInput(
            "Cannot score a dimension with no answers".to_string(),
        ));
    }
    Ok(())
}

/// Mean of the numeric values, rounded. Always in [1, 5].
pub fn unweighted_score(answers: &[ScaleChoice]) -> Result<f64, AiIqError> {
    require_answers(answers)?;
    let sum: u32 = answers.iter().map(|c| u32::from(c.value())).sum();
    Ok(round_score(f64::from(sum) / answers.len() as f64))
}

/// Signed-weight ratio score, rounded. Always in [0, 5].
///
/// `positive` sums `value * weight` over agreeing answers, `negative` sums
/// `value * |weight|` over disagreeing ones; Neutral adds to neither. When
/// both sums are zero the score is the neutral midpoint 2.5.
pub fn weighted_score(answers: &[ScaleChoice]) -> Result<f64, AiIqError> {
    require_answers(answers)?;

    let mut positive = 0.0_f64;
    let mut negative = 0.0_f64;
    for choice in answers {
        let value = f64::from(choice.value());
        let weight = choice.weight();
        if weight > 0.0 {
            positive += value * weight;
        } else if weight < 0.0 {
            negative += value * weight.abs();
        }
    }

    let total = positive + negative;
    if total == 0.0 {
        return Ok(NEUTRAL_MIDPOINT);
    }

    let ratio = (positive / total * SCORE_CEILING).clamp(0.0, SCORE_CEILING);
    Ok(round_score(ratio))
}

/// Composite AI IQ: mean of the dimension scores, rounded.
pub fn composite_score(scores: &[DimensionScore]) -> Result<f64, AiIqError> {
    if scores.is_empty() {
        return Err(AiIqError::Configuration(
            "No dimension scores to combine".to_string(),
        ));
    }
    let sum: f64 = scores.iter().map(|s| s.score).sum();
    Ok(round_score(sum / scores.len() as f64))
}

// =============================================================================
// SCORE CARD
// =============================================================================

/// Result of scoring one response sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub policy: ScoringPolicy,
    /// One entry per dimension, in model order.
    pub dimension_scores: Vec<DimensionScore>,
    pub ai_iq: f64,
    pub level: MaturityLevel,
}

impl ScoreCard {
    /// Score for a named dimension.
    #[must_use]
    pub fn score_for(&self, dimension: &str) -> Option<f64> {
        self.dimension_scores
            .iter()
            .find(|s| s.dimension == dimension)
            .map(|s| s.score)
    }
}

/// Validate a sheet against the model and score it under `policy`.
pub fn score_sheet(
    model: &SurveyModel,
    policy: ScoringPolicy,
    sheet: &ResponseSheet,
) -> Result<ScoreCard, AiIqError> {
    sheet.validate(model)?;

    let dimension_scores = model
        .dimensions()
        .iter()
        .map(|d| {
            policy
                .score_dimension(sheet.answers_for(&d.name))
                .map(|score| DimensionScore::new(d.name.clone(), score))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let ai_iq = composite_score(&dimension_scores)?;

    Ok(ScoreCard {
        policy,
        dimension_scores,
        ai_iq,
        level: MaturityLevel::classify(ai_iq),
    })
}

// =============================================================================
// TESTS
// =============================================================================
