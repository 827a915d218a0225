//! # Aggregation
//!
//! Structured data for the views a renderer draws:
//! - [`SwimlaneChart`]: one lane per dimension with the score marked on it
//! - [`Summary`]: respondent count, mean AI IQ, per-dimension means and the
//!   maturity distribution across all stored submissions
//!
//! No drawing happens here; a renderer consumes these values as-is.

use crate::formats::format_score;
use crate::maturity::MaturityLevel;
use crate::model::SurveyModel;
use crate::scoring::{ScoreCard, ScoringPolicy, round_score};
use crate::submission::Submission;
use crate::DimensionScore;
use serde::{Deserialize, Serialize};

// =============================================================================
// SWIMLANE CHART
// =============================================================================

/// One horizontal lane of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// 1-based lane position, top to bottom.
    pub position: usize,
    pub dimension: String,
    pub score: f64,
    /// Marker label, `"<dimension>: <score>"`.
    pub label: String,
}

/// Dimension scores laid out as lanes on a shared score axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimlaneChart {
    pub title: String,
    /// Inclusive x-axis range.
    pub x_range: (f64, f64),
    pub lanes: Vec<Lane>,
}

impl SwimlaneChart {
    /// Build lanes in the order the scores are given.
    #[must_use]
    pub fn from_scores(scores: &[DimensionScore], policy: ScoringPolicy) -> Self {
        let (low, high) = policy.score_range();
        let lanes = scores
            .iter()
            .enumerate()
            .map(|(i, s)| Lane {
                position: i + 1,
                dimension: s.dimension.clone(),
                score: s.score,
                label: format!("{}: {}", s.dimension, format_score(s.score)),
            })
            .collect();

        Self {
            title: format!("Dimension Scores ({}–{})", low, high),
            x_range: (low, high),
            lanes,
        }
    }

    #[must_use]
    pub fn for_card(card: &ScoreCard) -> Self {
        Self::from_scores(&card.dimension_scores, card.policy)
    }

    #[must_use]
    pub fn for_submission(submission: &Submission, policy: ScoringPolicy) -> Self {
        Self::from_scores(&submission.dimension_scores(), policy)
    }

    /// Fraction of the axis width at which a score sits, clamped to [0, 1].
    #[must_use]
    pub fn relative_position(&self, score: f64) -> f64 {
        let (low, high) = self.x_range;
        if high <= low {
            return 0.0;
        }
        ((score - low) / (high - low)).clamp(0.0, 1.0)
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// How many respondents fall into one maturity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: MaturityLevel,
    pub label: String,
    pub count: usize,
}

/// Aggregate view over all stored submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub respondents: usize,
    /// Mean composite score; `None` without submissions.
    pub mean_ai_iq: Option<f64>,
    /// Level of the mean composite score.
    pub mean_level: Option<MaturityLevel>,
    /// Per-dimension mean in model order; empty without submissions.
    pub dimension_means: Vec<DimensionScore>,
    /// Every level, lowest first, including empty ones.
    pub level_distribution: Vec<LevelCount>,
}

impl Summary {
    #[must_use]
    pub fn from_submissions(model: &SurveyModel, submissions: &[Submission]) -> Self {
        let level_distribution = MaturityLevel::ALL
            .iter()
            .map(|&level| LevelCount {
                level,
                label: level.to_string(),
                count: submissions.iter().filter(|s| s.level() == level).count(),
            })
            .collect();

        let mean_ai_iq = mean(submissions.iter().map(|s| s.ai_iq));

        let dimension_means = if submissions.is_empty() {
            Vec::new()
        } else {
            model
                .dimension_names()
                .filter_map(|name| {
                    mean(submissions.iter().filter_map(|s| s.score_for(name)))
                        .map(|m| DimensionScore::new(name, m))
                })
                .collect()
        };

        Self {
            respondents: submissions.len(),
            mean_ai_iq,
            mean_level: mean_ai_iq.map(MaturityLevel::classify),
            dimension_means,
            level_distribution,
        }
    }

    /// Chart of the per-dimension means; `None` without submissions.
    #[must_use]
    pub fn chart(&self, policy: ScoringPolicy) -> Option<SwimlaneChart> {
        if self.dimension_means.is_empty() {
            return None;
        }
        Some(SwimlaneChart::from_scores(&self.dimension_means, policy))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(round_score(sum / count as f64))
    }
}

// =============================================================================
// TESTS
// =============================================================================
