//! # Submissions
//!
//! A stored survey result: identity, timestamp, composite AI IQ and one
//! score plus one (possibly empty) text response per dimension.
//!
//! Submissions are created once and never edited; the only mutation a store
//! supports is removing a whole row.

use crate::maturity::MaturityLevel;
use crate::model::SurveyModel;
use crate::primitives::{NO_COMMENT_PLACEHOLDER, TIMESTAMP_FORMAT};
use crate::response::{Respondent, ResponseSheet};
use crate::scoring::ScoreCard;
use crate::{AiIqError, DimensionScore, RespondentId};
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Current local time at second resolution.
#[must_use]
pub fn now_timestamp() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Format a timestamp the way the store writes it.
#[must_use]
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AiIqError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        AiIqError::SchemaMismatch(format!("Invalid timestamp '{}': {}", raw, e))
    })
}

/// Serde adapter keeping the stored timestamp format in JSON too.
pub mod timestamp_format {
    use super::{TIMESTAMP_FORMAT, format_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// DIMENSION RECORD
// =============================================================================

/// Score and free-text response stored for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRecord {
    pub dimension: String,
    pub score: f64,
    #[serde(default)]
    pub text_response: String,
}

impl DimensionRecord {
    /// The text response, or the placeholder shown when it is blank.
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.text_response.trim().is_empty() {
            NO_COMMENT_PLACEHOLDER
        } else {
            &self.text_response
        }
    }
}

// =============================================================================
// NEW SUBMISSION (not yet stored)
// =============================================================================

/// A submission that has not been assigned a respondent identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub timestamp: NaiveDateTime,
    pub ai_iq: f64,
    pub dimensions: Vec<DimensionRecord>,
}

impl NewSubmission {
    /// Combine a score card with the sheet's free text.
    #[must_use]
    pub fn from_card(
        respondent: &Respondent,
        card: &ScoreCard,
        sheet: &ResponseSheet,
        timestamp: NaiveDateTime,
    ) -> Self {
        let dimensions = card
            .dimension_scores
            .iter()
            .map(|s| DimensionRecord {
                dimension: s.dimension.clone(),
                score: s.score,
                text_response: sheet.text_for(&s.dimension).to_string(),
            })
            .collect();

        Self {
            name: respondent.name.clone().unwrap_or_default(),
            email: respondent.email.clone().unwrap_or_default(),
            timestamp,
            ai_iq: card.ai_iq,
            dimensions,
        }
    }

    /// Attach the identifier assigned by the store.
    #[must_use]
    pub fn with_id(self, respondent_id: RespondentId) -> Submission {
        Submission {
            respondent_id,
            name: self.name,
            email: self.email,
            timestamp: self.timestamp,
            ai_iq: self.ai_iq,
            dimensions: self.dimensions,
        }
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// One stored survey result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub respondent_id: RespondentId,
    pub name: String,
    pub email: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub ai_iq: f64,
    /// One record per dimension, in model order.
    pub dimensions: Vec<DimensionRecord>,
}

impl Submission {
    /// Maturity level of the stored composite score.
    #[must_use]
    pub fn level(&self) -> MaturityLevel {
        MaturityLevel::classify(self.ai_iq)
    }

    #[must_use]
    pub fn record(&self, dimension: &str) -> Option<&DimensionRecord> {
        self.dimensions.iter().find(|r| r.dimension == dimension)
    }

    #[must_use]
    pub fn score_for(&self, dimension: &str) -> Option<f64> {
        self.record(dimension).map(|r| r.score)
    }

    /// Scores in stored order, for chart building.
    #[must_use]
    pub fn dimension_scores(&self) -> Vec<DimensionScore> {
        self.dimensions
            .iter()
            .map(|r| DimensionScore::new(r.dimension.clone(), r.score))
            .collect()
    }

    /// Check the record set matches the model exactly, in order.
    pub fn conforms_to(&self, model: &SurveyModel) -> Result<(), AiIqError> {
        let stored = self.dimensions.iter().map(|r| r.dimension.as_str());
        if !stored.eq(model.dimension_names()) {
            return Err(AiIqError::SchemaMismatch(format!(
                "Submission {} does not carry exactly one record per configured dimension",
                self.respondent_id
            )));
        }
        Ok(())
    }
}

/// Next identifier for a store: `1 + max(existing)`, or 1 when empty.
#[must_use]
pub fn next_respondent_id(existing: &[Submission]) -> RespondentId {
    existing
        .iter()
        .map(|s| s.respondent_id)
        .max()
        .map(RespondentId::next)
        .unwrap_or(RespondentId::FIRST)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScoringPolicy, score_sheet};
    use crate::ScaleChoice;

    fn sample(id: u64) -> Submission {
        Submission {
            respondent_id: RespondentId(id),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            timestamp: parse_timestamp("2024-03-01 09:30:00").expect("timestamp"),
            ai_iq: 3.0,
            dimensions: Vec::new(),
        }
    }

    #[test]
    fn next_id_on_empty_store_is_one() {
        assert_eq!(next_respondent_id(&[]), RespondentId(1));
    }

    #[test]
    fn next_id_follows_max_not_len() {
        let existing = vec![sample(3), sample(7), sample(2)];
        assert_eq!(next_respondent_id(&existing), RespondentId(8));
    }

    #[test]
    fn timestamp_roundtrip_keeps_format() {
        let ts = parse_timestamp("2025-01-31 23:59:07").expect("parse");
        assert_eq!(format_timestamp(&ts), "2025-01-31 23:59:07");
    }

    #[test]
    fn malformed_timestamp_rejected() {
        assert!(matches!(
            parse_timestamp("31/01/2025"),
            Err(AiIqError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn now_has_second_resolution() {
        let now = now_timestamp();
        assert_eq!(parse_timestamp(&format_timestamp(&now)).expect("parse"), now);
    }

    #[test]
    fn from_card_carries_text_and_scores() {
        let model = SurveyModel::builtin();
        let sheet = ResponseSheet::neutral(&model)
            .with_answers("Data", &[ScaleChoice::StronglyAgree; 3])
            .with_text("Data", "Silos everywhere");
        let card = score_sheet(&model, ScoringPolicy::Unweighted, &sheet).expect("card");
        let draft = NewSubmission::from_card(
            &Respondent::new("Ada", "ada@example.com"),
            &card,
            &sheet,
            now_timestamp(),
        );

        let stored = draft.with_id(RespondentId(4));
        assert!(stored.conforms_to(&model).is_ok());
        assert_eq!(stored.score_for("Data"), Some(5.0));
        let data = stored.record("Data").expect("data");
        assert_eq!(data.display_text(), "Silos everywhere");
        let people = stored.record("People").expect("people");
        assert_eq!(people.display_text(), NO_COMMENT_PLACEHOLDER);
    }

    #[test]
    fn missing_dimension_does_not_conform() {
        assert!(sample(1).conforms_to(&SurveyModel::builtin()).is_err());
    }
}
