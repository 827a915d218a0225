//! # Response Sheets
//!
//! What one respondent hands in: optional identity, one [`ScaleChoice`] per
//! question, and an optional free-text response per dimension.
//!
//! Sheets are validated against a [`SurveyModel`] before scoring. An
//! incomplete sheet is rejected; it is never scored with missing answers.

use crate::model::SurveyModel;
use crate::primitives::{MAX_IDENTITY_LENGTH, MAX_TEXT_RESPONSE_LENGTH};
use crate::{AiIqError, ScaleChoice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// RESPONDENT
// =============================================================================

/// Optional identity of the person answering.
///
/// Only identified respondents (both name and email non-blank) are
/// persisted; anonymous respondents get their scores without a stored row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Respondent {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when both name and email are present and non-blank.
    #[must_use]
    pub fn is_identified(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.name) && present(&self.email)
    }

    /// Reject oversized identity fields.
    pub fn validate(&self) -> Result<(), AiIqError> {
        for (field, value) in [("name", &self.name), ("email", &self.email)] {
            if let Some(value) = value {
                if value.len() > MAX_IDENTITY_LENGTH {
                    return Err(AiIqError::InvalidInput(format!(
                        "{} length {} exceeds maximum {} bytes",
                        field,
                        value.len(),
                        MAX_IDENTITY_LENGTH
                    )));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// RESPONSE SHEET
// =============================================================================

/// Answers keyed by dimension name, in question order, plus free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSheet {
    pub answers: BTreeMap<String, Vec<ScaleChoice>>,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
}

impl ResponseSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default form state: every question answered Neutral, no text.
    #[must_use]
    pub fn neutral(model: &SurveyModel) -> Self {
        let answers = model
            .dimensions()
            .iter()
            .map(|d| (d.name.clone(), vec![ScaleChoice::DEFAULT; d.question_count()]))
            .collect();
        Self {
            answers,
            texts: BTreeMap::new(),
        }
    }

    /// Set the answers for a dimension, replacing any previous ones.
    #[must_use]
    pub fn with_answers(mut self, dimension: impl Into<String>, choices: &[ScaleChoice]) -> Self {
        self.answers.insert(dimension.into(), choices.to_vec());
        self
    }

    /// Set the free-text response for a dimension.
    #[must_use]
    pub fn with_text(mut self, dimension: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(dimension.into(), text.into());
        self
    }

    /// Answers given for a dimension (empty if none).
    #[must_use]
    pub fn answers_for(&self, dimension: &str) -> &[ScaleChoice] {
        self.answers.get(dimension).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Free-text response for a dimension (empty if none).
    #[must_use]
    pub fn text_for(&self, dimension: &str) -> &str {
        self.texts.get(dimension).map(String::as_str).unwrap_or("")
    }

    /// Check the sheet is complete and only references known dimensions.
    pub fn validate(&self, model: &SurveyModel) -> Result<(), AiIqError> {
        if model.is_empty() {
            return Err(AiIqError::Configuration(
                "Survey has no dimensions".to_string(),
            ));
        }

        if let Some(unknown) = self.answers.keys().find(|k| model.dimension(k).is_none()) {
            return Err(AiIqError::InvalidInput(format!(
                "Answers given for unknown dimension '{}'",
                unknown
            )));
        }

        for (dimension, text) in &self.texts {
            if model.dimension(dimension).is_none() {
                return Err(AiIqError::InvalidInput(format!(
                    "Text given for unknown dimension '{}'",
                    dimension
                )));
            }
            if text.len() > MAX_TEXT_RESPONSE_LENGTH {
                return Err(AiIqError::InvalidInput(format!(
                    "Text for '{}' is {} bytes, maximum is {}",
                    dimension,
                    text.len(),
                    MAX_TEXT_RESPONSE_LENGTH
                )));
            }
        }

        for dimension in model.dimensions() {
            let given = self.answers_for(&dimension.name).len();
            if given == 0 {
                return Err(AiIqError::InvalidInput(format!(
                    "Dimension '{}' has no answers",
                    dimension.name
                )));
            }
            if given != dimension.question_count() {
                return Err(AiIqError::InvalidInput(format!(
                    "Dimension '{}' has {} answers, expected {}",
                    dimension.name,
                    given,
                    dimension.question_count()
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dimension;

    fn two_dimension_model() -> SurveyModel {
        SurveyModel::new(vec![
            Dimension::new("People", &["p1", "p2"], Some("notes")),
            Dimension::new("Data", &["d1"], None),
        ])
        .expect("valid model")
    }

    #[test]
    fn neutral_sheet_is_complete() {
        let model = two_dimension_model();
        let sheet = ResponseSheet::neutral(&model);
        assert!(sheet.validate(&model).is_ok());
        assert_eq!(sheet.answers_for("People"), &[ScaleChoice::Neutral; 2]);
    }

    #[test]
    fn missing_dimension_rejected() {
        let model = two_dimension_model();
        let sheet = ResponseSheet::new().with_answers("People", &[ScaleChoice::Agree; 2]);
        let result = sheet.validate(&model);
        assert!(matches!(result, Err(AiIqError::InvalidInput(msg)) if msg.contains("Data")));
    }

    #[test]
    fn short_answer_list_rejected() {
        let model = two_dimension_model();
        let sheet = ResponseSheet::neutral(&model).with_answers("People", &[ScaleChoice::Agree]);
        assert!(matches!(
            sheet.validate(&model),
            Err(AiIqError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_dimension_rejected() {
        let model = two_dimension_model();
        let sheet = ResponseSheet::neutral(&model).with_answers("Culture", &[ScaleChoice::Agree]);
        assert!(matches!(
            sheet.validate(&model),
            Err(AiIqError::InvalidInput(_))
        ));

        let sheet = ResponseSheet::neutral(&model).with_text("Culture", "hello");
        assert!(matches!(
            sheet.validate(&model),
            Err(AiIqError::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_text_rejected() {
        let model = two_dimension_model();
        let sheet = ResponseSheet::neutral(&model)
            .with_text("Data", "x".repeat(MAX_TEXT_RESPONSE_LENGTH + 1));
        assert!(sheet.validate(&model).is_err());
    }

    #[test]
    fn identified_requires_both_fields() {
        assert!(Respondent::new("Ada", "ada@example.com").is_identified());
        assert!(!Respondent::new("Ada", "   ").is_identified());
        assert!(!Respondent::anonymous().is_identified());
        let name_only = Respondent {
            name: Some("Ada".to_string()),
            email: None,
        };
        assert!(!name_only.is_identified());
    }
}
