//! # Response Model
//!
//! The static survey definition: ordered dimensions, their ordered question
//! prompts and an optional free-text prompt per dimension.
//!
//! A [`SurveyModel`] is validated once at construction and is immutable
//! afterwards. It is passed explicitly to the scoring engine, the store and
//! the app layer; there is no global survey.

use crate::AiIqError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DIMENSION
// =============================================================================

/// A thematic group of Likert questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Unique key. Also the prefix of the dimension's CSV columns.
    pub name: String,
    /// Question prompts in presentation order.
    pub questions: Vec<String>,
    /// Prompt for the optional free-text response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Dimension {
    #[must_use]
    pub fn new(name: impl Into<String>, questions: &[&str], text: Option<&str>) -> Self {
        Self {
            name: name.into(),
            questions: questions.iter().map(|q| (*q).to_string()).collect(),
            text: text.map(str::to_string),
        }
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

// =============================================================================
// SURVEY DEFINITION (unvalidated, as read from configuration)
// =============================================================================

/// Raw survey definition as declared in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SurveyDefinition {
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

// =============================================================================
// SURVEY MODEL (validated)
// =============================================================================

/// A validated, immutable survey.
///
/// Invariants:
/// - at least one dimension
/// - dimension names are non-blank and unique
/// - every dimension has at least one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SurveyDefinition")]
pub struct SurveyModel {
    dimensions: Vec<Dimension>,
}

impl SurveyModel {
    /// Validate and build a model from dimensions in presentation order.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, AiIqError> {
        if dimensions.is_empty() {
            return Err(AiIqError::Configuration(
                "Survey has no dimensions".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for dimension in &dimensions {
            if dimension.name.trim().is_empty() {
                return Err(AiIqError::Configuration(
                    "Dimension name must not be blank".to_string(),
                ));
            }
            if !seen.insert(dimension.name.as_str()) {
                return Err(AiIqError::Configuration(format!(
                    "Duplicate dimension: '{}'",
                    dimension.name
                )));
            }
            if dimension.questions.is_empty() {
                return Err(AiIqError::Configuration(format!(
                    "Dimension '{}' has no questions",
                    dimension.name
                )));
            }
        }

        Ok(Self { dimensions })
    }

    /// The built-in AI readiness survey: six dimensions, three questions each.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            dimensions: builtin_dimensions(),
        }
    }

    /// Dimensions in presentation order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Look up a dimension by name.
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Dimension names in presentation order.
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Always false for a validated model; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Total number of Likert questions across all dimensions.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.dimensions.iter().map(Dimension::question_count).sum()
    }
}

impl Default for SurveyModel {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<SurveyDefinition> for SurveyModel {
    type Error = AiIqError;

    fn try_from(definition: SurveyDefinition) -> Result<Self, Self::Error> {
        Self::new(definition.dimensions)
    }
}

impl From<SurveyModel> for SurveyDefinition {
    fn from(model: SurveyModel) -> Self {
        Self {
            dimensions: model.dimensions,
        }
    }
}

// =============================================================================
// BUILT-IN SURVEY
// =============================================================================

fn builtin_dimensions() -> Vec<Dimension> {
    vec![
        Dimension::new(
            "Business Domain Understanding",
            &[
                "Our organization has in-depth domain knowledge where AI will be applied.",
                "We effectively identify & prioritize AI use cases that bring real business value.",
                "We have a clear understanding of AI’s potential ROI or tangible benefits.",
            ],
            Some("Optional: Briefly describe any recent AI project or domain-specific challenge."),
        ),
        Dimension::new(
            "People",
            &[
                "Our Data Science team effectively translates business needs and collaborates with stakeholders.",
                "Our Data Science team has the necessary technical depth (ML, MLOps, relevant tools).",
                "Our business stakeholders are willing & able to sponsor and guide AI projects.",
            ],
            Some("Optional: Describe any communication or alignment challenges among teams."),
        ),
        Dimension::new(
            "Process",
            &[
                "We have a structured, iterative process for conducting AI experiments (POCs) quickly.",
                "We have a mature process for deploying AI models from pilot to production.",
                "We have robust monitoring and a clear human-in-the-loop for AI-driven decisions.",
            ],
            Some("Optional: Highlight any bottlenecks or pain points in the AI lifecycle."),
        ),
        Dimension::new(
            "Technology",
            &[
                "Our AI tech stack (frameworks, libraries, DevOps/MLOps) is modern and well-integrated.",
                "We have well-defined standards or governance for AI tools & data usage.",
                "Our architecture supports ‘plug-and-play’ integration for new AI models.",
            ],
            Some("Optional: Note any tech gaps or constraints (legacy systems, cloud limits, etc.)."),
        ),
        Dimension::new(
            "Data",
            &[
                "We have a unified data platform (not many siloed sources).",
                "Our data sources (structured/unstructured) are well-documented and discoverable.",
                "We have strong data governance and data quality practices.",
            ],
            Some("Optional: If data quality or availability is an issue, explain."),
        ),
        Dimension::new(
            "Patterns",
            &[
                "We understand and leverage common AI deployment patterns (batch, real-time, RAG, etc.).",
                "We have a clear approach for integrating AI models internally vs. using external services.",
                "We frequently reuse proven AI solution patterns across projects.",
            ],
            Some("Optional: Describe any challenges adopting new AI patterns or frameworks."),
        ),
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_survey_is_valid() {
        let builtin = SurveyModel::builtin();
        let rebuilt = SurveyModel::new(builtin.dimensions().to_vec()).expect("valid");
        assert_eq!(rebuilt, builtin);
        assert_eq!(builtin.len(), 6);
        assert_eq!(builtin.question_count(), 18);
    }

    #[test]
    fn builtin_order_is_stable() {
        let model = SurveyModel::builtin();
        let names: Vec<&str> = model.dimension_names().collect();
        assert_eq!(
            names,
            vec![
                "Business Domain Understanding",
                "People",
                "Process",
                "Technology",
                "Data",
                "Patterns"
            ]
        );
    }

    #[test]
    fn empty_survey_rejected() {
        let result = SurveyModel::new(Vec::new());
        assert!(matches!(result, Err(AiIqError::Configuration(_))));
    }

    #[test]
    fn duplicate_dimension_rejected() {
        let result = SurveyModel::new(vec![
            Dimension::new("Data", &["q1"], None),
            Dimension::new("Data", &["q2"], None),
        ]);
        assert!(matches!(result, Err(AiIqError::Configuration(_))));
    }

    #[test]
    fn dimension_without_questions_rejected() {
        let result = SurveyModel::new(vec![Dimension::new("Data", &[], None)]);
        assert!(matches!(result, Err(AiIqError::Configuration(_))));
    }

    #[test]
    fn blank_dimension_name_rejected() {
        let result = SurveyModel::new(vec![Dimension::new("  ", &["q"], None)]);
        assert!(matches!(result, Err(AiIqError::Configuration(_))));
    }

    #[test]
    fn lookup_by_name() {
        let model = SurveyModel::builtin();
        let people = model.dimension("People").expect("present");
        assert_eq!(people.question_count(), 3);
        assert!(model.dimension("Culture").is_none());
    }
}
