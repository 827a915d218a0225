//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use aiiq_core::{
    AiIqError, Dimension, LevelCount, MaturityLevel, Respondent, ResponseSheet, RespondentId,
    ScaleChoice, ScoreCard, ScoringPolicy, Submission, SubmitOutcome, Summary, Survey,
    SurveyModel, SwimlaneChart,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// SURVEY RESPONSE
// =============================================================================

/// The survey form: dimensions, questions and the answer scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub policy: ScoringPolicy,
    /// Answer labels in presentation order.
    pub scale: Vec<String>,
    /// Label a form pre-selects.
    pub default_choice: String,
    pub dimensions: Vec<Dimension>,
}

impl SurveyResponse {
    #[must_use]
    pub fn from_survey(survey: &Survey) -> Self {
        Self {
            policy: survey.policy(),
            scale: ScaleChoice::ALL
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
            default_choice: ScaleChoice::DEFAULT.label().to_string(),
            dimensions: survey.model().dimensions().to_vec(),
        }
    }
}

// =============================================================================
// SUBMIT REQUEST/RESPONSE
// =============================================================================

/// A completed survey form.
///
/// Answers are keyed by dimension name and listed in question order. Labels
/// may be given as displayed (`"Strongly Agree"`) or in snake_case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub answers: BTreeMap<String, Vec<ScaleChoice>>,
    pub texts: BTreeMap<String, String>,
}

impl SubmitRequest {
    /// A blank form for `model`: identity fields empty, every answer Neutral.
    #[must_use]
    pub fn template(model: &SurveyModel) -> Self {
        let sheet = ResponseSheet::neutral(model);
        Self {
            name: Some(String::new()),
            email: Some(String::new()),
            answers: sheet.answers,
            texts: sheet.texts,
        }
    }

    #[must_use]
    pub fn respondent(&self) -> Respondent {
        Respondent {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    #[must_use]
    pub fn sheet(&self) -> ResponseSheet {
        ResponseSheet {
            answers: self.answers.clone(),
            texts: self.texts.clone(),
        }
    }
}

/// Scoring result for a submitted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub card: ScoreCard,
    /// Human-readable level, e.g. `Level 3: Managing`.
    pub level_label: String,
    pub chart: SwimlaneChart,
    /// False for anonymous respondents.
    pub saved: bool,
    pub respondent_id: Option<RespondentId>,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            level_label: outcome.card.level.to_string(),
            chart: SwimlaneChart::for_card(&outcome.card),
            saved: outcome.saved.is_some(),
            respondent_id: outcome.saved.map(|s| s.respondent_id),
            card: outcome.card,
        }
    }
}

// =============================================================================
// SUBMISSION LIST/DETAIL
// =============================================================================

/// One row of the submissions overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub respondent_id: RespondentId,
    pub name: String,
    pub email: String,
    pub timestamp: String,
    pub ai_iq: f64,
    pub level: MaturityLevel,
}

impl From<&Submission> for SubmissionRow {
    fn from(submission: &Submission) -> Self {
        Self {
            respondent_id: submission.respondent_id,
            name: submission.name.clone(),
            email: submission.email.clone(),
            timestamp: aiiq_core::submission::format_timestamp(&submission.timestamp),
            ai_iq: submission.ai_iq,
            level: submission.level(),
        }
    }
}

/// All stored submissions, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionListResponse {
    pub count: usize,
    pub submissions: Vec<SubmissionRow>,
}

impl SubmissionListResponse {
    #[must_use]
    pub fn from_submissions(submissions: &[Submission]) -> Self {
        Self {
            count: submissions.len(),
            submissions: submissions.iter().map(SubmissionRow::from).collect(),
        }
    }
}

/// Free-text answer for one dimension, placeholder when blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponseJson {
    pub dimension: String,
    pub text: String,
}

/// Everything shown for one respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetailResponse {
    pub submission: Submission,
    pub level_label: String,
    pub chart: SwimlaneChart,
    pub text_responses: Vec<TextResponseJson>,
}

impl SubmissionDetailResponse {
    #[must_use]
    pub fn new(submission: Submission, policy: ScoringPolicy) -> Self {
        let text_responses = submission
            .dimensions
            .iter()
            .map(|r| TextResponseJson {
                dimension: r.dimension.clone(),
                text: r.display_text().to_string(),
            })
            .collect();

        Self {
            level_label: submission.level().to_string(),
            chart: SwimlaneChart::for_submission(&submission, policy),
            text_responses,
            submission,
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub respondent_id: RespondentId,
    /// False when no row matched; deleting an unknown id is not an error.
    pub deleted: bool,
}

// =============================================================================
// SUMMARY RESPONSE
// =============================================================================

/// Aggregate results across all respondents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub respondents: usize,
    pub mean_ai_iq: Option<f64>,
    pub mean_level: Option<MaturityLevel>,
    pub level_distribution: Vec<LevelCount>,
    /// Per-dimension means; absent without submissions.
    pub chart: Option<SwimlaneChart>,
}

impl SummaryResponse {
    #[must_use]
    pub fn new(summary: Summary, policy: ScoringPolicy) -> Self {
        Self {
            chart: summary.chart(policy),
            respondents: summary.respondents,
            mean_ai_iq: summary.mean_ai_iq,
            mean_level: summary.mean_level,
            level_distribution: summary.level_distribution,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Core error carried to an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AiIqError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AiIqError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AiIqError::NotFound(_) => StatusCode::NOT_FOUND,
            AiIqError::Configuration(_)
            | AiIqError::Storage(_)
            | AiIqError::SchemaMismatch(_)
            | AiIqError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AiIqError> for ApiError {
    fn from(err: AiIqError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
