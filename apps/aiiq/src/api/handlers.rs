//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Reads take the session's read lock. Submissions and deletions take the
//! write lock for the whole read-modify-write cycle so identifier
//! assignment cannot interleave.

use super::{
    AppState,
    types::{
        ApiError, DeleteResponse, HealthResponse, SubmissionDetailResponse,
        SubmissionListResponse, SubmitRequest, SubmitResponse, SummaryResponse, SurveyResponse,
    },
};
use aiiq_core::RespondentId;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// SURVEY HANDLERS
// =============================================================================

/// The survey form definition.
pub async fn survey_handler(State(state): State<AppState>) -> impl IntoResponse {
    let survey = state.survey.read().await;
    Json(SurveyResponse::from_survey(&survey))
}

/// Score a completed form; store it when name and email are given.
pub async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let respondent = request.respondent();
    let sheet = request.sheet();

    let mut survey = state.survey.write().await;
    let outcome = survey.submit(&respondent, &sheet)?;

    match &outcome.saved {
        Some(saved) => tracing::info!(
            respondent_id = %saved.respondent_id,
            ai_iq = saved.ai_iq,
            "Submission stored"
        ),
        None => tracing::debug!(ai_iq = outcome.card.ai_iq, "Anonymous submission scored"),
    }

    Ok(Json(SubmitResponse::from(outcome)))
}

// =============================================================================
// RESULTS HANDLERS (password gated)
// =============================================================================

/// List all stored submissions.
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<SubmissionListResponse>, ApiError> {
    let survey = state.survey.read().await;
    let submissions = survey.submissions()?;
    Ok(Json(SubmissionListResponse::from_submissions(&submissions)))
}

/// One respondent's scores, chart and text answers.
pub async fn show_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SubmissionDetailResponse>, ApiError> {
    let survey = state.survey.read().await;
    let submission = survey.submission(RespondentId(id))?;
    Ok(Json(SubmissionDetailResponse::new(
        submission,
        survey.policy(),
    )))
}

/// Delete one submission.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let respondent_id = RespondentId(id);
    let mut survey = state.survey.write().await;
    let deleted = survey.delete(respondent_id)?;

    if deleted {
        tracing::info!(respondent_id = %respondent_id, "Submission deleted");
    }

    Ok(Json(DeleteResponse {
        respondent_id,
        deleted,
    }))
}

/// Aggregate results.
pub async fn summary_handler(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let survey = state.survey.read().await;
    let summary = survey.summary()?;
    Ok(Json(SummaryResponse::new(summary, survey.policy())))
}
