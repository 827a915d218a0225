//! Integration tests for the AI-IQ HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use aiiq::api::{
    AppState, DeleteResponse, ErrorResponse, HealthResponse, SubmissionDetailResponse,
    SubmissionListResponse, SubmitResponse, SummaryResponse, SurveyResponse, create_router,
};
use aiiq_core::{
    Dimension, MaturityLevel, RespondentId, ScoringPolicy, Survey, SurveyModel,
};
use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;

const PASSWORD: &str = "test-results-password";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Two-dimension survey to keep request bodies short.
fn small_model() -> SurveyModel {
    SurveyModel::new(vec![
        Dimension::new("People", &["p1", "p2", "p3"], Some("Anything about people?")),
        Dimension::new("Data", &["d1", "d2", "d3"], None),
    ])
    .unwrap()
}

/// Create a test server with an in-memory session and the test password.
fn create_test_server() -> TestServer {
    create_server_with(Survey::new(small_model(), ScoringPolicy::Unweighted), Some(PASSWORD))
}

fn create_server_with(survey: Survey, password: Option<&str>) -> TestServer {
    let state = AppState::new(survey, password.map(str::to_string));
    TestServer::new(create_router(state)).unwrap()
}

fn bearer() -> HeaderValue {
    format!("Bearer {}", PASSWORD).parse::<HeaderValue>().unwrap()
}

fn identified_form(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "answers": {
            "People": ["Strongly Agree", "Agree", "Strongly Agree"],
            "Data": ["disagree", "strongly_disagree", "neutral"]
        },
        "texts": { "People": "We hired two ML engineers." }
    })
}

async fn submit(server: &TestServer, name: &str) -> SubmitResponse {
    let response = server.post("/survey/score").json(&identified_form(name)).await;
    response.assert_status_ok();
    response.json()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// SURVEY ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_survey_definition() {
    let server = create_test_server();

    let response = server.get("/survey").await;

    response.assert_status_ok();
    let survey: SurveyResponse = response.json();
    assert_eq!(survey.policy, ScoringPolicy::Unweighted);
    assert_eq!(survey.default_choice, "Neutral");
    assert_eq!(
        survey.scale,
        vec!["Strongly Agree", "Agree", "Neutral", "Disagree", "Strongly Disagree"]
    );
    assert_eq!(survey.dimensions.len(), 2);
    assert_eq!(survey.dimensions[0].text.as_deref(), Some("Anything about people?"));
}

// =============================================================================
// SCORE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_score_identified_is_saved() {
    let server = create_test_server();

    let result = submit(&server, "Ada").await;

    // People: (5 + 4 + 5) / 3 = 4.67, Data: (2 + 1 + 3) / 3 = 2.0
    assert_eq!(result.card.score_for("People"), Some(4.67));
    assert_eq!(result.card.score_for("Data"), Some(2.0));
    // (4.67 + 2.0) / 2 = 3.335, held as 3.33499.. in binary
    assert_eq!(result.card.ai_iq, 3.33);
    assert_eq!(result.card.level, MaturityLevel::Managing);
    assert_eq!(result.level_label, "Level 3: Managing");
    assert!(result.saved);
    assert_eq!(result.respondent_id, Some(RespondentId(1)));
    assert_eq!(result.chart.lanes[0].label, "People: 4.67");
}

#[tokio::test]
async fn test_score_anonymous_is_not_saved() {
    let server = create_test_server();
    let mut form = identified_form("Ada");
    form["email"] = json!("   ");

    let response = server.post("/survey/score").json(&form).await;

    response.assert_status_ok();
    let result: SubmitResponse = response.json();
    assert!(!result.saved);
    assert_eq!(result.respondent_id, None);

    let list = server
        .get("/submissions")
        .add_header(header::AUTHORIZATION, bearer())
        .await;
    let list: SubmissionListResponse = list.json();
    assert_eq!(list.count, 0);
}

#[tokio::test]
async fn test_score_weighted_policy() {
    let server = create_server_with(
        Survey::new(small_model(), ScoringPolicy::Weighted),
        Some(PASSWORD),
    );

    let result = submit(&server, "Ada").await;

    assert_eq!(result.card.score_for("People"), Some(5.0));
    assert_eq!(result.card.score_for("Data"), Some(0.0));
    assert_eq!(result.card.ai_iq, 2.5);
    assert_eq!(result.chart.x_range, (0.0, 5.0));
}

#[tokio::test]
async fn test_score_incomplete_form_rejected() {
    let server = create_test_server();
    let form = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "answers": { "People": ["Agree"] }
    });

    let response = server.post("/survey/score").json(&form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert!(error.error.starts_with("Invalid input"));
}

#[tokio::test]
async fn test_score_unknown_dimension_rejected() {
    let server = create_test_server();
    let mut form = identified_form("Ada");
    form["answers"]["Budget"] = json!(["Agree", "Agree", "Agree"]);

    let response = server.post("/survey/score").json(&form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_score_unknown_label_rejected() {
    let server = create_test_server();
    let mut form = identified_form("Ada");
    form["answers"]["People"] = json!(["Maybe", "Agree", "Agree"]);

    let response = server.post("/survey/score").json(&form).await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// RESULTS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_list_submissions() {
    let server = create_test_server();
    submit(&server, "Ada").await;
    submit(&server, "Alan").await;

    let response = server
        .get("/submissions")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    response.assert_status_ok();
    let list: SubmissionListResponse = response.json();
    assert_eq!(list.count, 2);
    assert_eq!(list.submissions[0].name, "Ada");
    assert_eq!(list.submissions[1].respondent_id, RespondentId(2));
    assert_eq!(list.submissions[1].level, MaturityLevel::Managing);
}

#[tokio::test]
async fn test_show_submission() {
    let server = create_test_server();
    submit(&server, "Ada").await;

    let response = server
        .get("/submissions/1")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    response.assert_status_ok();
    let detail: SubmissionDetailResponse = response.json();
    assert_eq!(detail.submission.email, "ada@example.com");
    assert_eq!(detail.chart.lanes.len(), 2);
    assert_eq!(detail.text_responses[0].text, "We hired two ML engineers.");
    assert_eq!(detail.text_responses[1].text, "(No additional comments)");
}

#[tokio::test]
async fn test_show_unknown_submission_is_404() {
    let server = create_test_server();

    let response = server
        .get("/submissions/42")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_submission() {
    let server = create_test_server();
    submit(&server, "Ada").await;
    submit(&server, "Alan").await;

    let response = server
        .delete("/submissions/1")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    response.assert_status_ok();
    let deleted: DeleteResponse = response.json();
    assert!(deleted.deleted);

    let again = server
        .delete("/submissions/1")
        .add_header(header::AUTHORIZATION, bearer())
        .await;
    again.assert_status_ok();
    let again: DeleteResponse = again.json();
    assert!(!again.deleted);

    let list: SubmissionListResponse = server
        .get("/submissions")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .json();
    assert_eq!(list.count, 1);
    assert_eq!(list.submissions[0].name, "Alan");
}

#[tokio::test]
async fn test_summary_empty() {
    let server = create_test_server();

    let response = server
        .get("/summary")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    response.assert_status_ok();
    let summary: SummaryResponse = response.json();
    assert_eq!(summary.respondents, 0);
    assert_eq!(summary.mean_ai_iq, None);
    assert!(summary.chart.is_none());
    assert_eq!(summary.level_distribution.len(), 5);
}

#[tokio::test]
async fn test_summary_after_submissions() {
    let server = create_test_server();
    submit(&server, "Ada").await;
    submit(&server, "Alan").await;

    let summary: SummaryResponse = server
        .get("/summary")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .json();

    assert_eq!(summary.respondents, 2);
    assert_eq!(summary.mean_ai_iq, Some(3.33));
    assert_eq!(summary.mean_level, Some(MaturityLevel::Managing));
    let managing = &summary.level_distribution[2];
    assert_eq!(managing.level, MaturityLevel::Managing);
    assert_eq!(managing.count, 2);
    assert_eq!(summary.chart.unwrap().lanes[0].score, 4.67);
}

// =============================================================================
// CSV-BACKED SERVER TESTS
// =============================================================================

#[tokio::test]
async fn test_submissions_persist_to_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("survey_responses.csv");
    let server = create_server_with(
        Survey::with_csv(small_model(), ScoringPolicy::Unweighted, &path),
        Some(PASSWORD),
    );

    submit(&server, "Ada").await;

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("RespondentID,name,email,timestamp,AI_IQ,People_score,Data_score,People_text_response,Data_text_response")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,Ada,ada@example.com,"));
    assert!(row.ends_with(",3.33,4.67,2.0,We hired two ML engineers.,"));
}

// =============================================================================
// PASSWORD GATE TESTS
// =============================================================================

#[tokio::test]
async fn test_gate_accepts_raw_password() {
    let server = create_test_server();

    let response = server
        .get("/submissions")
        .add_header(
            header::AUTHORIZATION,
            PASSWORD.parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_gate_rejects_wrong_password() {
    let server = create_test_server();

    let response = server
        .get("/summary")
        .add_header(
            header::AUTHORIZATION,
            "Bearer wrong-password".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(
        response.status_code().as_u16(),
        401,
        "Wrong password should return 401 Unauthorized"
    );
}

#[tokio::test]
async fn test_gate_rejects_missing_header() {
    let server = create_test_server();

    for path in ["/submissions", "/submissions/1", "/summary"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code().as_u16(), 401, "{} must be gated", path);
    }

    let response = server.delete("/submissions/1").await;
    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_gate_locked_without_configured_password() {
    let server = create_server_with(Survey::new(small_model(), ScoringPolicy::Unweighted), None);

    let response = server
        .get("/submissions")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_gate_bearer_prefix_only_rejected() {
    let server = create_test_server();

    let response = server
        .get("/submissions")
        .add_header(
            header::AUTHORIZATION,
            "Bearer ".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_public_routes_need_no_password() {
    let server = create_server_with(Survey::new(small_model(), ScoringPolicy::Unweighted), None);

    server.get("/health").await.assert_status_ok();
    server.get("/survey").await.assert_status_ok();
    server
        .post("/survey/score")
        .json(&identified_form("Ada"))
        .await
        .assert_status_ok();
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let server = create_test_server();

    let response = server.get("/unknown").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_test_server();

    // /health is GET only
    let response = server.post("/health").await;
    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = create_test_server();

    let response = server
        .post("/survey/score")
        .text("not valid json")
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}
