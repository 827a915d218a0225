//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{
    self, SubmissionDetailResponse, SubmissionListResponse, SubmitRequest, SubmitResponse,
    SummaryResponse, SurveyResponse,
};
use crate::config::AppConfig;
use aiiq_core::{
    AiIqError, RespondentId, ScaleChoice, SubmitOutcome, SwimlaneChart, format_score,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum answers file size (1 MB).
const MAX_ANSWERS_FILE_SIZE: u64 = 1024 * 1024;

/// Width of one chart lane in characters.
const CHART_WIDTH: usize = 31;

// =============================================================================
// HELPERS
// =============================================================================

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Canonicalize an input path and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AiIqError> {
    let canonical = path.canonicalize().map_err(|e| {
        AiIqError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AiIqError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AiIqError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AiIqError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(AiIqError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read and parse an answers file.
pub fn read_answers_file(file: &Path) -> Result<SubmitRequest, AiIqError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_ANSWERS_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| AiIqError::Io(format!("Read {}: {}", file.display(), e)))?;

    serde_json::from_slice(&contents)
        .map_err(|e| AiIqError::InvalidInput(format!("Invalid answers file: {}", e)))
}

/// Check the results password for gated commands.
pub fn require_password(config: &AppConfig, provided: Option<&str>) -> Result<(), AiIqError> {
    let Some(expected) = config.password.as_deref() else {
        return Err(AiIqError::Configuration(
            "No results password configured. Set [general] password or AIIQ_PASSWORD.".to_string(),
        ));
    };

    let Some(provided) = provided else {
        return Err(AiIqError::InvalidInput(
            "This command requires --password".to_string(),
        ));
    };

    if api::password_matches(provided, expected) {
        Ok(())
    } else {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_password",
            "Authentication failed: invalid password"
        );
        Err(AiIqError::InvalidInput("Incorrect password".to_string()))
    }
}

/// Render a swimlane chart as text, one lane per line.
#[must_use]
pub fn render_chart(chart: &SwimlaneChart) -> String {
    let label_width = chart
        .lanes
        .iter()
        .map(|l| l.dimension.chars().count())
        .max()
        .unwrap_or(0);
    let (low, high) = chart.x_range;

    let mut out = format!("{}\n", chart.title);
    for lane in &chart.lanes {
        let position = chart.relative_position(lane.score) * (CHART_WIDTH - 1) as f64;
        let marker = position.round() as usize;
        let track: String = (0..CHART_WIDTH)
            .map(|i| if i == marker { '●' } else { '─' })
            .collect();
        out.push_str(&format!(
            "  {:<width$}  {}  {}\n",
            lane.dimension,
            track,
            format_score(lane.score),
            width = label_width
        ));
    }
    out.push_str(&format!(
        "  {:<width$}  {:<span$}{}\n",
        "",
        low,
        high,
        width = label_width,
        span = CHART_WIDTH - 1
    ));
    out
}

// =============================================================================
// QUESTIONS COMMAND
// =============================================================================

/// Show the survey questions.
pub fn cmd_questions(config: &AppConfig, json_mode: bool) -> Result<(), AiIqError> {
    if json_mode {
        print_json(&SurveyResponse::from_survey(&config.survey()));
        return Ok(());
    }

    let scale: Vec<&str> = ScaleChoice::ALL.iter().map(ScaleChoice::label).collect();

    println!("AI IQ Survey");
    println!("============");
    println!("Answer each statement with: {}", scale.join(" / "));
    println!("Default answer: {}", ScaleChoice::DEFAULT);

    for (index, dimension) in config.model.dimensions().iter().enumerate() {
        println!();
        println!("{}. {}", index + 1, dimension.name);
        for (q, question) in dimension.questions.iter().enumerate() {
            println!("   Q{}: {}", q + 1, question);
        }
        if let Some(text) = &dimension.text {
            println!("   ({})", text);
        }
    }

    Ok(())
}

// =============================================================================
// TEMPLATE COMMAND
// =============================================================================

/// Print a blank answers file.
pub fn cmd_template(config: &AppConfig) -> Result<(), AiIqError> {
    print_json(&SubmitRequest::template(&config.model));
    Ok(())
}

// =============================================================================
// SCORE COMMAND
// =============================================================================

/// Score an answers file and store it when the respondent is identified.
pub fn cmd_score(
    config: &AppConfig,
    json_mode: bool,
    file: &Path,
    name: Option<String>,
    email: Option<String>,
    dry_run: bool,
) -> Result<(), AiIqError> {
    tracing::debug!("Scoring answers from {}", file.display());

    let mut request = read_answers_file(file)?;
    if name.is_some() {
        request.name = name;
    }
    if email.is_some() {
        request.email = email;
    }

    let respondent = request.respondent();
    let sheet = request.sheet();
    let mut survey = config.survey();

    let outcome = if dry_run {
        respondent.validate()?;
        SubmitOutcome {
            card: survey.score(&sheet)?,
            saved: None,
        }
    } else {
        survey.submit(&respondent, &sheet)?
    };
    let response = SubmitResponse::from(outcome);

    if json_mode {
        print_json(&response);
        return Ok(());
    }

    println!("AI IQ Results");
    println!("=============");
    println!("Policy: {}", response.card.policy);
    println!("AI IQ:  {}", format_score(response.card.ai_iq));
    println!("Level:  {}", response.level_label);
    if let Some(gap) = response.card.level.gap_to_next(response.card.ai_iq) {
        if let Some(next) = response.card.level.next() {
            println!("        {} to {}", format_score(gap), next);
        }
    }
    println!();
    print!("{}", render_chart(&response.chart));
    println!();

    match response.respondent_id {
        Some(id) => println!("Saved as respondent {} in {}", id, config.store_path.display()),
        None if dry_run => println!("Dry run: nothing stored"),
        None => println!("Not stored: name and email are required to save a submission"),
    }

    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List stored submissions.
pub fn cmd_list(
    config: &AppConfig,
    json_mode: bool,
    password: Option<&str>,
) -> Result<(), AiIqError> {
    require_password(config, password)?;
    let submissions = config.survey().submissions()?;
    let response = SubmissionListResponse::from_submissions(&submissions);

    if json_mode {
        print_json(&response);
        return Ok(());
    }

    println!("Submissions: {}", response.count);
    if response.submissions.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{:>4}  {:<24}  {:<28}  {:<19}  {:>5}  Level",
        "ID", "Name", "Email", "Timestamp", "AI IQ"
    );
    for row in &response.submissions {
        println!(
            "{:>4}  {:<24}  {:<28}  {:<19}  {:>5}  {}",
            row.respondent_id,
            row.name,
            row.email,
            row.timestamp,
            format_score(row.ai_iq),
            row.level
        );
    }

    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one submission.
pub fn cmd_show(
    config: &AppConfig,
    json_mode: bool,
    id: u64,
    password: Option<&str>,
) -> Result<(), AiIqError> {
    require_password(config, password)?;
    let survey = config.survey();
    let submission = survey.submission(RespondentId(id))?;
    let response = SubmissionDetailResponse::new(submission, survey.policy());

    if json_mode {
        print_json(&response);
        return Ok(());
    }

    let submission = &response.submission;
    println!("Respondent {}", submission.respondent_id);
    println!("==============");
    println!("Name:      {}", submission.name);
    println!("Email:     {}", submission.email);
    println!(
        "Submitted: {}",
        aiiq_core::submission::format_timestamp(&submission.timestamp)
    );
    println!("AI IQ:     {}", format_score(submission.ai_iq));
    println!("Level:     {}", response.level_label);
    println!();
    print!("{}", render_chart(&response.chart));
    println!();
    println!("Text Responses");
    for text in &response.text_responses {
        println!("  {}: {}", text.dimension, text.text);
    }

    Ok(())
}

// =============================================================================
// DELETE COMMAND
// =============================================================================

/// Delete one submission.
pub fn cmd_delete(
    config: &AppConfig,
    json_mode: bool,
    id: u64,
    password: Option<&str>,
) -> Result<(), AiIqError> {
    require_password(config, password)?;
    let respondent_id = RespondentId(id);
    let deleted = config.survey().delete(respondent_id)?;

    if json_mode {
        print_json(&api::DeleteResponse {
            respondent_id,
            deleted,
        });
        return Ok(());
    }

    if deleted {
        tracing::info!(respondent_id = %respondent_id, "Submission deleted");
        println!("Deleted respondent {}", respondent_id);
    } else {
        println!("No respondent {}; nothing deleted", respondent_id);
    }

    Ok(())
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

/// Aggregate results.
pub fn cmd_summary(
    config: &AppConfig,
    json_mode: bool,
    password: Option<&str>,
) -> Result<(), AiIqError> {
    require_password(config, password)?;
    let survey = config.survey();
    let response = SummaryResponse::new(survey.summary()?, survey.policy());

    if json_mode {
        print_json(&response);
        return Ok(());
    }

    println!("AI IQ Summary");
    println!("=============");
    println!("Respondents: {}", response.respondents);

    let (Some(mean), Some(level)) = (response.mean_ai_iq, response.mean_level) else {
        println!("No submissions yet.");
        return Ok(());
    };

    println!("Mean AI IQ:  {} ({})", format_score(mean), level);
    println!();
    println!("Maturity Distribution");
    for entry in &response.level_distribution {
        println!(
            "  {:<22} {:>4}  {}",
            entry.label,
            entry.count,
            "█".repeat(entry.count)
        );
    }

    if let Some(chart) = &response.chart {
        println!();
        print!("{}", render_chart(chart));
    }

    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the resolved configuration. The password itself is never printed.
pub fn cmd_config(config: &AppConfig, json_mode: bool) -> Result<(), AiIqError> {
    let source = config
        .source
        .as_ref()
        .map(|p| p.display().to_string());

    if json_mode {
        let output = serde_json::json!({
            "source": source,
            "store": config.store_path.to_string_lossy(),
            "policy": config.policy,
            "dimensions": config.model.len(),
            "questions": config.model.question_count(),
            "password_configured": config.has_password(),
        });
        print_json(&output);
        return Ok(());
    }

    println!("AI IQ Configuration");
    println!("===================");
    println!(
        "Config file: {}",
        source.as_deref().unwrap_or("(none, built-in defaults)")
    );
    println!("Store:       {}", config.store_path.display());
    println!("Policy:      {}", config.policy);
    println!(
        "Survey:      {} dimensions, {} questions",
        config.model.len(),
        config.model.question_count()
    );
    println!(
        "Password:    {}",
        if config.has_password() {
            "configured"
        } else {
            "not set (results are locked)"
        }
    );

    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &AppConfig, host: &str, port: u16) -> Result<(), AiIqError> {
    println!("AI IQ Survey Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:   {}", host);
    println!("  Port:   {}", port);
    println!("  Store:  {}", config.store_path.display());
    println!("  Policy: {}", config.policy);
    println!();
    println!("Endpoints:");
    println!("  GET    /health            - Health check");
    println!("  GET    /survey            - Survey definition");
    println!("  POST   /survey/score      - Score (and store) a form");
    println!("  GET    /submissions       - List submissions (password)");
    println!("  GET    /submissions/{{id}}  - Show a submission (password)");
    println!("  DELETE /submissions/{{id}}  - Delete a submission (password)");
    println!("  GET    /summary           - Aggregate results (password)");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, config.survey(), config.password.clone()).await
}

// =============================================================================
// TESTS
// =============================================================================
