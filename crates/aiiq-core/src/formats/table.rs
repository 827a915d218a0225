//! # Tabular Submission Format
//!
//! CSV encoding of stored submissions. Pure transformations only; file I/O
//! lives in `storage`.
//!
//! ## Layout
//!
//! ```text
//! RespondentID,name,email,timestamp,AI_IQ,<D1>_score,..,<Dn>_score,<D1>_text_response,..,<Dn>_text_response
//! ```
//!
//! - Dimension columns follow model order.
//! - Whole scores keep one decimal (`5.0`); others use the shortest form
//!   (`4.67`).
//! - Stores written before `RespondentID` existed, and rows whose
//!   `RespondentID` cell is blank, are read with identifiers backfilled from
//!   1-based row position.
//! - Columns are looked up by name on read; any missing or unexpected
//!   column is a `SchemaMismatch`.

use crate::model::SurveyModel;
use crate::primitives::{
    COLUMN_AI_IQ, COLUMN_EMAIL, COLUMN_NAME, COLUMN_RESPONDENT_ID, COLUMN_TIMESTAMP,
    SCORE_COLUMN_SUFFIX, TEXT_COLUMN_SUFFIX,
};
use crate::submission::{DimensionRecord, Submission, format_timestamp, parse_timestamp};
use crate::{AiIqError, RespondentId};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum accepted store size.
///
/// Checked before parsing so a corrupted or hostile file cannot exhaust
/// memory.
pub const MAX_TABLE_SIZE: usize = 64 * 1024 * 1024; // 64 MB

// =============================================================================
// COLUMN LAYOUT
// =============================================================================

/// Column layout derived from the configured dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    dimensions: Vec<String>,
}

impl ColumnLayout {
    #[must_use]
    pub fn for_model(model: &SurveyModel) -> Self {
        Self {
            dimensions: model.dimension_names().map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn score_column(dimension: &str) -> String {
        format!("{}{}", dimension, SCORE_COLUMN_SUFFIX)
    }

    #[must_use]
    pub fn text_column(dimension: &str) -> String {
        format!("{}{}", dimension, TEXT_COLUMN_SUFFIX)
    }

    /// Header in canonical write order.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        let fixed = [
            COLUMN_RESPONDENT_ID,
            COLUMN_NAME,
            COLUMN_EMAIL,
            COLUMN_TIMESTAMP,
            COLUMN_AI_IQ,
        ]
        .into_iter()
        .map(str::to_string);
        let scores = self.dimensions.iter().map(|d| Self::score_column(d));
        let texts = self.dimensions.iter().map(|d| Self::text_column(d));
        fixed.chain(scores).chain(texts).collect()
    }

    /// Map each header name to its position, checking it against the layout.
    ///
    /// `RespondentID` may be absent; every other expected column must exist
    /// and no other column may appear.
    fn index(&self, header: &csv::StringRecord) -> Result<BTreeMap<String, usize>, AiIqError> {
        let mut positions = BTreeMap::new();
        for (position, name) in header.iter().enumerate() {
            if positions.insert(name.to_string(), position).is_some() {
                return Err(AiIqError::SchemaMismatch(format!(
                    "Duplicate column '{}'",
                    name
                )));
            }
        }

        let expected: BTreeSet<String> = self.header().into_iter().collect();
        let missing: Vec<&str> = expected
            .iter()
            .filter(|c| c.as_str() != COLUMN_RESPONDENT_ID && !positions.contains_key(*c))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AiIqError::SchemaMismatch(format!(
                "Missing columns: {}",
                missing.join(", ")
            )));
        }

        let unexpected: Vec<&str> = positions
            .keys()
            .filter(|c| !expected.contains(*c))
            .map(String::as_str)
            .collect();
        if !unexpected.is_empty() {
            return Err(AiIqError::SchemaMismatch(format!(
                "Columns not in the configured survey: {}",
                unexpected.join(", ")
            )));
        }

        Ok(positions)
    }
}

// =============================================================================
// VALUE FORMATTING
// =============================================================================

/// Format a score for the store: `5.0`, `4.67`, `2.5`.
#[must_use]
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}

fn parse_score(raw: &str, column: &str, row: usize) -> Result<f64, AiIqError> {
    raw.trim().parse::<f64>().map_err(|_| {
        AiIqError::SchemaMismatch(format!(
            "Row {}: column '{}' is not a number: '{}'",
            row, column, raw
        ))
    })
}

/// Parse a stored identifier. Accepts `7` and the float form `7.0`.
fn parse_respondent_id(raw: &str, row: usize) -> Result<RespondentId, AiIqError> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<u64>() {
        return Ok(RespondentId(id));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value >= 1.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            Ok(RespondentId(value as u64))
        }
        _ => Err(AiIqError::SchemaMismatch(format!(
            "Row {}: invalid {} '{}'",
            row, COLUMN_RESPONDENT_ID, raw
        ))),
    }
}

/// Value of a named column in a row.
///
/// The header was validated against the layout, so only the optional
/// RespondentID column can be missing.
fn field<'r>(
    record: &'r csv::StringRecord,
    positions: &BTreeMap<String, usize>,
    column: &str,
) -> &'r str {
    positions
        .get(column)
        .and_then(|&p| record.get(p))
        .unwrap_or("")
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode submissions as CSV bytes (header + one row per submission).
pub fn submissions_to_csv(
    layout: &ColumnLayout,
    submissions: &[Submission],
) -> Result<Vec<u8>, AiIqError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(layout.header())
        .map_err(|e| AiIqError::Storage(format!("Write header: {}", e)))?;

    for submission in submissions {
        if submission.dimensions.len() != layout.dimensions.len() {
            return Err(AiIqError::SchemaMismatch(format!(
                "Submission {} has {} dimension records, layout expects {}",
                submission.respondent_id,
                submission.dimensions.len(),
                layout.dimensions.len()
            )));
        }

        let mut row = vec![
            submission.respondent_id.to_string(),
            submission.name.clone(),
            submission.email.clone(),
            format_timestamp(&submission.timestamp),
            format_score(submission.ai_iq),
        ];

        let records = layout
            .dimensions
            .iter()
            .map(|d| {
                submission.record(d).ok_or_else(|| {
                    AiIqError::SchemaMismatch(format!(
                        "Submission {} has no record for dimension '{}'",
                        submission.respondent_id, d
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        row.extend(records.iter().map(|r| format_score(r.score)));
        row.extend(records.iter().map(|r| r.text_response.clone()));

        writer
            .write_record(&row)
            .map_err(|e| AiIqError::Storage(format!("Write row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AiIqError::Storage(format!("Flush table: {}", e)))
}

/// Decode CSV bytes into submissions, validating the header against the layout.
///
/// Empty input decodes to an empty sequence.
pub fn submissions_from_csv(
    layout: &ColumnLayout,
    bytes: &[u8],
) -> Result<Vec<Submission>, AiIqError> {
    if bytes.len() > MAX_TABLE_SIZE {
        return Err(AiIqError::Storage(format!(
            "Store size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_TABLE_SIZE
        )));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let header = reader
        .headers()
        .map_err(|e| AiIqError::SchemaMismatch(format!("Unreadable header: {}", e)))?
        .clone();
    let positions = layout.index(&header)?;

    let mut submissions = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record =
            result.map_err(|e| AiIqError::SchemaMismatch(format!("Row {}: {}", row, e)))?;

        let raw_id = field(&record, &positions, COLUMN_RESPONDENT_ID);
        let respondent_id = if raw_id.trim().is_empty() {
            RespondentId(row as u64)
        } else {
            parse_respondent_id(raw_id, row)?
        };

        let dimensions = layout
            .dimensions
            .iter()
            .map(|d| {
                let score_column = ColumnLayout::score_column(d);
                let text_column = ColumnLayout::text_column(d);
                let raw_score = field(&record, &positions, &score_column);
                Ok(DimensionRecord {
                    dimension: d.clone(),
                    score: parse_score(raw_score, &score_column, row)?,
                    text_response: field(&record, &positions, &text_column).to_string(),
                })
            })
            .collect::<Result<Vec<_>, AiIqError>>()?;

        submissions.push(Submission {
            respondent_id,
            name: field(&record, &positions, COLUMN_NAME).to_string(),
            email: field(&record, &positions, COLUMN_EMAIL).to_string(),
            timestamp: parse_timestamp(field(&record, &positions, COLUMN_TIMESTAMP))?,
            ai_iq: parse_score(
                field(&record, &positions, COLUMN_AI_IQ),
                COLUMN_AI_IQ,
                row,
            )?,
            dimensions,
        });
    }

    Ok(submissions)
}

// =============================================================================
// TESTS
// =============================================================================
