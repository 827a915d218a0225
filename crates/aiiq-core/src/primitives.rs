//! # Survey Primitives
//!
//! Hardcoded constants shared by the scoring engine and the CSV store.
//!
//! These values are part of the compatibility surface with previously
//! stored submissions and are immutable at runtime.

/// Lowest numeric value of the Likert scale ("Strongly Disagree").
pub const SCALE_MIN: u8 = 1;

/// Highest numeric value of the Likert scale ("Strongly Agree").
pub const SCALE_MAX: u8 = 5;

/// Upper bound of every dimension score and of the composite AI IQ.
pub const SCORE_CEILING: f64 = 5.0;

/// Score assigned by the signed-weight policy when no answer carries weight.
///
/// Applies to all-Neutral dimensions and to exact cancellation.
pub const NEUTRAL_MIDPOINT: f64 = 2.5;

/// Number of decimal places every stored score is rounded to.
pub const SCORE_DECIMALS: usize = 2;

/// Stored timestamp format: local time, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// CSV COLUMN NAMES
// =============================================================================

/// Respondent identifier column. Older stores lack it.
pub const COLUMN_RESPONDENT_ID: &str = "RespondentID";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_EMAIL: &str = "email";
pub const COLUMN_TIMESTAMP: &str = "timestamp";
pub const COLUMN_AI_IQ: &str = "AI_IQ";

/// Suffix appended to a dimension name for its score column.
pub const SCORE_COLUMN_SUFFIX: &str = "_score";

/// Suffix appended to a dimension name for its free-text column.
pub const TEXT_COLUMN_SUFFIX: &str = "_text_response";

/// Placeholder shown for a blank free-text response.
pub const NO_COMMENT_PLACEHOLDER: &str = "(No additional comments)";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a single free-text response.
///
/// Longer responses are rejected before scoring.
pub const MAX_TEXT_RESPONSE_LENGTH: usize = 8192;

/// Maximum length for respondent name and email.
pub const MAX_IDENTITY_LENGTH: usize = 256;
