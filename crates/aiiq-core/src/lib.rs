//! # aiiq-core
//!
//! The deterministic scoring engine for the AI IQ maturity survey.
//!
//! This crate holds everything that does not need a terminal or a socket:
//! - the survey model (dimensions and their questions)
//! - response validation and the two scoring policies
//! - maturity classification of the composite score
//! - the tabular submission store and its CSV codec
//! - aggregation into chart and summary data
//!
//! ## Constraints
//!
//! - Same answers, same scores: no randomness, no clock reads in scoring
//! - NO async, NO network dependencies
//! - Rendering lives in the front ends; this crate only produces data

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod formats;
pub mod maturity;
pub mod model;
pub mod primitives;
pub mod response;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod submission;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AiIqError, DimensionScore, RespondentId, ScaleChoice};

// =============================================================================
// RE-EXPORTS: Survey Engine
// =============================================================================

pub use aggregate::{Lane, LevelCount, Summary, SwimlaneChart};
pub use model::{Dimension, SurveyDefinition, SurveyModel};
pub use response::{Respondent, ResponseSheet};
pub use scoring::{
    ScoreCard, ScoringPolicy, composite_score, round_score, score_sheet, unweighted_score,
    weighted_score,
};
pub use session::{StorageBackend, SubmitOutcome, Survey};
pub use storage::{CsvStore, MemoryStore, SubmissionStore};
pub use submission::{DimensionRecord, NewSubmission, Submission};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{ColumnLayout, format_score, submissions_from_csv, submissions_to_csv};

// =============================================================================
// RE-EXPORTS: Maturity (from maturity module)
// =============================================================================

pub use maturity::{
    EMERGING_THRESHOLD, INNOVATING_THRESHOLD, MANAGING_THRESHOLD, MaturityLevel,
    OPTIMIZING_THRESHOLD,
};
