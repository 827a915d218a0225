//! # Survey Session
//!
//! Binds a [`SurveyModel`], a [`ScoringPolicy`] and a storage backend into
//! the operations a front end calls: score, submit, list, show, delete and
//! summarize.
//!
//! ## Storage Backends
//!
//! - `InMemory`: volatile, nothing survives the process
//! - `Csv`: whole-file CSV store on disk
//!
//! A session performs no locking. The HTTP layer wraps it in a lock so that
//! identifier assignment and the final write of one submission cannot
//! interleave with another.

use crate::aggregate::Summary;
use crate::model::SurveyModel;
use crate::response::{Respondent, ResponseSheet};
use crate::scoring::{ScoreCard, ScoringPolicy, score_sheet};
use crate::storage::{CsvStore, MemoryStore, SubmissionStore};
use crate::submission::{NewSubmission, Submission, now_timestamp};
use crate::{AiIqError, RespondentId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Survey session.
#[derive(Debug)]
pub enum StorageBackend {
    /// Volatile rows (previews, tests).
    InMemory(MemoryStore),
    /// CSV file on disk.
    Csv(CsvStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl SubmissionStore for StorageBackend {
    fn load(&self) -> Result<Vec<Submission>, AiIqError> {
        match self {
            StorageBackend::InMemory(store) => store.load(),
            StorageBackend::Csv(store) => store.load(),
        }
    }

    fn append(&mut self, draft: NewSubmission) -> Result<Submission, AiIqError> {
        match self {
            StorageBackend::InMemory(store) => store.append(draft),
            StorageBackend::Csv(store) => store.append(draft),
        }
    }

    fn delete(&mut self, id: RespondentId) -> Result<bool, AiIqError> {
        match self {
            StorageBackend::InMemory(store) => store.delete(id),
            StorageBackend::Csv(store) => store.delete(id),
        }
    }
}

// =============================================================================
// SUBMIT OUTCOME
// =============================================================================

/// Result of a submission: the scores, and the stored row if one was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub card: ScoreCard,
    /// `None` for anonymous respondents; their results are shown, not stored.
    pub saved: Option<Submission>,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }
}

// =============================================================================
// SURVEY
// =============================================================================

/// A survey session: model + scoring policy + store.
#[derive(Debug)]
pub struct Survey {
    model: SurveyModel,
    policy: ScoringPolicy,
    backend: StorageBackend,
}

impl Survey {
    /// Session with an in-memory store.
    #[must_use]
    pub fn new(model: SurveyModel, policy: ScoringPolicy) -> Self {
        Self::with_backend(model, policy, StorageBackend::default())
    }

    /// Session backed by a CSV file at `path`.
    #[must_use]
    pub fn with_csv(model: SurveyModel, policy: ScoringPolicy, path: impl AsRef<Path>) -> Self {
        let store = CsvStore::open(path.as_ref(), &model);
        Self::with_backend(model, policy, StorageBackend::Csv(store))
    }

    #[must_use]
    pub fn with_backend(model: SurveyModel, policy: ScoringPolicy, backend: StorageBackend) -> Self {
        Self {
            model,
            policy,
            backend,
        }
    }

    #[must_use]
    pub fn model(&self) -> &SurveyModel {
        &self.model
    }

    #[must_use]
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Csv(_))
    }

    /// Score a sheet without storing anything.
    pub fn score(&self, sheet: &ResponseSheet) -> Result<ScoreCard, AiIqError> {
        score_sheet(&self.model, self.policy, sheet)
    }

    /// Score a sheet and store it when the respondent is identified.
    pub fn submit(
        &mut self,
        respondent: &Respondent,
        sheet: &ResponseSheet,
    ) -> Result<SubmitOutcome, AiIqError> {
        self.submit_at(respondent, sheet, now_timestamp())
    }

    /// [`Survey::submit`] with an explicit timestamp.
    pub fn submit_at(
        &mut self,
        respondent: &Respondent,
        sheet: &ResponseSheet,
        timestamp: NaiveDateTime,
    ) -> Result<SubmitOutcome, AiIqError> {
        respondent.validate()?;
        let card = self.score(sheet)?;

        if !respondent.is_identified() {
            return Ok(SubmitOutcome { card, saved: None });
        }

        let draft = NewSubmission::from_card(respondent, &card, sheet, timestamp);
        let saved = self.backend.append(draft)?;
        Ok(SubmitOutcome {
            card,
            saved: Some(saved),
        })
    }

    /// All stored submissions in insertion order.
    pub fn submissions(&self) -> Result<Vec<Submission>, AiIqError> {
        self.backend.load()
    }

    pub fn submission(&self, id: RespondentId) -> Result<Submission, AiIqError> {
        self.backend.get(id)
    }

    /// Remove a submission. Unknown identifiers are a no-op (`Ok(false)`).
    pub fn delete(&mut self, id: RespondentId) -> Result<bool, AiIqError> {
        self.backend.delete(id)
    }

    pub fn summary(&self) -> Result<Summary, AiIqError> {
        let submissions = self.submissions()?;
        Ok(Summary::from_submissions(&self.model, &submissions))
    }
}

impl Default for Survey {
    fn default() -> Self {
        Self::new(SurveyModel::builtin(), ScoringPolicy::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================
