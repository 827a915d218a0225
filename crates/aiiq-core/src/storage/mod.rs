//! # Storage Module
//!
//! The persistence contract for submissions and its two backends:
//! - `MemoryStore`: volatile, used for previews and tests
//! - `CsvStore`: whole-file CSV read/replace on disk
//!
//! Every operation is a complete read-modify-write cycle. Callers that
//! share a store across threads must serialize access themselves.

mod csv_file;

pub use csv_file::CsvStore;

use crate::submission::{NewSubmission, Submission, next_respondent_id};
use crate::{AiIqError, RespondentId};

// =============================================================================
// STORE CONTRACT
// =============================================================================

/// Append-only submission store with whole-row deletion.
pub trait SubmissionStore {
    /// All stored submissions in insertion order.
    ///
    /// A store that does not exist yet is empty, not an error.
    fn load(&self) -> Result<Vec<Submission>, AiIqError>;

    /// Persist a new submission under `1 + max(existing ids)` (1 when empty).
    fn append(&mut self, draft: NewSubmission) -> Result<Submission, AiIqError>;

    /// Remove the submission with `id`.
    ///
    /// Returns `false`, without touching the store, when no row matches.
    fn delete(&mut self, id: RespondentId) -> Result<bool, AiIqError>;

    /// Look up one submission.
    fn get(&self, id: RespondentId) -> Result<Submission, AiIqError> {
        self.load()?
            .into_iter()
            .find(|s| s.respondent_id == id)
            .ok_or(AiIqError::NotFound(id))
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Volatile store. Never touches disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    submissions: Vec<Submission>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows (e.g. a snapshot loaded elsewhere).
    #[must_use]
    pub fn with_submissions(submissions: Vec<Submission>) -> Self {
        Self { submissions }
    }
}

impl SubmissionStore for MemoryStore {
    fn load(&self) -> Result<Vec<Submission>, AiIqError> {
        Ok(self.submissions.clone())
    }

    fn append(&mut self, draft: NewSubmission) -> Result<Submission, AiIqError> {
        let stored = draft.with_id(next_respondent_id(&self.submissions));
        self.submissions.push(stored.clone());
        Ok(stored)
    }

    fn delete(&mut self, id: RespondentId) -> Result<bool, AiIqError> {
        let before = self.submissions.len();
        self.submissions.retain(|s| s.respondent_id != id);
        Ok(self.submissions.len() != before)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::parse_timestamp;

    fn draft(name: &str) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            timestamp: parse_timestamp("2024-02-02 10:00:00").expect("ts"),
            ai_iq: 3.5,
            dimensions: Vec::new(),
        }
    }

    #[test]
    fn memory_store_assigns_sequential_ids() {
        let mut store = MemoryStore::new();
        let first = store.append(draft("Ada")).expect("append");
        let second = store.append(draft("Alan")).expect("append");
        assert_eq!(first.respondent_id, RespondentId(1));
        assert_eq!(second.respondent_id, RespondentId(2));
        assert_eq!(store.load().expect("load").len(), 2);
    }

    #[test]
    fn memory_store_delete_is_idempotent() {
        let mut store = MemoryStore::new();
        let stored = store.append(draft("Ada")).expect("append");
        assert!(store.delete(stored.respondent_id).expect("delete"));
        assert!(!store.delete(stored.respondent_id).expect("delete again"));
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_deleting_older_rows() {
        let mut store = MemoryStore::new();
        let first = store.append(draft("Ada")).expect("append");
        store.append(draft("Alan")).expect("append");
        store.delete(first.respondent_id).expect("delete");
        let third = store.append(draft("Grace")).expect("append");
        assert_eq!(third.respondent_id, RespondentId(3));
    }

    #[test]
    fn get_unknown_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get(RespondentId(42)),
            Err(AiIqError::NotFound(RespondentId(42)))
        ));
    }
}
