//! # CSV File Store
//!
//! Disk-backed [`SubmissionStore`] using the tabular format in `formats`.
//!
//! Each write encodes the full table, writes it to a sibling `.tmp` file
//! and renames it over the store, so a failed write leaves the previous
//! table intact. There is no cross-process locking.

use super::SubmissionStore;
use crate::formats::{ColumnLayout, MAX_TABLE_SIZE, submissions_from_csv, submissions_to_csv};
use crate::model::SurveyModel;
use crate::submission::{NewSubmission, Submission, next_respondent_id};
use crate::{AiIqError, RespondentId};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// CSV-file submission store.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    layout: ColumnLayout,
}

impl CsvStore {
    /// Bind a store to a file path. The file is created on first write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, model: &SurveyModel) -> Self {
        Self {
            path: path.into(),
            layout: ColumnLayout::for_model(model),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the first submission has been written.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("submissions.csv"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the whole table.
    fn write_all(&self, submissions: &[Submission]) -> Result<(), AiIqError> {
        let bytes = submissions_to_csv(&self.layout, submissions)?;
        let temp = self.temp_path();

        let written = std::fs::write(&temp, &bytes)
            .map_err(|e| AiIqError::Storage(format!("Write {}: {}", temp.display(), e)))
            .and_then(|()| {
                std::fs::rename(&temp, &self.path).map_err(|e| {
                    AiIqError::Storage(format!(
                        "Replace {} with {}: {}",
                        self.path.display(),
                        temp.display(),
                        e
                    ))
                })
            });

        if written.is_err() {
            // Best effort; the store error is what the caller needs.
            let _ = std::fs::remove_file(&temp);
        }
        written
    }
}

impl SubmissionStore for CsvStore {
    fn load(&self) -> Result<Vec<Submission>, AiIqError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let metadata = std::fs::metadata(&self.path).map_err(|e| {
            AiIqError::Storage(format!("Cannot read metadata of {}: {}", self.path.display(), e))
        })?;
        if metadata.len() > MAX_TABLE_SIZE as u64 {
            return Err(AiIqError::Storage(format!(
                "Store {} is {} bytes, maximum allowed is {} bytes",
                self.path.display(),
                metadata.len(),
                MAX_TABLE_SIZE
            )));
        }

        let bytes = std::fs::read(&self.path)
            .map_err(|e| AiIqError::Storage(format!("Read {}: {}", self.path.display(), e)))?;
        submissions_from_csv(&self.layout, &bytes)
    }

    fn append(&mut self, draft: NewSubmission) -> Result<Submission, AiIqError> {
        let mut submissions = self.load()?;
        let stored = draft.with_id(next_respondent_id(&submissions));
        submissions.push(stored.clone());
        self.write_all(&submissions)?;
        Ok(stored)
    }

    fn delete(&mut self, id: RespondentId) -> Result<bool, AiIqError> {
        let mut submissions = self.load()?;
        let before = submissions.len();
        submissions.retain(|s| s.respondent_id != id);
        if submissions.len() == before {
            return Ok(false);
        }
        self.write_all(&submissions)?;
        Ok(true)
    }
}

// =============================================================================
// TESTS
// =============================================================================
