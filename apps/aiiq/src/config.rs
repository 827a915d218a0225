//! # Configuration
//!
//! Resolves the runtime configuration from three layers, later wins:
//!
//! 1. Built-in defaults (built-in survey, unweighted scoring,
//!    `survey_responses.csv`, no results password)
//! 2. TOML file (`aiiq.toml` by default, or `--config <path>`)
//! 3. Environment: `AIIQ_PASSWORD`, `AIIQ_STORE`, `AIIQ_SCORING_POLICY`
//!
//! The `--store` flag is applied last by the CLI.
//!
//! ```toml
//! [general]
//! password = "change-me"
//!
//! [store]
//! path = "survey_responses.csv"
//!
//! [scoring]
//! policy = "weighted"
//!
//! [[survey.dimensions]]
//! name = "People"
//! questions = ["Our team has the skills we need."]
//! text = "Optional: anything to add?"
//! ```

use aiiq_core::{AiIqError, ScoringPolicy, Survey, SurveyDefinition, SurveyModel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "aiiq.toml";

/// Store path when neither file nor environment names one.
pub const DEFAULT_STORE_PATH: &str = "survey_responses.csv";

pub const ENV_PASSWORD: &str = "AIIQ_PASSWORD";
pub const ENV_STORE: &str = "AIIQ_STORE";
pub const ENV_SCORING_POLICY: &str = "AIIQ_SCORING_POLICY";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// FILE LAYOUT
// =============================================================================

/// The TOML file as written by an operator. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub general: GeneralSection,
    pub store: StoreSection,
    pub scoring: ScoringSection,
    pub survey: Option<SurveyDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralSection {
    /// Shared secret for the results views.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringSection {
    pub policy: Option<ScoringPolicy>,
}

impl ConfigFile {
    pub fn from_toml_str(raw: &str) -> Result<Self, AiIqError> {
        toml::from_str(raw).map_err(|e| AiIqError::Configuration(format!("Invalid TOML: {}", e)))
    }

    pub fn read(path: &Path) -> Result<Self, AiIqError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AiIqError::Configuration(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AiIqError::Configuration(format!(
                "Config {} is {} bytes, maximum allowed is {} bytes",
                path.display(),
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AiIqError::Configuration(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }
}

// =============================================================================
// RESOLVED CONFIGURATION
// =============================================================================

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` means every gated view is refused.
    pub password: Option<String>,
    pub store_path: PathBuf,
    pub policy: ScoringPolicy,
    pub model: SurveyModel,
    /// The file the configuration was read from, if any.
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            password: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            policy: ScoringPolicy::default(),
            model: SurveyModel::builtin(),
            source: None,
        }
    }
}

impl AppConfig {
    /// Load file and environment layers.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AiIqError> {
        let (file, source) = match explicit {
            Some(path) => (ConfigFile::read(path)?, Some(path.to_path_buf())),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    (ConfigFile::read(default)?, Some(default.to_path_buf()))
                } else {
                    (ConfigFile::default(), None)
                }
            }
        };

        let config = Self::from_file(file, source)?;
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Apply a parsed file over the defaults.
    pub fn from_file(file: ConfigFile, source: Option<PathBuf>) -> Result<Self, AiIqError> {
        let defaults = Self::default();
        let model = match file.survey {
            Some(definition) => SurveyModel::try_from(definition)?,
            None => defaults.model,
        };

        Ok(Self {
            password: non_empty(file.general.password),
            store_path: file.store.path.unwrap_or(defaults.store_path),
            policy: file.scoring.policy.unwrap_or(defaults.policy),
            model,
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AiIqError> {
        if let Some(password) = non_empty(lookup(ENV_PASSWORD)) {
            self.password = Some(password);
        }
        if let Some(store) = non_empty(lookup(ENV_STORE)) {
            self.store_path = PathBuf::from(store);
        }
        if let Some(policy) = non_empty(lookup(ENV_SCORING_POLICY)) {
            self.policy = policy.parse()?;
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_store(mut self, store: Option<PathBuf>) -> Self {
        if let Some(path) = store {
            self.store_path = path;
        }
        self
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Open a survey session on the configured CSV store.
    #[must_use]
    pub fn survey(&self) -> Survey {
        Survey::with_csv(self.model.clone(), self.policy, &self.store_path)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// TESTS
// =============================================================================
