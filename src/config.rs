//! YAML configuration for the lost & found pipeline.
//!
//! One file configures where items are stored and how the Smart Match engine
//! ranks them. Every field has a default, so an empty document is valid.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! store:
//!   backend: "redb"
//!   path: "data/lostfound.redb"
//!   seed_sample_data: true
//!
//! matcher:
//!   max_results: 5
//!   min_score: 20
//!   # stop_words: ["a", "an", "the"]   # optional override
//! ```

use std::fs;
use std::path::Path;

use matcher::{MatchConfig, SmartMatcher};
use serde::{Deserialize, Serialize};
use store::{BackendConfig, ItemStore};
use thiserror::Error;

use crate::PipelineError;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LostFoundConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub store: StoreYamlConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,
}

impl LostFoundConfig {
    /// Load a YAML configuration file from the given path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration from a string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LostFoundConfig = if yaml.trim().is_empty() {
            LostFoundConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;
        self.store.validate()?;
        self.matcher.validate()?;
        Ok(())
    }

    /// Open the configured store, loading the sample catalogue when enabled.
    pub fn open_store(&self) -> Result<ItemStore, PipelineError> {
        let store = ItemStore::open(&self.store.backend_config())?;
        if self.store.seed_sample_data {
            let inserted = store.seed_sample_data()?;
            if inserted > 0 {
                tracing::info!(inserted, "loaded sample catalogue");
            }
        }
        Ok(store)
    }

    pub fn build_matcher(&self) -> Result<SmartMatcher, PipelineError> {
        Ok(SmartMatcher::new(self.matcher.to_match_config())?)
    }
}

impl Default for LostFoundConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            store: StoreYamlConfig::default(),
            matcher: MatchYamlConfig::default(),
        }
    }
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendKind {
    #[default]
    InMemory,
    Redb,
}

/// Store section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreYamlConfig {
    #[serde(default)]
    pub backend: StoreBackendKind,

    /// Database file; required for `redb`.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "true_value")]
    pub seed_sample_data: bool,
}

impl StoreYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.backend == StoreBackendKind::Redb
            && self.path.as_deref().map_or(true, |p| p.trim().is_empty())
        {
            return Err(ConfigLoadError::MissingField("store.path".to_string()));
        }
        Ok(())
    }

    pub fn backend_config(&self) -> BackendConfig {
        match (self.backend, &self.path) {
            (StoreBackendKind::Redb, Some(path)) => BackendConfig::redb(path.clone()),
            _ => BackendConfig::in_memory(),
        }
    }
}

impl Default for StoreYamlConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::InMemory,
            path: None,
            seed_sample_data: true,
        }
    }
}

/// Matcher section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchYamlConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Replaces the built-in stop-word list when present.
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
}

impl MatchYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_match_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))
    }

    pub fn to_match_config(&self) -> MatchConfig {
        let mut config = MatchConfig {
            max_results: self.max_results,
            min_score: self.min_score,
            ..MatchConfig::default()
        };
        if let Some(words) = &self.stop_words {
            config.stop_words = words.iter().map(|w| w.trim().to_string()).collect();
        }
        config
    }
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_score: default_min_score(),
            stop_words: None,
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn true_value() -> bool {
    true
}
fn default_max_results() -> usize {
    5
}
fn default_min_score() -> u32 {
    20
}
