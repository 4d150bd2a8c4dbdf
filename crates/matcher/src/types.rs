use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::collections::BTreeSet;

use crate::tokenize::DEFAULT_STOP_WORDS;

/// A found item eligible for matching.
///
/// Only items in the publicly visible ("approved") state should ever reach the
/// engine; status filtering belongs to whoever produces the candidate list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoundItem {
    /// Stable identifier assigned by the item store.
    pub id: u64,
    pub name: String,
    /// Category label from the caller's closed set, compared exactly.
    pub category: String,
    pub description: String,
    pub location: String,
    /// Raw `YYYY-MM-DD` date. Kept as text so a malformed value only disables
    /// the date signal for this item.
    pub date_found: String,
    /// Extra identifying attributes (brand, colour, size...).
    #[serde(default)]
    pub item_detail: Option<String>,
}

/// Inclusive range of dates during which the item was lost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Range covering a single reported day.
    pub fn single(date: impl Into<String>) -> Self {
        let date = date.into();
        Self {
            start: date.clone(),
            end: date,
        }
    }

    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Description of a lost item, as entered by the person looking for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LostQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub date_range: DateRange,
}

/// Coarse restatement of a match score for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const HIGH_THRESHOLD: u32 = 65;
    pub const MEDIUM_THRESHOLD: u32 = 40;

    pub fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Confidence::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

/// A single ranked candidate returned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub item: FoundItem,
    /// Final score, capped at [`MatchConfig::SCORE_CAP`].
    pub score: u32,
    pub confidence: Confidence,
    /// Contributing signals in evaluation order.
    pub reasons: Vec<String>,
}

/// Engine configuration.
///
/// The defaults reproduce the documented scoring behaviour; the thresholds are
/// exposed so deployments can be tuned, but callers relying on the documented
/// semantics should use [`MatchConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Maximum number of results returned.
    #[serde(default = "MatchConfig::default_max_results")]
    pub max_results: usize,
    /// Minimum raw (pre-cap) score a candidate needs to be returned.
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: u32,
    /// Words ignored by the keyword signal.
    #[serde(default = "MatchConfig::default_stop_words")]
    pub stop_words: BTreeSet<String>,
}

impl MatchConfig {
    /// Upper bound applied to every reported score.
    pub const SCORE_CAP: u32 = 99;

    pub(crate) fn default_max_results() -> usize {
        5
    }

    pub(crate) fn default_min_score() -> u32 {
        20
    }

    pub(crate) fn default_stop_words() -> BTreeSet<String> {
        DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_results == 0 {
            return Err(MatchError::InvalidConfig(
                "max_results must be greater than zero".into(),
            ));
        }
        if self.min_score > Self::SCORE_CAP {
            return Err(MatchError::InvalidConfig(format!(
                "min_score must be <= {}",
                Self::SCORE_CAP
            )));
        }
        if self
            .stop_words
            .iter()
            .any(|w| w.is_empty() || w.chars().any(|c| c.is_uppercase()))
        {
            return Err(MatchError::InvalidConfig(
                "stop_words must be non-empty lowercase words".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_results: Self::default_max_results(),
            min_score: Self::default_min_score(),
            stop_words: Self::default_stop_words(),
        }
    }
}

/// Errors produced by the matching layer.
///
/// Matching itself never fails on data; only configuration can be rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
