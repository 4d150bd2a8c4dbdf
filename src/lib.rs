//! Workspace umbrella crate for the campus lost & found.
//!
//! This crate stitches the item store and the Smart Match engine together so
//! callers can file a lost-item report and get ranked candidates back through
//! a single entry point.
//!
//! ```
//! use lostfound::{report_lost_item, ItemStore, LostReportInput, SmartMatcher};
//!
//! let store = ItemStore::in_memory();
//! store.seed_sample_data().unwrap();
//! let matcher = SmartMatcher::default();
//!
//! let input = LostReportInput {
//!     name: "AirPods Pro".into(),
//!     category: "Electronics".into(),
//!     description: "white apple earbuds".into(),
//!     location: "Library".into(),
//!     date_from: Some("2026-02-09".into()),
//!     date_to: Some("2026-02-11".into()),
//!     ..Default::default()
//! };
//!
//! let (report, matches) = report_lost_item(&store, &matcher, input).unwrap();
//! assert_eq!(report.id, 1);
//! assert_eq!(matches[0].item.name, "Apple AirPods");
//! ```

pub mod config;

pub use config::{ConfigLoadError, LostFoundConfig, MatchYamlConfig, StoreBackendKind, StoreYamlConfig};
pub use matcher::{
    smart_match, Confidence, DateRange, FoundItem, LostQuery, MatchConfig, MatchError,
    MatchResult, SmartMatcher,
};
pub use store::{
    BackendConfig, ItemFilter, ItemRecord, ItemStatus, ItemStore, LostReportRecord,
    NewLostReport, StoreError,
};

use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while running a report through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("matcher failure: {0}")]
    Match(#[from] MatchError),

    #[error("invalid report: {0}")]
    InvalidReport(String),
}

/// A lost-item report as submitted by a form or JSON client.
///
/// Newer clients send `date_from`/`date_to`; older ones send a single
/// `date_lost`, which is treated as both endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LostReportInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub date_lost: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

impl LostReportInput {
    /// Build a report in the older single-date shape.
    pub fn from_legacy(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        date_lost: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: description.into(),
            location: location.into(),
            date_lost: Some(date_lost.into()),
            ..Self::default()
        }
    }

    /// Resolve the reported dates into a range.
    ///
    /// `date_from` wins over `date_lost`; a missing `date_to` repeats the
    /// start. With no usable date at all the range is empty, which only
    /// disables the date signal.
    pub fn date_range(&self) -> DateRange {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match (non_empty(&self.date_from), non_empty(&self.date_lost)) {
            (Some(from), _) => {
                let to = non_empty(&self.date_to).unwrap_or_else(|| from.clone());
                DateRange::new(from, to)
            }
            (None, Some(lost)) => DateRange::single(lost),
            (None, None) => DateRange::single(""),
        }
    }

    pub fn to_query(&self) -> LostQuery {
        LostQuery {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            date_range: self.date_range(),
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let missing: Vec<&str> = [("name", &self.name), ("category", &self.category)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::InvalidReport(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Rank the store's approved items against `query`.
pub fn find_matches(
    store: &ItemStore,
    matcher: &SmartMatcher,
    query: &LostQuery,
) -> Result<Vec<MatchResult>, PipelineError> {
    let snapshot = store.approved_snapshot()?;
    Ok(matcher.match_items(query, &snapshot))
}

/// Persist a lost-item report and return it with its ranked matches.
pub fn report_lost_item(
    store: &ItemStore,
    matcher: &SmartMatcher,
    input: LostReportInput,
) -> Result<(LostReportRecord, Vec<MatchResult>), PipelineError> {
    input.validate()?;
    let start = Instant::now();
    let query = input.to_query();

    let report = store.add_lost_report(NewLostReport {
        name: query.name.clone(),
        category: query.category.clone(),
        description: query.description.clone(),
        location: query.location.clone(),
        date_from: query.date_range.start.clone(),
        date_to: query.date_range.end.clone(),
        contact: input.contact,
    })?;
    let matches = find_matches(store, matcher, &query)?;

    tracing::info!(
        report_id = report.id,
        matches = matches.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "lost report processed"
    );
    Ok((report, matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_date_becomes_both_endpoints() {
        let input = LostReportInput::from_legacy("Keys", "Keys", "", "", "2026-02-09");
        assert_eq!(input.date_range(), DateRange::single("2026-02-09"));
    }

    #[test]
    fn date_from_takes_precedence() {
        let input = LostReportInput {
            date_from: Some("2026-02-01".into()),
            date_lost: Some("2026-03-01".into()),
            ..Default::default()
        };
        assert_eq!(input.date_range(), DateRange::single("2026-02-01"));
    }

    #[test]
    fn missing_dates_give_empty_range() {
        let input = LostReportInput {
            date_from: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(input.date_range(), DateRange::single(""));
    }

    #[test]
    fn validation_names_missing_fields() {
        let err = LostReportInput::default().validate().unwrap_err();
        assert!(err.to_string().contains("name, category"));
    }

    #[test]
    fn invalid_report_is_not_persisted() {
        let store = ItemStore::in_memory();
        let matcher = SmartMatcher::default();
        let result = report_lost_item(&store, &matcher, LostReportInput::default());
        assert!(matches!(result, Err(PipelineError::InvalidReport(_))));
        assert!(store.list_lost_reports().unwrap().is_empty());
    }
}
