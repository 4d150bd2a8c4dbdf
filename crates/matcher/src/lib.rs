//! # Lost & Found Smart Match (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` ranks previously found items against a newly reported lost item.
//! It is a pure function of `(LostQuery, &[FoundItem])`: no I/O, no clocks, no
//! shared mutable state. Reading the approved items and persisting the report
//! are the item store's job (`store` crate); this crate only scores.
//!
//! ## Scoring
//!
//! Four independent signals are evaluated per candidate and summed:
//!
//! | Signal   | Max | Rule |
//! |----------|-----|------|
//! | Category | 35  | exact, case-sensitive equality |
//! | Location | 25  | 12 per shared location token |
//! | Date     | 20  | 20 inside the range, 12 within 3 days, 6 within a further week |
//! | Keywords | 30  | 8 per shared non-stop word |
//!
//! Candidates whose raw total is below 20 are dropped, reported scores are
//! capped at 99, results are sorted by score (stable for ties) and truncated
//! to five. [`Confidence`] restates the score as `High` (≥65), `Medium` (≥40)
//! or `Low`.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{smart_match, DateRange, FoundItem, LostQuery};
//!
//! let found = vec![FoundItem {
//!     id: 4,
//!     name: "Green Hydro Flask".into(),
//!     category: "Water Bottles".into(),
//!     description: "32oz bottle with sunflower stickers".into(),
//!     location: "Library — Study Room 2".into(),
//!     date_found: "2026-02-10".into(),
//!     item_detail: None,
//! }];
//!
//! let query = LostQuery {
//!     name: "Hydro Flask".into(),
//!     category: "Water Bottles".into(),
//!     description: "green, stickers".into(),
//!     location: "Library".into(),
//!     date_range: DateRange::new("2026-02-09", "2026-02-11"),
//! };
//!
//! let hits = smart_match(&query, &found);
//! assert_eq!(hits.len(), 1);
//! assert!(hits[0].reasons.contains(&"Same category".to_string()));
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-call latency and hit counts.

pub mod engine;
pub mod metrics;
pub mod signals;
pub mod tokenize;
pub mod types;

pub use crate::engine::{smart_match, ScoreBreakdown, SmartMatcher};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::tokenize::{location_tokens, word_set, DEFAULT_STOP_WORDS, LOCATION_NOISE};
pub use crate::types::{
    Confidence, DateRange, FoundItem, LostQuery, MatchConfig, MatchError, MatchResult,
};
