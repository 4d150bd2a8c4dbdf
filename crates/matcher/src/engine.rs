use std::collections::BTreeSet;
use std::time::Instant;

use once_cell::sync::Lazy;

use crate::metrics::metrics_recorder;
use crate::signals::{category_signal, date_signal, keyword_signal, location_signal, Signal};
use crate::tokenize::{join_fields, word_set};
use crate::types::{Confidence, FoundItem, LostQuery, MatchConfig, MatchError, MatchResult};

#[cfg(test)]
mod tests;

/// Raw evaluation of one candidate before thresholding and capping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Sum of all signal points, uncapped.
    pub raw_score: u32,
    pub reasons: Vec<String>,
}

impl ScoreBreakdown {
    /// Score as reported to callers.
    pub fn capped(&self) -> u32 {
        self.raw_score.min(MatchConfig::SCORE_CAP)
    }
}

/// Ranks approved found items against a lost-item query.
///
/// The matcher is immutable once built and holds no per-call state, so a single
/// instance can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SmartMatcher {
    config: MatchConfig,
}

impl SmartMatcher {
    /// Build a matcher from a validated configuration.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Keyword set for the query's name and description.
    pub fn query_words(&self, query: &LostQuery) -> BTreeSet<String> {
        word_set(
            &join_fields([query.name.as_str(), query.description.as_str()]),
            &self.config.stop_words,
        )
    }

    /// Keyword set for an item's name, description and detail text.
    pub fn item_words(&self, item: &FoundItem) -> BTreeSet<String> {
        word_set(
            &join_fields([
                item.name.as_str(),
                item.description.as_str(),
                item.item_detail.as_deref().unwrap_or_default(),
            ]),
            &self.config.stop_words,
        )
    }

    /// Evaluate every signal for a single candidate.
    pub fn explain(&self, query: &LostQuery, item: &FoundItem) -> ScoreBreakdown {
        self.score_with_words(query, &self.query_words(query), item)
    }

    fn score_with_words(
        &self,
        query: &LostQuery,
        query_words: &BTreeSet<String>,
        item: &FoundItem,
    ) -> ScoreBreakdown {
        let item_words = self.item_words(item);
        let signals: [Option<Signal>; 4] = [
            category_signal(&query.category, &item.category),
            location_signal(&query.location, &item.location),
            date_signal(&item.date_found, &query.date_range),
            keyword_signal(query_words, &item_words),
        ];

        let mut raw_score = 0u32;
        let mut reasons = Vec::new();
        for signal in signals.into_iter().flatten() {
            raw_score = raw_score.saturating_add(signal.points);
            reasons.push(signal.reason);
        }

        ScoreBreakdown { raw_score, reasons }
    }

    /// Rank `candidates` against `query`.
    ///
    /// Returns at most `max_results` matches whose raw score reaches
    /// `min_score`, highest score first. Candidates with equal scores keep
    /// their input order, so callers should pass a deterministic ordering
    /// (newest first, for instance).
    pub fn match_items(&self, query: &LostQuery, candidates: &[FoundItem]) -> Vec<MatchResult> {
        let start = Instant::now();
        let query_words = self.query_words(query);

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .filter_map(|item| {
                let breakdown = self.score_with_words(query, &query_words, item);
                if breakdown.raw_score < self.config.min_score {
                    return None;
                }
                let score = breakdown.capped();
                Some(MatchResult {
                    item: item.clone(),
                    score,
                    confidence: Confidence::from_score(score),
                    reasons: breakdown.reasons,
                })
            })
            .collect();

        // `sort_by` is stable: ties stay in candidate order.
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(self.config.max_results);

        let latency = start.elapsed();
        tracing::debug!(
            candidates = candidates.len(),
            hits = results.len(),
            top_score = results.first().map(|r| r.score).unwrap_or(0),
            latency_us = latency.as_micros() as u64,
            "smart match ranked"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(latency, candidates.len(), results.len());
        }

        results
    }
}

static DEFAULT_MATCHER: Lazy<SmartMatcher> = Lazy::new(SmartMatcher::default);

/// Rank `candidates` with the default configuration.
pub fn smart_match(query: &LostQuery, candidates: &[FoundItem]) -> Vec<MatchResult> {
    DEFAULT_MATCHER.match_items(query, candidates)
}
