//! The four independent scoring signals.
//!
//! Each signal returns `None` when it contributes nothing, otherwise the points
//! awarded (already capped at the signal's maximum) and a short reason.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::tokenize::location_tokens;
use crate::types::DateRange;

pub const CATEGORY_POINTS: u32 = 35;
pub const LOCATION_POINTS_PER_WORD: u32 = 12;
pub const LOCATION_MAX: u32 = 25;
pub const DATE_WITHIN_POINTS: u32 = 20;
pub const DATE_NEAR_POINTS: u32 = 12;
pub const DATE_CLOSE_POINTS: u32 = 6;
pub const KEYWORD_POINTS_PER_WORD: u32 = 8;
pub const KEYWORD_MAX: u32 = 30;

/// Days of slack added on both sides of the reported range.
pub const DATE_BUFFER_DAYS: i64 = 3;
/// Furthest distance (days from the nearest endpoint) still rewarded.
pub const DATE_CLOSE_MAX_DAYS: i64 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Points and explanation contributed by one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub points: u32,
    pub reason: String,
}

impl Signal {
    fn new(points: u32, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: reason.into(),
        }
    }
}

pub fn category_signal(query_category: &str, item_category: &str) -> Option<Signal> {
    (query_category == item_category).then(|| Signal::new(CATEGORY_POINTS, "Same category"))
}

pub fn location_signal(query_location: &str, item_location: &str) -> Option<Signal> {
    let query = location_tokens(query_location);
    let item = location_tokens(item_location);
    let shared: Vec<&String> = query.intersection(&item).collect();
    if shared.is_empty() {
        return None;
    }

    let points = scaled(shared.len(), LOCATION_POINTS_PER_WORD, LOCATION_MAX);
    let named = name_words(&shared, 2);
    Some(Signal::new(points, format!("Location match: {named}")))
}

/// Score how close `date_found` is to the reported range.
///
/// Returns `None` when any of the dates fails to parse; the caller keeps
/// scoring the other signals.
pub fn date_signal(date_found: &str, range: &DateRange) -> Option<Signal> {
    let found = parse_date(date_found)?;
    let start = parse_date(&range.start)?;
    let end = parse_date(&range.end)?;
    let (low, high) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    let buffer = chrono::Duration::days(DATE_BUFFER_DAYS);
    let buffered_low = low - buffer;
    let buffered_high = high + buffer;

    if buffered_low <= found && found <= buffered_high {
        if low <= found && found <= high {
            return Some(Signal::new(
                DATE_WITHIN_POINTS,
                "Found within your date range",
            ));
        }
        return Some(Signal::new(DATE_NEAR_POINTS, "Found near your date range"));
    }

    let nearest = (found - low)
        .num_days()
        .abs()
        .min((found - high).num_days().abs());
    (nearest <= DATE_CLOSE_MAX_DAYS).then(|| {
        Signal::new(
            DATE_CLOSE_POINTS,
            format!("Found ~{nearest}d from your range"),
        )
    })
}

pub fn keyword_signal(query_words: &BTreeSet<String>, item_words: &BTreeSet<String>) -> Option<Signal> {
    let shared: Vec<&String> = query_words.intersection(item_words).collect();
    if shared.is_empty() {
        return None;
    }

    let points = scaled(shared.len(), KEYWORD_POINTS_PER_WORD, KEYWORD_MAX);
    let named = name_words(&shared, 3);
    Some(Signal::new(points, format!("Shared keywords: {named}")))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn scaled(count: usize, per_word: u32, max: u32) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count.saturating_mul(per_word).min(max)
}

fn name_words(words: &[&String], limit: usize) -> String {
    words
        .iter()
        .take(limit)
        .map(|w| w.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(start, end)
    }

    #[test]
    fn category_is_case_sensitive() {
        assert_eq!(
            category_signal("Keys", "Keys").map(|s| s.points),
            Some(CATEGORY_POINTS)
        );
        assert!(category_signal("keys", "Keys").is_none());
        assert!(category_signal("Keys", "Electronics").is_none());
    }

    #[test]
    fn location_points_scale_and_cap() {
        let one = location_signal("Gymnasium", "Gymnasium — Main Floor").unwrap();
        assert_eq!(one.points, 12);
        assert_eq!(one.reason, "Location match: gymnasium");

        let two = location_signal("Gymnasium Main", "Gymnasium — Main Floor").unwrap();
        assert_eq!(two.points, 24);

        let three = location_signal("Gymnasium Main Floor", "Gymnasium — Main Floor").unwrap();
        assert_eq!(three.points, LOCATION_MAX);
        // Only two words are named.
        assert_eq!(three.reason, "Location match: floor, gymnasium");
    }

    #[test]
    fn location_noise_never_matches() {
        assert!(location_signal("the room hall area -", "Room — Hall the Area").is_none());
    }

    #[test]
    fn date_inside_range_scores_full() {
        let s = date_signal("2026-02-10", &range("2026-02-10", "2026-02-10")).unwrap();
        assert_eq!(s.points, DATE_WITHIN_POINTS);
        assert_eq!(s.reason, "Found within your date range");

        let s = date_signal("2026-02-12", &range("2026-02-10", "2026-02-14")).unwrap();
        assert_eq!(s.points, DATE_WITHIN_POINTS);
    }

    #[test]
    fn date_in_buffer_scores_near() {
        for day in ["2026-02-07", "2026-02-09", "2026-02-13"] {
            let s = date_signal(day, &range("2026-02-10", "2026-02-10")).unwrap();
            assert_eq!(s.points, DATE_NEAR_POINTS, "{day}");
            assert_eq!(s.reason, "Found near your date range");
        }
    }

    #[test]
    fn date_just_outside_buffer_scores_close() {
        let s = date_signal("2026-02-14", &range("2026-02-10", "2026-02-10")).unwrap();
        assert_eq!(s.points, DATE_CLOSE_POINTS);
        assert_eq!(s.reason, "Found ~4d from your range");

        let s = date_signal("2026-02-03", &range("2026-02-10", "2026-02-12")).unwrap();
        assert_eq!(s.reason, "Found ~7d from your range");
    }

    #[test]
    fn date_far_outside_scores_nothing() {
        assert!(date_signal("2026-02-18", &range("2026-02-10", "2026-02-10")).is_none());
        assert!(date_signal("2026-03-12", &range("2026-02-10", "2026-02-10")).is_none());
    }

    #[test]
    fn unparsable_dates_skip_signal() {
        assert!(date_signal("2026-13-45", &range("2026-02-10", "2026-02-10")).is_none());
        assert!(date_signal("not-a-date", &range("2026-02-10", "2026-02-10")).is_none());
        assert!(date_signal("2026-02-10", &range("", "2026-02-10")).is_none());
    }

    #[test]
    fn reversed_range_is_normalised() {
        let s = date_signal("2026-02-12", &range("2026-02-14", "2026-02-10")).unwrap();
        assert_eq!(s.points, DATE_WITHIN_POINTS);
    }

    #[test]
    fn keyword_points_scale_and_cap() {
        let q: BTreeSet<String> = ["red", "nike", "backpack", "zipper"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let i: BTreeSet<String> = ["red", "nike", "backpack", "zipper", "blue"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let s = keyword_signal(&q, &i).unwrap();
        assert_eq!(s.points, KEYWORD_MAX);
        assert_eq!(s.reason, "Shared keywords: backpack, nike, red");

        let empty = BTreeSet::new();
        assert!(keyword_signal(&empty, &i).is_none());
    }
}
