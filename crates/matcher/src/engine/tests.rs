use super::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::metrics::{set_match_metrics, MatchMetrics};
use crate::types::DateRange;

fn item(id: u64, name: &str, category: &str, location: &str, date_found: &str) -> FoundItem {
    FoundItem {
        id,
        name: name.into(),
        category: category.into(),
        description: String::new(),
        location: location.into(),
        date_found: date_found.into(),
        item_detail: None,
    }
}

fn query(name: &str, category: &str, description: &str, location: &str, date: &str) -> LostQuery {
    LostQuery {
        name: name.into(),
        category: category.into(),
        description: description.into(),
        location: location.into(),
        date_range: DateRange::single(date),
    }
}

fn airpods_query() -> LostQuery {
    query(
        "AirPods",
        "Electronics",
        "white earbuds",
        "Library Study Room 2",
        "2026-02-10",
    )
}

fn airpods_item() -> FoundItem {
    FoundItem {
        id: 1,
        name: "Apple AirPods".into(),
        category: "Electronics".into(),
        description: "Multiple Apple AirPods found across campus.".into(),
        location: "Library — Study Room 2".into(),
        date_found: "2026-02-10".into(),
        item_detail: Some("Brand: Apple".into()),
    }
}

#[test]
fn strong_match_on_all_signals() {
    let results = smart_match(&airpods_query(), &[airpods_item()]);
    assert_eq!(results.len(), 1);

    let hit = &results[0];
    // 35 category + 25 location + 20 date + 8 keyword
    assert_eq!(hit.score, 88);
    assert_eq!(hit.confidence, Confidence::High);
    assert_eq!(
        hit.reasons,
        vec![
            "Same category".to_string(),
            "Location match: 2, library".to_string(),
            "Found within your date range".to_string(),
            "Shared keywords: airpods".to_string(),
        ]
    );
}

#[test]
fn score_is_capped_at_99() {
    let q = query(
        "red nike backpack",
        "Bags & Backpacks",
        "zipper keychain",
        "Main Hallway Lockers",
        "2026-02-11",
    );
    let candidate = FoundItem {
        id: 7,
        name: "Red Nike Backpack".into(),
        category: "Bags & Backpacks".into(),
        description: "zipper with keychain".into(),
        location: "Main Hallway — Lockers B12".into(),
        date_found: "2026-02-11".into(),
        item_detail: None,
    };

    let breakdown = SmartMatcher::default().explain(&q, &candidate);
    assert_eq!(breakdown.raw_score, 35 + 25 + 20 + 30);

    let results = smart_match(&q, &[candidate]);
    assert_eq!(results[0].score, 99);
    assert_eq!(results[0].confidence, Confidence::High);
}

#[test]
fn unrelated_candidate_is_excluded() {
    let q = query("House keys", "Keys", "silver ring", "Front Office", "2026-02-10");
    let candidate = item(2, "Calculator", "Electronics", "Math Department", "2026-03-12");

    assert_eq!(SmartMatcher::default().explain(&q, &candidate).raw_score, 0);
    assert!(smart_match(&q, &[candidate]).is_empty());
}

#[test]
fn invalid_date_only_disables_date_signal() {
    let q = query(
        "Bracelet",
        "Jewelry & Accessories",
        "gold chain",
        "Gymnasium Main",
        "2026-02-13",
    );
    let mut candidate = item(
        3,
        "Water Bottle",
        "Jewelry & Accessories",
        "Gymnasium — Main Floor",
        "2026-13-45",
    );
    candidate.description = "Blue steel bottle".into();

    let results = smart_match(&q, &[candidate.clone()]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 59);
    assert_eq!(results[0].confidence, Confidence::Medium);
    assert_eq!(results[0].reasons.len(), 2);

    candidate.date_found = "not-a-date".into();
    let results = smart_match(&q, &[candidate]);
    assert_eq!(results[0].score, 59);
}

#[test]
fn empty_candidates_yield_empty_results() {
    assert!(smart_match(&airpods_query(), &[]).is_empty());
}

fn six_distinct_candidates() -> Vec<FoundItem> {
    let far = "2025-01-01";
    vec![
        item(1, "zulu", "Keys", "Parking Lot", far),          // 35
        item(2, "alpha", "Keys", "Parking Lot", far),         // 43
        item(3, "alpha bravo", "Keys", "Parking Lot", far),   // 51
        item(4, "alpha bravo charlie", "Keys", "Parking Lot", far), // 59
        item(5, "zulu", "Keys", "Parking Lot", "2026-02-10"), // 55
        item(6, "zulu", "Keys", "Cafeteria Table 7", far),    // 47
    ]
}

#[test]
fn only_top_five_are_returned() {
    let q = query("alpha", "Keys", "bravo charlie delta", "Cafeteria", "2026-02-10");
    let results = smart_match(&q, &six_distinct_candidates());

    assert_eq!(results.len(), 5);
    let ids: Vec<u64> = results.iter().map(|r| r.item.id).collect();
    assert_eq!(ids, vec![4, 5, 3, 6, 2]);
    let scores: Vec<u32> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![59, 55, 51, 47, 43]);
}

#[test]
fn ties_keep_candidate_order() {
    let q = query("", "Keys", "", "", "2026-02-10");
    let candidates = vec![
        item(10, "a", "Keys", "x", "1999-01-01"),
        item(11, "b", "Keys", "y", "1999-01-01"),
        item(12, "c", "Keys", "z", "1999-01-01"),
    ];

    let ids: Vec<u64> = smart_match(&q, &candidates)
        .iter()
        .map(|r| r.item.id)
        .collect();
    assert_eq!(ids, vec![10, 11, 12]);

    let reversed: Vec<FoundItem> = candidates.into_iter().rev().collect();
    let ids: Vec<u64> = smart_match(&q, &reversed)
        .iter()
        .map(|r| r.item.id)
        .collect();
    assert_eq!(ids, vec![12, 11, 10]);
}

#[test]
fn threshold_is_inclusive_at_twenty() {
    let q = query("umbrella", "Other", "", "Cafeteria", "2026-02-10");
    let keyword_only = item(1, "umbrella", "Keys", "Gym", "1999-01-01"); // 8
    let location_and_keyword = item(2, "umbrella", "Keys", "Cafeteria", "1999-01-01"); // 20

    let results = smart_match(&q, &[keyword_only, location_and_keyword]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item.id, 2);
    assert_eq!(results[0].score, 20);
    assert_eq!(results[0].confidence, Confidence::Low);
}

#[test]
fn stop_word_only_query_gets_no_keyword_points() {
    let q = query("my", "Keys", "I lost it at the", "", "2026-02-10");
    let candidate = item(1, "my keys", "Keys", "Office", "1999-01-01");
    let breakdown = SmartMatcher::default().explain(&q, &candidate);
    assert_eq!(breakdown.raw_score, 35);
    assert_eq!(breakdown.reasons, vec!["Same category".to_string()]);
}

#[test]
fn item_detail_contributes_keywords() {
    let q = query("Jacket", "Clothing & Apparel", "north face nuptse", "", "2026-02-15");
    let mut candidate = item(1, "Puffer", "Clothing & Apparel", "Room 304", "1999-01-01");
    candidate.item_detail = Some("Brand: The North Face · Style: Nuptse".into());

    let breakdown = SmartMatcher::default().explain(&q, &candidate);
    // category + {face, north, nuptse}
    assert_eq!(breakdown.raw_score, 35 + 24);
    assert_eq!(breakdown.reasons[1], "Shared keywords: face, north, nuptse");
}

#[test]
fn repeated_calls_are_identical() {
    let q = query("alpha", "Keys", "bravo charlie delta", "Cafeteria", "2026-02-10");
    let candidates = six_distinct_candidates();
    let first = smart_match(&q, &candidates);
    let second = smart_match(&q, &candidates);
    assert_eq!(first, second);
}

#[test]
fn invariants_hold_across_query_grid() {
    let mut candidates = six_distinct_candidates();
    candidates.push(airpods_item());
    candidates.push(item(20, "Keys", "Keys", "Front Office — Main Entrance", "2026-02-09"));
    candidates.push(item(21, "Notebook", "Books & Stationery", "Cafeteria — Table 7", "bad"));

    let categories = ["Keys", "Electronics", "Books & Stationery", "Unknown"];
    let locations = ["Cafeteria", "Library Study Room 2", "", "Parking Lot"];
    let dates = ["2026-02-10", "2025-01-01", "2026-02-20", "garbage"];
    let names = ["alpha bravo", "AirPods", "", "keys notebook"];

    for category in categories {
        for location in locations {
            for date in dates {
                for name in names {
                    let q = query(name, category, "charlie", location, date);
                    let results = smart_match(&q, &candidates);
                    assert!(results.len() <= 5);
                    for pair in results.windows(2) {
                        assert!(pair[0].score >= pair[1].score);
                    }
                    for r in &results {
                        assert!(r.score <= 99);
                        assert_eq!(r.confidence, Confidence::from_score(r.score));
                        let raw = SmartMatcher::default().explain(&q, &r.item).raw_score;
                        assert!(raw >= 20);
                    }
                }
            }
        }
    }
}

#[test]
fn custom_config_limits_and_threshold() {
    let matcher = SmartMatcher::new(MatchConfig {
        max_results: 2,
        min_score: 50,
        ..MatchConfig::default()
    })
    .expect("valid config");

    let q = query("alpha", "Keys", "bravo charlie delta", "Cafeteria", "2026-02-10");
    let results = matcher.match_items(&q, &six_distinct_candidates());
    let ids: Vec<u64> = results.iter().map(|r| r.item.id).collect();
    assert_eq!(ids, vec![4, 5]);
}

#[test]
fn injected_stop_words_are_respected() {
    let mut config = MatchConfig::default();
    config.stop_words.insert("airpods".into());
    let matcher = SmartMatcher::new(config).expect("valid config");

    let breakdown = matcher.explain(&airpods_query(), &airpods_item());
    assert_eq!(breakdown.raw_score, 35 + 25 + 20);
    assert!(!breakdown.reasons.iter().any(|r| r.starts_with("Shared")));
}

#[test]
fn invalid_config_is_rejected() {
    let err = SmartMatcher::new(MatchConfig {
        max_results: 0,
        ..MatchConfig::default()
    })
    .expect_err("zero results is invalid");
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

#[derive(Default)]
struct RecordingMetrics {
    calls: Mutex<Vec<(usize, usize)>>,
}

impl MatchMetrics for RecordingMetrics {
    fn record_match(&self, _latency: Duration, candidates: usize, hit_count: usize) {
        self.calls
            .lock()
            .expect("metrics lock")
            .push((candidates, hit_count));
    }
}

#[test]
fn metrics_hook_observes_calls() {
    let recorder = Arc::new(RecordingMetrics::default());
    set_match_metrics(Some(recorder.clone()));

    let candidates: Vec<FoundItem> = (0..13)
        .map(|id| item(id, "zulu", "Keys", "Nowhere", "1999-01-01"))
        .collect();
    let q = query("", "Keys", "", "", "2026-02-10");
    let results = smart_match(&q, &candidates);
    assert_eq!(results.len(), 5);

    set_match_metrics(None);
    let calls = recorder.calls.lock().expect("metrics lock");
    assert!(calls.contains(&(13, 5)));
}
