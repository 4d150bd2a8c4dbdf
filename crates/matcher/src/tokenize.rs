//! Word-set construction for the keyword and location signals.
//!
//! Sets are `BTreeSet`s so that shared words are always reported in the same
//! (alphabetical) order.

use std::collections::BTreeSet;

/// Words that carry no identifying signal in item descriptions.
pub const DEFAULT_STOP_WORDS: [&str; 17] = [
    "a", "an", "the", "is", "in", "at", "of", "and", "or", "it", "i", "my", "was", "with", "found",
    "lost", "have",
];

/// Location tokens ignored when comparing where items were lost and found.
pub const LOCATION_NOISE: [&str; 6] = ["the", "—", "-", "room", "hall", "area"];

/// Build the keyword set for free text.
///
/// Lowercases, drops every character that is not an ASCII letter, ASCII digit
/// or space, splits on whitespace and removes `stop_words`.
pub fn word_set(text: &str, stop_words: &BTreeSet<String>) -> BTreeSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| !stop_words.contains(*w))
        .map(str::to_string)
        .collect()
}

/// Build the location token set: lowercase whitespace split, punctuation kept,
/// [`LOCATION_NOISE`] removed.
pub fn location_tokens(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| !LOCATION_NOISE.contains(w))
        .map(str::to_string)
        .collect()
}

/// Join non-empty text fields with a single space.
pub(crate) fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
