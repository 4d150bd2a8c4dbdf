//! Display enrichment for items leaving the API.
//!
//! Category emoji and placeholder photos are presentation concerns, so they
//! live here as constant tables rather than in the store or the matcher.

use matcher::{FoundItem, MatchResult};
use serde::Serialize;
use store::{ItemRecord, ItemVariantRecord};

/// Emoji shown for categories missing from [`CATEGORY_EMOJI`].
pub const FALLBACK_EMOJI: &str = "📦";

pub const CATEGORY_EMOJI: [(&str, &str); 9] = [
    ("Clothing & Apparel", "👕"),
    ("Electronics", "📱"),
    ("Books & Stationery", "📚"),
    ("Bags & Backpacks", "🎒"),
    ("Sports Equipment", "⚽"),
    ("Jewelry & Accessories", "💍"),
    ("Keys", "🔑"),
    ("Water Bottles", "💧"),
    ("Other", "📦"),
];

pub const CATEGORY_PHOTOS: [(&str, &str); 9] = [
    ("Electronics", "https://images.unsplash.com/photo-1583394838336-acd977736f90?w=600&q=80"),
    ("Bags & Backpacks", "https://images.unsplash.com/photo-1622560480605-d83c853bc5c3?w=600&q=80"),
    ("Clothing & Apparel", "https://images.unsplash.com/photo-1512436991641-6745cdb1723f?w=600&q=80"),
    ("Books & Stationery", "https://images.unsplash.com/photo-1497633762265-9d179a990aa6?w=600&q=80"),
    ("Water Bottles", "https://images.unsplash.com/photo-1602143407151-7111542de6e8?w=600&q=80"),
    ("Keys", "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=600&q=80"),
    ("Sports Equipment", "https://images.unsplash.com/photo-1530549387789-4c1017266635?w=600&q=80"),
    ("Jewelry & Accessories", "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338?w=600&q=80"),
    ("Other", "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=600&q=80"),
];

fn lookup(table: &[(&'static str, &'static str)], category: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, value)| *value)
}

pub fn category_emoji(category: &str) -> &'static str {
    lookup(&CATEGORY_EMOJI, category).unwrap_or(FALLBACK_EMOJI)
}

pub fn category_photo(category: &str) -> Option<&'static str> {
    lookup(&CATEGORY_PHOTOS, category)
}

/// Item's own photo, else its category placeholder.
pub fn photo_for(photo_url: Option<&str>, category: &str) -> Option<String> {
    photo_url
        .filter(|url| !url.is_empty())
        .or_else(|| category_photo(category))
        .map(str::to_string)
}

/// An item as rendered by list and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: ItemRecord,
    pub emoji: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ItemVariantRecord>,
}

impl ItemView {
    pub fn new(mut item: ItemRecord) -> Self {
        item.photo_url = photo_for(item.photo_url.as_deref(), &item.category);
        Self {
            emoji: category_emoji(&item.category),
            item,
            variants: Vec::new(),
        }
    }

    pub fn with_variants(mut self, variants: Vec<ItemVariantRecord>) -> Self {
        self.variants = variants;
        self
    }
}

pub fn item_views(items: Vec<ItemRecord>) -> Vec<ItemView> {
    items.into_iter().map(ItemView::new).collect()
}

/// A Smart Match hit with display fields attached.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub item: FoundItem,
    pub score: u32,
    pub confidence: matcher::Confidence,
    pub reasons: Vec<String>,
    pub photo_url: Option<String>,
    pub emoji: &'static str,
}

impl MatchView {
    /// `photo_url` is the stored item's photo, looked up by the caller.
    pub fn new(result: MatchResult, photo_url: Option<&str>) -> Self {
        Self {
            photo_url: photo_for(photo_url, &result.item.category),
            emoji: category_emoji(&result.item.category),
            item: result.item,
            score: result.score,
            confidence: result.confidence,
            reasons: result.reasons,
        }
    }
}
