//! Record types persisted by the store.

use matcher::FoundItem;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Lifecycle state of a found item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Reported by a visitor, waiting for admin review. Not public.
    Pending,
    /// Published and matchable.
    Approved,
    /// Returned to its owner.
    Claimed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Claimed => "claimed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

/// A found item as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub date_found: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub item_detail: Option<String>,
    pub status: ItemStatus,
    /// Submission timestamp, `YYYY-MM-DD HH:MM`.
    pub submitted: String,
}

impl ItemRecord {
    /// Project onto the fields the Smart Match engine scores.
    pub fn as_found_item(&self) -> FoundItem {
        FoundItem {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date_found: self.date_found.clone(),
            item_detail: self.item_detail.clone(),
        }
    }

    pub(crate) fn matches_search(&self, needle_lower: &str) -> bool {
        [&self.name, &self.description, &self.location]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

fn default_quantity() -> u32 {
    1
}

/// A visitor-reported found item awaiting review.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub date_found: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub item_detail: Option<String>,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_fields(&[
            ("name", &self.name),
            ("category", &self.category),
            ("description", &self.description),
            ("location", &self.location),
            ("date_found", &self.date_found),
        ])?;
        if self.quantity == Some(0) {
            return Err(StoreError::Validation("quantity must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRecord {
    pub id: u64,
    pub item_id: u64,
    pub claimant: String,
    pub email: String,
    pub student_id: String,
    #[serde(default)]
    pub message: String,
    pub submitted: String,
    pub status: ClaimStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewClaim {
    pub claimant: String,
    pub email: String,
    pub student_id: String,
    #[serde(default)]
    pub message: String,
}

impl NewClaim {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_fields(&[
            ("claimant", &self.claimant),
            ("email", &self.email),
            ("student_id", &self.student_id),
        ])
    }
}

/// A claim joined with the name of the item it targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimWithItem {
    #[serde(flatten)]
    pub claim: ClaimRecord,
    pub item_name: String,
}

/// Keyword subscription for items posted later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: u64,
    pub email: String,
    pub keyword: String,
    pub created: String,
}

/// A lost-item report, kept so admins can follow up by contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LostReportRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub date_from: String,
    pub date_to: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub submitted: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewLostReport {
    pub name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub date_from: String,
    pub date_to: String,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemEventKind {
    Submitted,
    Approved,
    Claimed,
    Rejected,
    ClaimSubmitted,
    ClaimApproved,
    ClaimRejected,
}

/// Append-only audit entry for an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemEventRecord {
    pub id: u64,
    pub item_id: u64,
    pub kind: ItemEventKind,
    #[serde(default)]
    pub detail: Option<String>,
    pub at: String,
}

/// One concrete variant of a multi-unit item (e.g. "left bud only").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemVariantRecord {
    pub id: u64,
    pub item_id: u64,
    pub variant: String,
    pub quantity: u32,
}

/// Filter for [`ItemStore::list_items`](crate::ItemStore::list_items).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    /// Case-insensitive substring over name, description and location.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl ItemFilter {
    pub fn approved() -> Self {
        Self {
            status: Some(ItemStatus::Approved),
            ..Self::default()
        }
    }

    pub fn with_status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Aggregate counters for overview pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreCounts {
    pub pending: usize,
    pub approved: usize,
    pub claimed: usize,
    pub pending_claims: usize,
    pub notifications: usize,
    pub lost_reports: usize,
}

pub(crate) fn require_fields(fields: &[(&str, &String)]) -> Result<(), StoreError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}
