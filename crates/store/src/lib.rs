//! # Lost & Found Store
//!
//! A backend-agnostic record store for the campus lost & found: found items
//! and their variants, ownership claims, keyword notifications, lost-item
//! reports and a per-item audit trail.
//!
//! ## Core Features
//!
//! - **Pluggable Backends**: storage goes through the [`StoreBackend`] trait.
//!   Out of the box there is an in-memory `BTreeMap` backend (tests, demos) and
//!   a Redb backend for a single-file persistent database (feature
//!   `backend-redb`, on by default).
//! - **Typed API**: [`ItemStore`] hides keys and JSON encoding behind
//!   operations such as [`ItemStore::submit_item`] and
//!   [`ItemStore::approve_claim`].
//! - **Matcher snapshot**: [`ItemStore::approved_snapshot`] hands the Smart
//!   Match engine every published item in one consistent read.
//!
//! ## Example Usage
//!
//! ```
//! use store::{ItemStore, ItemStatus, NewItem};
//!
//! let store = ItemStore::in_memory();
//! let item = store
//!     .submit_item(NewItem {
//!         name: "Blue Umbrella".into(),
//!         category: "Other".into(),
//!         description: "Compact blue umbrella".into(),
//!         location: "Library entrance".into(),
//!         date_found: "2026-02-10".into(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert_eq!(item.status, ItemStatus::Pending);
//!
//! store.approve_item(item.id).unwrap();
//! assert_eq!(store.approved_snapshot().unwrap().len(), 1);
//! ```

pub mod backend;
mod error;
mod records;
mod seed;
mod store;

pub use backend::{BackendConfig, BatchOp, InMemoryBackend, StoreBackend};
#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;
pub use error::StoreError;
pub use records::{
    ClaimRecord, ClaimStatus, ClaimWithItem, ItemEventKind, ItemEventRecord, ItemFilter,
    ItemRecord, ItemStatus, ItemVariantRecord, LostReportRecord, NewClaim, NewItem,
    NewLostReport, NotificationRecord, StoreCounts,
};
pub use seed::SAMPLE_ITEM_COUNT;
pub use store::{timestamp, ItemStore};
