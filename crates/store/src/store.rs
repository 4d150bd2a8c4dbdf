use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use matcher::FoundItem;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{BackendConfig, BatchOp, StoreBackend};
use crate::records::{
    require_fields, ClaimRecord, ClaimStatus, ClaimWithItem, ItemEventKind, ItemEventRecord,
    ItemFilter, ItemRecord, ItemStatus, ItemVariantRecord, LostReportRecord, NewClaim, NewItem,
    NewLostReport, NotificationRecord, StoreCounts,
};
use crate::StoreError;


/// Logical tables, each a key prefix in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Items,
    Claims,
    Notifications,
    LostReports,
    ItemEvents,
    ItemVariants,
}

impl Table {
    const ALL: [Table; 6] = [
        Table::Items,
        Table::Claims,
        Table::Notifications,
        Table::LostReports,
        Table::ItemEvents,
        Table::ItemVariants,
    ];

    fn prefix(self) -> &'static str {
        match self {
            Table::Items => "items/",
            Table::Claims => "claims/",
            Table::Notifications => "notifications/",
            Table::LostReports => "lost_reports/",
            Table::ItemEvents => "item_events/",
            Table::ItemVariants => "item_variants/",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    /// Zero-padded so lexicographic key order equals id order.
    fn key(self, id: u64) -> String {
        format!("{}{id:020}", self.prefix())
    }

    /// Highest id ever allocated in this table. Outlives deleted records.
    fn high_water_key(self) -> String {
        format!("meta/next_id/{}", self.prefix().trim_end_matches('/'))
    }
}

/// Writes staged by one store operation and committed as a single batch.
struct WriteSet {
    ops: Vec<BatchOp>,
    high_water: [Option<u64>; 6],
}

impl WriteSet {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            high_water: [None; 6],
        }
    }

    fn put<T: Serialize>(&mut self, table: Table, id: u64, record: &T) -> Result<(), StoreError> {
        self.ops.push(BatchOp::Put(table.key(id), serde_json::to_vec(record)?));
        Ok(())
    }

    fn delete(&mut self, table: Table, id: u64) {
        self.ops.push(BatchOp::Delete(table.key(id)));
    }

    fn into_ops(mut self) -> Vec<BatchOp> {
        for table in Table::ALL {
            if let Some(id) = self.high_water[table.slot()] {
                self.ops
                    .push(BatchOp::Put(table.high_water_key(), id.to_string().into_bytes()));
            }
        }
        self.ops
    }
}

/// Current local time in the `YYYY-MM-DD HH:MM` form used on every record.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Typed record store over a pluggable [`StoreBackend`].
///
/// Records are JSON-encoded under `"{table}/{id:020}"` keys. Ids are assigned
/// from per-table counters whose high-water mark is persisted with every
/// insert, so ids of deleted records are never handed out again. Writes are
/// serialized through an internal lock and each operation commits all of its
/// records in one backend batch.
pub struct ItemStore {
    backend: Box<dyn StoreBackend>,
    next_ids: [AtomicU64; 6],
    write_lock: Mutex<()>,
}

impl ItemStore {
    /// Open a store using the configured backend.
    pub fn open(config: &BackendConfig) -> Result<Self, StoreError> {
        Self::with_backend(config.build()?)
    }

    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(crate::backend::InMemoryBackend::new()),
            next_ids: Default::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Wrap an existing backend, recovering id counters from its contents.
    ///
    /// A counter resumes from the larger of the stored high-water mark and the
    /// largest id still present.
    pub fn with_backend(backend: Box<dyn StoreBackend>) -> Result<Self, StoreError> {
        let next_ids: [AtomicU64; 6] = Default::default();
        for table in Table::ALL {
            let mut max_id = match backend.get(&table.high_water_key())? {
                Some(bytes) => String::from_utf8_lossy(&bytes)
                    .parse::<u64>()
                    .map_err(|e| StoreError::backend(format!("malformed id counter: {e}")))?,
                None => 0,
            };
            backend.scan_prefix(table.prefix(), &mut |key, _| {
                let id = key[table.prefix().len()..]
                    .parse::<u64>()
                    .map_err(|e| StoreError::backend(format!("malformed key {key}: {e}")))?;
                max_id = max_id.max(id);
                Ok(())
            })?;
            next_ids[table.slot()].store(max_id, Ordering::SeqCst);
        }
        tracing::debug!(items = next_ids[Table::Items.slot()].load(Ordering::SeqCst), "store opened");
        Ok(Self {
            backend,
            next_ids,
            write_lock: Mutex::new(()),
        })
    }

    /// Callers hold the write lock, so high-water marks commit in order.
    fn allocate_id(&self, table: Table, writes: &mut WriteSet) -> u64 {
        let id = self.next_ids[table.slot()].fetch_add(1, Ordering::SeqCst) + 1;
        writes.high_water[table.slot()] = Some(id);
        id
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        self.backend.write_batch(writes.into_ops())
    }

    fn get_record<T: DeserializeOwned>(&self, table: Table, id: u64) -> Result<Option<T>, StoreError> {
        match self.backend.get(&table.key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All records of a table in ascending id order.
    fn scan_records<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, StoreError> {
        let mut records: Vec<T> = Vec::new();
        self.backend.scan_prefix(table.prefix(), &mut |_, bytes| {
            records.push(serde_json::from_slice::<T>(bytes)?);
            Ok(())
        })?;
        Ok(records)
    }

    fn record_event(
        &self,
        writes: &mut WriteSet,
        item_id: u64,
        kind: ItemEventKind,
        detail: Option<String>,
    ) -> Result<(), StoreError> {
        let id = self.allocate_id(Table::ItemEvents, writes);
        let event = ItemEventRecord {
            id,
            item_id,
            kind,
            detail,
            at: timestamp(),
        };
        writes.put(Table::ItemEvents, id, &event)
    }

    // ---------- items ----------

    /// Record a visitor-reported found item. It stays pending until approved.
    pub fn submit_item(&self, new_item: NewItem) -> Result<ItemRecord, StoreError> {
        self.insert_item_with_status(new_item, ItemStatus::Pending)
    }

    /// Insert an item directly in the given state (seeding, admin entry).
    pub fn insert_item_with_status(
        &self,
        new_item: NewItem,
        status: ItemStatus,
    ) -> Result<ItemRecord, StoreError> {
        new_item.validate()?;
        let _guard = self.lock_writes();
        let mut writes = WriteSet::new();
        let id = self.allocate_id(Table::Items, &mut writes);
        let record = ItemRecord {
            id,
            name: new_item.name.trim().to_string(),
            category: new_item.category.trim().to_string(),
            description: new_item.description.trim().to_string(),
            location: new_item.location.trim().to_string(),
            date_found: new_item.date_found.trim().to_string(),
            photo_url: new_item.photo_url.filter(|url| !url.trim().is_empty()),
            quantity: new_item.quantity.unwrap_or(1),
            item_detail: new_item.item_detail.filter(|d| !d.trim().is_empty()),
            status,
            submitted: timestamp(),
        };
        writes.put(Table::Items, id, &record)?;
        self.record_event(
            &mut writes,
            id,
            ItemEventKind::Submitted,
            Some(status.as_str().to_string()),
        )?;
        self.commit(writes)?;
        tracing::info!(item_id = id, status = status.as_str(), "item recorded");
        Ok(record)
    }

    pub fn get_item(&self, id: u64) -> Result<Option<ItemRecord>, StoreError> {
        self.get_record(Table::Items, id)
    }

    /// Fetch an item only if it is publicly visible.
    pub fn get_approved_item(&self, id: u64) -> Result<ItemRecord, StoreError> {
        match self.get_item(id)? {
            Some(item) if item.status == ItemStatus::Approved => Ok(item),
            _ => Err(StoreError::item_not_found(id)),
        }
    }

    /// Items matching `filter`, newest first.
    pub fn list_items(&self, filter: &ItemFilter) -> Result<Vec<ItemRecord>, StoreError> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut items: Vec<ItemRecord> = self
            .scan_records::<ItemRecord>(Table::Items)?
            .into_iter()
            .filter(|item| filter.status.map_or(true, |s| item.status == s))
            .filter(|item| category.map_or(true, |c| item.category == c))
            .filter(|item| needle.as_deref().map_or(true, |n| item.matches_search(n)))
            .collect();
        items.reverse();
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    /// Approved items, newest first, projected for the matcher.
    ///
    /// Taken from a single backend scan, so the list is a consistent snapshot.
    pub fn approved_snapshot(&self) -> Result<Vec<FoundItem>, StoreError> {
        Ok(self
            .list_items(&ItemFilter::approved())?
            .iter()
            .map(ItemRecord::as_found_item)
            .collect())
    }

    /// Distinct categories among approved items, sorted.
    pub fn approved_categories(&self) -> Result<Vec<String>, StoreError> {
        let mut categories: Vec<String> = self
            .list_items(&ItemFilter::approved())?
            .into_iter()
            .map(|item| item.category)
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    pub fn counts(&self) -> Result<StoreCounts, StoreError> {
        let mut counts = StoreCounts::default();
        for item in self.scan_records::<ItemRecord>(Table::Items)? {
            match item.status {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::Approved => counts.approved += 1,
                ItemStatus::Claimed => counts.claimed += 1,
            }
        }
        counts.pending_claims = self
            .scan_records::<ClaimRecord>(Table::Claims)?
            .iter()
            .filter(|c| c.status == ClaimStatus::Pending)
            .count();
        counts.notifications = self.scan_records::<NotificationRecord>(Table::Notifications)?.len();
        counts.lost_reports = self.scan_records::<LostReportRecord>(Table::LostReports)?.len();
        Ok(counts)
    }

    fn require_item(&self, id: u64) -> Result<ItemRecord, StoreError> {
        self.get_item(id)?
            .ok_or_else(|| StoreError::item_not_found(id))
    }

    /// Publish a pending item.
    pub fn approve_item(&self, id: u64) -> Result<ItemRecord, StoreError> {
        let _guard = self.lock_writes();
        let mut item = self.require_item(id)?;
        match item.status {
            ItemStatus::Approved => return Ok(item),
            ItemStatus::Claimed => {
                return Err(StoreError::InvalidState(format!(
                    "item {id} is already claimed"
                )))
            }
            ItemStatus::Pending => {}
        }
        item.status = ItemStatus::Approved;
        let mut writes = WriteSet::new();
        writes.put(Table::Items, id, &item)?;
        self.record_event(&mut writes, id, ItemEventKind::Approved, None)?;
        self.commit(writes)?;
        tracing::info!(item_id = id, "item approved");
        Ok(item)
    }

    /// Mark an item as returned to its owner.
    pub fn mark_claimed(&self, id: u64) -> Result<ItemRecord, StoreError> {
        let _guard = self.lock_writes();
        let mut writes = WriteSet::new();
        let item = self.stage_claimed(&mut writes, id, None)?;
        self.commit(writes)?;
        Ok(item)
    }

    /// Stage the claimed transition; a no-op for items already claimed.
    fn stage_claimed(
        &self,
        writes: &mut WriteSet,
        id: u64,
        detail: Option<String>,
    ) -> Result<ItemRecord, StoreError> {
        let mut item = self.require_item(id)?;
        if item.status == ItemStatus::Claimed {
            return Ok(item);
        }
        item.status = ItemStatus::Claimed;
        writes.put(Table::Items, id, &item)?;
        self.record_event(writes, id, ItemEventKind::Claimed, detail)?;
        tracing::info!(item_id = id, "item marked claimed");
        Ok(item)
    }

    /// Remove an item and its variants; pending claims against it are rejected.
    pub fn reject_item(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        self.require_item(id)?;

        let mut writes = WriteSet::new();
        for variant in self.variants_for_item(id)? {
            writes.delete(Table::ItemVariants, variant.id);
        }
        for mut claim in self.scan_records::<ClaimRecord>(Table::Claims)? {
            if claim.item_id == id && claim.status == ClaimStatus::Pending {
                claim.status = ClaimStatus::Rejected;
                writes.put(Table::Claims, claim.id, &claim)?;
            }
        }
        writes.delete(Table::Items, id);
        self.record_event(&mut writes, id, ItemEventKind::Rejected, None)?;
        self.commit(writes)?;
        tracing::info!(item_id = id, "item rejected and removed");
        Ok(())
    }

    // ---------- claims ----------

    /// File a claim against an approved item.
    pub fn submit_claim(&self, item_id: u64, new_claim: NewClaim) -> Result<ClaimRecord, StoreError> {
        new_claim.validate()?;
        let _guard = self.lock_writes();
        self.get_approved_item(item_id)?;

        let mut writes = WriteSet::new();
        let id = self.allocate_id(Table::Claims, &mut writes);
        let claim = ClaimRecord {
            id,
            item_id,
            claimant: new_claim.claimant.trim().to_string(),
            email: new_claim.email.trim().to_string(),
            student_id: new_claim.student_id.trim().to_string(),
            message: new_claim.message.trim().to_string(),
            submitted: timestamp(),
            status: ClaimStatus::Pending,
        };
        writes.put(Table::Claims, id, &claim)?;
        self.record_event(
            &mut writes,
            item_id,
            ItemEventKind::ClaimSubmitted,
            Some(format!("claim {id}")),
        )?;
        self.commit(writes)?;
        tracing::info!(claim_id = id, item_id, "claim submitted");
        Ok(claim)
    }

    pub fn get_claim(&self, id: u64) -> Result<Option<ClaimRecord>, StoreError> {
        self.get_record(Table::Claims, id)
    }

    /// Claims (optionally filtered by status) joined with their item's name,
    /// newest first. Claims whose item has been removed are skipped.
    pub fn list_claims(&self, status: Option<ClaimStatus>) -> Result<Vec<ClaimWithItem>, StoreError> {
        let mut joined = Vec::new();
        for claim in self.scan_records::<ClaimRecord>(Table::Claims)?.into_iter().rev() {
            if status.is_some_and(|s| claim.status != s) {
                continue;
            }
            if let Some(item) = self.get_item(claim.item_id)? {
                joined.push(ClaimWithItem {
                    claim,
                    item_name: item.name,
                });
            }
        }
        Ok(joined)
    }

    fn require_pending_claim(&self, id: u64) -> Result<ClaimRecord, StoreError> {
        let claim = self
            .get_claim(id)?
            .ok_or_else(|| StoreError::claim_not_found(id))?;
        if claim.status != ClaimStatus::Pending {
            return Err(StoreError::InvalidState(format!(
                "claim {id} was already resolved"
            )));
        }
        Ok(claim)
    }

    /// Approve a claim: the claim is approved and its item marked claimed.
    pub fn approve_claim(&self, id: u64) -> Result<ClaimRecord, StoreError> {
        let _guard = self.lock_writes();
        let mut claim = self.require_pending_claim(id)?;
        let mut writes = WriteSet::new();
        self.stage_claimed(&mut writes, claim.item_id, Some(format!("claim {id}")))?;
        claim.status = ClaimStatus::Approved;
        writes.put(Table::Claims, id, &claim)?;
        self.record_event(
            &mut writes,
            claim.item_id,
            ItemEventKind::ClaimApproved,
            Some(format!("claim {id}")),
        )?;
        self.commit(writes)?;
        Ok(claim)
    }

    pub fn reject_claim(&self, id: u64) -> Result<ClaimRecord, StoreError> {
        let _guard = self.lock_writes();
        let mut claim = self.require_pending_claim(id)?;
        claim.status = ClaimStatus::Rejected;
        let mut writes = WriteSet::new();
        writes.put(Table::Claims, id, &claim)?;
        self.record_event(
            &mut writes,
            claim.item_id,
            ItemEventKind::ClaimRejected,
            Some(format!("claim {id}")),
        )?;
        self.commit(writes)?;
        Ok(claim)
    }

    // ---------- notifications ----------

    pub fn add_notification(&self, email: &str, keyword: &str) -> Result<NotificationRecord, StoreError> {
        let email = email.trim().to_string();
        let keyword = keyword.trim().to_string();
        require_fields(&[("email", &email), ("keyword", &keyword)])?;

        let _guard = self.lock_writes();
        let mut writes = WriteSet::new();
        let id = self.allocate_id(Table::Notifications, &mut writes);
        let record = NotificationRecord {
            id,
            email,
            keyword,
            created: timestamp(),
        };
        writes.put(Table::Notifications, id, &record)?;
        self.commit(writes)?;
        Ok(record)
    }

    /// Newest first.
    pub fn list_notifications(&self) -> Result<Vec<NotificationRecord>, StoreError> {
        let mut records = self.scan_records::<NotificationRecord>(Table::Notifications)?;
        records.reverse();
        Ok(records)
    }

    // ---------- lost reports ----------

    pub fn add_lost_report(&self, report: NewLostReport) -> Result<LostReportRecord, StoreError> {
        let _guard = self.lock_writes();
        let mut writes = WriteSet::new();
        let id = self.allocate_id(Table::LostReports, &mut writes);
        let record = LostReportRecord {
            id,
            name: report.name,
            category: report.category,
            description: report.description,
            location: report.location,
            date_from: report.date_from,
            date_to: report.date_to,
            contact: report.contact.filter(|c| !c.trim().is_empty()),
            submitted: timestamp(),
        };
        writes.put(Table::LostReports, id, &record)?;
        self.commit(writes)?;
        tracing::info!(report_id = id, category = %record.category, "lost report recorded");
        Ok(record)
    }

    /// Newest first.
    pub fn list_lost_reports(&self) -> Result<Vec<LostReportRecord>, StoreError> {
        let mut records = self.scan_records::<LostReportRecord>(Table::LostReports)?;
        records.reverse();
        Ok(records)
    }

    // ---------- events & variants ----------

    /// Audit trail for one item, oldest first.
    pub fn events_for_item(&self, item_id: u64) -> Result<Vec<ItemEventRecord>, StoreError> {
        Ok(self
            .scan_records::<ItemEventRecord>(Table::ItemEvents)?
            .into_iter()
            .filter(|e| e.item_id == item_id)
            .collect())
    }

    pub fn add_variant(
        &self,
        item_id: u64,
        variant: &str,
        quantity: u32,
    ) -> Result<ItemVariantRecord, StoreError> {
        let variant = variant.trim().to_string();
        require_fields(&[("variant", &variant)])?;
        let _guard = self.lock_writes();
        self.require_item(item_id)?;

        let mut writes = WriteSet::new();
        let id = self.allocate_id(Table::ItemVariants, &mut writes);
        let record = ItemVariantRecord {
            id,
            item_id,
            variant,
            quantity,
        };
        writes.put(Table::ItemVariants, id, &record)?;
        self.commit(writes)?;
        Ok(record)
    }

    /// Variants of an item, in insertion order.
    pub fn variants_for_item(&self, item_id: u64) -> Result<Vec<ItemVariantRecord>, StoreError> {
        Ok(self
            .scan_records::<ItemVariantRecord>(Table::ItemVariants)?
            .into_iter()
            .filter(|v| v.item_id == item_id)
            .collect())
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.backend.flush()
    }
}
