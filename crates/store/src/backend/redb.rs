//! Redb (Rust embedded database) backend for the item store.
//!
//! Redb is a pure Rust embedded key-value store with ACID transactions, so a
//! single campus deployment needs nothing beyond one database file.
//!
//! # Configuration Example
//! ```yaml
//! store:
//!   backend: "redb"
//!   path: "/data/lostfound.redb"
//! ```

use crate::backend::BatchOp;
use crate::{StoreBackend, StoreError};
use ::redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Single table holding every record, namespaced by key prefix.
const RECORDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("lostfound_records");

/// Redb backend implementation for persistent key-value storage.
///
/// `put` and `delete` each commit their own transaction; `write_batch` commits
/// all of its operations in one. Redb handles its own internal locking and
/// MVCC, so reads never block writers.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a Redb database at the given path.
    ///
    /// # Example
    /// ```no_run
    /// use store::RedbBackend;
    ///
    /// let backend = RedbBackend::open("/tmp/lostfound.redb").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::backend(e.to_string()))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            // Opening the table inside a write transaction creates it.
            let _table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StoreBackend for RedbBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(RECORDS_TABLE)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        match table
            .get(key)
            .map_err(|e| StoreError::backend(e.to_string()))?
        {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let existed = {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            let removed = table
                .remove(key)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            removed.is_some()
        };
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(existed)
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            for op in &ops {
                match op {
                    BatchOp::Put(key, value) => {
                        table
                            .insert(key.as_str(), value.as_slice())
                            .map_err(|e| StoreError::backend(e.to_string()))?;
                    }
                    BatchOp::Delete(key) => {
                        table
                            .remove(key.as_str())
                            .map_err(|e| StoreError::backend(e.to_string()))?;
                    }
                }
            }
        }
        // Dropping an uncommitted transaction aborts it, so an early return
        // above leaves the database untouched.
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(())
    }

    fn scan_prefix(
        &self,
        prefix: &str,
        visitor: &mut dyn FnMut(&str, &[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        // One read transaction for the whole scan: the visitor sees a snapshot.
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(RECORDS_TABLE)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        for entry in table
            .range(prefix..)
            .map_err(|e| StoreError::backend(e.to_string()))?
        {
            let (key, value) = entry.map_err(|e| StoreError::backend(e.to_string()))?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            visitor(key, value.value())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_redb_backend_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(temp_file.path()).unwrap();

        backend.put("items/1", b"value1").unwrap();
        assert_eq!(backend.get("items/1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(backend.get("items/2").unwrap(), None);
    }

    #[test]
    fn test_redb_backend_delete() {
        let temp_file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(temp_file.path()).unwrap();

        backend.put("items/1", b"value1").unwrap();
        assert!(backend.delete("items/1").unwrap());
        assert!(!backend.delete("items/1").unwrap());
        assert_eq!(backend.get("items/1").unwrap(), None);
    }

    #[test]
    fn test_redb_backend_scan_prefix() {
        let temp_file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(temp_file.path()).unwrap();

        backend.put("claims/1", b"c").unwrap();
        backend.put("items/2", b"b").unwrap();
        backend.put("items/1", b"a").unwrap();

        let mut collected = Vec::new();
        backend
            .scan_prefix("items/", &mut |key, value| {
                collected.push((key.to_string(), value.to_vec()));
                Ok(())
            })
            .unwrap();

        assert_eq!(
            collected,
            vec![
                ("items/1".to_string(), b"a".to_vec()),
                ("items/2".to_string(), b"b".to_vec()),
            ]
        );
    }

    #[test]
    fn test_redb_backend_write_batch() {
        let temp_file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(temp_file.path()).unwrap();
        backend.put("items/1", b"old").unwrap();

        backend
            .write_batch(vec![
                BatchOp::Put("items/2".to_string(), b"two".to_vec()),
                BatchOp::Delete("items/1".to_string()),
            ])
            .unwrap();

        assert_eq!(backend.get("items/1").unwrap(), None);
        assert_eq!(backend.get("items/2").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn test_redb_backend_persists_across_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let backend = RedbBackend::open(temp_file.path()).unwrap();
            backend.put("items/1", b"kept").unwrap();
        }
        let backend = RedbBackend::open(temp_file.path()).unwrap();
        assert_eq!(backend.get("items/1").unwrap(), Some(b"kept".to_vec()));
    }
}
