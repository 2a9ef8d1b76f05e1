//! redb-backed record store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | user id | JSON `User` | Credential store records |
//! | `orders` | order id | JSON `Order` | Order ledger records |
//! | `meta` | `"last_order_number"` | `u64` | Sequence number counter |
//!
//! # Durability and atomicity
//!
//! redb commits with `Durability::Immediate`, so every mutation is
//! persisted before the operation returns (write-through). redb allows a
//! single write transaction at a time, which makes each
//! read-check-write a critical section: two concurrent registrations of
//! the same login, or two fulfillments of the same order, are
//! serialized by the storage layer itself.

use std::path::Path;
use std::sync::Arc;

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use thiserror::Error;

use shared::AppError;
use shared::models::ORDER_NUMBER_BASE;

/// User records: key = user id, value = JSON-serialized `User`
pub(crate) const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Order records: key = order id, value = JSON-serialized `Order`
pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Counters: key = counter name, value = u64
pub(crate) const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

pub(crate) const LAST_ORDER_NUMBER_KEY: &str = "last_order_number";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::storage(e.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Record store backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;

            // Seed the sequence counter so the first order gets 1001
            let mut meta = write_txn.open_table(META_TABLE)?;
            if meta.get(LAST_ORDER_NUMBER_KEY)?.is_none() {
                meta.insert(LAST_ORDER_NUMBER_KEY, ORDER_NUMBER_BASE)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// redb serializes writers, so the returned transaction is an
    /// exclusive critical section over the whole store.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Read every value of a table, deserialized
    pub(crate) fn read_all<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }

    /// Read one value by key, deserialized
    pub(crate) fn read_one<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        let value = match table.get(key)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::User;

    #[test]
    fn counter_is_seeded_on_open() {
        let storage = Storage::open_in_memory().unwrap();
        let read_txn = storage.begin_read().unwrap();
        let meta = read_txn.open_table(META_TABLE).unwrap();
        let last = meta.get(LAST_ORDER_NUMBER_KEY).unwrap().unwrap().value();
        assert_eq!(last, ORDER_NUMBER_BASE);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.redb");

        let user = User::new("Alice", "Smith", "alice", "alice@example.com", "hash");
        {
            let storage = Storage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            {
                let mut users = txn.open_table(USERS_TABLE).unwrap();
                let bytes = serde_json::to_vec(&user).unwrap();
                users.insert(user.id.as_str(), bytes.as_slice()).unwrap();
            }
            txn.commit().unwrap();
        }

        let storage = Storage::open(&path).unwrap();
        let loaded: Option<User> = storage.read_one(USERS_TABLE, &user.id).unwrap();
        assert_eq!(loaded.unwrap().login, "alice");
    }
}
