//! Storage seam between the HTTP layer and the database.

use billing_client::domain::{ElectricityRecord, NewElectricityRecord};

pub mod sqlite;

pub use sqlite::SqliteRecordStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistent home of electricity records.
///
/// Handlers receive an owned `Arc<dyn RecordStore>`; nothing reaches the
/// database through a global.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Idempotent schema setup, run once during startup.
    async fn migrate(&self) -> Result<(), StoreError>;

    /// Every record, newest first.
    async fn list_all(&self) -> Result<Vec<ElectricityRecord>, StoreError>;

    /// Persist `record` and return its new id.
    async fn create(&self, record: NewElectricityRecord) -> Result<i64, StoreError>;

    /// Remove the record with the largest id; returns how many rows went away.
    async fn delete_last(&self) -> Result<u64, StoreError>;

    async fn search_by_month(&self, month: &str) -> Result<Vec<ElectricityRecord>, StoreError>;

    /// Release the underlying connection(s). Later calls fail with a storage error.
    async fn close(&self);
}
