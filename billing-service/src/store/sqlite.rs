use std::path::Path;

use billing_client::{
    db,
    domain::{ElectricityRecord, NewElectricityRecord},
};
use sqlx::SqlitePool;

use super::{RecordStore, StoreError};
use crate::config::StorageConfig;

#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the configured database file, creating it if needed.
    pub async fn open(cfg: &StorageConfig) -> Result<Self, StoreError> {
        Self::open_path(&cfg.database_path, cfg.max_connections).await
    }

    pub async fn open_path(path: &Path, max_connections: u32) -> Result<Self, StoreError> {
        let pool = db::connect(path, max_connections).await?;
        Ok(Self::new(pool))
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = db::connect_in_memory().await?;
        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl RecordStore for SqliteRecordStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        db::ensure_schema(&self.pool).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ElectricityRecord>, StoreError> {
        Ok(db::list_records(&self.pool).await?)
    }

    async fn create(&self, record: NewElectricityRecord) -> Result<i64, StoreError> {
        Ok(db::insert_record(&self.pool, &record).await?)
    }

    async fn delete_last(&self) -> Result<u64, StoreError> {
        Ok(db::delete_last_record(&self.pool).await?)
    }

    async fn search_by_month(&self, month: &str) -> Result<Vec<ElectricityRecord>, StoreError> {
        Ok(db::records_for_month(&self.pool, month).await?)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
