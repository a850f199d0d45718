use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ExtractionRecord, NewExtraction};

/// CRUD and query operations for extraction history.
#[async_trait]
pub trait ExtractionStore: Send + Sync {
    /// Persist a new extraction. The store assigns `id` and `created_at`.
    async fn create_extraction(&self, new: &NewExtraction) -> Result<ExtractionRecord>;
    async fn get_extraction(&self, id: i64) -> Result<Option<ExtractionRecord>>;
    /// Most-recent-first page of records plus the total row count.
    async fn list_extractions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ExtractionRecord>, u64)>;
    /// Hard delete. Returns `false` when the id does not exist.
    async fn delete_extraction(&self, id: i64) -> Result<bool>;
}

/// A complete database backend plus lifecycle operations.
#[async_trait]
pub trait DatabaseBackend: ExtractionStore {
    /// Cheap connectivity check used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}
