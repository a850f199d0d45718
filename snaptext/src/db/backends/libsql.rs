use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::ExtractionRepository;
use crate::db::traits::{DatabaseBackend, ExtractionStore};
use crate::error::Result;
use crate::models::{ExtractionRecord, NewExtraction};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExtractionStore for LibSqlBackend {
    async fn create_extraction(&self, new: &NewExtraction) -> Result<ExtractionRecord> {
        let conn = self.db.connect()?;
        ExtractionRepository::create(&conn, new).await
    }

    async fn get_extraction(&self, id: i64) -> Result<Option<ExtractionRecord>> {
        let conn = self.db.connect()?;
        ExtractionRepository::get_by_id(&conn, id).await
    }

    async fn list_extractions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ExtractionRecord>, u64)> {
        let conn = self.db.connect()?;
        ExtractionRepository::list(&conn, limit, offset).await
    }

    async fn delete_extraction(&self, id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        ExtractionRepository::delete(&conn, id).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn ping(&self) -> Result<()> {
        let conn = self.db.connect()?;
        conn.query("SELECT 1", ()).await?;
        Ok(())
    }
}
