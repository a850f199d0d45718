use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{ExtractionRecord, NewExtraction};

pub struct ExtractionRepository;

impl ExtractionRepository {
    /// Insert a new extraction. `id` and `created_at` are assigned here,
    /// never by the caller.
    pub async fn create(conn: &Connection, new: &NewExtraction) -> Result<ExtractionRecord> {
        let created_at = Utc::now();

        conn.execute(
            r#"
            INSERT INTO extraction_history (
                filename, extracted_text, language, created_at,
                file_size_bytes, processing_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                new.filename.clone(),
                new.extracted_text.clone(),
                new.language.clone(),
                created_at.to_rfc3339(),
                new.file_size_bytes,
                new.processing_time.clone(),
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();

        Ok(ExtractionRecord {
            id,
            filename: new.filename.clone(),
            extracted_text: new.extracted_text.clone(),
            language: new.language.clone(),
            created_at,
            file_size_bytes: new.file_size_bytes,
            processing_time: new.processing_time.clone(),
        })
    }

    pub async fn get_by_id(conn: &Connection, id: i64) -> Result<Option<ExtractionRecord>> {
        let mut rows = conn
            .query(
                "SELECT * FROM extraction_history WHERE id = ?1",
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_record(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Page of records ordered most-recent-first, plus the total count.
    /// `id DESC` breaks ties between rows created at the same instant.
    pub async fn list(
        conn: &Connection,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ExtractionRecord>, u64)> {
        let mut count_rows = conn
            .query("SELECT COUNT(*) FROM extraction_history", ())
            .await?;
        let total: i64 = if let Some(row) = count_rows.next().await? {
            row.get(0)?
        } else {
            0
        };

        let mut rows = conn
            .query(
                r#"
                SELECT * FROM extraction_history
                ORDER BY created_at DESC, id DESC
                LIMIT ?1 OFFSET ?2
                "#,
                params![limit as i64, offset as i64],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::row_to_record(&row)?);
        }

        Ok((records, total as u64))
    }

    pub async fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn
            .execute("DELETE FROM extraction_history WHERE id = ?1", params![id])
            .await?;

        Ok(rows_affected > 0)
    }

    fn row_to_record(row: &libsql::Row) -> Result<ExtractionRecord> {
        Ok(ExtractionRecord {
            id: row.get(0)?,
            filename: row.get(1)?,
            extracted_text: row.get(2)?,
            language: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(4)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            file_size_bytes: row.get(5)?,
            processing_time: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::Database;

    async fn test_conn() -> Connection {
        let db = Database::new(&DatabaseConfig {
            url: ":memory:".to_string(),
        })
        .await
        .expect("create database");
        db.connect().expect("connect")
    }

    fn sample(filename: &str, text: &str) -> NewExtraction {
        NewExtraction {
            filename: filename.to_string(),
            extracted_text: text.to_string(),
            language: "eng".to_string(),
            file_size_bytes: 1234,
            processing_time: "0.42s".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_monotonic_ids() {
        let conn = test_conn().await;

        let first = ExtractionRepository::create(&conn, &sample("a.png", "alpha"))
            .await
            .expect("create");
        let second = ExtractionRepository::create(&conn, &sample("b.png", "beta"))
            .await
            .expect("create");

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn get_by_id_round_trips() {
        let conn = test_conn().await;

        let created = ExtractionRepository::create(&conn, &sample("scan.png", "hello world"))
            .await
            .expect("create");

        let fetched = ExtractionRepository::get_by_id(&conn, created.id)
            .await
            .expect("get")
            .expect("record exists");

        assert_eq!(fetched.filename, "scan.png");
        assert_eq!(fetched.extracted_text, "hello world");
        assert_eq!(fetched.language, "eng");
        assert_eq!(fetched.file_size_bytes, 1234);
        assert_eq!(fetched.processing_time, "0.42s");
    }

    #[tokio::test]
    async fn get_by_id_missing_returns_none() {
        let conn = test_conn().await;

        let result = ExtractionRepository::get_by_id(&conn, 9999)
            .await
            .expect("get");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn list_orders_most_recent_first() {
        let conn = test_conn().await;

        for i in 0..5 {
            ExtractionRepository::create(&conn, &sample(&format!("{i}.png"), "text"))
                .await
                .expect("create");
        }

        let (records, total) = ExtractionRepository::list(&conn, 50, 0).await.expect("list");

        assert_eq!(total, 5);
        assert_eq!(records.len(), 5);
        // Burst inserts share a timestamp; id DESC keeps the order stable
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn list_respects_limit_and_offset() {
        let conn = test_conn().await;

        for i in 0..5 {
            ExtractionRepository::create(&conn, &sample(&format!("{i}.png"), "text"))
                .await
                .expect("create");
        }

        let (page, total) = ExtractionRepository::list(&conn, 2, 2).await.expect("list");
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].filename, "2.png");
        assert_eq!(page[1].filename, "1.png");
    }

    #[tokio::test]
    async fn delete_removes_row_and_reports_missing() {
        let conn = test_conn().await;

        let created = ExtractionRepository::create(&conn, &sample("gone.png", "bye"))
            .await
            .expect("create");

        assert!(ExtractionRepository::delete(&conn, created.id)
            .await
            .expect("delete"));
        assert!(!ExtractionRepository::delete(&conn, created.id)
            .await
            .expect("delete again"));
        assert!(ExtractionRepository::get_by_id(&conn, created.id)
            .await
            .expect("get")
            .is_none());
    }
}
