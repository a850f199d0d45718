use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per successful extraction; failed extractions are never stored
        CREATE TABLE IF NOT EXISTS extraction_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            extracted_text TEXT NOT NULL,
            language TEXT NOT NULL DEFAULT 'eng',
            created_at TEXT NOT NULL,
            file_size_bytes INTEGER NOT NULL,
            processing_time TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_extraction_history_created_at
            ON extraction_history(created_at);
        "#,
    )
    .await?;

    Ok(())
}
