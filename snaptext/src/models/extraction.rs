use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed text extraction as stored in `extraction_history`.
///
/// Rows exist only for successful extractions (placeholder responses
/// included); `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub id: i64,
    pub filename: String,
    pub extracted_text: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub file_size_bytes: i64,
    pub processing_time: String,
}

/// Fields the caller supplies when persisting a new extraction.
#[derive(Debug, Clone)]
pub struct NewExtraction {
    pub filename: String,
    pub extracted_text: String,
    pub language: String,
    pub file_size_bytes: i64,
    pub processing_time: String,
}
