//! Extraction request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ExtractionRecord;

/// Longest list-view preview of the extracted text, in characters.
/// Applied only on the wire; the stored value is never truncated.
const PREVIEW_CHARS: usize = 200;

/// Query parameters for `GET /api/v1/history`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct HistoryQuery {
    /// Maximum results per page (default 50, clamped to 1..=100).
    pub limit: Option<u32>,
    /// Number of records to skip (default 0).
    pub offset: Option<u32>,
}

/// Response body for `POST /api/v1/extract-text`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextResponse {
    pub id: i64,
    pub filename: String,
    pub extracted_text: String,
    /// Mean recognition confidence, 0-100.
    pub confidence: f64,
    pub processing_time: String,
    pub language: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub success: bool,
}

/// A single record in the history list view.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemResponse {
    pub id: i64,
    pub filename: String,
    /// Preview of the extracted text, truncated to 200 characters.
    pub extracted_text: String,
    /// The complete stored text.
    pub full_text: String,
    pub language: String,
    pub file_size: i64,
    pub processing_time: String,
    pub created_at: DateTime<Utc>,
}

/// Response body for `GET /api/v1/history`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListResponse {
    pub history: Vec<HistoryItemResponse>,
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

impl From<ExtractionRecord> for HistoryItemResponse {
    fn from(record: ExtractionRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            extracted_text: preview(&record.extracted_text),
            full_text: record.extracted_text,
            language: record.language,
            file_size: record.file_size_bytes,
            processing_time: record.processing_time,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> ExtractionRecord {
        ExtractionRecord {
            id: 1,
            filename: "scan.png".to_string(),
            extracted_text: text.to_string(),
            language: "eng".to_string(),
            created_at: Utc::now(),
            file_size_bytes: 512,
            processing_time: "0.10s".to_string(),
        }
    }

    #[test]
    fn short_text_is_not_truncated() {
        let item = HistoryItemResponse::from(record("short text"));
        assert_eq!(item.extracted_text, "short text");
        assert_eq!(item.full_text, "short text");
    }

    #[test]
    fn long_text_gets_preview_but_full_text_is_kept() {
        let long = "x".repeat(500);
        let item = HistoryItemResponse::from(record(&long));
        assert_eq!(item.extracted_text.chars().count(), 203);
        assert!(item.extracted_text.ends_with("..."));
        assert_eq!(item.full_text, long);
    }

    #[test]
    fn preview_respects_multibyte_boundaries() {
        let long = "ß".repeat(300);
        let item = HistoryItemResponse::from(record(&long));
        assert!(item.extracted_text.starts_with("ß"));
        assert!(item.extracted_text.ends_with("..."));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let item = HistoryItemResponse::from(record("hello"));
        let json = serde_json::to_value(&item).expect("serialize");
        assert!(json.get("extractedText").is_some());
        assert!(json.get("fullText").is_some());
        assert!(json.get("fileSize").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
