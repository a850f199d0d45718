//! v1 extraction handler.
//!
//! Validates the uploaded image, routes it through the OCR dispatcher, and
//! persists one history record per successful extraction. Failed
//! extractions are never stored.

use axum::extract::{Multipart, State};

use crate::api::v1::dto::ExtractTextResponse;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::models::NewExtraction;
use crate::ocr::validate_image;

/// `POST /api/v1/extract-text`
///
/// Accepts a multipart form with a `file` field and an optional `language`
/// text field. Returns the extracted text together with the persisted
/// history record's id.
#[utoipa::path(
    post,
    path = "/api/v1/extract-text",
    tag = "extraction",
    operation_id = "extraction.extractText",
    request_body(content_type = "multipart/form-data", content = String, description = "Image upload with optional language field"),
    responses(
        (status = 200, description = "Text extracted", body = ExtractTextResponse),
        (status = 400, description = "Invalid or missing image", body = ApiError),
        (status = 500, description = "Recognition failed", body = ApiError),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<ExtractTextResponse> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut language: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                if let Some(name) = field.file_name() {
                    file_name = Some(name.to_string());
                }

                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        return ApiResponse::error(
                            ErrorCode::InvalidRequest,
                            format!("Failed to read file: {e}"),
                        );
                    }
                };

                file_bytes = Some(bytes.to_vec());
            }
            "language" => {
                language = match field.text().await {
                    Ok(t) => Some(t),
                    Err(e) => {
                        return ApiResponse::error(
                            ErrorCode::InvalidRequest,
                            format!("Invalid language value: {e}"),
                        );
                    }
                };
            }
            _ => {}
        }
    }

    let bytes = match file_bytes {
        Some(b) => b,
        None => {
            return ApiResponse::error(ErrorCode::InvalidRequest, "Missing required 'file' field");
        }
    };

    let language = language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| state.config.ocr.default_language.clone());

    if let Err(e) = validate_image(&bytes) {
        return e.into();
    }

    let outcome = state.ocr.dispatch(&bytes, &language).await;

    if !outcome.success {
        let reason = outcome
            .error
            .unwrap_or_else(|| "Unknown error".to_string());
        return ApiResponse::error(
            ErrorCode::InternalError,
            format!("OCR processing failed: {reason}"),
        );
    }

    let new = NewExtraction {
        filename: file_name.unwrap_or_default(),
        extracted_text: outcome.text,
        language: outcome.language,
        file_size_bytes: bytes.len() as i64,
        processing_time: outcome.processing_time,
    };

    match state.db.create_extraction(&new).await {
        Ok(record) => ApiResponse::success(ExtractTextResponse {
            id: record.id,
            filename: record.filename,
            extracted_text: record.extracted_text,
            confidence: outcome.confidence,
            processing_time: record.processing_time,
            language: record.language,
            file_size: record.file_size_bytes,
            created_at: record.created_at,
            success: true,
        }),
        Err(e) => e.into(),
    }
}
