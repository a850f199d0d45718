//! v1 history handlers: paginated listing, deletion, and plain-text
//! download of stored extractions.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Query;

use crate::api::v1::dto::{HistoryItemResponse, HistoryListResponse, HistoryQuery};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/history`
///
/// Lists stored extractions most-recent-first. The preview field is
/// truncated to 200 characters; `fullText` carries the complete value.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "history",
    operation_id = "history.list",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History listed", body = HistoryListResponse),
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResponse<HistoryListResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let offset = query.offset.unwrap_or(0);

    let (records, total) = match state.db.list_extractions(limit, offset).await {
        Ok(result) => result,
        Err(e) => return e.into(),
    };

    let history: Vec<HistoryItemResponse> = records.into_iter().map(Into::into).collect();

    let meta = ResponseMeta {
        total,
        limit,
        offset,
    };

    ApiResponse::success_with_meta(HistoryListResponse { history }, meta)
}

/// `DELETE /api/v1/history/{id}`
///
/// Hard-deletes a single record.
#[utoipa::path(
    delete,
    path = "/api/v1/history/{id}",
    tag = "history",
    operation_id = "history.delete",
    params(("id" = i64, Path, description = "History record id")),
    responses(
        (status = 200, description = "Record deleted", body = Object),
        (status = 404, description = "Record not found", body = ApiError),
    )
)]
pub async fn delete_history_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResponse<serde_json::Value> {
    match state.db.delete_extraction(id).await {
        Ok(true) => ApiResponse::success(serde_json::json!({ "deleted": true })),
        Ok(false) => ApiResponse::error(
            ErrorCode::NotFound,
            format!("History item {id} not found"),
        ),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/download/{id}`
///
/// Returns the stored text as a `text/plain` attachment with a fixed
/// header block describing the source upload.
#[utoipa::path(
    get,
    path = "/api/v1/download/{id}",
    tag = "history",
    operation_id = "history.download",
    params(("id" = i64, Path, description = "History record id")),
    responses(
        (status = 200, description = "Plain-text attachment", body = String, content_type = "text/plain"),
        (status = 404, description = "Record not found", body = ApiError),
    )
)]
pub async fn download_text(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let record = match state.db.get_extraction(id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return ApiResponse::<()>::error(
                ErrorCode::NotFound,
                format!("History item {id} not found"),
            )
            .into_response();
        }
        Err(e) => {
            let resp: ApiResponse<()> = e.into();
            return resp.into_response();
        }
    };

    let mut content = format!("Extracted Text from {}\n", record.filename);
    content.push_str(&format!("Language: {}\n", record.language));
    content.push_str(&format!(
        "Extracted on: {}\n",
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    content.push_str(&format!("Processing time: {}\n", record.processing_time));
    content.push_str(&format!("\n{}\n\n", "=".repeat(50)));
    content.push_str(&record.extracted_text);

    let stem = record.filename.split('.').next().unwrap_or("");
    let attachment = format!("extracted_text_{}_{}.txt", record.id, stem);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={attachment}"),
            ),
        ],
        content,
    )
        .into_response()
}
