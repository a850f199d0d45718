use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Snaptext API",
        version = "1.0.0",
        description = "Self-hostable OCR service. REST API for image text extraction and history.",
    ),
    paths(
        handlers::health::health_check,
        handlers::extract::extract_text,
        handlers::history::get_history,
        handlers::history::delete_history_item,
        handlers::history::download_text,
        handlers::languages::get_languages,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Extraction
        dto::extractions::HistoryQuery,
        dto::extractions::ExtractTextResponse,
        dto::extractions::HistoryItemResponse,
        dto::extractions::HistoryListResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::EngineStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "extraction", description = "Image upload and text extraction"),
        (name = "history", description = "Extraction history listing, deletion, and download"),
        (name = "languages", description = "Supported OCR languages"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
