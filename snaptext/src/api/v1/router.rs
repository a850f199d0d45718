use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/extract-text", post(handlers::extract::extract_text))
        .route("/history", get(handlers::history::get_history))
        .route("/history/{id}", delete(handlers::history::delete_history_item))
        .route("/download/{id}", get(handlers::history::download_text))
        .route("/languages", get(handlers::languages::get_languages))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
}
