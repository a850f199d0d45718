use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::v1;
use super::AppState;

/// Request body cap. Sits above the validator's 20 MiB image limit (plus
/// multipart framing) so oversized images are rejected by the validator
/// with a proper message, not by the transport.
const MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = v1::router::v1_router();

    Router::new()
        .nest("/api/v1", v1)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
