use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub engines: Vec<EngineStatus>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EngineStatus {
    pub name: String,
    pub status: String,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match state.db.ping().await {
        Ok(_) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(_) => DatabaseStatus {
            status: "error".to_string(),
        },
    };

    let engines = state
        .ocr
        .engine_status()
        .await
        .into_iter()
        .map(|(name, available)| EngineStatus {
            name: name.to_string(),
            status: if available {
                "available".to_string()
            } else {
                "unavailable".to_string()
            },
        })
        .collect();

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        engines,
    })
}
