//! # V1 API Response Envelope & Error Contract
//!
//! Defines the canonical wire format for all v1 API responses. Every JSON
//! endpoint returns an [`ApiResponse<T>`] envelope with three optional
//! top-level fields:
//!
//! ```json
//! {
//!   "data": { ... },       // present on success, absent on error
//!   "meta": { "total": 42, "limit": 50, "offset": 0 },  // list endpoints
//!   "error": { "code": "not_found", "message": "..." }  // present on error
//! }
//! ```
//!
//! The download endpoint is the one exception: it returns a raw
//! `text/plain` attachment.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::SnaptextError;

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed or the uploaded image failed validation.
    /// HTTP 400.
    InvalidRequest,
    /// The requested history record does not exist. HTTP 404.
    NotFound,
    /// An unexpected server-side error occurred, including a recognition
    /// failure in the selected OCR engine. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error payload within the API envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Machine-readable error classification.
    pub code: ErrorCode,
    /// Human-readable description safe to display to end users.
    pub message: String,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// Total number of matching records.
    pub total: u64,
    /// Page size that was applied after clamping.
    pub limit: u32,
    /// Offset that was applied.
    pub offset: u32,
}

/// Canonical v1 API response envelope.
///
/// On success, `data` is present and `error` is absent; on error the
/// reverse. The HTTP status code is derived from the error code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// HTTP status to use in the response. Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with data (HTTP 200).
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Success response with data and pagination metadata (HTTP 200).
    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Error response. HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<SnaptextError> for ApiResponse<T> {
    /// Convert a [`SnaptextError`] into a v1 [`ApiResponse`].
    ///
    /// Internal error details are **never** leaked to the client. For
    /// `internal_error` responses, a generic message is returned and the
    /// real error is logged via `tracing::error!`.
    fn from(err: SnaptextError) -> Self {
        match err {
            SnaptextError::NotFound(ref msg) => ApiResponse::error(ErrorCode::NotFound, msg.clone()),

            SnaptextError::Validation(ref msg) => {
                ApiResponse::error(ErrorCode::InvalidRequest, msg.clone())
            }

            ref internal @ (SnaptextError::Database(_)
            | SnaptextError::Engine(_)
            | SnaptextError::EngineUnavailable(_)
            | SnaptextError::Json(_)
            | SnaptextError::Io(_)
            | SnaptextError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_serializes_without_error() {
        let resp = ApiResponse::success("hello");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["data"], "hello");
        assert!(json.get("error").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn error_response_serializes_without_data() {
        let resp = ApiResponse::<()>::error(ErrorCode::NotFound, "gone");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "gone");
    }

    #[test]
    fn success_with_meta_serializes_all_fields() {
        let meta = ResponseMeta {
            total: 42,
            limit: 50,
            offset: 10,
        };
        let resp = ApiResponse::success_with_meta(vec![1, 2, 3], meta);
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["meta"]["total"], 42);
        assert_eq!(json["meta"]["limit"], 50);
        assert_eq!(json["meta"]["offset"], 10);
    }

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_code_serializes_snake_case() {
        let json = serde_json::to_value(&ErrorCode::InvalidRequest).expect("serialize");
        assert_eq!(json, "invalid_request");
    }

    #[test]
    fn snaptext_error_not_found_maps_correctly() {
        let resp: ApiResponse<()> = SnaptextError::NotFound("gone".into()).into();
        assert_eq!(
            resp.error.as_ref().expect("error").code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn snaptext_error_validation_maps_to_invalid_request() {
        let resp: ApiResponse<()> = SnaptextError::Validation("bad image".into()).into();
        let err = resp.error.as_ref().expect("error");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "bad image");
    }

    #[test]
    fn snaptext_error_internal_does_not_leak() {
        let resp: ApiResponse<()> = SnaptextError::Internal("secret debug info".into()).into();
        let err = resp.error.as_ref().expect("error");
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "An internal error occurred");
    }
}
