use std::collections::BTreeMap;

use crate::api::v1::response::ApiResponse;
use crate::ocr::supported_languages;

/// `GET /api/v1/languages`
///
/// Static mapping of supported OCR language codes to display names.
#[utoipa::path(
    get,
    path = "/api/v1/languages",
    tag = "languages",
    operation_id = "languages.list",
    responses(
        (status = 200, description = "Supported languages", body = Object),
    )
)]
pub async fn get_languages() -> ApiResponse<BTreeMap<&'static str, &'static str>> {
    ApiResponse::success(supported_languages())
}
