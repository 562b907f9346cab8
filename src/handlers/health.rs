use axum::Json;

use crate::error::ApiResponse;

/// Liveness probe
/// GET /api/health
pub async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::success_message("ok"))
}
