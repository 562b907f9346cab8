use axum::{extract::State, Extension, Json};

use crate::error::{ApiResponse, Result};
use crate::models::{CurrentUser, DeleteFileRequest};
use crate::AppState;

/// Delete a drive file
/// POST /api/drive/files/delete
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<DeleteFileRequest>,
) -> Result<Json<ApiResponse>> {
    state.drive.delete_file(&req.file_id, &current_user).await?;
    Ok(Json(ApiResponse::success_message("File deleted")))
}
