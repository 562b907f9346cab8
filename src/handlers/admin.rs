use axum::{extract::State, Extension, Json};

use crate::error::{ApiResponse, Result};
use crate::models::{CurrentUser, DeleteAllFilesFromHostRequest};
use crate::AppState;

/// Delete every drive file that originated from a remote host (moderators only)
/// POST /api/admin/federation/delete-all-files
pub async fn delete_all_files_from_host(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<DeleteAllFilesFromHostRequest>,
) -> Result<Json<ApiResponse>> {
    state
        .drive
        .delete_all_files_from_host(&req.host, &current_user)
        .await?;
    Ok(Json(ApiResponse::success_message("Files deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::testing::{
        current_user, file_exists, insert_emoji, insert_file, insert_user, FileSeed,
    };
    use crate::test_state;

    #[tokio::test]
    async fn test_moderator_purges_host_but_keeps_emoji_files() {
        let (state, _dir) = test_state().await;
        insert_user(&state.db, "mod", "moderator").await;
        let used = insert_file(&state.db, FileSeed::remote("a", "remote.example")).await;
        insert_file(&state.db, FileSeed::remote("b", "remote.example")).await;
        insert_emoji(&state.db, "partyparrot", &used.url, "").await;

        let req = DeleteAllFilesFromHostRequest {
            host: "remote.example".to_string(),
        };
        delete_all_files_from_host(State(state.clone()), Extension(current_user("mod")), Json(req))
            .await
            .unwrap();

        assert!(file_exists(&state.db, "a").await);
        assert!(!file_exists(&state.db, "b").await);
    }

    #[tokio::test]
    async fn test_regular_user_is_denied() {
        let (state, _dir) = test_state().await;
        insert_user(&state.db, "alice", "user").await;
        insert_file(&state.db, FileSeed::remote("b", "remote.example")).await;

        let req = DeleteAllFilesFromHostRequest {
            host: "remote.example".to_string(),
        };
        let err = delete_all_files_from_host(
            State(state.clone()),
            Extension(current_user("alice")),
            Json(req),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::AccessDenied(_)));
        assert!(file_exists(&state.db, "b").await);
    }
}
