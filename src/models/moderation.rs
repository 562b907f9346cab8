use serde::Serialize;
use sqlx::FromRow;

pub const DELETE_DRIVE_FILE: &str = "deleteDriveFile";

/// Moderation log entry
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModerationLog {
    pub id: String,
    pub moderator_id: String,
    pub kind: String,
    /// JSON payload
    pub info: String,
    pub created_at: String,
}
