use serde::Serialize;

/// Published after a drive file has been removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileDeleted {
    pub file_id: String,
    pub owner_id: Option<String>,
    /// Acting user, absent for administrative bulk deletes
    pub deleted_by: Option<String>,
    pub deleted_at: String,
}
