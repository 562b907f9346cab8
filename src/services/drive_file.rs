use crate::db::Database;
use crate::error::Result;
use crate::models::DriveFile;

/// Drive file metadata lookups
pub struct DriveFileService;

impl DriveFileService {
    pub async fn find_by_id(db: &Database, file_id: &str) -> Result<Option<DriveFile>> {
        let file: Option<DriveFile> = sqlx::query_as("SELECT * FROM drive_files WHERE id = ?")
            .bind(file_id)
            .fetch_optional(db.pool())
            .await?;

        Ok(file)
    }

    /// Every file ingested from a remote host. `host` must already be normalized.
    pub async fn find_by_origin_host(db: &Database, host: &str) -> Result<Vec<DriveFile>> {
        let files: Vec<DriveFile> =
            sqlx::query_as("SELECT * FROM drive_files WHERE user_host = ? ORDER BY id ASC")
                .bind(host)
                .fetch_all(db.pool())
                .await?;

        Ok(files)
    }
}

/// Hosts are compared lowercased and without surrounding whitespace
pub fn normalize_host(host: &str) -> Option<String> {
    let host = host.trim().to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
