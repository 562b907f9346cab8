use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Drive file model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DriveFile {
    pub id: String,
    /// Owner, absent for system files
    pub user_id: Option<String>,
    /// Origin host, `None` for files uploaded to this instance
    pub user_host: Option<String>,
    pub name: String,
    pub size: i64,
    pub mime_type: Option<String>,
    pub url: String,
    pub webpublic_url: Option<String>,
    /// Remote file referenced by URL only, nothing stored locally
    pub is_link: bool,
    pub access_key: Option<String>,
    pub thumbnail_access_key: Option<String>,
    pub webpublic_access_key: Option<String>,
    pub created_at: String,
}

impl DriveFile {
    pub fn is_remote(&self) -> bool {
        self.user_host.is_some()
    }

    /// Storage keys of every blob this file owns, derived variants first and the original last
    pub fn storage_keys(&self) -> Vec<&str> {
        if self.is_link {
            return Vec::new();
        }
        [
            self.thumbnail_access_key.as_deref(),
            self.webpublic_access_key.as_deref(),
            self.access_key.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// URL under which the file is publicly served
    pub fn public_url(&self) -> &str {
        self.webpublic_url.as_deref().unwrap_or(&self.url)
    }
}

/// Delete file request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    pub file_id: String,
}

/// Delete all files from a federated host request
#[derive(Debug, Deserialize)]
pub struct DeleteAllFilesFromHostRequest {
    pub host: String,
}
