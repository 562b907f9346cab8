use async_trait::async_trait;

use crate::db::Database;
use crate::error::Result;
use crate::models::{DriveFile, Emoji};

/// Answers whether another part of the system still depends on a drive file.
///
/// Implementations must not swallow backend failures: an error means "unknown", never "not in use".
#[async_trait]
pub trait ReferenceGuard: Send + Sync {
    async fn is_in_use(&self, file: &DriveFile) -> Result<bool>;
}

/// Custom emoji subsystem view of drive files
#[derive(Clone)]
pub struct CustomEmojiService {
    db: Database,
}

impl CustomEmojiService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// First emoji whose image is served from this file, if any
    pub async fn find_referencing(&self, file: &DriveFile) -> Result<Option<Emoji>> {
        let emoji: Option<Emoji> = sqlx::query_as(
            "SELECT * FROM emojis WHERE original_url = ? OR public_url = ? LIMIT 1",
        )
        .bind(&file.url)
        .bind(file.public_url())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(emoji)
    }
}

#[async_trait]
impl ReferenceGuard for CustomEmojiService {
    async fn is_in_use(&self, file: &DriveFile) -> Result<bool> {
        match self.find_referencing(file).await? {
            Some(emoji) => {
                tracing::debug!("Drive file {} is used by emoji :{}:", file.id, emoji.name);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
