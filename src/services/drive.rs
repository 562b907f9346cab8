use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DriveConfig;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{
    Actor, CurrentUser, DriveFile, DriveFileDeleted, ModerationLog, DELETE_DRIVE_FILE,
};
use crate::services::drive_file::normalize_host;
use crate::services::{policy, role, DriveFileService, EventBus, ReferenceGuard, RoleOracle};
use crate::storage::StorageProvider;

/// What a host-wide deletion did, per file id
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkDeletionReport {
    pub candidates: usize,
    pub deleted: Vec<String>,
    pub skipped_in_use: Vec<String>,
    pub failed: Vec<String>,
}

/// Drive file deletion.
///
/// The reference check and the removal are not atomic with respect to the emoji subsystem:
/// a reference created after the check still loses its file. Within one call the check for
/// a file always completes before any of its data is touched.
#[derive(Clone)]
pub struct DriveService {
    db: Database,
    storage: Arc<dyn StorageProvider>,
    references: Arc<dyn ReferenceGuard>,
    roles: Arc<dyn RoleOracle>,
    events: Arc<dyn EventBus>,
    options: DriveConfig,
}

impl DriveService {
    pub fn new(
        db: Database,
        storage: Arc<dyn StorageProvider>,
        references: Arc<dyn ReferenceGuard>,
        roles: Arc<dyn RoleOracle>,
        events: Arc<dyn EventBus>,
        options: DriveConfig,
    ) -> Self {
        Self {
            db,
            storage,
            references,
            roles,
            events,
            options,
        }
    }

    /// Delete one file on behalf of `user`.
    ///
    /// Checks run strictly in the order existence, authorization, references, so a caller
    /// never learns about references on a file they may not touch.
    pub async fn delete_file(&self, file_id: &str, user: &CurrentUser) -> Result<()> {
        tracing::debug!("{} requested deletion of drive file {}", user.username, file_id);

        let file = DriveFileService::find_by_id(&self.db, file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No such file.".to_string()))?;

        let actor = role::resolve_actor(self.roles.as_ref(), user).await?;
        if !policy::can_delete(&actor, &file) {
            return Err(AppError::AccessDenied("Access denied.".to_string()));
        }

        if self.references.is_in_use(&file).await? {
            return Err(AppError::ConflictInUse(
                "This file is in use with custom emojis.".to_string(),
            ));
        }

        self.remove_file(&file, Some(&actor)).await
    }

    /// Delete every file that came from `host`, leaving files that are still referenced.
    ///
    /// All reference checks are resolved before the delete set is built. A file whose
    /// check fails is left alone and reported as failed. A storage failure either skips
    /// that file or aborts the rest of the batch, per `continue_on_failure`.
    pub async fn delete_all_files_from_host(
        &self,
        host: &str,
        user: &CurrentUser,
    ) -> Result<BulkDeletionReport> {
        let actor = role::resolve_actor(self.roles.as_ref(), user).await?;
        policy::require_moderator(&actor)?;

        let host = normalize_host(host)
            .ok_or_else(|| AppError::BadRequest("host is required".to_string()))?;

        let files = DriveFileService::find_by_origin_host(&self.db, &host).await?;
        let mut report = BulkDeletionReport {
            candidates: files.len(),
            ..Default::default()
        };

        let pending: Vec<_> = files
            .iter()
            .map(|file| self.references.is_in_use(file))
            .collect();
        let checks: Vec<Result<bool>> = stream::iter(pending)
            .buffered(self.options.reference_check_concurrency.max(1))
            .collect()
            .await;

        let mut to_delete = Vec::with_capacity(files.len());
        for (file, check) in files.iter().zip(checks) {
            match check {
                Ok(false) => to_delete.push(file),
                Ok(true) => {
                    tracing::debug!("Skipping drive file {} from {}: in use", file.id, host);
                    report.skipped_in_use.push(file.id.clone());
                }
                Err(e) => {
                    tracing::warn!("Reference check failed for drive file {}: {}", file.id, e);
                    report.failed.push(file.id.clone());
                }
            }
        }

        for file in to_delete {
            match self.remove_file(file, None).await {
                Ok(()) => report.deleted.push(file.id.clone()),
                Err(e) => {
                    tracing::warn!("Failed to delete drive file {}: {}", file.id, e);
                    if !self.options.continue_on_failure {
                        return Err(e);
                    }
                    report.failed.push(file.id.clone());
                }
            }
        }

        tracing::info!(
            host = %host,
            moderator = %actor.id,
            candidates = report.candidates,
            deleted = report.deleted.len(),
            skipped_in_use = report.skipped_in_use.len(),
            failed = report.failed.len(),
            "Deleted drive files from remote host"
        );

        Ok(report)
    }

    /// Remove a file's blobs and metadata, then announce it.
    ///
    /// The metadata row is deleted inside a transaction that only commits once every blob
    /// is gone, so a storage failure leaves the record in place. A file that no longer
    /// exists is a no-op.
    pub async fn remove_file(&self, file: &DriveFile, actor: Option<&Actor>) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM drive_files WHERE id = ?")
            .bind(&file.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tracing::debug!("Drive file {} already deleted", file.id);
            return Ok(());
        }

        if let Some(actor) = actor {
            if actor.is_moderator && file.user_id.as_deref() != Some(actor.id.as_str()) {
                let info = serde_json::json!({
                    "fileId": file.id,
                    "fileUserId": file.user_id,
                    "fileUserHost": file.user_host,
                    "fileName": file.name,
                });
                let entry = ModerationLog {
                    id: Uuid::new_v4().to_string(),
                    moderator_id: actor.id.clone(),
                    kind: DELETE_DRIVE_FILE.to_string(),
                    info: info.to_string(),
                    created_at: Utc::now().to_rfc3339(),
                };
                sqlx::query(
                    "INSERT INTO moderation_logs (id, moderator_id, kind, info, created_at) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(&entry.id)
                .bind(&entry.moderator_id)
                .bind(&entry.kind)
                .bind(&entry.info)
                .bind(&entry.created_at)
                .execute(&mut *tx)
                .await?;
            }
        }

        // Original blob last: a partial failure leaves the row pointing at readable data
        for key in file.storage_keys() {
            if let Err(e) = self.storage.delete(key).await {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(
                        "Rollback after storage failure on {} failed: {}",
                        file.id,
                        rollback
                    );
                }
                return Err(e);
            }
        }

        tx.commit().await?;

        tracing::info!(
            file_id = %file.id,
            remote = file.is_remote(),
            deleted_by = ?actor.map(|a| a.id.as_str()),
            storage = self.storage.storage_type(),
            "Drive file deleted"
        );

        let event = DriveFileDeleted {
            file_id: file.id.clone(),
            owner_id: file.user_id.clone(),
            deleted_by: actor.map(|a| a.id.clone()),
            deleted_at: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.events.publish_file_deleted(event).await {
            tracing::warn!("Drive event publish failed for {}: {}", file.id, e);
        }

        Ok(())
    }
}
