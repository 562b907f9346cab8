//! Fixtures and fakes shared by the service tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{CurrentUser, DriveFile, DriveFileDeleted};
use crate::services::{EventBus, ReferenceGuard, RoleOracle};
use crate::storage::StorageProvider;

/// Ordered record of collaborator calls, shared between fakes
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct FileSeed {
    pub id: String,
    pub user_id: Option<String>,
    pub user_host: Option<String>,
    pub url: String,
    pub webpublic_url: Option<String>,
    pub is_link: bool,
    pub access_key: Option<String>,
    pub thumbnail_access_key: Option<String>,
}

impl FileSeed {
    /// File uploaded to this instance by `owner`, with original and thumbnail blobs
    pub fn local(id: &str, owner: &str) -> Self {
        Self {
            id: id.to_string(),
            user_id: Some(owner.to_string()),
            user_host: None,
            url: format!("https://local.example/files/{}", id),
            webpublic_url: None,
            is_link: false,
            access_key: Some(id.to_string()),
            thumbnail_access_key: Some(format!("thumbnail-{}", id)),
        }
    }

    /// Remote file cached locally with a single blob
    pub fn remote(id: &str, host: &str) -> Self {
        Self {
            id: id.to_string(),
            user_id: Some(format!("{}-user", host)),
            user_host: Some(host.to_string()),
            url: format!("https://{}/files/{}", host, id),
            webpublic_url: None,
            is_link: false,
            access_key: Some(id.to_string()),
            thumbnail_access_key: None,
        }
    }
}

pub fn file_fixture(seed: FileSeed) -> DriveFile {
    DriveFile {
        name: format!("{}.png", seed.id),
        id: seed.id,
        user_id: seed.user_id,
        user_host: seed.user_host,
        size: 4,
        mime_type: Some("image/png".to_string()),
        url: seed.url,
        webpublic_url: seed.webpublic_url,
        is_link: seed.is_link,
        access_key: seed.access_key,
        thumbnail_access_key: seed.thumbnail_access_key,
        webpublic_access_key: None,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub async fn insert_file(db: &Database, seed: FileSeed) -> DriveFile {
    let file = file_fixture(seed);
    sqlx::query(
        r#"
        INSERT INTO drive_files (id, user_id, user_host, name, size, mime_type, url, webpublic_url,
            is_link, access_key, thumbnail_access_key, webpublic_access_key, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&file.id)
    .bind(&file.user_id)
    .bind(&file.user_host)
    .bind(&file.name)
    .bind(file.size)
    .bind(&file.mime_type)
    .bind(&file.url)
    .bind(&file.webpublic_url)
    .bind(file.is_link)
    .bind(&file.access_key)
    .bind(&file.thumbnail_access_key)
    .bind(&file.webpublic_access_key)
    .bind(&file.created_at)
    .execute(db.pool())
    .await
    .unwrap();
    file
}

pub async fn insert_emoji(db: &Database, name: &str, original_url: &str, public_url: &str) {
    sqlx::query("INSERT INTO emojis (id, name, original_url, public_url) VALUES (?, ?, ?, ?)")
        .bind(format!("emoji-{}", name))
        .bind(name)
        .bind(original_url)
        .bind(public_url)
        .execute(db.pool())
        .await
        .unwrap();
}

pub async fn insert_user(db: &Database, id: &str, role: &str) {
    sqlx::query("INSERT INTO users (id, username, role) VALUES (?, ?, ?)")
        .bind(id)
        .bind(id)
        .bind(role)
        .execute(db.pool())
        .await
        .unwrap();
}

pub async fn file_exists(db: &Database, id: &str) -> bool {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drive_files WHERE id = ?")
        .bind(id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    count > 0
}

pub fn current_user(id: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        username: id.to_string(),
    }
}

/// Reference guard with scripted answers and optional per-file latency
#[derive(Default)]
pub struct ScriptedGuard {
    pub in_use: HashSet<String>,
    pub failing: HashSet<String>,
    pub delays: HashMap<String, Duration>,
    pub log: CallLog,
}

impl ScriptedGuard {
    pub fn in_use(ids: &[&str]) -> Self {
        Self {
            in_use: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ReferenceGuard for ScriptedGuard {
    async fn is_in_use(&self, file: &DriveFile) -> Result<bool> {
        if let Some(delay) = self.delays.get(&file.id) {
            tokio::time::sleep(*delay).await;
        }
        self.log.lock().unwrap().push(format!("check:{}", file.id));
        if self.failing.contains(&file.id) {
            return Err(AppError::DependencyUnavailable("emoji store offline".to_string()));
        }
        Ok(self.in_use.contains(&file.id))
    }
}

/// Role oracle with a fixed moderator set
#[derive(Default)]
pub struct FixedRoles {
    pub moderators: HashSet<String>,
}

impl FixedRoles {
    pub fn with_moderators(ids: &[&str]) -> Self {
        Self {
            moderators: ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl RoleOracle for FixedRoles {
    async fn is_moderator(&self, user: &CurrentUser) -> Result<bool> {
        Ok(self.moderators.contains(&user.id))
    }
}

/// In-memory blob store that records deletes and can be told to fail on some keys
#[derive(Default)]
pub struct MemoryStorage {
    pub blobs: Mutex<HashSet<String>>,
    pub failing: HashSet<String>,
    pub log: CallLog,
}

impl MemoryStorage {
    pub fn with_blobs_for(files: &[&DriveFile]) -> Self {
        let storage = Self::default();
        {
            let mut blobs = storage.blobs.lock().unwrap();
            for file in files {
                blobs.extend(file.storage_keys().into_iter().map(String::from));
            }
        }
        storage
    }

    pub fn has(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains(key)
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn put(&self, key: &str, _data: Bytes) -> Result<()> {
        self.blobs.lock().unwrap().insert(key.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("delete:{}", key));
        if self.failing.contains(key) {
            return Err(AppError::StorageFailure(format!("disk error on {}", key)));
        }
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.has(key))
    }

    fn storage_type(&self) -> &'static str {
        "memory"
    }
}

/// Event bus that keeps what it was given, or fails every publish
#[derive(Default)]
pub struct RecordingBus {
    pub events: Mutex<Vec<DriveFileDeleted>>,
    pub broken: bool,
}

impl RecordingBus {
    pub fn file_ids(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.file_id.clone())
            .collect()
    }
}

#[async_trait]
impl EventBus for RecordingBus {
    async fn publish_file_deleted(&self, event: DriveFileDeleted) -> anyhow::Result<()> {
        if self.broken {
            anyhow::bail!("bus down");
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
