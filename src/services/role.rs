use async_trait::async_trait;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Actor, CurrentUser, User};

/// Resolves whether a user holds moderator privileges
#[async_trait]
pub trait RoleOracle: Send + Sync {
    async fn is_moderator(&self, user: &CurrentUser) -> Result<bool>;
}

/// Role lookup against the users table
#[derive(Clone)]
pub struct RoleService {
    db: Database,
}

impl RoleService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleOracle for RoleService {
    async fn is_moderator(&self, user: &CurrentUser) -> Result<bool> {
        let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some_and(|u| u.is_active && u.get_role().is_moderator()))
    }
}

/// Build the acting identity for one request
pub async fn resolve_actor(roles: &dyn RoleOracle, user: &CurrentUser) -> Result<Actor> {
    Ok(Actor {
        id: user.id.clone(),
        is_moderator: roles.is_moderator(user).await?,
    })
}
