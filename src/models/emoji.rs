use serde::Serialize;
use sqlx::FromRow;

/// Custom emoji model, only the columns that point at drive files
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Emoji {
    pub id: String,
    pub name: String,
    pub host: Option<String>,
    pub original_url: String,
    pub public_url: String,
    pub created_at: String,
}
