use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Moderator,
    User,
}

impl UserRole {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "moderator" => UserRole::Moderator,
            _ => UserRole::User,
        }
    }

    /// Admins are moderators too
    pub fn is_moderator(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Moderator)
    }
}

/// User model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: String,
    pub is_active: bool,
}

impl User {
    pub fn get_role(&self) -> UserRole {
        UserRole::parse(&self.role)
    }
}

/// Current authenticated user (extracted from JWT)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

/// A user acting on drive files, with the moderator flag resolved for this request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub is_moderator: bool,
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::parse("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::parse("moderator"), UserRole::Moderator);
        assert_eq!(UserRole::parse("something"), UserRole::User);
    }

    #[test]
    fn test_admin_counts_as_moderator() {
        assert!(UserRole::Admin.is_moderator());
        assert!(UserRole::Moderator.is_moderator());
        assert!(!UserRole::User.is_moderator());
    }
}
