use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Claims;

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Validate a bearer token against the current and previous signing secrets
    pub fn validate_token(token: &str, config: &Config) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let keys = std::iter::once(config.jwt.secret.as_str())
            .chain(config.jwt.previous_secrets.iter().map(|s| s.as_str()));

        for secret in keys {
            if let Ok(token_data) = decode::<Claims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &validation,
            ) {
                return Ok(token_data.claims);
            }
        }

        Err(AppError::Unauthorized("Invalid token".to_string()))
    }
}
