use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Conflict: {0}")]
    ConflictInUse(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Storage error: {0}")]
    StorageFailure(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Machine readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NO_SUCH_FILE",
            AppError::AccessDenied(_) => "ACCESS_DENIED",
            AppError::ConflictInUse(_) => "FILE_IS_IN_USE",
            AppError::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            AppError::StorageFailure(_) => "STORAGE_FAILURE",
            AppError::Unauthorized(_) => "CREDENTIAL_REQUIRED",
            AppError::BadRequest(_) => "INVALID_PARAM",
        }
    }

    /// Stable error id, so clients can match errors across message wording changes
    pub fn id(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "908939ec-e52b-4458-b395-1025195cea58",
            AppError::AccessDenied(_) => "5eb8d909-2540-4970-90b8-dd6f86088121",
            AppError::ConflictInUse(_) => "c4f5b5a4-6b92-4c33-ac66-b806659bb5cf",
            AppError::DependencyUnavailable(_) => "0f1c8e2a-5d34-4f7b-9a61-3b2e7d4c9a10",
            AppError::StorageFailure(_) => "6a2d9b41-8c7e-4e15-b3f0-91d5c2a7e864",
            AppError::Unauthorized(_) => "1384574d-a912-4b81-8601-c7b1c4085df1",
            AppError::BadRequest(_) => "3d81ceae-475f-4600-b2a8-2bc116157532",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::ConflictInUse(_) => StatusCode::CONFLICT,
            AppError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::AccessDenied(msg)
            | AppError::ConflictInUse(msg)
            | AppError::Unauthorized(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            // Backend details stay in the log
            AppError::DependencyUnavailable(_) => "Dependency unavailable".to_string(),
            AppError::StorageFailure(_) => "Storage error".to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::DependencyUnavailable(format!("database: {}", e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::StorageFailure(e.to_string())
    }
}

/// Error details attached to a failed response
#[derive(Debug, Serialize)]
pub struct ApiErrorInfo {
    pub code: &'static str,
    pub id: &'static str,
}

/// API response wrapper. Deletions return no payload, only the outcome.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorInfo>,
}

impl ApiResponse {
    pub fn success_message(message: &str) -> Self {
        Self {
            code: 0,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.status().as_u16() as i32,
            message: err.message(),
            error: Some(ApiErrorInfo {
                code: err.code(),
                id: err.id(),
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::DependencyUnavailable(detail) => {
                tracing::error!("Dependency unavailable: {}", detail)
            }
            AppError::StorageFailure(detail) => tracing::error!("Storage error: {}", detail),
            AppError::Unauthorized(detail) => tracing::warn!("Unauthorized: {}", detail),
            _ => {}
        }

        let body = Json(ApiResponse::error(&self));
        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
