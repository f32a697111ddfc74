use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Upstream product API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Upstream product API request failed: {0}")]
    UpstreamTransport(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::UpstreamStatus { status, body } => AppError::ServiceUnavailable(format!(
                "Upstream product API returned status {}: {}",
                status, body
            )),
            CatalogError::UpstreamTransport(msg) => {
                AppError::ServiceUnavailable(format!("Upstream product API unreachable: {}", msg))
            }
            CatalogError::Database(msg) => AppError::InternalServerError(msg),
            CatalogError::Cache(msg) => AppError::InternalServerError(msg),
            CatalogError::Serialization(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        CatalogError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for CatalogError {
    fn from(err: redis::RedisError) -> Self {
        CatalogError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

/// Transport-level reqwest failures (timeouts included) all surface as an
/// unavailable upstream; non-success statuses are mapped at the call site
/// where the body is available.
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::UpstreamTransport(err.to_string())
    }
}
