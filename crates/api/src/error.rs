use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use payhere_core::error::{CoreError, ErrorKind};

use crate::response::Envelope;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds a variant for malformed
/// requests rejected before any domain code runs. Implements
/// [`IntoResponse`] to produce the standard error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `payhere_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An unparseable body, path or query string.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request ran past the configured deadline.
    #[error("Request timed out")]
    Timeout,
}

pub const INVALID_PATH_MESSAGE: &str = "Invalid path parameter.";
pub const INVALID_QUERY_MESSAGE: &str = "Invalid query string.";
pub const REQUEST_TIMEOUT_MESSAGE: &str = "The request took too long to process.";

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// HTTP status for each error kind.
///
/// `Permission` maps to 400 rather than 403 so that clients already built
/// against this API keep working.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::Auth => StatusCode::UNAUTHORIZED,
        ErrorKind::Permission => StatusCode::BAD_REQUEST,
        ErrorKind::Exist => StatusCode::CONFLICT,
        ErrorKind::NotExist => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(core) => {
                let status = status_for(core.kind());
                match core {
                    CoreError::Internal {
                        op,
                        source: Some(source),
                        ..
                    } => {
                        tracing::error!(op, error = %source, "Internal error");
                    }
                    other if status.is_server_error() => {
                        tracing::error!(op = other.op(), "Internal error");
                    }
                    other => {
                        tracing::debug!(op = other.op(), kind = %other.kind(), "Request rejected");
                    }
                }
                (status, core.message().to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Timeout => {
                tracing::warn!("Request deadline exceeded");
                (
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(Envelope::error(status, message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Path rejected");
        AppError::BadRequest(INVALID_PATH_MESSAGE.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Query string rejected");
        AppError::BadRequest(INVALID_QUERY_MESSAGE.to_string())
    }
}
