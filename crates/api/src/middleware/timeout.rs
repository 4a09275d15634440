//! Error envelope for requests that ran past their deadline.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// `TimeoutLayer` answers an expired deadline with an empty 408. Layered
/// outside it via `axum::middleware::from_fn`, this replaces that body with
/// the standard envelope. Handlers never produce 408 themselves.
pub async fn timeout_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::Timeout.into_response();
    }
    response
}
