//! Shared response envelope types for API handlers.
//!
//! Every body, success or failure, is `{ "meta": { "code", "message" }, "data": ... }`.
//! On success `message` is the status reason phrase; on failure it is the
//! client-safe error message and `data` is `null`.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Status code and human-readable message of a response.
#[derive(Debug, Serialize)]
pub struct Meta {
    pub code: u16,
    pub message: String,
}

impl Meta {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    /// Meta carrying the canonical reason phrase of `status`.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or_default())
    }
}

/// Standard `{ "meta": ..., "data": T }` response envelope.
///
/// `Envelope<()>` serializes `data` as `null`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub meta: Meta,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// A `200 OK` envelope around `data`.
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            meta: Meta::from_status(StatusCode::OK),
            data,
        })
    }
}

impl Envelope<()> {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(status, message),
            data: (),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ok_envelope_uses_reason_phrase() {
        let Json(body) = Envelope::ok(json!({ "cursor": null }));
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(
            value,
            json!({ "meta": { "code": 200, "message": "OK" }, "data": { "cursor": null } })
        );
    }

    #[test]
    fn error_envelope_has_null_data() {
        let body = Envelope::error(StatusCode::NOT_FOUND, "Product not found.");
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(
            value,
            json!({ "meta": { "code": 404, "message": "Product not found." }, "data": null })
        );
    }
}
