//! Domain error taxonomy.
//!
//! Every error carries an operation tag (`"layer/component/action"`) for
//! diagnostics and a short message that is safe to show to clients. Driver
//! errors are kept only as the `source` of [`CoreError::Internal`] and never
//! leak into the message.

use std::fmt;

/// Operation tag identifying where an error was raised.
pub type Op = &'static str;

/// Boxed underlying cause of an internal error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Generic client-facing message for internal failures.
pub const INTERNAL_MESSAGE: &str = "A server error occurred.";

/// Classification of a [`CoreError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Invalid,
    Auth,
    Permission,
    Exist,
    NotExist,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Invalid => "invalid operation",
            ErrorKind::Auth => "unauthorized",
            ErrorKind::Permission => "permission denied",
            ErrorKind::Exist => "item already exists",
            ErrorKind::NotExist => "item does not exist",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad input or a violated business rule.
    #[error("{op}: invalid operation: {message}")]
    Invalid { op: Op, message: String },

    /// Missing, malformed, expired or revoked credentials.
    #[error("{op}: unauthorized: {message}")]
    Auth { op: Op, message: String },

    /// The caller does not own the resource.
    #[error("{op}: permission denied: {message}")]
    Permission { op: Op, message: String },

    #[error("{op}: item already exists: {message}")]
    Exist { op: Op, message: String },

    #[error("{op}: item does not exist: {message}")]
    NotExist { op: Op, message: String },

    /// Storage, hashing or signing failure.
    #[error("{op}: internal error: {message}")]
    Internal {
        op: Op,
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl CoreError {
    pub fn invalid(op: Op, message: impl Into<String>) -> Self {
        CoreError::Invalid {
            op,
            message: message.into(),
        }
    }

    pub fn auth(op: Op, message: impl Into<String>) -> Self {
        CoreError::Auth {
            op,
            message: message.into(),
        }
    }

    pub fn permission(op: Op, message: impl Into<String>) -> Self {
        CoreError::Permission {
            op,
            message: message.into(),
        }
    }

    pub fn exist(op: Op, message: impl Into<String>) -> Self {
        CoreError::Exist {
            op,
            message: message.into(),
        }
    }

    pub fn not_exist(op: Op, message: impl Into<String>) -> Self {
        CoreError::NotExist {
            op,
            message: message.into(),
        }
    }

    /// Wrap an underlying failure, exposing only `message` to clients.
    pub fn internal<E>(op: Op, message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        CoreError::Internal {
            op,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Invalid { .. } => ErrorKind::Invalid,
            CoreError::Auth { .. } => ErrorKind::Auth,
            CoreError::Permission { .. } => ErrorKind::Permission,
            CoreError::Exist { .. } => ErrorKind::Exist,
            CoreError::NotExist { .. } => ErrorKind::NotExist,
            CoreError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// The operation tag where the error was raised.
    pub fn op(&self) -> Op {
        match self {
            CoreError::Invalid { op, .. }
            | CoreError::Auth { op, .. }
            | CoreError::Permission { op, .. }
            | CoreError::Exist { op, .. }
            | CoreError::NotExist { op, .. }
            | CoreError::Internal { op, .. } => op,
        }
    }

    /// The client-facing message.
    pub fn message(&self) -> &str {
        match self {
            CoreError::Invalid { message, .. }
            | CoreError::Auth { message, .. }
            | CoreError::Permission { message, .. }
            | CoreError::Exist { message, .. }
            | CoreError::NotExist { message, .. }
            | CoreError::Internal { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn internal_message_hides_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "connection reset by peer");
        let err = CoreError::internal("db/user/create", INTERNAL_MESSAGE, cause);

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
        assert!(!err.message().contains("connection reset"));
        assert!(err.source().is_some(), "driver error must be kept as source");
    }

    #[test]
    fn display_includes_op_and_kind() {
        let err = CoreError::not_exist("product/service/get", "Product not found.");
        assert_eq!(
            err.to_string(),
            "product/service/get: item does not exist: Product not found."
        );
        assert_eq!(err.op(), "product/service/get");
    }
}
