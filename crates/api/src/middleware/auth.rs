//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use payhere_core::error::CoreError;
use payhere_core::types::DbId;

use crate::error::AppError;
use crate::services::session::INVALID_TOKEN_MESSAGE;
use crate::state::AppState;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in first.";

/// Authenticated caller extracted from the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires a live
/// session:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<StatusCode> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from the `userID` claim).
    pub user_id: DbId,
    /// The raw bearer token, used by logout to revoke this session.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?;

        let identity = state.sessions.authenticate(token).await?;
        Ok(AuthUser {
            user_id: identity.user_id,
            token: identity.token,
        })
    }
}

/// Extract `<token>` from a header of exactly the form `Bearer <token>`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, CoreError> {
    const OP: &str = "middleware/auth/bearer_token";

    let header = header
        .filter(|h| !h.is_empty())
        .ok_or_else(|| CoreError::auth(OP, LOGIN_REQUIRED_MESSAGE))?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(CoreError::auth(OP, INVALID_TOKEN_MESSAGE)),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_bearer_scheme() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_asks_for_login() {
        for header in [None, Some("")] {
            assert_matches!(
                bearer_token(header),
                Err(CoreError::Auth { ref message, .. }) if message == LOGIN_REQUIRED_MESSAGE
            );
        }
    }

    #[test]
    fn rejects_malformed_headers() {
        for header in ["abc", "Basic abc", "Bearer", "Bearer ", "Bearer a b", "bearer abc"] {
            assert_matches!(
                bearer_token(Some(header)),
                Err(CoreError::Auth { ref message, .. }) if message == INVALID_TOKEN_MESSAGE,
                "header {header:?}"
            );
        }
    }
}
