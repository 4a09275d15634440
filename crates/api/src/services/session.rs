//! Signup, login, logout and the authentication guard.
//!
//! A session is a signed JWT plus a row in `auth_tokens`. The guard checks
//! both, so revoking the row ends the session even while the JWT's own
//! `exp` is still in the future.

use std::sync::Arc;

use chrono::{Duration, Utc};
use payhere_core::credentials::{normalize_phone, validate_password};
use payhere_core::error::{CoreError, INTERNAL_MESSAGE};
use payhere_core::types::DbId;
use payhere_db::models::auth_token::CreateAuthToken;
use payhere_db::models::user::{CreateUser, UseType};
use payhere_db::repositories::{AuthTokenStore, UserStore};
use serde::Serialize;

use crate::auth::jwt::{self, JwtConfig};
use crate::auth::password;

pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password.";
pub const MOBILE_ID_IN_USE_MESSAGE: &str = "Mobile phone number already in use.";
/// Shared by every login failure so callers cannot probe which accounts exist.
pub const LOGIN_FAILED_MESSAGE: &str = "Check your ID or password.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Login has expired.";
pub const ALREADY_LOGGED_OUT_MESSAGE: &str = "Already logged out.";

/// The caller behind a request that passed the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: DbId,
    /// The raw bearer token, needed to revoke this exact session.
    pub token: String,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub access_token: String,
    /// Session expiry as a Unix timestamp.
    pub expires_in: i64,
}

pub struct SessionService {
    users: Arc<dyn UserStore>,
    auth_tokens: Arc<dyn AuthTokenStore>,
    jwt: JwtConfig,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserStore>,
        auth_tokens: Arc<dyn AuthTokenStore>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            users,
            auth_tokens,
            jwt,
        }
    }

    /// Register a place account and return its id.
    pub async fn signup(&self, mobile_id: &str, password: &str) -> Result<DbId, CoreError> {
        const OP: &str = "service/session/signup";

        let mobile_id = normalize_phone(mobile_id)?;
        if !validate_password(password) {
            return Err(CoreError::invalid(OP, INVALID_PASSWORD_MESSAGE));
        }

        let existing = self
            .users
            .find_by_mobile_id(&mobile_id)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;
        if existing.is_some() {
            return Err(CoreError::invalid(OP, MOBILE_ID_IN_USE_MESSAGE));
        }

        let password_hash = password::hash_password(password)
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e.to_string()))?;

        let input = CreateUser {
            mobile_id,
            password_hash,
            use_type: UseType::Place,
        };
        let user_id = self.users.create(&input).await.map_err(|e| {
            // Lost a race with a concurrent signup for the same number.
            if is_unique_violation(&e) {
                CoreError::exist(OP, MOBILE_ID_IN_USE_MESSAGE)
            } else {
                CoreError::internal(OP, INTERNAL_MESSAGE, e)
            }
        })?;

        tracing::info!(user_id, "User signed up");
        Ok(user_id)
    }

    /// Verify credentials, issue a JWT and record it as an active session.
    ///
    /// Malformed input, an unknown number and a wrong password all fail with
    /// [`LOGIN_FAILED_MESSAGE`].
    pub async fn login(&self, mobile_id: &str, password: &str) -> Result<LoginOutcome, CoreError> {
        const OP: &str = "service/session/login";

        let mobile_id =
            normalize_phone(mobile_id).map_err(|_| CoreError::invalid(OP, LOGIN_FAILED_MESSAGE))?;
        if !validate_password(password) {
            return Err(CoreError::invalid(OP, LOGIN_FAILED_MESSAGE));
        }

        let user = self
            .users
            .find_by_mobile_id(&mobile_id)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?
            .ok_or_else(|| CoreError::invalid(OP, LOGIN_FAILED_MESSAGE))?;

        let matches = password::verify_password(password, &user.password_hash)
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e.to_string()))?;
        if !matches {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(CoreError::invalid(OP, LOGIN_FAILED_MESSAGE));
        }

        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::hours(self.jwt.expiry_hours);
        let access_token = jwt::generate_access_token(user.id, expires_at, &self.jwt)
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;

        let session = CreateAuthToken {
            user_id: user.id,
            jwt_token: access_token.clone(),
            issued_at,
            expires_at,
        };
        self.auth_tokens
            .create(&session)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(LoginOutcome {
            access_token,
            expires_in: expires_at.timestamp(),
        })
    }

    /// Resolve a bearer token to the caller's identity.
    ///
    /// Requires a valid HS256 signature, an integer `userID` claim and a
    /// stored session for that exact token that is active and unexpired.
    /// Every failure, including a storage error, is [`CoreError::Auth`].
    pub async fn authenticate(&self, token: &str) -> Result<Identity, CoreError> {
        const OP: &str = "service/session/authenticate";

        let claims = jwt::validate_token(token, &self.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            CoreError::auth(OP, INVALID_TOKEN_MESSAGE)
        })?;

        let session = self
            .auth_tokens
            .find_by_user_and_token(claims.user_id, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Session lookup failed");
                CoreError::auth(OP, INTERNAL_MESSAGE)
            })?
            .ok_or_else(|| CoreError::auth(OP, INVALID_TOKEN_MESSAGE))?;

        if !session.is_usable_at(Utc::now()) {
            return Err(CoreError::auth(OP, SESSION_EXPIRED_MESSAGE));
        }

        Ok(Identity {
            user_id: claims.user_id,
            token: token.to_string(),
        })
    }

    /// Revoke the session behind `identity`. Revocation is permanent.
    pub async fn logout(&self, identity: &Identity) -> Result<(), CoreError> {
        const OP: &str = "service/session/logout";

        let session = self
            .auth_tokens
            .find_by_user_and_token(identity.user_id, &identity.token)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;
        match session {
            Some(row) if row.active => {}
            _ => return Err(CoreError::invalid(OP, ALREADY_LOGGED_OUT_MESSAGE)),
        }

        self.auth_tokens
            .deactivate(identity.user_id, &identity.token)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;

        tracing::info!(user_id = identity.user_id, "User logged out");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
