//! Handlers for the `/users` resource (signup, login, logout).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::services::session::{Identity, LoginOutcome};
use crate::state::AppState;

/// Request body for `POST /users` and `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(rename = "mobileID")]
    pub mobile_id: String,
    pub password: String,
}

/// POST /users
///
/// Register a place account. Responds 204 with no body.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(input) = payload?;
    state
        .sessions
        .signup(&input.mobile_id, &input.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/login
///
/// Exchange credentials for an access token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<LoginOutcome>>> {
    let Json(input) = payload?;
    let outcome = state
        .sessions
        .login(&input.mobile_id, &input.password)
        .await?;
    Ok(Envelope::ok(outcome))
}

/// POST /users/logout
///
/// Revoke the session whose token authenticated this request.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let identity = Identity {
        user_id: user.user_id,
        token: user.token,
    };
    state.sessions.logout(&identity).await?;
    Ok(StatusCode::NO_CONTENT)
}
