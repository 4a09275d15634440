use axum::routing::post;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Account routes.
///
/// ```text
/// POST /users           signup (public)
/// POST /users/login     login (public)
/// POST /users/logout    logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(user::signup))
        .route("/users/login", post(user::login))
        .route("/users/logout", post(user::logout))
}
