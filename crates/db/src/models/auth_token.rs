//! Auth token (login session) model and DTOs.

use payhere_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One issued JWT from the `auth_tokens` table.
///
/// Rows are never deleted; logout flips `active` to `false` for good.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub id: DbId,
    pub user_id: DbId,
    pub jwt_token: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AuthToken {
    /// Active and not yet past its recorded expiry.
    pub fn is_usable_at(&self, now: Timestamp) -> bool {
        self.active && self.expires_at >= now
    }
}

/// DTO for recording a freshly issued token. New rows start active.
#[derive(Debug, Clone)]
pub struct CreateAuthToken {
    pub user_id: DbId,
    pub jwt_token: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}
