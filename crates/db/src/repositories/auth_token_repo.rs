//! Repository for the `auth_tokens` table.

use async_trait::async_trait;
use payhere_core::types::DbId;
use sqlx::PgPool;

use crate::models::auth_token::{AuthToken, CreateAuthToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, jwt_token, issued_at, expires_at, active, created_at, updated_at";

/// Server-side record of issued JWTs.
///
/// A user may hold any number of sessions; `(user_id, jwt_token)` is the
/// lookup key.
#[async_trait]
pub trait AuthTokenStore: Send + Sync {
    /// Record a newly issued token as active, returning its id.
    async fn create(&self, input: &CreateAuthToken) -> Result<DbId, sqlx::Error>;

    /// Find the session for an exact `(user_id, jwt_token)` pair.
    ///
    /// `Ok(None)` means no such session; `Err` means the lookup itself failed.
    async fn find_by_user_and_token(
        &self,
        user_id: DbId,
        jwt_token: &str,
    ) -> Result<Option<AuthToken>, sqlx::Error>;

    /// Mark the matching session inactive. Deactivating an already inactive
    /// or unknown session is not an error.
    async fn deactivate(&self, user_id: DbId, jwt_token: &str) -> Result<(), sqlx::Error>;
}

/// Postgres-backed [`AuthTokenStore`].
#[derive(Clone)]
pub struct AuthTokenRepo {
    pool: PgPool,
}

impl AuthTokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthTokenStore for AuthTokenRepo {
    async fn create(&self, input: &CreateAuthToken) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO auth_tokens (user_id, jwt_token, issued_at, expires_at, active)
             VALUES ($1, $2, $3, $4, true)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.jwt_token)
        .bind(input.issued_at)
        .bind(input.expires_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_user_and_token(
        &self,
        user_id: DbId,
        jwt_token: &str,
    ) -> Result<Option<AuthToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auth_tokens
             WHERE user_id = $1 AND jwt_token = $2
             ORDER BY id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, AuthToken>(&query)
            .bind(user_id)
            .bind(jwt_token)
            .fetch_optional(&self.pool)
            .await
    }

    async fn deactivate(&self, user_id: DbId, jwt_token: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE auth_tokens SET active = false, updated_at = NOW()
             WHERE user_id = $1 AND jwt_token = $2",
        )
        .bind(user_id)
        .bind(jwt_token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
