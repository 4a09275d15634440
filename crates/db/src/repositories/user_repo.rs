//! Repository for the `users` table.

use async_trait::async_trait;
use payhere_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, mobile_id, password_hash, use_type, created_at, updated_at";

/// Lookup and creation of user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, returning its id.
    async fn create(&self, input: &CreateUser) -> Result<DbId, sqlx::Error>;

    /// Find a user by canonical phone number.
    async fn find_by_mobile_id(&self, mobile_id: &str) -> Result<Option<User>, sqlx::Error>;
}

/// Postgres-backed [`UserStore`].
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn create(&self, input: &CreateUser) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO users (mobile_id, password_hash, use_type)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.mobile_id)
        .bind(&input.password_hash)
        .bind(input.use_type.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_mobile_id(&self, mobile_id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE mobile_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(mobile_id)
            .fetch_optional(&self.pool)
            .await
    }
}
