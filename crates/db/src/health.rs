//! Round-trip check against the backing store.

use async_trait::async_trait;
use sqlx::PgPool;

/// Something that can tell whether the store is reachable.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trip the store once.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// [`StoreHealth`] over the Postgres pool.
pub struct PoolHealth {
    pool: PgPool,
}

impl PoolHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PoolHealth {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
