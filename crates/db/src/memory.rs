//! In-memory implementations of the store traits.
//!
//! Compiled only with the `memory` feature. They follow the same semantics as
//! the Postgres repositories (soft-delete filtering, ascending id pages,
//! substring search, unique `mobile_id`) so service and HTTP tests can run
//! without a database.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use payhere_core::types::DbId;
use sqlx::error::{DatabaseError, ErrorKind};

use crate::health::StoreHealth;
use crate::models::auth_token::{AuthToken, CreateAuthToken};
use crate::models::product::{
    CreateProduct, ListProductsParams, Product, ProductFilter, UpdateProduct,
};
use crate::models::user::{CreateUser, User};
use crate::repositories::{AuthTokenStore, ProductStore, UserStore};

const USERS_MOBILE_ID_CONSTRAINT: &str = "uq_users_mobile_id";

/// Mirrors the Postgres unique violation on `users.mobile_id`.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key value violates unique constraint \"uq_users_mobile_id\"")]
struct UniqueViolation;

impl DatabaseError for UniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some(USERS_MOBILE_ID_CONSTRAINT)
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    auth_tokens: Vec<AuthToken>,
    products: Vec<Product>,
}

/// A single store backing all three traits.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the pool were exhausted.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency` before it touches the tables.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// All auth token rows, including inactive ones.
    pub fn auth_tokens(&self) -> Vec<AuthToken> {
        self.lock().auth_tokens.clone()
    }

    /// A product row regardless of its soft-delete state.
    pub fn product_including_deleted(&self, id: DbId) -> Option<Product> {
        self.lock().products.iter().find(|p| p.id == id).cloned()
    }

    async fn check(&self) -> Result<(), sqlx::Error> {
        let latency_ms = self.latency_ms.load(Ordering::SeqCst);
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn next_id(len: usize) -> DbId {
    len as DbId + 1
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, input: &CreateUser) -> Result<DbId, sqlx::Error> {
        self.check().await?;
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.mobile_id == input.mobile_id) {
            return Err(sqlx::Error::Database(Box::new(UniqueViolation)));
        }
        let now = Utc::now();
        let id = next_id(tables.users.len());
        tables.users.push(User {
            id,
            mobile_id: input.mobile_id.clone(),
            password_hash: input.password_hash.clone(),
            use_type: input.use_type,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_mobile_id(&self, mobile_id: &str) -> Result<Option<User>, sqlx::Error> {
        self.check().await?;
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.mobile_id == mobile_id)
            .cloned())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check().await
    }
}

#[async_trait]
impl AuthTokenStore for MemoryStore {
    async fn create(&self, input: &CreateAuthToken) -> Result<DbId, sqlx::Error> {
        self.check().await?;
        let mut tables = self.lock();
        let now = Utc::now();
        let id = next_id(tables.auth_tokens.len());
        tables.auth_tokens.push(AuthToken {
            id,
            user_id: input.user_id,
            jwt_token: input.jwt_token.clone(),
            issued_at: input.issued_at,
            expires_at: input.expires_at,
            active: true,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_user_and_token(
        &self,
        user_id: DbId,
        jwt_token: &str,
    ) -> Result<Option<AuthToken>, sqlx::Error> {
        self.check().await?;
        Ok(self
            .lock()
            .auth_tokens
            .iter()
            .rev()
            .find(|t| t.user_id == user_id && t.jwt_token == jwt_token)
            .cloned())
    }

    async fn deactivate(&self, user_id: DbId, jwt_token: &str) -> Result<(), sqlx::Error> {
        self.check().await?;
        let now = Utc::now();
        for token in self
            .lock()
            .auth_tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && t.jwt_token == jwt_token)
        {
            token.active = false;
            token.updated_at = now;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create(&self, input: &CreateProduct) -> Result<DbId, sqlx::Error> {
        self.check().await?;
        let mut tables = self.lock();
        let now = Utc::now();
        let id = next_id(tables.products.len());
        tables.products.push(Product {
            id,
            user_id: input.user_id,
            initial: input.initial.clone(),
            category: input.category.clone(),
            price: input.price,
            cost: input.cost,
            name: input.name.clone(),
            description: input.description.clone(),
            barcode: input.barcode.clone(),
            expiry_date: input.expiry_date,
            size: input.size,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        self.check().await?;
        Ok(self
            .lock()
            .products
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn update(&self, id: DbId, input: &UpdateProduct) -> Result<bool, sqlx::Error> {
        self.check().await?;
        let mut tables = self.lock();
        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        else {
            return Ok(false);
        };

        if let Some(initial) = &input.initial {
            product.initial = initial.clone();
        }
        if let Some(category) = &input.category {
            product.category = category.clone();
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(cost) = input.cost {
            product.cost = cost;
        }
        if let Some(name) = &input.name {
            product.name = name.clone();
        }
        if let Some(description) = &input.description {
            product.description = description.clone();
        }
        if let Some(barcode) = &input.barcode {
            product.barcode = barcode.clone();
        }
        if let Some(expiry_date) = input.expiry_date {
            product.expiry_date = expiry_date;
        }
        if let Some(size) = input.size {
            product.size = size;
        }
        product.updated_at = Utc::now();
        Ok(true)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        self.check().await?;
        let mut tables = self.lock();
        match tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        {
            Some(product) => {
                product.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, params: &ListProductsParams) -> Result<Vec<Product>, sqlx::Error> {
        self.check().await?;
        let limit = usize::try_from(params.limit).unwrap_or(0);
        let mut page: Vec<Product> = self
            .lock()
            .products
            .iter()
            .filter(|p| p.user_id == params.user_id && p.deleted_at.is_none())
            .filter(|p| params.cursor.map_or(true, |cursor| p.id > cursor))
            .filter(|p| match &params.filter {
                Some(ProductFilter::Name(term)) => p.name.contains(term.as_str()),
                Some(ProductFilter::Initial(term)) => p.initial.contains(term.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        page.sort_by_key(|p| p.id);
        page.truncate(limit);
        Ok(page)
    }
}
