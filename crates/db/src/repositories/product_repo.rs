//! Repository for the `products` table.
//!
//! Products are soft-deleted: every read filters `deleted_at IS NULL`.

use async_trait::async_trait;
use payhere_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{
    CreateProduct, ListProductsParams, Product, ProductFilter, UpdateProduct,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, initial, category, price, cost, name, description, \
                       barcode, expiry_date, size, created_at, updated_at, deleted_at";

/// Product catalog storage.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product, returning its id.
    async fn create(&self, input: &CreateProduct) -> Result<DbId, sqlx::Error>;

    /// Find a live (not soft-deleted) product by id.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Product>, sqlx::Error>;

    /// Apply the `Some` fields of `input`. Returns `true` if a live row was updated.
    async fn update(&self, id: DbId, input: &UpdateProduct) -> Result<bool, sqlx::Error>;

    /// Stamp `deleted_at`. Returns `true` if a live row was deleted.
    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// One page of a user's live products in ascending id order.
    async fn list(&self, params: &ListProductsParams) -> Result<Vec<Product>, sqlx::Error>;
}

/// Postgres-backed [`ProductStore`].
#[derive(Clone)]
pub struct ProductRepo {
    pool: PgPool,
}

impl ProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepo {
    async fn create(&self, input: &CreateProduct) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO products
                (user_id, initial, category, price, cost, name, description, barcode, expiry_date, size)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.initial)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.cost)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.barcode)
        .bind(input.expiry_date)
        .bind(input.size.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update(&self, id: DbId, input: &UpdateProduct) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET
                initial = COALESCE($2, initial),
                category = COALESCE($3, category),
                price = COALESCE($4, price),
                cost = COALESCE($5, cost),
                name = COALESCE($6, name),
                description = COALESCE($7, description),
                barcode = COALESCE($8, barcode),
                expiry_date = COALESCE($9, expiry_date),
                size = COALESCE($10, size),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(&input.initial)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.cost)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.barcode)
        .bind(input.expiry_date)
        .bind(input.size.map(|s| s.as_str()))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, params: &ListProductsParams) -> Result<Vec<Product>, sqlx::Error> {
        let (name_pattern, initial_pattern) = match &params.filter {
            Some(ProductFilter::Name(term)) => (Some(contains_pattern(term)), None),
            Some(ProductFilter::Initial(term)) => (None, Some(contains_pattern(term))),
            None => (None, None),
        };

        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE user_id = $1
               AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR id > $2)
               AND ($3::TEXT IS NULL OR name LIKE $3)
               AND ($4::TEXT IS NULL OR initial LIKE $4)
             ORDER BY id ASC
             LIMIT $5"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(params.user_id)
            .bind(params.cursor)
            .bind(name_pattern)
            .bind(initial_pattern)
            .bind(params.limit)
            .fetch_all(&self.pool)
            .await
    }
}

/// Build a `LIKE` pattern matching `term` anywhere, with wildcards in `term`
/// taken literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("라떼"), "%라떼%");
        assert_eq!(contains_pattern("ㅅㅋㄹ"), "%ㅅㅋㄹ%");
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
