//! Product entity model and DTOs.

use payhere_core::product::ProductSize;
use payhere_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    #[serde(rename = "userID")]
    pub user_id: DbId,
    /// Chosung form of `name`, kept in sync on every name change.
    pub initial: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub name: String,
    pub description: String,
    pub barcode: String,
    pub expiry_date: Timestamp,
    #[sqlx(try_from = "String")]
    pub size: ProductSize,
    #[serde(rename = "createdDate")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedDate")]
    pub updated_at: Timestamp,
    #[serde(rename = "deletedDate")]
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub user_id: DbId,
    pub initial: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub name: String,
    pub description: String,
    pub barcode: String,
    pub expiry_date: Timestamp,
    pub size: ProductSize,
}

/// DTO for updating a product. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub initial: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub expiry_date: Option<Timestamp>,
    pub size: Option<ProductSize>,
}

/// Search predicate for a product listing. Exactly one column is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Substring of `name`.
    Name(String),
    /// Substring of `initial`.
    Initial(String),
}

/// Parameters for a cursor-paginated product listing.
#[derive(Debug, Clone)]
pub struct ListProductsParams {
    pub user_id: DbId,
    /// Only products with `id > cursor` are returned.
    pub cursor: Option<DbId>,
    pub filter: Option<ProductFilter>,
    pub limit: i64,
}
