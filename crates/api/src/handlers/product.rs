//! Handlers for the `/products` resource.
//!
//! Every route requires a live session; products are scoped to the caller.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use payhere_core::types::DbId;
use payhere_db::models::product::Product;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::services::product::{NewProduct, ProductPage, ProductPatch};
use crate::state::AppState;

/// Query parameters for `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Id of the last product already seen. Absent or empty means the first page.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub cursor: Option<DbId>,
    /// Name substring, or a run of Hangul initial consonants.
    pub search: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Response payload for `GET /products/{id}`.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// POST /products
pub async fn create_product(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(input) = payload?;
    state.products.create(user.user_id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /products/{id}
pub async fn get_product(
    user: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Envelope<ProductResponse>>> {
    let Path(id) = id?;
    let product = state.products.get(user.user_id, id).await?;
    Ok(Envelope::ok(ProductResponse { product }))
}

/// PATCH /products
///
/// The body names the product by `id`; absent fields are left unchanged.
pub async fn patch_product(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(patch) = payload?;
    state.products.patch(user.user_id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /products/{id}
pub async fn delete_product(
    user: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.products.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /products?cursor=&search=
pub async fn list_products(
    user: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<ListProductsQuery>, QueryRejection>,
) -> AppResult<Json<Envelope<ProductPage>>> {
    let Query(params) = params?;
    let page = state
        .products
        .list(user.user_id, params.cursor, params.search.as_deref())
        .await?;
    Ok(Envelope::ok(page))
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::*;

    fn parse(uri: &str) -> Option<ListProductsQuery> {
        let uri: Uri = uri.parse().unwrap();
        Query::<ListProductsQuery>::try_from_uri(&uri)
            .ok()
            .map(|Query(q)| q)
    }

    #[test]
    fn empty_cursor_means_first_page() {
        let query = parse("/products?cursor=&search=").unwrap();
        assert_eq!(query.cursor, None);
        assert_eq!(query.search.as_deref(), Some(""));

        let query = parse("/products").unwrap();
        assert_eq!(query.cursor, None);
        assert_eq!(query.search, None);
    }

    #[test]
    fn numeric_cursor_is_parsed() {
        assert_eq!(parse("/products?cursor=10").unwrap().cursor, Some(10));
        assert!(parse("/products?cursor=ten").is_none());
    }
}
