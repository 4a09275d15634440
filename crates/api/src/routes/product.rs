use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Product routes. All require auth.
///
/// ```text
/// GET    /products              list (?cursor, ?search)
/// POST   /products              create
/// PATCH  /products              partial update (id in body)
/// GET    /products/{id}         get
/// DELETE /products/{id}         soft delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(product::list_products)
                .post(product::create_product)
                .patch(product::patch_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product).delete(product::delete_product),
        )
}
