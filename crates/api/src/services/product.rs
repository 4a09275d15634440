//! Owner-scoped product CRUD and cursor-paginated search.

use std::sync::Arc;

use payhere_core::chosung::{extract_initials, is_chosung_query};
use payhere_core::error::{CoreError, Op, INTERNAL_MESSAGE};
use payhere_core::product::{
    require_amount, require_expiry_date, require_product_id, require_text, ProductSize,
    INVALID_BARCODE_MESSAGE,
    INVALID_CATEGORY_MESSAGE, INVALID_COST_MESSAGE, INVALID_DESCRIPTION_MESSAGE,
    INVALID_NAME_MESSAGE, INVALID_PRICE_MESSAGE, PAGE_SIZE,
};
use payhere_core::types::{DbId, Timestamp};
use payhere_db::models::product::{
    CreateProduct, ListProductsParams, Product, ProductFilter, UpdateProduct,
};
use payhere_db::repositories::ProductStore;
use serde::{Deserialize, Serialize};

pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product not found.";
pub const NOT_OWNER_MESSAGE: &str = "You do not have permission for this product.";

/// Request body for registering a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub name: String,
    pub description: String,
    pub barcode: String,
    pub expiry_date: Timestamp,
    pub size: ProductSize,
}

impl NewProduct {
    pub fn validate(&self, op: Op) -> Result<(), CoreError> {
        require_text(op, &self.category, INVALID_CATEGORY_MESSAGE)?;
        require_amount(op, self.price, INVALID_PRICE_MESSAGE)?;
        require_amount(op, self.cost, INVALID_COST_MESSAGE)?;
        require_text(op, &self.name, INVALID_NAME_MESSAGE)?;
        require_text(op, &self.description, INVALID_DESCRIPTION_MESSAGE)?;
        require_text(op, &self.barcode, INVALID_BARCODE_MESSAGE)?;
        require_expiry_date(op, self.expiry_date)?;
        Ok(())
    }
}

/// Request body for a partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub id: DbId,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub expiry_date: Option<Timestamp>,
    pub size: Option<ProductSize>,
}

impl ProductPatch {
    /// Validate only the fields that are present.
    pub fn validate(&self, op: Op) -> Result<(), CoreError> {
        require_product_id(op, self.id)?;
        if let Some(category) = &self.category {
            require_text(op, category, INVALID_CATEGORY_MESSAGE)?;
        }
        if let Some(price) = self.price {
            require_amount(op, price, INVALID_PRICE_MESSAGE)?;
        }
        if let Some(cost) = self.cost {
            require_amount(op, cost, INVALID_COST_MESSAGE)?;
        }
        if let Some(name) = &self.name {
            require_text(op, name, INVALID_NAME_MESSAGE)?;
        }
        if let Some(description) = &self.description {
            require_text(op, description, INVALID_DESCRIPTION_MESSAGE)?;
        }
        if let Some(barcode) = &self.barcode {
            require_text(op, barcode, INVALID_BARCODE_MESSAGE)?;
        }
        if let Some(expiry_date) = self.expiry_date {
            require_expiry_date(op, expiry_date)?;
        }
        Ok(())
    }

    fn into_update(self) -> UpdateProduct {
        UpdateProduct {
            initial: self.name.as_deref().map(extract_initials),
            category: self.category,
            price: self.price,
            cost: self.cost,
            name: self.name,
            description: self.description,
            barcode: self.barcode,
            expiry_date: self.expiry_date,
            size: self.size,
        }
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Id of the last product on this page; `null` when the page is empty.
    pub cursor: Option<DbId>,
}

pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Register a product owned by `user_id` and return its id.
    pub async fn create(&self, user_id: DbId, input: NewProduct) -> Result<DbId, CoreError> {
        const OP: &str = "service/product/create";
        input.validate(OP)?;

        let create = CreateProduct {
            user_id,
            initial: extract_initials(&input.name),
            category: input.category,
            price: input.price,
            cost: input.cost,
            name: input.name,
            description: input.description,
            barcode: input.barcode,
            expiry_date: input.expiry_date,
            size: input.size,
        };
        let id = self
            .products
            .create(&create)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;

        tracing::info!(user_id, product_id = id, "Product created");
        Ok(id)
    }

    pub async fn get(&self, user_id: DbId, id: DbId) -> Result<Product, CoreError> {
        const OP: &str = "service/product/get";
        require_product_id(OP, id)?;
        self.owned(OP, user_id, id).await
    }

    /// Apply a partial update. A new `name` also refreshes the stored initials.
    pub async fn patch(&self, user_id: DbId, patch: ProductPatch) -> Result<(), CoreError> {
        const OP: &str = "service/product/patch";
        patch.validate(OP)?;

        let id = patch.id;
        self.owned(OP, user_id, id).await?;

        let updated = self
            .products
            .update(id, &patch.into_update())
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;
        if !updated {
            return Err(CoreError::not_exist(OP, PRODUCT_NOT_FOUND_MESSAGE));
        }

        tracing::info!(user_id, product_id = id, "Product updated");
        Ok(())
    }

    /// Soft-delete a product. Deleted products behave as nonexistent.
    pub async fn delete(&self, user_id: DbId, id: DbId) -> Result<(), CoreError> {
        const OP: &str = "service/product/delete";
        require_product_id(OP, id)?;
        self.owned(OP, user_id, id).await?;

        let deleted = self
            .products
            .soft_delete(id)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;
        if !deleted {
            return Err(CoreError::not_exist(OP, PRODUCT_NOT_FOUND_MESSAGE));
        }

        tracing::info!(user_id, product_id = id, "Product deleted");
        Ok(())
    }

    /// List the caller's products in ascending id order, [`PAGE_SIZE`] at a time.
    ///
    /// A search made only of Hangul initial consonants matches against the
    /// stored initials; any other non-empty search matches the name.
    pub async fn list(
        &self,
        user_id: DbId,
        cursor: Option<DbId>,
        search: Option<&str>,
    ) -> Result<ProductPage, CoreError> {
        const OP: &str = "service/product/list";

        let filter = search.filter(|s| !s.is_empty()).map(|s| {
            if is_chosung_query(s) {
                ProductFilter::Initial(s.to_string())
            } else {
                ProductFilter::Name(s.to_string())
            }
        });
        let params = ListProductsParams {
            user_id,
            cursor,
            filter,
            limit: PAGE_SIZE,
        };

        let products = self
            .products
            .list(&params)
            .await
            .map_err(|e| CoreError::internal(OP, INTERNAL_MESSAGE, e))?;
        let cursor = products.last().map(|p| p.id);

        Ok(ProductPage { products, cursor })
    }

    /// Load a live product and check that `user_id` owns it.
    async fn owned(&self, op: Op, user_id: DbId, id: DbId) -> Result<Product, CoreError> {
        let product = self
            .products
            .find_by_id(id)
            .await
            .map_err(|e| CoreError::internal(op, INTERNAL_MESSAGE, e))?
            .ok_or_else(|| CoreError::not_exist(op, PRODUCT_NOT_FOUND_MESSAGE))?;

        if product.user_id != user_id {
            tracing::debug!(user_id, product_id = id, owner = product.user_id, "Not the owner");
            return Err(CoreError::permission(op, NOT_OWNER_MESSAGE));
        }
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use payhere_core::product::{INVALID_EXPIRY_DATE_MESSAGE, INVALID_PRODUCT_ID_MESSAGE};
    use payhere_db::memory::MemoryStore;

    use super::*;

    const OWNER: DbId = 1;
    const STRANGER: DbId = 2;

    fn service() -> (ProductService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ProductService::new(store.clone()), store)
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            category: "coffee".to_string(),
            price: 4500.0,
            cost: 1200.0,
            name: name.to_string(),
            description: "house blend".to_string(),
            barcode: "8801234567890".to_string(),
            expiry_date: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            size: ProductSize::Small,
        }
    }

    fn empty_patch(id: DbId) -> ProductPatch {
        ProductPatch {
            id,
            category: None,
            price: None,
            cost: None,
            name: None,
            description: None,
            barcode: None,
            expiry_date: None,
            size: None,
        }
    }

    #[tokio::test]
    async fn create_stores_initials() {
        let (svc, _store) = service();
        let id = svc.create(OWNER, new_product("슈크림 라떼")).await.unwrap();

        let product = svc.get(OWNER, id).await.unwrap();
        assert_eq!(product.name, "슈크림 라떼");
        assert_eq!(product.initial, "ㅅㅋㄹ ㄹㄸ");
        assert_eq!(product.user_id, OWNER);
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields() {
        let (svc, _store) = service();

        let mut input = new_product("latte");
        input.price = -1.0;
        let err = svc.create(OWNER, input).await.unwrap_err();
        assert_matches!(err, CoreError::Invalid { ref message, .. } if message == INVALID_PRICE_MESSAGE);

        let mut input = new_product("latte");
        input.barcode.clear();
        let err = svc.create(OWNER, input).await.unwrap_err();
        assert_matches!(err, CoreError::Invalid { ref message, .. } if message == INVALID_BARCODE_MESSAGE);
    }

    #[tokio::test]
    async fn unset_expiry_date_is_rejected() {
        let (svc, _store) = service();
        let unset: Timestamp = "0001-01-01T00:00:00Z".parse().unwrap();

        let mut input = new_product("latte");
        input.expiry_date = unset;
        let err = svc.create(OWNER, input).await.unwrap_err();
        assert_matches!(err, CoreError::Invalid { ref message, .. } if message == INVALID_EXPIRY_DATE_MESSAGE);

        let id = svc.create(OWNER, new_product("latte")).await.unwrap();
        let mut patch = empty_patch(id);
        patch.expiry_date = Some(unset);
        assert_matches!(
            svc.patch(OWNER, patch).await,
            Err(CoreError::Invalid { ref message, .. }) if message == INVALID_EXPIRY_DATE_MESSAGE
        );
    }

    #[tokio::test]
    async fn get_distinguishes_missing_from_foreign() {
        let (svc, _store) = service();
        let id = svc.create(OWNER, new_product("latte")).await.unwrap();

        assert_matches!(
            svc.get(STRANGER, id).await,
            Err(CoreError::Permission { .. })
        );
        assert_matches!(svc.get(OWNER, 999).await, Err(CoreError::NotExist { .. }));
        assert_matches!(
            svc.get(OWNER, 0).await,
            Err(CoreError::Invalid { ref message, .. }) if message == INVALID_PRODUCT_ID_MESSAGE
        );
    }

    #[tokio::test]
    async fn patch_changes_only_supplied_fields() {
        let (svc, _store) = service();
        let id = svc.create(OWNER, new_product("슈크림 라떼")).await.unwrap();
        let before = svc.get(OWNER, id).await.unwrap();

        let mut patch = empty_patch(id);
        patch.price = Some(5000.0);
        svc.patch(OWNER, patch).await.unwrap();

        let after = svc.get(OWNER, id).await.unwrap();
        assert_eq!(after.price, 5000.0);
        assert_eq!(after.name, before.name);
        assert_eq!(after.initial, before.initial);
        assert_eq!(after.cost, before.cost);
        assert_eq!(after.size, before.size);
    }

    #[tokio::test]
    async fn patch_name_recomputes_initials() {
        let (svc, _store) = service();
        let id = svc.create(OWNER, new_product("슈크림 라떼")).await.unwrap();

        let mut patch = empty_patch(id);
        patch.name = Some("아메리카노".to_string());
        svc.patch(OWNER, patch).await.unwrap();

        let after = svc.get(OWNER, id).await.unwrap();
        assert_eq!(after.name, "아메리카노");
        assert_eq!(after.initial, "ㅇㅁㄹㅋㄴ");
    }

    #[tokio::test]
    async fn patch_checks_ownership_and_input() {
        let (svc, _store) = service();
        let id = svc.create(OWNER, new_product("latte")).await.unwrap();

        let mut patch = empty_patch(id);
        patch.cost = Some(1.0);
        assert_matches!(
            svc.patch(STRANGER, patch).await,
            Err(CoreError::Permission { .. })
        );

        let mut patch = empty_patch(id);
        patch.name = Some(String::new());
        assert_matches!(
            svc.patch(OWNER, patch).await,
            Err(CoreError::Invalid { ref message, .. }) if message == INVALID_NAME_MESSAGE
        );

        assert_matches!(
            svc.patch(OWNER, empty_patch(-3)).await,
            Err(CoreError::Invalid { .. })
        );
    }

    #[tokio::test]
    async fn delete_hides_product_but_keeps_row() {
        let (svc, store) = service();
        let id = svc.create(OWNER, new_product("latte")).await.unwrap();

        assert_matches!(
            svc.delete(STRANGER, id).await,
            Err(CoreError::Permission { .. })
        );
        svc.delete(OWNER, id).await.unwrap();

        assert_matches!(svc.get(OWNER, id).await, Err(CoreError::NotExist { .. }));
        assert_matches!(svc.delete(OWNER, id).await, Err(CoreError::NotExist { .. }));
        assert!(store
            .product_including_deleted(id)
            .is_some_and(|p| p.deleted_at.is_some()));

        let page = svc.list(OWNER, None, None).await.unwrap();
        assert!(page.products.is_empty());
        assert_eq!(page.cursor, None);
    }

    #[tokio::test]
    async fn list_pages_by_cursor() {
        let (svc, _store) = service();
        for i in 0..12 {
            svc.create(OWNER, new_product(&format!("item {i}")))
                .await
                .unwrap();
        }
        svc.create(STRANGER, new_product("item x")).await.unwrap();

        let first = svc.list(OWNER, None, None).await.unwrap();
        assert_eq!(first.products.len(), 10);
        let ids: Vec<DbId> = first.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.cursor, Some(10));

        let second = svc.list(OWNER, first.cursor, None).await.unwrap();
        let ids: Vec<DbId> = second.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert_eq!(second.cursor, Some(12));

        let third = svc.list(OWNER, second.cursor, None).await.unwrap();
        assert!(third.products.is_empty());
        assert_eq!(third.cursor, None);
    }

    #[tokio::test]
    async fn list_searches_by_name_or_initials() {
        let (svc, _store) = service();
        let latte = svc.create(OWNER, new_product("슈크림 라떼")).await.unwrap();
        let americano = svc.create(OWNER, new_product("아메리카노")).await.unwrap();

        let page = svc.list(OWNER, None, Some("라떼")).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].id, latte);

        let page = svc.list(OWNER, None, Some("ㄹㄸ")).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].id, latte);

        let page = svc.list(OWNER, None, Some("ㅇㅁ")).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].id, americano);

        // Empty search means no filter.
        let page = svc.list(OWNER, None, Some("")).await.unwrap();
        assert_eq!(page.products.len(), 2);
    }

    #[tokio::test]
    async fn storage_failure_is_internal() {
        let (svc, store) = service();
        store.set_unavailable(true);

        let err = svc.list(OWNER, None, None).await.unwrap_err();
        assert_matches!(err, CoreError::Internal { .. });
        assert_eq!(err.message(), INTERNAL_MESSAGE);
    }
}
