//! Product service.

use market_catalog::{FavoriteRequest, FavoriteResult, FeaturedProduct, MainProduct, ProductId};
use market_core::endpoints;
use market_data::{ApiClient, ApiEnvelope, Params};
use serde_json::json;
use tracing::error;

use crate::banner::TrackResult;
use crate::error::{ServiceError, ADD_FAVORITE_FAILED};

/// Default size of the featured grid.
pub const DEFAULT_FEATURED_LIMIT: u32 = 6;
/// Default size of a category page.
pub const DEFAULT_CATEGORY_LIMIT: u32 = 10;
/// Default size of a search page.
pub const DEFAULT_SEARCH_LIMIT: u32 = 12;

/// Product reads and the favorites call. Nothing here is cached; the query
/// layer decides how long results stay fresh.
#[derive(Debug, Clone)]
pub struct ProductService {
    api: ApiClient,
}

impl ProductService {
    /// Create a service over `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Featured products.
    pub async fn featured_products(&self, limit: u32) -> Result<Vec<FeaturedProduct>, ServiceError> {
        let envelope = self
            .api
            .get::<Vec<FeaturedProduct>>(
                endpoints::FEATURED_PRODUCTS,
                Params::new().insert("limit", limit),
            )
            .await
            .map_err(|e| {
                error!(error = %e, "error fetching featured products");
                e
            })?;
        Ok(envelope.into_data())
    }

    /// Products of one category. Empty on failure.
    pub async fn products_by_category(&self, category_id: u64, limit: u32) -> Vec<MainProduct> {
        match self
            .api
            .get::<Vec<MainProduct>>(
                &endpoints::products_by_category(category_id),
                Params::new().insert("limit", limit),
            )
            .await
        {
            Ok(envelope) => envelope.into_data(),
            Err(e) => {
                error!(category_id, error = %e, "error fetching products by category");
                Vec::new()
            }
        }
    }

    /// One page of search results, with the paging metadata.
    pub async fn search_products(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<ApiEnvelope<Vec<MainProduct>>, ServiceError> {
        let params = Params::new()
            .insert("q", query)
            .insert("page", page)
            .insert("limit", limit);
        self.api
            .get(endpoints::PRODUCTS_SEARCH, params)
            .await
            .map_err(|e| {
                error!(query, error = %e, "error searching products");
                e.into()
            })
    }

    /// Full details of one product.
    pub async fn product_details(&self, id: ProductId) -> Result<MainProduct, ServiceError> {
        let envelope = self
            .api
            .get::<MainProduct>(&endpoints::product(id), Params::new())
            .await
            .map_err(|e| {
                error!(product_id = id, error = %e, "error fetching product details");
                e
            })?;
        Ok(envelope.require_data()?)
    }

    /// Add a product to the user's favorites.
    pub async fn add_to_favorites(&self, id: ProductId) -> Result<FavoriteResult, ServiceError> {
        let envelope = self
            .api
            .post::<_, FavoriteResult>(
                endpoints::USER_FAVORITES,
                &FavoriteRequest { product_id: id },
            )
            .await
            .map_err(|e| {
                error!(product_id = id, error = %e, "error adding to favorites");
                ServiceError::write(ADD_FAVORITE_FAILED, e)
            })?;
        Ok(envelope.into_data())
    }

    /// Record a product click. Failures are logged and reported, never raised.
    pub async fn track_product_click(&self, id: ProductId) -> TrackResult {
        self.track(endpoints::ANALYTICS_PRODUCT_CLICK, id).await
    }

    /// Record a product impression.
    pub async fn track_product_impression(&self, id: ProductId) -> TrackResult {
        self.track(endpoints::ANALYTICS_PRODUCT_IMPRESSION, id).await
    }

    async fn track(&self, path: &str, id: ProductId) -> TrackResult {
        let body = json!({ "productId": id });
        match self.api.post::<_, serde_json::Value>(path, &body).await {
            Ok(_) => TrackResult { success: true },
            Err(e) => {
                error!(path, product_id = id, error = %e, "error tracking product");
                TrackResult { success: false }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_data::testing::MockTransport;
    use market_data::Method;
    use serde_json::json;

    fn service(mock: &MockTransport) -> ProductService {
        ProductService::new(ApiClient::with_transport(
            "https://api.example.com",
            mock.shared(),
        ))
    }

    #[tokio::test]
    async fn test_featured_sends_limit() {
        let mock = MockTransport::new();
        mock.respond_json(
            Method::GET,
            "/featured-products",
            json!({"data": [{"id": 1, "name": "Jet ski day", "image": "/j.jpg", "price": "$120"}]}),
        );

        let products = service(&mock).featured_products(6).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price.as_deref(), Some("$120"));

        let sent = mock.last_request(Method::GET, "/featured-products").unwrap();
        assert_eq!(sent.params.get("limit"), Some("6"));
    }

    #[tokio::test]
    async fn test_featured_failure_is_raised() {
        let mock = MockTransport::new();
        mock.fail(Method::GET, "/featured-products", "timeout");
        assert!(service(&mock).featured_products(6).await.is_err());
    }

    #[tokio::test]
    async fn test_by_category_empty_on_failure() {
        let mock = MockTransport::new();
        mock.respond_status(Method::GET, "/products/category/3", 500);
        assert!(service(&mock).products_by_category(3, 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_keeps_paging() {
        let mock = MockTransport::new();
        mock.respond_json(
            Method::GET,
            "/products/search",
            json!({
                "data": [{"id": 5, "name": "Beach house", "price": "$300"}],
                "success": true,
                "total": 13,
                "page": 2,
                "limit": 12
            }),
        );

        let page = service(&mock)
            .search_products("beach", 2, 12)
            .await
            .unwrap();
        assert_eq!(page.total, Some(13));
        assert_eq!(page.into_data()[0].name, "Beach house");

        let sent = mock.last_request(Method::GET, "/products/search").unwrap();
        assert_eq!(sent.params.get("q"), Some("beach"));
        assert_eq!(sent.params.get("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_details_without_data_fails() {
        let mock = MockTransport::new();
        mock.respond_json(Method::GET, "/products/8", json!({"success": false}));
        assert!(service(&mock).product_details(8).await.is_err());
    }

    #[tokio::test]
    async fn test_add_to_favorites() {
        let mock = MockTransport::new();
        mock.respond_json(
            Method::POST,
            "/user/favorites",
            json!({"data": {"success": true}}),
        );

        let result = service(&mock).add_to_favorites(8).await.unwrap();
        assert!(result.success);
        let sent = mock.last_request(Method::POST, "/user/favorites").unwrap();
        assert_eq!(sent.body, Some(json!({"productId": 8})));
    }

    #[tokio::test]
    async fn test_product_tracking() {
        let mock = MockTransport::new();
        mock.respond_json(Method::POST, "/analytics/product-click", json!({"success": true}));
        let svc = service(&mock);

        assert!(svc.track_product_click(3).await.success);
        assert!(!svc.track_product_impression(3).await.success);
    }

    #[tokio::test]
    async fn test_add_to_favorites_failure() {
        let mock = MockTransport::new();
        mock.respond_status(Method::POST, "/user/favorites", 401);
        let err = service(&mock).add_to_favorites(8).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to add to favorites");
    }
}
