//! Listing service.
//!
//! The listing API answers with bare JSON and does almost no filtering of
//! its own, so category and price filtering and the seller join happen on
//! the client.

use futures::future::try_join_all;
use market_catalog::{
    filter_by_category_slug, find_seller, ImageBase, Listing, ListingFilter, ListingId,
    ListingSection, SectionListings, Seller,
};
use market_core::endpoints;
use market_data::{ApiClient, Params};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::ServiceError;

/// A listing joined with its seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDetail {
    pub listing: Listing,
    /// `None` when the seller is unknown or the seller list failed to load.
    pub seller: Option<Seller>,
}

/// Reads against the listing API.
#[derive(Debug, Clone)]
pub struct ListingService {
    api: ApiClient,
    section_images: ImageBase,
}

impl ListingService {
    /// Create a service over `api`. Section cards resolve images against
    /// `section_images`.
    pub fn new(api: ApiClient, section_images: ImageBase) -> Self {
        Self { api, section_images }
    }

    /// How pages built on this service should resolve listing images.
    pub fn listing_images(&self) -> ImageBase {
        ImageBase::Uploads(self.api.base_url().to_string())
    }

    /// Every listing.
    pub async fn all_listings(&self) -> Result<Vec<Listing>, ServiceError> {
        Ok(self.api.get_json(endpoints::LISTINGS, Params::new()).await?)
    }

    /// Every seller.
    pub async fn sellers(&self) -> Result<Vec<Seller>, ServiceError> {
        Ok(self.api.get_json(endpoints::SELLERS, Params::new()).await?)
    }

    /// Homepage sections, each with at most `card_limit` cards.
    ///
    /// Section listings are requested concurrently; any failure fails the
    /// whole call.
    pub async fn listing_sections(&self) -> Result<Vec<SectionListings>, ServiceError> {
        let sections: Vec<ListingSection> = self
            .api
            .get_json(endpoints::LISTING_SECTIONS, Params::new())
            .await
            .map_err(|e| {
                error!(error = %e, "failed to load listing sections");
                e
            })?;

        let fetches = sections.into_iter().map(|section| async move {
            let params = Params::new().insert("categorySlug", &section.category);
            let listings: Vec<Listing> = self.api.get_json(endpoints::LISTINGS, params).await?;
            debug!(
                section = %section.id,
                category = %section.category,
                found = listings.len(),
                "section listings loaded"
            );
            Ok::<_, ServiceError>(SectionListings::build(
                section,
                &listings,
                &self.section_images,
            ))
        });

        try_join_all(fetches).await.map_err(|e| {
            error!(error = %e, "failed to load listings");
            e
        })
    }

    /// Listings of one category that pass `filter`.
    pub async fn listings_for_category(
        &self,
        slug: &str,
        filter: &ListingFilter,
    ) -> Result<Vec<Listing>, ServiceError> {
        let all = self.all_listings().await.map_err(|e| {
            error!(slug, error = %e, "error fetching listings");
            e
        })?;
        let in_category = filter_by_category_slug(&all, slug);
        Ok(filter.apply(&in_category))
    }

    /// One listing with its seller.
    ///
    /// The listing must load; a failed seller lookup only leaves the seller
    /// empty.
    pub async fn listing_detail(&self, id: &ListingId) -> Result<ListingDetail, ServiceError> {
        let listing: Listing = self
            .api
            .get_json(&endpoints::listing(id.as_str()), Params::new())
            .await
            .map_err(|e| {
                error!(listing_id = %id, error = %e, "failed to load listing");
                e
            })?;

        let seller = match self.sellers().await {
            Ok(sellers) => find_seller(&listing, &sellers).cloned(),
            Err(e) => {
                warn!(listing_id = %id, error = %e, "failed to load sellers");
                None
            }
        };

        Ok(ListingDetail { listing, seller })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_data::testing::MockTransport;
    use market_data::Method;
    use serde_json::{json, Value};

    fn service(mock: &MockTransport) -> ListingService {
        ListingService::new(
            ApiClient::with_transport("https://listings.example.com", mock.shared()),
            ImageBase::Prefix("https://img.example.com/uploads".into()),
        )
    }

    fn listing(id: &str, slug: &str, price: f64, kind: &str) -> Value {
        json!({
            "_id": id,
            "listingId": format!("L-{}", id),
            "title": format!("Listing {}", id),
            "description": "",
            "price": price,
            "images": [format!("/{}.jpg", id)],
            "categoryId": {"_id": "c", "name": slug, "slug": slug, "description": ""},
            "listingType": kind,
            "sellerId": "s1",
            "createdAt": "2024-01-01T00:00:00.000Z"
        })
    }

    #[tokio::test]
    async fn test_sections_respect_card_limit() {
        let mock = MockTransport::new();
        mock.respond_json(
            Method::GET,
            "/api/listing-sections",
            json!([
                {"_id": "sec1", "title": "Homes", "category": "real-estate", "cardLimit": 2}
            ]),
        );
        mock.respond_json(
            Method::GET,
            "/api/listings",
            json!([
                listing("1", "real-estate", 10.0, "sale"),
                listing("2", "real-estate", 20.0, "sale"),
                listing("3", "real-estate", 30.0, "sale")
            ]),
        );

        let sections = service(&mock).listing_sections().await.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].listings.len(), 2);
        assert_eq!(
            sections[0].listings[0].image,
            "https://img.example.com/uploads/1.jpg"
        );

        let sent = mock.last_request(Method::GET, "/api/listings").unwrap();
        assert_eq!(sent.params.get("categorySlug"), Some("real-estate"));
    }

    #[tokio::test]
    async fn test_sections_fail_as_a_whole() {
        let mock = MockTransport::new();
        mock.respond_json(
            Method::GET,
            "/api/listing-sections",
            json!([{"_id": "sec1", "title": "Homes", "category": "real-estate", "cardLimit": 4}]),
        );
        mock.fail(Method::GET, "/api/listings", "reset");

        assert!(service(&mock).listing_sections().await.is_err());
    }

    #[tokio::test]
    async fn test_category_listings_filtered() {
        let mock = MockTransport::new();
        mock.respond_json(
            Method::GET,
            "/api/listings",
            json!([
                listing("1", "Bikes", 150.0, "sale"),
                listing("2", "bikes", 900.0, "auction"),
                listing("3", "real-estate", 150.0, "sale")
            ]),
        );

        let svc = service(&mock);
        let all_bikes = svc
            .listings_for_category("bikes", &ListingFilter::default())
            .await
            .unwrap();
        assert_eq!(all_bikes.len(), 2);

        let cheap = ListingFilter::default().with_price_range(0.0, 500.0);
        let found = svc.listings_for_category("BIKES", &cheap).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_detail_joins_seller() {
        let mock = MockTransport::new();
        mock.respond_json(Method::GET, "/api/listings/1", listing("1", "bikes", 1.0, "sale"));
        mock.respond_json(
            Method::GET,
            "/api/sellers",
            json!([{"_id": "s1", "name": "Island Motors", "phone": "+297 555 0101"}]),
        );

        let detail = service(&mock)
            .listing_detail(&ListingId::new("1"))
            .await
            .unwrap();
        assert_eq!(detail.seller.map(|s| s.name).as_deref(), Some("Island Motors"));
    }

    #[tokio::test]
    async fn test_detail_survives_seller_failure() {
        let mock = MockTransport::new();
        mock.respond_json(Method::GET, "/api/listings/1", listing("1", "bikes", 1.0, "sale"));
        mock.respond_status(Method::GET, "/api/sellers", 500);

        let detail = service(&mock)
            .listing_detail(&ListingId::new("1"))
            .await
            .unwrap();
        assert!(detail.seller.is_none());
    }

    #[tokio::test]
    async fn test_detail_missing_listing_fails() {
        let mock = MockTransport::new();
        let err = service(&mock)
            .listing_detail(&ListingId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Fetch(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_listing_images_use_uploads() {
        let mock = MockTransport::new();
        let images = service(&mock).listing_images();
        assert_eq!(images.resolve("a.jpg"), "https://listings.example.com/uploads/a.jpg");
    }
}
