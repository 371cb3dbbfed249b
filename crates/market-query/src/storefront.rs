//! Storefront services bound to the query cache.

use std::time::Duration;

use market_catalog::{
    next_page_param, BannerOrderEntry, Category, FavoriteResult, FeaturedProduct, HeroSlide,
    HeroSlidePatch, MainProduct, NewHeroSlide, ProductId, RawHeroSlide, SlideId, VehicleType,
};
use market_data::ApiEnvelope;
use market_services::{
    CategoryOptions, ServiceError, SlideOptions, Storefront, WriteOutcome,
    DEFAULT_FEATURED_LIMIT,
};
use serde_json::Value;

use crate::keys::{banner_keys, product_keys, vehicle_types_key};
use crate::{MutationEffects, QueryClient, QueryOptions, QueryResult};

const MINUTE: Duration = Duration::from_secs(60);

/// Hero slides: 30 minutes fresh, kept an hour.
pub fn hero_slide_options() -> QueryOptions {
    QueryOptions::new()
        .with_stale_time(30 * MINUTE)
        .with_gc_time(60 * MINUTE)
}

/// Categories: an hour fresh, kept two.
pub fn category_options() -> QueryOptions {
    QueryOptions::new()
        .with_stale_time(60 * MINUTE)
        .with_gc_time(120 * MINUTE)
}

pub fn featured_options() -> QueryOptions {
    QueryOptions::new().with_stale_time(10 * MINUTE)
}

pub fn by_category_options() -> QueryOptions {
    QueryOptions::new().with_stale_time(5 * MINUTE)
}

pub fn search_options() -> QueryOptions {
    QueryOptions::new().with_stale_time(2 * MINUTE)
}

pub fn details_options() -> QueryOptions {
    QueryOptions::new().with_stale_time(15 * MINUTE)
}

pub fn vehicle_type_options() -> QueryOptions {
    QueryOptions::new()
        .with_stale_time(5 * MINUTE)
        .with_gc_time(10 * MINUTE)
}

/// Hero slides and categories, loaded together for the banner area.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerData {
    pub hero_slides: Vec<HeroSlide>,
    pub categories: Vec<Category>,
    /// Either query has no data yet and is fetching.
    pub is_loading: bool,
    /// Either query is in the error state.
    pub is_error: bool,
    /// First error message, hero slides first.
    pub error: Option<String>,
}

/// Queries and mutations of the storefront, with their cache timings.
#[derive(Clone)]
pub struct StorefrontQueries {
    client: QueryClient,
    services: Storefront,
}

impl StorefrontQueries {
    /// Bind `services` to `client`.
    pub fn new(client: QueryClient, services: Storefront) -> Self {
        Self { client, services }
    }

    /// Bind `services` to a fresh client on the services' clock.
    pub fn from_services(services: Storefront) -> Self {
        let client = QueryClient::new(services.clock().clone());
        Self::new(client, services)
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    pub fn services(&self) -> &Storefront {
        &self.services
    }

    // =========================================================================
    // Banners
    // =========================================================================

    /// Hero slides. `force_refresh` bypasses fresh query data as well as the
    /// service cache.
    pub async fn hero_slides(&self, options: &SlideOptions) -> QueryResult<Vec<HeroSlide>> {
        let banners = self.services.banners.clone();
        let opts = options.clone();
        self.client
            .query(
                banner_keys::hero_slides_with(options),
                &hero_slide_options().forced(options.force_refresh),
                move || {
                    let banners = banners.clone();
                    let opts = opts.clone();
                    async move { banners.get_hero_slides(&opts).await }
                },
            )
            .await
    }

    pub async fn categories(&self, options: &CategoryOptions) -> QueryResult<Vec<Category>> {
        let banners = self.services.banners.clone();
        let opts = options.clone();
        self.client
            .query(
                banner_keys::categories_with(options),
                &category_options().forced(options.force_refresh),
                move || {
                    let banners = banners.clone();
                    let opts = opts.clone();
                    async move { banners.get_categories(&opts).await }
                },
            )
            .await
    }

    /// Hero slides and categories with default options.
    pub async fn banner_data(&self) -> BannerData {
        self.banner_data_with(&SlideOptions::new(), &CategoryOptions::new())
            .await
    }

    /// Hero slides and categories, fetched concurrently.
    pub async fn banner_data_with(
        &self,
        slide_options: &SlideOptions,
        category_options: &CategoryOptions,
    ) -> BannerData {
        let (slides, categories) = futures::join!(
            self.hero_slides(slide_options),
            self.categories(category_options)
        );

        BannerData {
            is_loading: slides.is_loading() || categories.is_loading(),
            is_error: slides.is_error() || categories.is_error(),
            error: slides.error.clone().or_else(|| categories.error.clone()),
            hero_slides: slides.data.unwrap_or_default(),
            categories: categories.data.unwrap_or_default(),
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn featured_products(&self, limit: u32) -> QueryResult<Vec<FeaturedProduct>> {
        let products = self.services.products.clone();
        self.client
            .query(
                product_keys::featured_with_limit(limit),
                &featured_options(),
                move || {
                    let products = products.clone();
                    async move { products.featured_products(limit).await }
                },
            )
            .await
    }

    /// Products of one category. Disabled for category id 0.
    pub async fn products_by_category(
        &self,
        category_id: u64,
        limit: u32,
    ) -> QueryResult<Vec<MainProduct>> {
        let products = self.services.products.clone();
        self.client
            .query(
                product_keys::by_category(category_id),
                &by_category_options().enabled(category_id != 0),
                move || {
                    let products = products.clone();
                    async move {
                        Ok::<_, ServiceError>(
                            products.products_by_category(category_id, limit).await,
                        )
                    }
                },
            )
            .await
    }

    /// One page of search results. Disabled for blank queries.
    pub async fn search_products(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> QueryResult<ApiEnvelope<Vec<MainProduct>>> {
        let products = self.services.products.clone();
        let q = query.to_string();
        self.client
            .query(
                product_keys::search_page(query, page, limit),
                &search_options().enabled(!query.trim().is_empty()),
                move || {
                    let products = products.clone();
                    let q = q.clone();
                    async move { products.search_products(&q, page, limit).await }
                },
            )
            .await
    }

    /// Page to request after `last_page`, if the search may have more.
    pub fn next_search_page(
        last_page: &[MainProduct],
        pages_loaded: u32,
        limit: u32,
    ) -> Option<u32> {
        next_page_param(last_page.len(), pages_loaded, limit as usize)
    }

    pub async fn product_details(&self, id: ProductId) -> QueryResult<MainProduct> {
        let products = self.services.products.clone();
        self.client
            .query(
                product_keys::details(id),
                &details_options().enabled(id != 0),
                move || {
                    let products = products.clone();
                    async move { products.product_details(id).await }
                },
            )
            .await
    }

    // =========================================================================
    // Vehicles
    // =========================================================================

    pub async fn vehicle_types(&self) -> QueryResult<Vec<VehicleType>> {
        let vehicles = self.services.vehicles.clone();
        self.client
            .query(vehicle_types_key(), &vehicle_type_options(), move || {
                let vehicles = vehicles.clone();
                async move { vehicles.vehicle_types().await }
            })
            .await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to favorites.
    ///
    /// On success the featured lists are invalidated and a cached details
    /// entry is marked as a favorite. The mark is not undone if a later read
    /// disagrees.
    pub async fn add_to_favorites(&self, id: ProductId) -> Result<FavoriteResult, ServiceError> {
        self.client
            .mutate(self.services.products.add_to_favorites(id), |_| {
                MutationEffects::new()
                    .invalidate(product_keys::featured())
                    .patch(move |client| {
                        client.set_query_data::<MainProduct, _>(&product_keys::details(id), |old| {
                            old.map(|mut product| {
                                product.is_favorite = true;
                                product
                            })
                        })
                    })
            })
            .await
    }

    /// Mark the featured grid for refetch and load it again.
    pub async fn refresh_featured(&self, limit: Option<u32>) -> QueryResult<Vec<FeaturedProduct>> {
        self.client.invalidate(&product_keys::featured());
        self.featured_products(limit.unwrap_or(DEFAULT_FEATURED_LIMIT))
            .await
    }

    pub async fn update_banner_order(
        &self,
        order: &[BannerOrderEntry],
    ) -> Result<WriteOutcome<Value>, ServiceError> {
        self.client
            .mutate(self.services.banners.update_banner_order(order), |_| {
                MutationEffects::new().invalidate(banner_keys::all())
            })
            .await
    }

    pub async fn create_hero_slide(
        &self,
        slide: &NewHeroSlide,
    ) -> Result<WriteOutcome<RawHeroSlide>, ServiceError> {
        self.client
            .mutate(self.services.banners.create_hero_slide(slide), |_| {
                MutationEffects::new().invalidate(banner_keys::hero_slides())
            })
            .await
    }

    pub async fn update_hero_slide(
        &self,
        id: &SlideId,
        patch: &HeroSlidePatch,
    ) -> Result<WriteOutcome<RawHeroSlide>, ServiceError> {
        self.client
            .mutate(self.services.banners.update_hero_slide(id, patch), |_| {
                MutationEffects::new().invalidate(banner_keys::hero_slides())
            })
            .await
    }

    pub async fn delete_hero_slide(
        &self,
        id: &SlideId,
    ) -> Result<WriteOutcome<Value>, ServiceError> {
        self.client
            .mutate(self.services.banners.delete_hero_slide(id), |_| {
                MutationEffects::new().invalidate(banner_keys::hero_slides())
            })
            .await
    }
}
