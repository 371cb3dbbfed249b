//! Wiring of every service from one configuration.

use std::sync::Arc;

use market_catalog::ImageBase;
use market_core::{SharedClock, StorefrontConfig, SystemClock};
use market_data::{ApiClient, ReqwestTransport, Transport};

use crate::{BannerService, CatalogCache, ListingService, ProductService, VehicleService};

/// All storefront services, sharing one transport, one clock and one
/// banner cache.
#[derive(Clone)]
pub struct Storefront {
    pub banners: BannerService,
    pub products: ProductService,
    pub listings: ListingService,
    pub vehicles: VehicleService,
    clock: SharedClock,
}

impl Storefront {
    /// Build production services from `config`.
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::with_transport(
            config,
            Arc::new(ReqwestTransport::new()),
            SystemClock::shared(),
        )
    }

    /// Build services over a custom transport and clock.
    pub fn with_transport(
        config: &StorefrontConfig,
        transport: Arc<dyn Transport>,
        clock: SharedClock,
    ) -> Self {
        let api = ApiClient::with_transport(config.api_base_url.clone(), transport);
        let cache = Arc::new(CatalogCache::with_ttl(clock.clone(), config.cache_ttl()));
        let section_images = ImageBase::Prefix(format!("{}/uploads", config.image_base()));

        Self {
            banners: BannerService::new(api.clone(), cache, clock.clone()),
            products: ProductService::new(api.clone()),
            listings: ListingService::new(api.rebased(config.listing_base()), section_images),
            vehicles: VehicleService::new(api.rebased(config.cars_base())),
            clock,
        }
    }

    /// The shared clock.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}
