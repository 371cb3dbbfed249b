//! Banner and category service.
//!
//! Reads go through an injected [`TtlCache`]: a fresh entry is served
//! without a request, a successful fetch rewrites the entry, and a failed
//! fetch falls back to whatever entry exists, expired or not. Writes are one
//! request each and drop the whole cache family they touch.

use std::sync::Arc;

use market_cache::{CacheFamily, CacheInfo, CacheKey, TtlCache};
use market_catalog::{
    sort_categories, validate_banner_order, BannerMetrics, BannerOrderEntry, BannerStatus,
    CatalogError, Category, CategoryDraft, CategoryPatch, CategorySort, HeroSlide,
    HeroSlidePatch, NewHeroSlide, RawHeroSlide, SlideId,
};
use market_core::{endpoints, SharedClock};
use market_data::{ApiClient, FetchError, Params};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::{
    ServiceError, CREATE_CATEGORY_FAILED, CREATE_SLIDE_FAILED, DELETE_SLIDE_FAILED,
    UPDATE_CATEGORY_FAILED, UPDATE_ORDER_FAILED, UPDATE_SLIDE_FAILED,
};

/// A value held by the banner cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedCatalog {
    /// A normalized `/banners` response.
    Slides(Vec<HeroSlide>),
    /// A (possibly sorted) `/categories-enhanced` response.
    Categories(Vec<Category>),
}

impl CachedCatalog {
    fn into_slides(self) -> Option<Vec<HeroSlide>> {
        match self {
            Self::Slides(slides) => Some(slides),
            Self::Categories(_) => None,
        }
    }

    fn into_categories(self) -> Option<Vec<Category>> {
        match self {
            Self::Categories(categories) => Some(categories),
            Self::Slides(_) => None,
        }
    }
}

/// Cache shared by banner and category reads.
pub type CatalogCache = TtlCache<CachedCatalog>;

/// Server-side banner filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideFilters {
    /// Only active (`true`) or inactive (`false`) banners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SlideFilters {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Options for [`BannerService::get_hero_slides`].
///
/// Serialized (minus `force_refresh`) into the cache key, so a forced
/// refresh overwrites the entry ordinary reads use.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideOptions {
    /// Skip the cache and bust intermediaries with a timestamp.
    #[serde(skip)]
    pub force_refresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_inactive: Option<bool>,
    #[serde(skip_serializing_if = "SlideFilters::is_empty")]
    pub filters: SlideFilters,
}

impl SlideOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass the cache.
    pub fn with_force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    /// Ask the server to include inactive banners.
    pub fn with_include_inactive(mut self, include: bool) -> Self {
        self.include_inactive = Some(include);
        self
    }

    /// Filter by status.
    pub fn with_active_filter(mut self, active: bool) -> Self {
        self.filters.is_active = Some(active);
        self
    }

    fn params(&self, now_millis: i64) -> Params {
        let status = self
            .filters
            .is_active
            .map(|active| BannerStatus::from_active(active).as_str().to_string());
        let params = Params::new()
            .insert_opt("include_inactive", self.include_inactive)
            .insert_opt("status", status);
        if self.force_refresh {
            params.insert("timestamp", now_millis)
        } else {
            params
        }
    }
}

/// Options for [`BannerService::get_categories`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_product_count: bool,
    /// Client-side ordering, also sent to the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<CategorySort>,
    /// Skip the cache.
    #[serde(skip)]
    pub force_refresh: bool,
}

impl CategoryOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for item counts.
    pub fn with_product_count(mut self) -> Self {
        self.include_product_count = true;
        self
    }

    /// Sort the result.
    pub fn sorted_by(mut self, sort: CategorySort) -> Self {
        self.sort_by = Some(sort);
        self
    }

    /// Bypass the cache.
    pub fn with_force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    fn params(&self) -> Params {
        let params = if self.include_product_count {
            Params::new().insert("include_product_count", true)
        } else {
            Params::new()
        };
        params.insert_opt("sort_by", self.sort_by)
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteOutcome<T> {
    pub success: bool,
    /// Record echoed back by the server, if any.
    pub record: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> WriteOutcome<T> {
    fn ok(record: Option<T>) -> Self {
        Self {
            success: true,
            record,
            message: None,
        }
    }
}

/// Result of an analytics call. Failures are reported here, never raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackResult {
    pub success: bool,
}

/// Banner and category operations against the main API.
#[derive(Clone)]
pub struct BannerService {
    api: ApiClient,
    cache: Arc<CatalogCache>,
    clock: SharedClock,
}

impl BannerService {
    /// Create a service over `api`, reading through `cache`.
    pub fn new(api: ApiClient, cache: Arc<CatalogCache>, clock: SharedClock) -> Self {
        Self { api, cache, clock }
    }

    /// The cache this service reads through.
    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Hero slides, normalized, cache-aside.
    pub async fn get_hero_slides(
        &self,
        options: &SlideOptions,
    ) -> Result<Vec<HeroSlide>, ServiceError> {
        let key = CacheKey::from_options(CacheFamily::HeroSlides, options);

        if !options.force_refresh {
            if let Some(slides) = self.cache.get_fresh(&key).and_then(CachedCatalog::into_slides) {
                debug!(cache_key = %key, "hero slides served from cache");
                return Ok(slides);
            }
        }

        let params = options.params(self.clock.now_millis());
        match self
            .api
            .get::<Vec<RawHeroSlide>>(endpoints::BANNERS, params)
            .await
        {
            Ok(envelope) => {
                let slides: Vec<HeroSlide> = envelope
                    .into_data()
                    .into_iter()
                    .enumerate()
                    .map(|(index, raw)| HeroSlide::from_raw(raw, index))
                    .collect();
                self.cache.insert(key, CachedCatalog::Slides(slides.clone()));
                Ok(slides)
            }
            Err(e) => {
                error!(cache_key = %key, error = %e, "error fetching hero slides");
                match self.cache.get_any(&key).and_then(CachedCatalog::into_slides) {
                    Some(slides) => {
                        warn!(cache_key = %key, "using cached hero slides due to API error");
                        Ok(slides)
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    /// Banners from the public active feed. Never cached.
    pub async fn get_active_hero_slides(&self) -> Result<Vec<HeroSlide>, ServiceError> {
        let envelope = self
            .api
            .get::<Vec<RawHeroSlide>>(endpoints::BANNERS_PUBLIC_ACTIVE, Params::new())
            .await
            .map_err(|e| {
                error!(error = %e, "error fetching active hero slides");
                e
            })?;
        Ok(envelope
            .into_data()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| HeroSlide::from_raw_active(raw, index))
            .collect())
    }

    /// Categories, cache-aside, sorted on the client when asked.
    pub async fn get_categories(
        &self,
        options: &CategoryOptions,
    ) -> Result<Vec<Category>, ServiceError> {
        let key = CacheKey::from_options(CacheFamily::Categories, options);

        if !options.force_refresh {
            if let Some(categories) = self
                .cache
                .get_fresh(&key)
                .and_then(CachedCatalog::into_categories)
            {
                debug!(cache_key = %key, "categories served from cache");
                return Ok(categories);
            }
        }

        match self
            .api
            .get::<Vec<Category>>(endpoints::CATEGORIES_ENHANCED, options.params())
            .await
        {
            Ok(envelope) => {
                let mut categories = envelope.into_data();
                if let Some(sort) = options.sort_by {
                    categories = sort_categories(&categories, sort);
                }
                self.cache
                    .insert(key, CachedCatalog::Categories(categories.clone()));
                Ok(categories)
            }
            Err(e) => {
                error!(cache_key = %key, error = %e, "error fetching categories");
                match self
                    .cache
                    .get_any(&key)
                    .and_then(CachedCatalog::into_categories)
                {
                    Some(categories) => {
                        warn!(cache_key = %key, "using cached categories due to API error");
                        Ok(categories)
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    /// One category. Any failure, including a zero id, yields `None`.
    pub async fn get_category_by_id(&self, id: u64) -> Option<Category> {
        if id == 0 {
            error!(error = %CatalogError::InvalidCategoryId, "error fetching category");
            return None;
        }
        match self
            .api
            .get::<Category>(&endpoints::category(id), Params::new())
            .await
        {
            Ok(envelope) => envelope.data,
            Err(e) => {
                error!(category_id = id, error = %e, "error fetching category");
                None
            }
        }
    }

    /// Engagement numbers, optionally for some banners only. Empty on failure.
    pub async fn get_banner_metrics(&self, ids: Option<&[SlideId]>) -> Vec<BannerMetrics> {
        let params = match ids {
            Some(ids) => {
                let joined: Vec<&str> = ids.iter().map(SlideId::as_str).collect();
                Params::new().insert("bannerIds", joined.join(","))
            }
            None => Params::new(),
        };
        match self
            .api
            .get::<Vec<BannerMetrics>>(endpoints::BANNERS_METRICS, params)
            .await
        {
            Ok(envelope) => envelope.into_data(),
            Err(e) => {
                error!(error = %e, "error fetching banner metrics");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a hero banner.
    pub async fn create_hero_slide(
        &self,
        slide: &NewHeroSlide,
    ) -> Result<WriteOutcome<RawHeroSlide>, ServiceError> {
        let envelope = self
            .api
            .post::<_, RawHeroSlide>(endpoints::BANNERS, &slide.to_body())
            .await
            .map_err(|e| write_failed(CREATE_SLIDE_FAILED, e))?;
        self.invalidate(CacheFamily::HeroSlides);
        Ok(WriteOutcome::ok(envelope.data))
    }

    /// Update the given fields of a banner.
    pub async fn update_hero_slide(
        &self,
        id: &SlideId,
        patch: &HeroSlidePatch,
    ) -> Result<WriteOutcome<RawHeroSlide>, ServiceError> {
        if id.is_empty() {
            return Err(CatalogError::MissingSlideId.into());
        }
        let envelope = self
            .api
            .put::<_, RawHeroSlide>(&endpoints::banner(id.as_str()), &patch.to_body())
            .await
            .map_err(|e| write_failed(UPDATE_SLIDE_FAILED, e))?;
        self.invalidate(CacheFamily::HeroSlides);
        Ok(WriteOutcome::ok(envelope.data))
    }

    /// Delete a banner.
    pub async fn delete_hero_slide(
        &self,
        id: &SlideId,
    ) -> Result<WriteOutcome<Value>, ServiceError> {
        if id.is_empty() {
            return Err(CatalogError::MissingSlideId.into());
        }
        let envelope = self
            .api
            .delete::<Value>(&endpoints::banner(id.as_str()))
            .await
            .map_err(|e| write_failed(DELETE_SLIDE_FAILED, e))?;
        self.invalidate(CacheFamily::HeroSlides);
        Ok(WriteOutcome::ok(envelope.data))
    }

    /// Reorder banners in bulk.
    pub async fn update_banner_order(
        &self,
        order: &[BannerOrderEntry],
    ) -> Result<WriteOutcome<Value>, ServiceError> {
        validate_banner_order(order)?;

        let body = json!({
            "bannerOrder": order,
            "timestamp": self.clock.now_millis(),
        });
        let envelope = self
            .api
            .put::<_, Value>(endpoints::BANNERS_ORDER, &body)
            .await
            .map_err(|e| write_failed(UPDATE_ORDER_FAILED, e))?;
        self.invalidate(CacheFamily::HeroSlides);

        let message = envelope
            .data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Banner order updated successfully")
            .to_string();
        Ok(WriteOutcome {
            success: true,
            record: envelope.data,
            message: Some(message),
        })
    }

    /// Create a category.
    pub async fn create_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<WriteOutcome<Category>, ServiceError> {
        let body = self.stamped(draft).map_err(|e| write_failed(CREATE_CATEGORY_FAILED, e))?;
        let envelope = self
            .api
            .post::<_, Category>(endpoints::CATEGORIES_ENHANCED, &body)
            .await
            .map_err(|e| write_failed(CREATE_CATEGORY_FAILED, e))?;
        self.invalidate(CacheFamily::Categories);
        Ok(WriteOutcome::ok(envelope.data))
    }

    /// Update a category.
    pub async fn update_category(
        &self,
        id: u64,
        patch: &CategoryPatch,
    ) -> Result<WriteOutcome<Category>, ServiceError> {
        if id == 0 {
            return Err(CatalogError::InvalidCategoryId.into());
        }
        let body = self.stamped(patch).map_err(|e| write_failed(UPDATE_CATEGORY_FAILED, e))?;
        let envelope = self
            .api
            .put::<_, Category>(&endpoints::category(id), &body)
            .await
            .map_err(|e| write_failed(UPDATE_CATEGORY_FAILED, e))?;
        self.invalidate(CacheFamily::Categories);
        Ok(WriteOutcome::ok(envelope.data))
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// Record a banner click.
    pub async fn track_banner_click(
        &self,
        id: &SlideId,
        metadata: Option<Map<String, Value>>,
    ) -> TrackResult {
        self.track(endpoints::ANALYTICS_BANNER_CLICK, id, metadata).await
    }

    /// Record a banner impression.
    pub async fn track_banner_impression(
        &self,
        id: &SlideId,
        metadata: Option<Map<String, Value>>,
    ) -> TrackResult {
        self.track(endpoints::ANALYTICS_BANNER_IMPRESSION, id, metadata)
            .await
    }

    async fn track(
        &self,
        path: &str,
        id: &SlideId,
        metadata: Option<Map<String, Value>>,
    ) -> TrackResult {
        if id.is_empty() {
            error!(path, error = %CatalogError::MissingBannerId, "error tracking banner");
            return TrackResult { success: false };
        }

        let mut body = Map::new();
        body.insert("bannerId".to_string(), json!(id));
        body.insert("timestamp".to_string(), json!(self.clock.now_millis()));
        body.extend(metadata.unwrap_or_default());

        match self.api.post::<_, Value>(path, &Value::Object(body)).await {
            Ok(_) => TrackResult { success: true },
            Err(e) => {
                error!(path, banner_id = %id, error = %e, "error tracking banner");
                TrackResult { success: false }
            }
        }
    }

    // =========================================================================
    // Cache management
    // =========================================================================

    /// Drop every cached read.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("banner cache cleared");
    }

    /// Snapshot of the cache.
    pub fn cache_info(&self) -> CacheInfo {
        self.cache.info()
    }

    fn invalidate(&self, family: CacheFamily) {
        let dropped = self.cache.invalidate_family(family);
        debug!(family = %family, dropped, "cache family invalidated");
    }

    /// `value` as a JSON object with the current timestamp added.
    fn stamped<T: Serialize>(&self, value: &T) -> Result<Value, FetchError> {
        let mut body = serde_json::to_value(value)?;
        if let Value::Object(map) = &mut body {
            map.insert("timestamp".to_string(), json!(self.clock.now_millis()));
        }
        Ok(body)
    }
}

fn write_failed(message: &'static str, source: FetchError) -> ServiceError {
    error!(error = %source, "{}", message);
    ServiceError::write(message, source)
}
