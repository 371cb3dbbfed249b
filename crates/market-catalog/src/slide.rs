//! Hero and promotional banners.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::ids::SlideId;

/// Gradient used for hero banners without one.
pub const HERO_GRADIENT: &str = "from-blue-100 via-indigo-100 to-purple-200";
/// Gradient used for promotional banners without one.
pub const PROMOTIONAL_GRADIENT: &str = "from-green-100 via-emerald-100 to-teal-200";
/// Gradient used for any other banner type.
pub const NEUTRAL_GRADIENT: &str = "from-gray-100 via-gray-100 to-gray-200";

/// Where a banner is shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BannerType {
    /// Main slider.
    #[default]
    Hero,
    /// Side promo card.
    Promotional,
    /// Anything else the server sends.
    Other(String),
}

impl BannerType {
    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::Promotional => "promotional",
            Self::Other(s) => s,
        }
    }

    /// Gradient applied when a banner of this type has none.
    pub fn default_gradient(&self) -> &'static str {
        match self {
            Self::Hero => HERO_GRADIENT,
            Self::Promotional => PROMOTIONAL_GRADIENT,
            Self::Other(_) => NEUTRAL_GRADIENT,
        }
    }
}

impl From<String> for BannerType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "hero" => Self::Hero,
            "promotional" => Self::Promotional,
            _ => Self::Other(s),
        }
    }
}

impl From<BannerType> for String {
    fn from(t: BannerType) -> Self {
        t.as_str().to_string()
    }
}

/// Publication status of a banner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BannerStatus {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl BannerStatus {
    /// Status matching an active flag.
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BannerStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::Other(s),
        }
    }
}

impl From<BannerStatus> for String {
    fn from(s: BannerStatus) -> Self {
        s.as_str().to_string()
    }
}

/// Banner exactly as the server sends it.
///
/// Every field is optional and several have two spellings depending on
/// which backend version produced the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawHeroSlide {
    pub id: Option<SlideId>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "crate::de::opt_text")]
    pub discount: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "image_url")]
    pub image_url: Option<String>,
    pub bg_gradient: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "link_url")]
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
    #[serde(rename = "is_active")]
    pub is_active_snake: Option<bool>,
    pub impressions: Option<u64>,
    pub impression_count: Option<u64>,
    pub clicks: Option<u64>,
    pub click_count: Option<u64>,
    pub click_through_rate: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub target_audience: Option<Vec<String>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub banner_type: Option<BannerType>,
    pub status: Option<BannerStatus>,
    pub order: Option<u32>,
}

/// Banner in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: SlideId,
    pub title: String,
    pub subtitle: String,
    pub discount: String,
    pub image: String,
    pub bg_gradient: String,
    pub link: String,
    pub is_active: bool,
    pub impressions: u64,
    pub clicks: u64,
    pub click_through_rate: f64,
    pub conversion_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub banner_type: BannerType,
    pub status: BannerStatus,
    pub order: u32,
}

/// Active flag for a banner that does not say.
///
/// Only the first banner in a response is treated as active. This ties the
/// default to list position rather than to anything in the record; it is
/// kept as-is and isolated here so it stays visible.
pub fn default_active_by_position(index: usize) -> bool {
    index == 0
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn non_zero(n: Option<u64>) -> Option<u64> {
    n.filter(|n| *n != 0)
}

impl HeroSlide {
    /// Normalize the record at `index` of a `/banners` response.
    pub fn from_raw(raw: RawHeroSlide, index: usize) -> Self {
        let is_active = raw
            .is_active
            .or(raw.is_active_snake)
            .unwrap_or_else(|| default_active_by_position(index));
        let impressions = non_zero(raw.impressions)
            .or(non_zero(raw.impression_count))
            .unwrap_or(0);
        let clicks = non_zero(raw.clicks)
            .or(non_zero(raw.click_count))
            .unwrap_or(0);
        let order = raw
            .order
            .filter(|o| *o != 0)
            .unwrap_or(index as u32);

        Self {
            id: raw.id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            subtitle: raw.subtitle.unwrap_or_default(),
            discount: raw.discount.unwrap_or_default(),
            image: non_empty(raw.image).or(raw.image_url).unwrap_or_default(),
            bg_gradient: raw.bg_gradient.unwrap_or_default(),
            link: non_empty(raw.link)
                .or(non_empty(raw.link_url))
                .unwrap_or_default(),
            is_active,
            impressions,
            clicks,
            click_through_rate: raw.click_through_rate.unwrap_or(0.0),
            conversion_rate: raw.conversion_rate.unwrap_or(0.0),
            start_date: raw.start_date,
            end_date: raw.end_date,
            target_audience: raw.target_audience.unwrap_or_default(),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            banner_type: raw.banner_type.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            order,
        }
    }

    /// Normalize a record from the public active-banners feed.
    ///
    /// Every record from that feed is active.
    pub fn from_raw_active(raw: RawHeroSlide, index: usize) -> Self {
        Self {
            is_active: true,
            ..Self::from_raw(raw, index)
        }
    }

    /// True for main-slider banners.
    pub fn is_hero(&self) -> bool {
        self.banner_type == BannerType::Hero
    }

    /// True for promo-card banners.
    pub fn is_promotional(&self) -> bool {
        self.banner_type == BannerType::Promotional
    }

    /// Fill in the type's default gradient when none is set.
    pub fn with_default_gradient(mut self) -> Self {
        if self.bg_gradient.is_empty() {
            self.bg_gradient = self.banner_type.default_gradient().to_string();
        }
        self
    }
}

/// Input for creating a banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHeroSlide {
    pub title: String,
    pub subtitle: String,
    pub discount: String,
    pub image: String,
    pub link: String,
    pub bg_gradient: String,
    pub is_active: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub target_audience: Vec<String>,
}

impl NewHeroSlide {
    /// Request body for `POST /banners`.
    ///
    /// New banners are hero banners at order 0 and default to active.
    pub fn to_body(&self) -> Value {
        let active = self.is_active.unwrap_or(true);
        json!({
            "title": self.title,
            "subtitle": self.subtitle,
            "description": self.subtitle,
            "discount": self.discount,
            "image": self.image,
            "link": self.link,
            "bgGradient": self.bg_gradient,
            "isActive": active,
            "bannerType": BannerType::Hero.as_str(),
            "status": BannerStatus::from_active(active).as_str(),
            "order": 0,
            "startDate": self.start_date,
            "endDate": self.end_date,
            "targetAudience": self.target_audience,
        })
    }
}

/// Partial update of a banner. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroSlidePatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub discount: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub bg_gradient: Option<String>,
    pub is_active: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub target_audience: Option<Vec<String>>,
}

impl HeroSlidePatch {
    /// Request body for `PUT /banners/{id}`.
    ///
    /// `subtitle` is mirrored into `description` and `is_active` into
    /// `status`.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        let mut put = |key: &str, value: Value| {
            body.insert(key.to_string(), value);
        };

        if let Some(title) = &self.title {
            put("title", json!(title));
        }
        if let Some(subtitle) = &self.subtitle {
            put("subtitle", json!(subtitle));
            put("description", json!(subtitle));
        }
        if let Some(discount) = &self.discount {
            put("discount", json!(discount));
        }
        if let Some(image) = &self.image {
            put("image", json!(image));
        }
        if let Some(link) = &self.link {
            put("link", json!(link));
        }
        if let Some(gradient) = &self.bg_gradient {
            put("bgGradient", json!(gradient));
        }
        if let Some(active) = self.is_active {
            put("isActive", json!(active));
            put("status", json!(BannerStatus::from_active(active).as_str()));
        }
        if let Some(start) = &self.start_date {
            put("startDate", json!(start));
        }
        if let Some(end) = &self.end_date {
            put("endDate", json!(end));
        }
        if let Some(audience) = &self.target_audience {
            put("targetAudience", json!(audience));
        }

        Value::Object(body)
    }

    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: Value) -> RawHeroSlide {
        serde_json::from_value(value).unwrap()
    }

    // === Normalization ===

    #[test]
    fn test_default_active_only_for_first() {
        assert!(default_active_by_position(0));
        assert!(!default_active_by_position(1));

        let first = HeroSlide::from_raw(raw(json!({"id": "a", "title": "A"})), 0);
        let second = HeroSlide::from_raw(raw(json!({"id": "b", "title": "B"})), 1);
        assert!(first.is_active);
        assert!(!second.is_active);
    }

    #[test]
    fn test_explicit_active_flag_wins() {
        let camel = HeroSlide::from_raw(raw(json!({"isActive": false})), 0);
        let snake = HeroSlide::from_raw(raw(json!({"is_active": true})), 3);
        assert!(!camel.is_active);
        assert!(snake.is_active);
    }

    #[test]
    fn test_alternate_field_names() {
        let slide = HeroSlide::from_raw(
            raw(json!({
                "id": 12,
                "image_url": "/uploads/banners/a.jpg",
                "link_url": "https://cars.example.com",
                "impressionCount": 40,
                "clickCount": 4
            })),
            0,
        );
        assert_eq!(slide.id.as_str(), "12");
        assert_eq!(slide.image, "/uploads/banners/a.jpg");
        assert_eq!(slide.link, "https://cars.example.com");
        assert_eq!(slide.impressions, 40);
        assert_eq!(slide.clicks, 4);
    }

    #[test]
    fn test_defaults() {
        let slide = HeroSlide::from_raw(raw(json!({"id": "x", "title": "T"})), 2);
        assert_eq!(slide.subtitle, "");
        assert_eq!(slide.link, "");
        assert_eq!(slide.banner_type, BannerType::Hero);
        assert_eq!(slide.status, BannerStatus::Active);
        assert_eq!(slide.order, 2);
        assert_eq!(slide.click_through_rate, 0.0);
        assert!(slide.target_audience.is_empty());
    }

    #[test]
    fn test_zero_order_falls_back_to_index() {
        let slide = HeroSlide::from_raw(raw(json!({"order": 0})), 4);
        assert_eq!(slide.order, 4);
        let slide = HeroSlide::from_raw(raw(json!({"order": 9})), 4);
        assert_eq!(slide.order, 9);
    }

    #[test]
    fn test_numeric_discount_and_unknown_type() {
        let slide = HeroSlide::from_raw(
            raw(json!({"discount": 25, "bannerType": "seasonal", "status": "draft"})),
            0,
        );
        assert_eq!(slide.discount, "25");
        assert_eq!(slide.banner_type, BannerType::Other("seasonal".to_string()));
        assert_eq!(slide.status.as_str(), "draft");
    }

    #[test]
    fn test_active_feed_forces_active() {
        let slide = HeroSlide::from_raw_active(raw(json!({"isActive": false})), 5);
        assert!(slide.is_active);
    }

    #[test]
    fn test_default_gradient_by_type() {
        let hero = HeroSlide::from_raw(raw(json!({})), 0).with_default_gradient();
        assert_eq!(hero.bg_gradient, HERO_GRADIENT);

        let promo = HeroSlide::from_raw(raw(json!({"bannerType": "promotional"})), 0)
            .with_default_gradient();
        assert_eq!(promo.bg_gradient, PROMOTIONAL_GRADIENT);
        assert!(promo.is_promotional());

        let custom = HeroSlide::from_raw(raw(json!({"bgGradient": "from-red-100"})), 0)
            .with_default_gradient();
        assert_eq!(custom.bg_gradient, "from-red-100");
    }

    #[test]
    fn test_canonical_serializes_camel_case() {
        let slide = HeroSlide::from_raw(raw(json!({"id": "a"})), 0);
        let v = serde_json::to_value(&slide).unwrap();
        assert_eq!(v["isActive"], true);
        assert_eq!(v["bannerType"], "hero");
        assert!(v.get("startDate").is_none());
    }

    // === Write bodies ===

    #[test]
    fn test_new_slide_body() {
        let body = NewHeroSlide {
            title: "Summer".into(),
            subtitle: "Deals".into(),
            ..Default::default()
        }
        .to_body();
        assert_eq!(body["description"], "Deals");
        assert_eq!(body["isActive"], true);
        assert_eq!(body["status"], "active");
        assert_eq!(body["bannerType"], "hero");
        assert_eq!(body["order"], 0);
    }

    #[test]
    fn test_patch_body_only_sets_given_fields() {
        let patch = HeroSlidePatch {
            subtitle: Some("New".into()),
            is_active: Some(false),
            ..Default::default()
        };
        let body = patch.to_body();
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(body["description"], "New");
        assert_eq!(body["status"], "inactive");
        assert!(HeroSlidePatch::default().is_empty());
    }
}
