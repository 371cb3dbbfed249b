//! Banner ordering and metrics.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::ids::SlideId;

/// One entry of a bulk reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerOrderEntry {
    /// Banner to move.
    pub id: SlideId,
    /// New position.
    pub position: u32,
}

impl BannerOrderEntry {
    /// Create an entry.
    pub fn new(id: impl Into<SlideId>, position: u32) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Check a reorder request before sending it.
///
/// The list must be non-empty and every id non-blank.
pub fn validate_banner_order(order: &[BannerOrderEntry]) -> Result<(), CatalogError> {
    if order.is_empty() {
        return Err(CatalogError::EmptyBannerOrder);
    }
    if order.iter().any(|entry| entry.id.is_empty()) {
        return Err(CatalogError::InvalidBannerOrder);
    }
    Ok(())
}

/// Engagement numbers for one banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerMetrics {
    pub id: SlideId,
    #[serde(default, deserialize_with = "crate::de::count")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "crate::de::count")]
    pub clicks: u64,
    #[serde(default)]
    pub click_through_rate: f64,
    #[serde(default)]
    pub conversion_rate: f64,
}
