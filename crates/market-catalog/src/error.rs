//! Validation errors.

use thiserror::Error;

/// Input rejected before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Banner reorder called with nothing to reorder.
    #[error("Banner order data is required")]
    EmptyBannerOrder,

    /// A reorder entry has an empty id.
    #[error("Invalid banner order data format")]
    InvalidBannerOrder,

    /// Slide operation without a slide id.
    #[error("Slide ID is required")]
    MissingSlideId,

    /// Tracking call without a banner id.
    #[error("Banner ID is required")]
    MissingBannerId,

    /// Category id is missing or not positive.
    #[error("Valid category ID is required")]
    InvalidCategoryId,
}
