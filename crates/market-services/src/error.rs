//! Service error types.

use market_catalog::CatalogError;
use market_data::FetchError;
use thiserror::Error;

/// Errors returned by storefront services.
///
/// Write paths report a fixed message; the underlying failure is kept as the
/// source and logged, never shown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] CatalogError),

    /// A read failed and nothing was cached to fall back on.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A write failed.
    #[error("{message}")]
    Write {
        /// Public message.
        message: &'static str,
        /// What actually went wrong.
        #[source]
        source: FetchError,
    },
}

impl ServiceError {
    pub(crate) fn write(message: &'static str, source: FetchError) -> Self {
        Self::Write { message, source }
    }

    /// True for input errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub(crate) const CREATE_SLIDE_FAILED: &str = "Failed to create hero slide";
pub(crate) const UPDATE_SLIDE_FAILED: &str = "Failed to update hero slide";
pub(crate) const DELETE_SLIDE_FAILED: &str = "Failed to delete hero slide";
pub(crate) const UPDATE_ORDER_FAILED: &str = "Failed to update banner order";
pub(crate) const CREATE_CATEGORY_FAILED: &str = "Failed to create category";
pub(crate) const UPDATE_CATEGORY_FAILED: &str = "Failed to update category";
pub(crate) const ADD_FAVORITE_FAILED: &str = "Failed to add to favorites";
