//! Storefront services over the remote REST APIs.
//!
//! This crate provides:
//! - `BannerService` - Hero slides and categories, cache-aside, plus banner writes and analytics
//! - `ProductService` - Featured, by-category, search, details and favorites
//! - `ListingService` - Listing sections, category listings and listing detail with seller
//! - `VehicleService` - Vehicle types with live car counts
//! - `Storefront` - Every service wired from one `StorefrontConfig`

mod banner;
mod error;
mod listing;
mod product;
mod storefront;
mod vehicle;

pub use banner::*;
pub use error::ServiceError;
pub use listing::*;
pub use product::*;
pub use storefront::*;
pub use vehicle::*;
