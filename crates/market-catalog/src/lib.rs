//! Marketplace domain records.
//!
//! Records are plain data fetched read-only from the REST services. Raw
//! server shapes with inconsistent field names are kept as separate types
//! and mapped explicitly into canonical ones.
//!
//! This crate provides:
//! - `HeroSlide` / `RawHeroSlide` - Banners and their normalization
//! - `Category` / `CategorySort` - Categories, sorting and the sidebar set
//! - `Listing` / `Seller` / `ListingSection` - Marketplace listings
//! - `FeaturedProduct` / `MainProduct` - Product cards
//! - `VehicleType` - Vehicle-type feed used to build the "Cars" category

mod banner;
mod category;
mod de;
mod error;
mod ids;
mod image;
mod listing;
mod product;
mod sidebar;
mod slide;
mod vehicle;

pub use banner::*;
pub use category::*;
pub use error::*;
pub use ids::*;
pub use image::*;
pub use listing::*;
pub use product::*;
pub use sidebar::*;
pub use slide::*;
pub use vehicle::*;
