//! Paths of the remote REST surface.
//!
//! Paths are relative to the base URL of the service that owns them.

/// Banner list, create.
pub const BANNERS: &str = "/banners";
/// Active banners only, uncached.
pub const BANNERS_PUBLIC_ACTIVE: &str = "/banners/public/active";
/// Bulk reorder.
pub const BANNERS_ORDER: &str = "/banners/order";
/// Banner metrics.
pub const BANNERS_METRICS: &str = "/banners/metrics";

/// Category list, create.
pub const CATEGORIES_ENHANCED: &str = "/categories-enhanced";

/// Featured products.
pub const FEATURED_PRODUCTS: &str = "/featured-products";
/// Products by category (id appended).
pub const PRODUCTS_BY_CATEGORY: &str = "/products/category";
/// Product search.
pub const PRODUCTS_SEARCH: &str = "/products/search";
/// Product details (id appended).
pub const PRODUCTS: &str = "/products";
/// Favorites.
pub const USER_FAVORITES: &str = "/user/favorites";

/// Banner click tracking.
pub const ANALYTICS_BANNER_CLICK: &str = "/analytics/banner-click";
/// Banner impression tracking.
pub const ANALYTICS_BANNER_IMPRESSION: &str = "/analytics/banner-impression";
/// Product click tracking.
pub const ANALYTICS_PRODUCT_CLICK: &str = "/analytics/product-click";
/// Product impression tracking.
pub const ANALYTICS_PRODUCT_IMPRESSION: &str = "/analytics/product-impression";

/// Uploads.
pub const UPLOADS: &str = "/uploads";

/// Listing service: all listings.
pub const LISTINGS: &str = "/api/listings";
/// Listing service: homepage sections.
pub const LISTING_SECTIONS: &str = "/api/listing-sections";
/// Listing service: all sellers.
pub const SELLERS: &str = "/api/sellers";

/// Vehicle-type service: types with car counts.
pub const VEHICLE_TYPES: &str = "/types/list-types";

/// Path of one banner.
pub fn banner(id: &str) -> String {
    format!("{}/{}", BANNERS, id)
}

/// Path of one category.
pub fn category(id: u64) -> String {
    format!("{}/{}", CATEGORIES_ENHANCED, id)
}

/// Path of the products in one category.
pub fn products_by_category(category_id: u64) -> String {
    format!("{}/{}", PRODUCTS_BY_CATEGORY, category_id)
}

/// Path of one product.
pub fn product(id: u64) -> String {
    format!("{}/{}", PRODUCTS, id)
}

/// Path of one listing.
pub fn listing(id: &str) -> String {
    format!("{}/{}", LISTINGS, id)
}

/// Upload path for a directory.
pub fn upload_to_directory(directory: &str) -> String {
    format!("{}?folderName={}", UPLOADS, directory)
}
