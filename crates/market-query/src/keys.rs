//! Key factories for storefront queries.

/// Keys of banner and category queries.
pub mod banner_keys {
    use market_services::{CategoryOptions, SlideOptions};

    use crate::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::root("banners")
    }

    pub fn hero_slides() -> QueryKey {
        all().push("hero-slides")
    }

    pub fn hero_slides_with(options: &SlideOptions) -> QueryKey {
        hero_slides().push_json(options)
    }

    pub fn categories() -> QueryKey {
        all().push("categories")
    }

    pub fn categories_with(options: &CategoryOptions) -> QueryKey {
        categories().push_json(options)
    }
}

/// Keys of product queries.
pub mod product_keys {
    use market_catalog::ProductId;

    use crate::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::root("products")
    }

    pub fn featured() -> QueryKey {
        all().push("featured")
    }

    pub fn featured_with_limit(limit: u32) -> QueryKey {
        featured().push(limit)
    }

    pub fn by_category(category_id: u64) -> QueryKey {
        all().push("category").push(category_id)
    }

    pub fn search(query: &str) -> QueryKey {
        all().push("search").push(query)
    }

    /// One page of a search.
    pub fn search_page(query: &str, page: u32, limit: u32) -> QueryKey {
        search(query).push(page).push(limit)
    }

    pub fn details(id: ProductId) -> QueryKey {
        all().push("details").push(id)
    }
}

/// Key of the vehicle-type feed.
pub fn vehicle_types_key() -> crate::QueryKey {
    crate::QueryKey::root("types")
}
