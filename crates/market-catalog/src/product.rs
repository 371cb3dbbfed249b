//! Product cards from the main API.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// Product shown in the featured grid.
///
/// Prices are display strings (`"$1,299"`); some records send them as
/// numbers, which are accepted and stringified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "crate::de::opt_text", skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// Full product record used by category grids, search and details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "crate::de::text")]
    pub price: String,
    #[serde(default, deserialize_with = "crate::de::text")]
    pub original_price: String,
    #[serde(default, deserialize_with = "crate::de::text")]
    pub discount: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Set locally after a successful add-to-favorites.
    #[serde(default)]
    pub is_favorite: bool,
}

impl MainProduct {
    /// Whole stars to fill, out of five.
    pub fn filled_stars(&self) -> usize {
        (self.rating.max(0.0).floor() as usize).min(5)
    }
}

/// True when a display price carries a positive amount.
///
/// Currency symbols and separators are ignored: `"$1,299.00"` is valid,
/// `"0"`, `"Free"` and `""` are not.
pub fn has_valid_price(price: &str) -> bool {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_number(&cleaned).map(|n| n > 0.0).unwrap_or(false)
}

/// Parse the longest numeric prefix, so `"12.5.0"` reads as 12.5.
fn leading_number(s: &str) -> Option<f64> {
    (1..=s.len())
        .rev()
        .find_map(|end| s.get(..end).and_then(|prefix| prefix.parse::<f64>().ok()))
}

/// Page to request after `pages_loaded` pages, if any.
///
/// More pages exist only while the last page came back full.
pub fn next_page_param(last_page_len: usize, pages_loaded: u32, limit: usize) -> Option<u32> {
    if limit > 0 && last_page_len == limit {
        Some(pages_loaded + 1)
    } else {
        None
    }
}

/// Body for `POST /user/favorites`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub product_id: ProductId,
}

/// Result of a favorites call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteResult {
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_price() {
        assert!(has_valid_price("$1,299.00"));
        assert!(has_valid_price("AWG 45"));
        assert!(has_valid_price("12.5.0"));
        assert!(!has_valid_price("0"));
        assert!(!has_valid_price("$0.00"));
        assert!(!has_valid_price("Free"));
        assert!(!has_valid_price(""));
        assert!(!has_valid_price("-5"));
    }

    #[test]
    fn test_next_page() {
        assert_eq!(next_page_param(12, 1, 12), Some(2));
        assert_eq!(next_page_param(12, 3, 12), Some(4));
        assert_eq!(next_page_param(7, 2, 12), None);
        assert_eq!(next_page_param(0, 1, 12), None);
    }

    #[test]
    fn test_featured_accepts_numeric_prices() {
        let p: FeaturedProduct = serde_json::from_value(json!({
            "id": 7,
            "name": "Kayak",
            "price": 499,
            "originalPrice": "$650",
            "image": "/k.jpg"
        }))
        .unwrap();
        assert_eq!(p.price.as_deref(), Some("499"));
        assert_eq!(p.original_price.as_deref(), Some("$650"));
        assert_eq!(p.discount, None);
    }

    #[test]
    fn test_main_product_defaults() {
        let p: MainProduct =
            serde_json::from_value(json!({"id": 1, "name": "Villa", "rating": 4.6})).unwrap();
        assert!(!p.is_favorite);
        assert_eq!(p.price, "");
        assert_eq!(p.filled_stars(), 4);
    }

    #[test]
    fn test_favorite_request_body() {
        let body = serde_json::to_value(FavoriteRequest { product_id: 9 }).unwrap();
        assert_eq!(body, json!({"productId": 9}));
    }
}
