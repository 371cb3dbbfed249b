//! Category types for storefront navigation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// A storefront category.
///
/// Subcategories nest one level deep in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier. Empty when the server omitted it.
    #[serde(default)]
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Icon token.
    #[serde(default)]
    pub icon: String,
    /// Whether the category expands into subcategories.
    #[serde(default)]
    pub has_submenu: bool,
    /// Nested subcategories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Category>,
    /// Number of items, when the server counted them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
    /// Popularity flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
    /// Last modification time as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Destination opened when the category is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Category {
    /// Create a leaf category.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
            has_submenu: false,
            subcategories: Vec::new(),
            product_count: None,
            is_popular: None,
            last_updated: None,
            link: None,
        }
    }

    /// Set the icon token.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the item count.
    pub fn with_count(mut self, count: u64) -> Self {
        self.product_count = Some(count);
        self
    }

    /// Mark as popular.
    pub fn popular(mut self) -> Self {
        self.is_popular = Some(true);
        self
    }

    /// Set the destination link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attach subcategories; the category gets a submenu when any exist.
    pub fn with_subcategories(mut self, subcategories: Vec<Category>) -> Self {
        self.has_submenu = !subcategories.is_empty();
        self.subcategories = subcategories;
        self
    }

    /// True when clicking the category should expand it.
    pub fn expands(&self) -> bool {
        self.has_submenu && !self.subcategories.is_empty()
    }

    /// Popularity flag, absent treated as not popular.
    pub fn popular_flag(&self) -> bool {
        self.is_popular.unwrap_or(false)
    }

    /// Item count, absent treated as zero.
    pub fn count_or_zero(&self) -> u64 {
        self.product_count.unwrap_or(0)
    }

    /// Find a direct subcategory.
    pub fn subcategory(&self, id: &CategoryId) -> Option<&Category> {
        self.subcategories.iter().find(|sub| &sub.id == id)
    }
}

/// Client-side category ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategorySort {
    /// Alphabetical by name.
    Name,
    /// Popular categories first.
    Popularity,
    /// Largest item count first.
    ProductCount,
}

impl CategorySort {
    /// Wire name, also sent as the `sort_by` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Popularity => "popularity",
            Self::ProductCount => "productCount",
        }
    }

    fn compare(&self, a: &Category, b: &Category) -> Ordering {
        match self {
            Self::Name => compare_names(&a.name, &b.name),
            Self::Popularity => b.popular_flag().cmp(&a.popular_flag()),
            Self::ProductCount => b.count_or_zero().cmp(&a.count_or_zero()),
        }
    }
}

impl fmt::Display for CategorySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategorySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "popularity" => Ok(Self::Popularity),
            "productCount" | "product-count" | "product_count" => Ok(Self::ProductCount),
            other => Err(format!("unknown sort: {}", other)),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorted copy of `categories`.
///
/// The sort is stable, so categories that compare equal keep their server
/// order, and the input is never reordered in place.
pub fn sort_categories(categories: &[Category], sort: CategorySort) -> Vec<Category> {
    let mut sorted = categories.to_vec();
    sorted.sort_by(|a, b| sort.compare(a, b));
    sorted
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    pub icon: String,
    pub has_submenu: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Category>,
}

/// Partial update of a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_submenu: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<Category>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name() {
        let input = vec![Category::new(1u64, "B"), Category::new(2u64, "A")];
        let sorted = sort_categories(&input, CategorySort::Name);
        assert_eq!(names(&sorted), vec!["A", "B"]);
        assert_eq!(names(&input), vec!["B", "A"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let input = vec![
            Category::new(1u64, "stays"),
            Category::new(2u64, "Bikes"),
            Category::new(3u64, "cars"),
        ];
        let sorted = sort_categories(&input, CategorySort::Name);
        assert_eq!(names(&sorted), vec!["Bikes", "cars", "stays"]);
    }

    #[test]
    fn test_sort_by_popularity_is_stable() {
        let input = vec![
            Category::new(1u64, "Stays"),
            Category::new(2u64, "Cars").popular(),
            Category::new(3u64, "Bikes"),
            Category::new(4u64, "Nails").popular(),
        ];
        let sorted = sort_categories(&input, CategorySort::Popularity);
        assert_eq!(names(&sorted), vec!["Cars", "Nails", "Stays", "Bikes"]);
    }

    #[test]
    fn test_sort_by_count_non_increasing() {
        let input = vec![
            Category::new(1u64, "A").with_count(5),
            Category::new(2u64, "B"),
            Category::new(3u64, "C").with_count(50),
            Category::new(4u64, "D").with_count(0),
        ];
        let sorted = sort_categories(&input, CategorySort::ProductCount);
        for pair in sorted.windows(2) {
            assert!(pair[0].count_or_zero() >= pair[1].count_or_zero());
        }
        assert_eq!(sorted[0].name, "C");
    }

    #[test]
    fn test_deserialize_minimal() {
        let cat: Category = serde_json::from_str(r#"{"id": 3, "name": "Stays"}"#).unwrap();
        assert_eq!(cat.id.as_str(), "3");
        assert!(!cat.has_submenu);
        assert!(cat.subcategories.is_empty());
        assert_eq!(cat.product_count, None);
    }

    #[test]
    fn test_deserialize_without_id() {
        let cat: Category = serde_json::from_str(r#"{"name": "B"}"#).unwrap();
        assert!(cat.id.is_empty());
        assert_eq!(cat.name, "B");
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("productCount".parse::<CategorySort>(), Ok(CategorySort::ProductCount));
        assert_eq!("product-count".parse::<CategorySort>(), Ok(CategorySort::ProductCount));
        assert!("price".parse::<CategorySort>().is_err());
    }

    #[test]
    fn test_expands_requires_subcategories() {
        let mut cat = Category::new(1u64, "Cars");
        cat.has_submenu = true;
        assert!(!cat.expands());
        let cat = cat.with_subcategories(vec![Category::new("sedan", "Sedan")]);
        assert!(cat.expands());
    }

    #[test]
    fn test_patch_skips_unset() {
        let patch = CategoryPatch {
            name: Some("Boats".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"name": "Boats"})
        );
    }
}
