//! Vehicle-type feed and the synthesized "Cars" category.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ids::CategoryId;

/// Id given to the synthesized "Cars" category.
pub const CARS_CATEGORY_ID: u64 = 1;

const CARS_LISTINGS_URL: &str = "https://cars.arudeal.com/listings";

/// One vehicle type with its live car count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "crate::de::count")]
    pub total_cars: u64,
}

impl VehicleType {
    /// Listings page for this type, newest first.
    pub fn listings_url(&self) -> String {
        format!("{}?type={}&sort=date-desc", CARS_LISTINGS_URL, self.slug)
    }
}

/// Body of the vehicle-type endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTypeFeed {
    #[serde(default)]
    pub data: Vec<VehicleType>,
}

/// Build the "Cars" category from the vehicle-type feed.
///
/// Types without cars are left out. Returns `None` when no cars are listed
/// at all.
pub fn cars_category(types: &[VehicleType]) -> Option<Category> {
    let total: u64 = types.iter().map(|t| t.total_cars).sum();
    if total == 0 {
        return None;
    }

    let subcategories: Vec<Category> = types
        .iter()
        .filter(|t| t.total_cars > 0)
        .map(|t| {
            Category::new(t.id.clone(), t.name.clone())
                .with_count(t.total_cars)
                .with_link(t.listings_url())
        })
        .collect();

    Some(
        Category::new(CARS_CATEGORY_ID, "Cars")
            .with_icon("car")
            .with_link(format!("{}?sort=date-desc", CARS_LISTINGS_URL))
            .popular()
            .with_count(total)
            .with_subcategories(subcategories),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vtype(id: &str, slug: &str, total: u64) -> VehicleType {
        VehicleType {
            id: CategoryId::new(id),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            total_cars: total,
        }
    }

    #[test]
    fn test_cars_category_skips_empty_types() {
        let cars = cars_category(&[vtype("a", "suv", 4), vtype("b", "van", 0), vtype("c", "sedan", 2)])
            .unwrap();
        assert_eq!(cars.id.as_str(), "1");
        assert_eq!(cars.product_count, Some(6));
        assert_eq!(cars.subcategories.len(), 2);
        assert_eq!(
            cars.subcategories[0].link.as_deref(),
            Some("https://cars.arudeal.com/listings?type=suv&sort=date-desc")
        );
        assert!(cars.expands());
    }

    #[test]
    fn test_no_cars_no_category() {
        assert!(cars_category(&[vtype("a", "suv", 0)]).is_none());
        assert!(cars_category(&[]).is_none());
    }

    #[test]
    fn test_feed_deserializes() {
        let feed: VehicleTypeFeed = serde_json::from_str(
            r#"{"data": [{"_id": "65a1", "name": "SUV", "slug": "suv", "totalCars": 12}]}"#,
        )
        .unwrap();
        assert_eq!(feed.data[0].total_cars, 12);
        assert_eq!(feed.data[0].id.as_str(), "65a1");
    }
}
