//! Category set shown in the storefront sidebar.

use crate::category::Category;
use crate::vehicle::{cars_category, VehicleType};

fn sub(id: &str, name: &str, count: u64) -> Category {
    Category::new(id, name).with_count(count)
}

/// The fixed verticals, each linking to its own subdomain or section.
pub fn static_sidebar_categories() -> Vec<Category> {
    vec![
        Category::new(2u64, "Real Estate")
            .with_icon("home")
            .with_link("https://realestate.arudeal.com/")
            .popular()
            .with_count(850)
            .with_subcategories(vec![
                sub("21", "Houses for Sale", 320),
                sub("22", "Apartments", 280),
                sub("23", "Commercial", 95),
                sub("24", "Land & Plots", 155),
            ]),
        Category::new(3u64, "Stays")
            .with_icon("home")
            .with_link("https://stays.arudeal.com")
            .with_count(420)
            .with_subcategories(vec![
                sub("31", "Hotels", 180),
                sub("32", "Guest Houses", 120),
                sub("33", "Vacation Rentals", 85),
                sub("34", "Hostels", 35),
            ]),
        Category::new(4u64, "Water Sports")
            .with_icon("waves")
            .with_link("https://watersport.arudeal.com")
            .with_count(180)
            .with_subcategories(vec![
                sub("41", "Surfing", 45),
                sub("42", "Jet Skiing", 35),
                sub("43", "Boat Rentals", 55),
                sub("44", "Swimming Lessons", 25),
                sub("45", "Diving", 20),
            ]),
        Category::new(5u64, "Nail Services")
            .with_icon("scissors")
            .with_link("https://nails.arudeal.com")
            .popular()
            .with_count(95)
            .with_subcategories(vec![
                sub("51", "Manicure", 40),
                sub("52", "Pedicure", 35),
                sub("53", "Nail Art", 15),
                sub("54", "Gel Nails", 5),
            ]),
        Category::new(6u64, "Bikes")
            .with_icon("bike")
            .with_link("/bikes/listings")
            .with_count(320)
            .with_subcategories(vec![
                sub("61", "Sports Bikes", 100).with_link("/bikes/listings?sports=true"),
                sub("62", "Scooters", 85).with_link("/bikes/listings?scooters=true"),
                sub("63", "Cruisers", 70).with_link("/bikes/listings?cruisers=true"),
                sub("64", "Electric Bikes", 65).with_link("/bikes/listings?electric=true"),
            ]),
    ]
}

/// Sidebar categories: "Cars" first when any cars are listed, then the
/// fixed verticals. Categories with a known count of zero are hidden.
pub fn sidebar_categories(vehicle_types: &[VehicleType]) -> Vec<Category> {
    let mut categories = Vec::with_capacity(6);
    if let Some(cars) = cars_category(vehicle_types) {
        categories.push(cars);
    }
    categories.extend(static_sidebar_categories());
    categories.retain(|c| c.product_count != Some(0));
    categories
}
