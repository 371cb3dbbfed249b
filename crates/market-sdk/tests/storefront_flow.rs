//! Home page reads and banner writes through the whole stack.

use std::sync::Arc;

use market_sdk::market_core::ManualClock;
use market_sdk::market_data::testing::MockTransport;
use market_sdk::market_data::Method;
use market_sdk::prelude::*;
use serde_json::json;

fn queries(mock: &MockTransport) -> (StorefrontQueries, StorefrontConfig) {
    let config = StorefrontConfig::new("https://api.example.com")
        .with_image_base_url("https://img.example.com");
    let services = Storefront::with_transport(&config, mock.shared(), Arc::new(ManualClock::at_epoch()));
    (StorefrontQueries::from_services(services), config)
}

fn script_home(mock: &MockTransport, slides: serde_json::Value) {
    mock.clear_route(Method::GET, "/banners");
    mock.respond_json(Method::GET, "/banners", json!({ "data": slides }));
    mock.respond_json(Method::GET, "/categories-enhanced", json!({ "data": [] }));
    mock.respond_json(Method::GET, "/featured-products", json!({ "data": [] }));
    mock.respond_json(Method::GET, "/types/list-types", json!({ "data": [] }));
    mock.respond_json(Method::GET, "/api/listing-sections", json!([]));
}

#[tokio::test]
async fn test_home_reload_is_served_from_cache() {
    let mock = MockTransport::new();
    script_home(&mock, json!([{ "id": "h1", "title": "Reef dive", "bannerType": "hero" }]));
    let (queries, config) = queries(&mock);

    let first = HomePage::load(&queries, config_images(&config)).await;
    let second = HomePage::load(&queries, config_images(&config)).await;

    assert_eq!(first.hero_slides, second.hero_slides);
    assert_eq!(mock.calls(Method::GET, "/banners"), 1);
    assert!(render_or_fallback(|| second.render()).contains("Reef dive"));
}

#[tokio::test]
async fn test_deleted_slide_disappears_on_next_load() {
    let mock = MockTransport::new();
    script_home(
        &mock,
        json!([
            { "id": "h1", "title": "Reef dive", "bannerType": "hero" },
            { "id": "h2", "title": "Sunset cruise", "bannerType": "hero" }
        ]),
    );
    let (queries, config) = queries(&mock);

    let before = HomePage::load(&queries, config_images(&config)).await;
    assert_eq!(before.hero_slides.len(), 2);

    mock.respond_json(Method::DELETE, "/banners/h2", json!({ "success": true }));
    let outcome = queries.delete_hero_slide(&SlideId::new("h2")).await.unwrap();
    assert!(outcome.success);

    script_home(&mock, json!([{ "id": "h1", "title": "Reef dive", "bannerType": "hero" }]));
    let after = HomePage::load(&queries, config_images(&config)).await;

    assert_eq!(after.hero_slides.len(), 1);
    assert_eq!(mock.calls(Method::GET, "/banners"), 2);
    assert!(!after.render().contains("Sunset cruise"));
}
