//! Listing cards, sections and the listing detail view.

use market_catalog::{
    format_price, FALLBACK_SELLER_NAME, ImageBase, Listing, ListingCard, SectionListings, Seller,
};

use crate::{escape_html, ImageCarousel, ViewState};

/// Image shown for listings without one.
pub const NO_IMAGE: &str = "/no-image.jpg";

/// Render a listing card. The card links to the listing's detail page.
pub fn render_listing_card(card: &ListingCard) -> String {
    let image = if card.image.is_empty() { NO_IMAGE } else { &card.image };
    format!(
        r#"<a class="listing-card" href="/listing-detail/{id}" data-listing-id="{id}">
    <img src="{image}" alt="{title}" class="listing-image">
    <h3 class="listing-title">{title}</h3>
    <p class="listing-description">{description}</p>
    <div class="listing-price">AWG {price}</div>
</a>"#,
        id = escape_html(card.id.as_str()),
        image = escape_html(image),
        title = escape_html(&card.title),
        description = escape_html(&card.description),
        price = format_price(card.price)
    )
}

/// Render the "More Listings" strip from every section's cards, in order.
pub fn render_listing_sections(state: &ViewState<Vec<SectionListings>>) -> String {
    match state {
        ViewState::Loading => r#"<section class="listing-sections listing-sections--loading" data-section="listings">
    <div class="listing-card skeleton"></div><div class="listing-card skeleton"></div><div class="listing-card skeleton"></div>
</section>"#
            .to_string(),
        ViewState::Empty => String::new(),
        ViewState::Ready(sections) => {
            let cards: Vec<&ListingCard> = sections.iter().flat_map(|s| s.listings.iter()).collect();
            render_more_listings(&cards)
        }
    }
}

/// Render a horizontal strip of cards. No cards, no strip.
pub fn render_more_listings(cards: &[&ListingCard]) -> String {
    if cards.is_empty() {
        return String::new();
    }
    let body: String = cards.iter().map(|c| render_listing_card(c)).collect();
    format!(
        r#"<section class="listing-sections" data-section="listings">
    <h3 class="section-title">More Listings</h3>
    <div class="listing-strip">{}</div>
</section>"#,
        body
    )
}

/// Render a category's listings.
pub fn render_category_listings(
    slug: &str,
    state: &ViewState<Vec<Listing>>,
    images: &ImageBase,
) -> String {
    let body = match state {
        ViewState::Loading => r#"<div class="loading">Loading...</div>"#.to_string(),
        ViewState::Empty => format!(
            r#"<div class="empty-state"><p>No {} found matching your criteria.</p></div>"#,
            escape_html(slug)
        ),
        ViewState::Ready(listings) => {
            let cards: String = listings
                .iter()
                .map(|l| render_listing_card(&ListingCard::from_listing(l, images)))
                .collect();
            format!(r#"<div class="listing-grid">{}</div>"#, cards)
        }
    };
    format!(
        r#"<section class="category-listings" data-section="category-listings" data-category="{slug}">
    {body}
</section>"#,
        slug = escape_html(slug),
        body = body
    )
}

/// Render the dealer card. Unknown sellers show as "System Admin".
pub fn render_seller_card(seller: Option<&Seller>) -> String {
    let name = seller.map(|s| s.name.as_str()).unwrap_or(FALLBACK_SELLER_NAME);
    let mut rows = format!(
        r#"<p><span class="label">Name:</span> {}</p>"#,
        escape_html(name)
    );
    if let Some(email) = seller.and_then(|s| s.email.as_deref()) {
        rows.push_str(&format!(
            r#"<p><span class="label">Email:</span> {}</p>"#,
            escape_html(email)
        ));
    }
    if let Some(phone) = seller.and_then(|s| s.phone.as_deref()) {
        rows.push_str(&format!(
            r#"<p><span class="label">Phone:</span> {}</p>"#,
            escape_html(phone)
        ));
    }
    format!(
        r#"<div class="seller-card">
    <h2>Dealer Information</h2>
    {}
</div>"#,
        rows
    )
}

/// Render one listing with its gallery and seller.
pub fn render_listing_detail(
    listing: &Listing,
    seller: Option<&Seller>,
    carousel: &ImageCarousel,
    images: &ImageBase,
) -> String {
    let main_image = carousel
        .current_image()
        .map(|path| {
            format!(
                r#"<img src="{}" alt="{}" class="listing-main-image">"#,
                escape_html(&images.resolve(path)),
                escape_html(&listing.title)
            )
        })
        .unwrap_or_else(|| {
            format!(
                r#"<img src="{}" alt="{}" class="listing-main-image">"#,
                NO_IMAGE,
                escape_html(&listing.title)
            )
        });

    let thumbnails: String = carousel
        .images()
        .iter()
        .enumerate()
        .map(|(i, path)| {
            format!(
                r#"<img src="{src}" alt="Thumbnail {i}" class="thumbnail{active}" data-index="{i}">"#,
                src = escape_html(&images.resolve(path)),
                i = i,
                active = if i == carousel.index() { " thumbnail--active" } else { "" }
            )
        })
        .collect();

    let listed_on = listing
        .listed_on()
        .map(|d| format!(r#"<p class="listing-date">Listed on: {}</p>"#, d))
        .unwrap_or_default();

    format!(
        r#"<article class="listing-detail" data-section="listing-detail" data-listing-id="{id}">
    <div class="listing-gallery">
        {main_image}
        <button class="gallery-prev" aria-label="Previous image"></button>
        <button class="gallery-next" aria-label="Next image"></button>
        <div class="thumbnails">{thumbnails}</div>
    </div>
    {seller}
    <div class="listing-info">
        <h1 class="listing-title">{title}</h1>
        <p class="listing-description">{description}</p>
        <p class="listing-price">Price: AWG {price}</p>
        {listed_on}
    </div>
</article>"#,
        id = escape_html(listing.id.as_str()),
        main_image = main_image,
        thumbnails = thumbnails,
        seller = render_seller_card(seller),
        title = escape_html(&listing.title),
        description = escape_html(&listing.description),
        price = format_price(listing.price),
        listed_on = listed_on
    )
}
