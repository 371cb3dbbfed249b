//! Hero slider and image carousel.

use market_catalog::{HeroSlide, ImageBase};

use crate::{escape_html, ViewState};

/// Auto-advance interval of the hero slider, in milliseconds.
pub const SLIDE_INTERVAL_MS: u64 = 5000;

/// Index into a cycle of `len` items. Moving past either end wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliderState {
    current: usize,
    len: usize,
}

impl SliderState {
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Navigation arrows and dots only show with more than one item.
    pub fn shows_navigation(&self) -> bool {
        self.len > 1
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`. Out-of-range indexes are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.len {
            self.current = index;
        }
    }

    /// Change the item count, keeping the index in range.
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        if self.current >= len {
            self.current = 0;
        }
    }
}

/// Main image and thumbnails of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCarousel {
    images: Vec<String>,
    state: SliderState,
}

impl ImageCarousel {
    pub fn new(images: Vec<String>) -> Self {
        let state = SliderState::new(images.len());
        Self { images, state }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.state.current()
    }

    /// The image on display.
    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.state.current()).map(String::as_str)
    }

    pub fn next(&mut self) {
        self.state.next();
    }

    pub fn previous(&mut self) {
        self.state.previous();
    }

    /// Show thumbnail `index`.
    pub fn select(&mut self, index: usize) {
        self.state.go_to(index);
    }
}

/// Render the hero slider.
///
/// Loading and empty both show the fixed-height placeholder.
pub fn render_hero_slider(
    state: &ViewState<Vec<HeroSlide>>,
    slider: &SliderState,
    images: &ImageBase,
) -> String {
    let slides = match state {
        ViewState::Ready(slides) => slides,
        _ => {
            return r#"<div class="hero-slider hero-slider--loading" data-section="hero">
    <div class="hero-placeholder">Loading slides...</div>
</div>"#
                .to_string()
        }
    };

    let body: String = slides
        .iter()
        .enumerate()
        .map(|(i, slide)| render_slide(slide, i == slider.current(), images))
        .collect();

    let navigation = if slider.shows_navigation() {
        let dots: String = (0..slides.len())
            .map(|i| {
                format!(
                    r#"<button class="slider-dot{}" data-slide="{}" aria-label="Go to slide {}"></button>"#,
                    if i == slider.current() { " slider-dot--active" } else { "" },
                    i,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"<button class="slider-prev" aria-label="Previous slide"></button>
    <button class="slider-next" aria-label="Next slide"></button>
    <div class="slider-dots">{}</div>"#,
            dots
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="hero-slider" data-section="hero" data-current="{current}">
    {body}
    {navigation}
</div>"#,
        current = slider.current(),
        body = body,
        navigation = navigation
    )
}

fn render_slide(slide: &HeroSlide, active: bool, images: &ImageBase) -> String {
    let mut content = String::new();
    if !slide.subtitle.is_empty() {
        content.push_str(&format!(
            r#"<span class="slide-subtitle">{}</span>"#,
            escape_html(&slide.subtitle)
        ));
    }
    if !slide.title.is_empty() {
        content.push_str(&format!(
            r#"<h2 class="slide-title">{}</h2>"#,
            escape_html(&slide.title)
        ));
    }
    if !slide.discount.is_empty() {
        content.push_str(&format!(
            r#"<div class="slide-discount"><span>Discount</span><strong>{}</strong></div>"#,
            escape_html(&slide.discount)
        ));
    }
    if !slide.link.is_empty() {
        content.push_str(r#"<button class="slide-cta">Shop Now</button>"#);
    }

    let image = if slide.image.is_empty() {
        String::new()
    } else {
        let alt = if slide.title.is_empty() { "Slide image" } else { &slide.title };
        format!(
            r#"<img src="{}" alt="{}" class="slide-image" loading="lazy">"#,
            escape_html(&images.resolve(&slide.image)),
            escape_html(alt)
        )
    };

    format!(
        r#"<div class="slide bg-gradient-to-r {gradient}{state}" data-banner-id="{id}">{content}{image}</div>"#,
        gradient = escape_html(&slide.bg_gradient),
        state = if active { " slide--active" } else { "" },
        id = escape_html(slide.id.as_str()),
        content = content,
        image = image
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_catalog::RawHeroSlide;

    fn slide(id: &str, title: &str, link: &str) -> HeroSlide {
        let raw = RawHeroSlide {
            id: Some(id.into()),
            title: Some(title.into()),
            image: Some("/banners/a.png".into()),
            link: Some(link.into()),
            ..Default::default()
        };
        HeroSlide::from_raw(raw, 0).with_default_gradient()
    }

    // === Cycling ===

    #[test]
    fn test_next_and_previous_wrap() {
        let mut slider = SliderState::new(3);
        slider.previous();
        assert_eq!(slider.current(), 2);
        slider.next();
        assert_eq!(slider.current(), 0);
        slider.go_to(1);
        assert_eq!(slider.current(), 1);
        slider.go_to(7);
        assert_eq!(slider.current(), 1);
    }

    #[test]
    fn test_empty_slider_stays_put() {
        let mut slider = SliderState::new(0);
        slider.next();
        slider.previous();
        assert_eq!(slider.current(), 0);
        assert!(!slider.shows_navigation());
    }

    #[test]
    fn test_resize_resets_out_of_range_index() {
        let mut slider = SliderState::new(4);
        slider.go_to(3);
        slider.resize(2);
        assert_eq!(slider.current(), 0);
    }

    #[test]
    fn test_carousel_follows_thumbnails() {
        let mut carousel = ImageCarousel::new(vec!["a.jpg".into(), "b.jpg".into()]);
        assert_eq!(carousel.current_image(), Some("a.jpg"));
        carousel.previous();
        assert_eq!(carousel.current_image(), Some("b.jpg"));
        carousel.select(0);
        assert_eq!(carousel.index(), 0);
        assert_eq!(ImageCarousel::new(Vec::new()).current_image(), None);
    }

    // === Rendering ===

    #[test]
    fn test_render_marks_current_slide() {
        let slides = vec![slide("a", "First", ""), slide("b", "Second", "https://x.test")];
        let mut slider = SliderState::new(slides.len());
        slider.next();

        let html = render_hero_slider(
            &ViewState::Ready(slides),
            &slider,
            &ImageBase::Prefix("https://img.test".into()),
        );
        assert!(html.contains(r#"data-current="1""#));
        assert!(html.contains(r#"slide--active" data-banner-id="b""#));
        assert!(html.contains("https://img.test/banners/a.png"));
        assert_eq!(html.matches("slide-cta").count(), 1);
        assert_eq!(html.matches("data-slide=").count(), 2);
    }

    #[test]
    fn test_single_slide_has_no_navigation() {
        let slides = vec![slide("a", "Only", "")];
        let html = render_hero_slider(
            &ViewState::Ready(slides),
            &SliderState::new(1),
            &ImageBase::Prefix(String::new()),
        );
        assert!(!html.contains("slider-prev"));
    }

    #[test]
    fn test_loading_placeholder() {
        let html = render_hero_slider(
            &ViewState::Loading,
            &SliderState::default(),
            &ImageBase::Prefix(String::new()),
        );
        assert!(html.contains("Loading slides..."));
    }
}
