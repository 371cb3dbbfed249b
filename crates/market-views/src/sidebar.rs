//! Category sidebar.

use market_catalog::{Category, CategoryId};

use crate::{escape_html, ViewState};

/// Number of skeleton rows while categories load.
pub const SIDEBAR_SKELETON_ROWS: usize = 5;

/// The one category whose submenu is open, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmenuSelection {
    expanded: Option<CategoryId>,
}

impl SubmenuSelection {
    /// Open `id`, closing whatever was open; close it if it already was.
    pub fn toggle(&mut self, id: &CategoryId) {
        if self.expanded.as_ref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.clone());
        }
    }

    pub fn is_expanded(&self, id: &CategoryId) -> bool {
        self.expanded.as_ref() == Some(id)
    }

    pub fn expanded(&self) -> Option<&CategoryId> {
        self.expanded.as_ref()
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

/// Render the sidebar. An empty category list renders nothing.
pub fn render_category_sidebar(
    state: &ViewState<Vec<Category>>,
    selection: &SubmenuSelection,
) -> String {
    match state {
        ViewState::Loading => render_sidebar_skeleton(),
        ViewState::Empty => String::new(),
        ViewState::Ready(categories) => {
            let rows: String = categories
                .iter()
                .map(|c| render_category_row(c, selection.is_expanded(&c.id)))
                .collect();
            format!(
                r#"<aside class="category-sidebar" data-section="sidebar">
    <h3 class="sidebar-title">Shop By Category</h3>
    <ul class="sidebar-categories">{rows}</ul>
</aside>"#,
                rows = rows
            )
        }
    }
}

fn render_category_row(category: &Category, expanded: bool) -> String {
    let popular = if category.popular_flag() {
        r#"<span class="badge badge-popular">Popular</span>"#
    } else {
        ""
    };
    let count = category
        .product_count
        .map(|n| format!(r#"<span class="category-count">{}</span>"#, n))
        .unwrap_or_default();

    let submenu = if expanded && category.expands() {
        let subs: String = category
            .subcategories
            .iter()
            .map(|sub| {
                format!(
                    r#"<li class="subcategory" data-subcategory-id="{id}">{name} <span class="category-count">{count}</span></li>"#,
                    id = escape_html(sub.id.as_str()),
                    name = escape_html(&sub.name),
                    count = sub.count_or_zero()
                )
            })
            .collect();
        format!(
            r#"<ul class="subcategories">{}<li class="view-all">View All {}</li></ul>"#,
            subs,
            escape_html(&category.name)
        )
    } else {
        String::new()
    };

    let chevron = match (category.expands(), expanded) {
        (false, _) => "",
        (true, false) => r#"<span class="chevron">&#9656;</span>"#,
        (true, true) => r#"<span class="chevron">&#9662;</span>"#,
    };

    format!(
        r#"<li class="category{open}" data-category-id="{id}"><span class="category-icon icon-{icon}"></span>{name}{popular}{count}{chevron}{submenu}</li>"#,
        open = if expanded { " category--open" } else { "" },
        id = escape_html(category.id.as_str()),
        icon = escape_html(&category.icon),
        name = escape_html(&category.name),
        popular = popular,
        count = count,
        chevron = chevron,
        submenu = submenu
    )
}

fn render_sidebar_skeleton() -> String {
    let rows: String = (0..SIDEBAR_SKELETON_ROWS)
        .map(|_| r#"<li class="category skeleton"><span class="skeleton-icon"></span><span class="skeleton-line"></span></li>"#)
        .collect();
    format!(
        r#"<aside class="category-sidebar category-sidebar--loading" data-section="sidebar">
    <div class="skeleton-title"></div>
    <ul class="sidebar-categories">{}</ul>
</aside>"#,
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_catalog::static_sidebar_categories;

    #[test]
    fn test_only_one_submenu_open() {
        let a = CategoryId::new("2");
        let b = CategoryId::new("3");
        let mut selection = SubmenuSelection::default();

        selection.toggle(&a);
        selection.toggle(&b);
        assert!(!selection.is_expanded(&a));
        assert!(selection.is_expanded(&b));

        selection.toggle(&b);
        assert_eq!(selection.expanded(), None);
    }

    #[test]
    fn test_expanded_category_lists_subcategories() {
        let categories = static_sidebar_categories();
        let mut selection = SubmenuSelection::default();
        selection.toggle(&CategoryId::new("2"));

        let html = render_category_sidebar(&ViewState::Ready(categories), &selection);
        assert!(html.contains("Houses for Sale"));
        assert!(html.contains("View All Real Estate"));
        assert!(!html.contains("Manicure"));
    }

    #[test]
    fn test_skeleton_rows() {
        let html = render_category_sidebar(&ViewState::Loading, &SubmenuSelection::default());
        assert_eq!(html.matches("category skeleton").count(), SIDEBAR_SKELETON_ROWS);
    }

    #[test]
    fn test_empty_renders_nothing() {
        let html = render_category_sidebar(&ViewState::Empty, &SubmenuSelection::default());
        assert!(html.is_empty());
    }
}
