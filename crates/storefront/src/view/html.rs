//! HTML adapter for the cart view.
//!
//! Materializes [`TableDescription`]s through askama templates. The markup
//! carries HTMX attributes so quantity edits and removals post back to the
//! page that rendered them and swap the returned table in place.

use askama::Template;
use askama_web::WebTemplate;

use super::TableDescription;
use crate::page::{CartPage, PageId};

/// Full cart page.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page_id: PageId,
    pub table: TableDescription,
    pub item_count: usize,
}

impl CartShowTemplate {
    /// Render a freshly loaded page.
    #[must_use]
    pub fn new(page: &CartPage) -> Self {
        Self {
            page_id: page.id(),
            table: page.view().describe(),
            item_count: page.item_count(),
        }
    }
}

/// Cart table fragment returned after row interactions (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_table.html")]
pub struct CartTableTemplate {
    pub page_id: PageId,
    pub table: TableDescription,
}

impl CartTableTemplate {
    /// Render the current table of `page`.
    #[must_use]
    pub fn new(page: &CartPage) -> Self {
        Self {
            page_id: page.id(),
            table: page.view().describe(),
        }
    }
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use cartview_core::{Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::view::CartView;

    fn table(view: &CartView) -> CartTableTemplate {
        CartTableTemplate {
            page_id: PageId::new(),
            table: view.describe(),
        }
    }

    fn product(id: i64, title: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::from_str(price).unwrap(),
            thumbnail: format!("https://cdn.example.com/{id}.png"),
            description: None,
            category: None,
            brand: None,
            stock: None,
        }
    }

    #[test]
    fn test_table_renders_rows_before_total() {
        let mut view = CartView::new();
        view.render_items([product(10, "Lamp", "10"), product(20, "Mug", "5")]);
        let html = table(&view).render().unwrap();

        assert_eq!(html.matches("class=\"cart-item\"").count(), 2);
        assert!(html.contains("data-product-id=\"10\""));
        assert!(html.contains("aria-label=\"Remove item\""));
        assert!(html.contains("Total: $15.00"));

        let last_item = html.rfind("cart-item").unwrap();
        let total = html.find("cart-total-row").unwrap();
        assert!(last_item < total);
    }

    #[test]
    fn test_table_escapes_titles() {
        let mut view = CartView::new();
        view.render_items([product(1, "<b>Bold</b>", "1")]);
        let html = table(&view).render().unwrap();

        assert!(!html.contains("<b>Bold</b>"));
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt;") || html.contains("&#60;b&#62;Bold"));
    }

    #[test]
    fn test_notices_render_distinctly() {
        let mut empty = CartView::new();
        empty.render_empty();
        let html = table(&empty).render().unwrap();
        assert!(html.contains("cart-empty"));
        assert!(html.contains("Your cart is empty"));
        assert!(!html.contains("class=\"cart-item\""));

        let mut errored = CartView::new();
        errored.render_error();
        let html = table(&errored).render().unwrap();
        assert!(html.contains("cart-error"));
        assert!(html.contains("Error loading cart items. Please try again."));
    }

    #[test]
    fn test_row_controls_post_back_to_their_page() {
        let mut view = CartView::new();
        view.render_items([product(10, "Lamp", "10")]);
        let fragment = table(&view);
        let page_id = fragment.page_id;
        let html = fragment.render().unwrap();

        assert!(html.contains(&format!("/cart/pages/{page_id}/quantity")));
        assert!(html.contains(&format!("/cart/pages/{page_id}/remove")));
        assert!(html.contains("min=\"1\""));
    }

    #[test]
    fn test_count_badge() {
        let html = CartCountTemplate { count: 3 }.render().unwrap();
        assert_eq!(html.trim(), "3");
    }
}
