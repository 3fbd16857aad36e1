//! Cart view state.
//!
//! [`CartView`] holds one [`LineItem`] per rendered product, keyed by
//! [`RowId`] in insertion order, plus any informational notices (empty cart,
//! load error). Everything shown to the user is derived from this state:
//! [`render_row`] turns a line item into a toolkit-independent
//! [`RowDescription`], and [`html`] materializes those descriptions as HTML.
//!
//! The aggregate total is never stored. [`CartView::total`] sums the current
//! subtotals every time it is called, so it always agrees with the rows that
//! exist regardless of the edits that produced them.

pub mod html;
mod row;

pub use row::{ImageDescription, RowDescription, render_row};

use std::collections::BTreeMap;

use cartview_core::{Price, Product, ProductId, Quantity, RowId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::cart_store::CartStore;

/// Errors raised by row interactions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// The row does not exist (already removed, or never rendered).
    #[error("Unknown cart row: {0}")]
    UnknownRow(RowId),
}

/// One rendered product with its editable quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    row: RowId,
    product_id: ProductId,
    title: String,
    thumbnail: String,
    unit_price: Price,
    quantity: Quantity,
    subtotal: Price,
}

impl LineItem {
    fn new(row: RowId, product: Product) -> Self {
        let unit_price = product.unit_price();
        Self {
            row,
            product_id: product.id,
            title: product.title,
            thumbnail: product.thumbnail,
            unit_price,
            quantity: Quantity::default(),
            subtotal: unit_price,
        }
    }

    fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.times(quantity);
    }

    #[must_use]
    pub const fn row(&self) -> RowId {
        self.row
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `quantity x unit_price`, kept current on every quantity change.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }
}

/// Informational row shown in place of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Nothing in the cart, or nothing in the cart exists upstream anymore.
    Empty,
    /// The catalog could not be loaded.
    Error,
}

impl Notice {
    /// Text shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Your cart is empty",
            Self::Error => "Error loading cart items. Please try again.",
        }
    }

    /// CSS class distinguishing the notice kinds.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Empty => "cart-empty",
            Self::Error => "cart-error",
        }
    }
}

/// Result of removing a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// Product whose identifier was dropped from the persisted cart.
    pub product_id: ProductId,
    /// Entries left in the persisted identifier list.
    pub item_count: usize,
    /// Whether the removal left no item rows (the empty notice was added).
    pub now_empty: bool,
}

/// Everything needed to draw the cart table, in display order.
///
/// The total row always comes last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub items: Vec<RowDescription>,
    pub notices: Vec<Notice>,
    pub total_text: String,
    pub total_value: Decimal,
}

/// Rows, notices and quantities of one loaded cart page.
#[derive(Debug, Default)]
pub struct CartView {
    rows: BTreeMap<RowId, LineItem>,
    notices: Vec<Notice>,
    next_row: i64,
}

impl CartView {
    /// Create a view with no rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the "cart is empty" notice.
    ///
    /// Callers only do this when no item rows exist; repeated calls add
    /// repeated notices.
    pub fn render_empty(&mut self) {
        self.notices.push(Notice::Empty);
    }

    /// Add the load-error notice.
    pub fn render_error(&mut self) {
        self.notices.push(Notice::Error);
    }

    /// Add one line item per product, in the given order, each with
    /// quantity 1.
    pub fn render_items(&mut self, products: impl IntoIterator<Item = Product>) {
        for product in products {
            let row = RowId::new(self.next_row);
            self.next_row += 1;
            self.rows.insert(row, LineItem::new(row, product));
        }
        debug!(rows = self.rows.len(), total = %self.total(), "Cart rows rendered");
    }

    /// Apply raw quantity input to a row.
    ///
    /// The input is clamped with [`Quantity::parse_clamped`]; the row's
    /// subtotal is recomputed immediately.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownRow` if `row` is not rendered.
    pub fn change_quantity(&mut self, row: RowId, raw: &str) -> Result<&LineItem, ViewError> {
        let item = self.rows.get_mut(&row).ok_or(ViewError::UnknownRow(row))?;
        item.set_quantity(Quantity::parse_clamped(raw));
        debug!(
            row = %row,
            quantity = %item.quantity,
            subtotal = %item.subtotal,
            "Quantity changed"
        );
        Ok(item)
    }

    /// Remove a row and its product from the persisted cart.
    ///
    /// The product's identifier is removed from `store` (every occurrence),
    /// then the row is dropped. When no rows remain the empty notice is
    /// shown. The reported count is the length of the persisted list, which
    /// can differ from the number of rendered rows.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownRow` if `row` is not rendered; the store
    /// is left untouched in that case.
    pub fn remove_row(&mut self, row: RowId, store: &CartStore) -> Result<Removal, ViewError> {
        let product_id = self
            .rows
            .get(&row)
            .map(LineItem::product_id)
            .ok_or(ViewError::UnknownRow(row))?;

        let item_count = store.remove_identifier(product_id);
        self.rows.remove(&row);

        let now_empty = self.rows.is_empty();
        if now_empty {
            self.render_empty();
        }

        let removal = Removal {
            product_id,
            item_count,
            now_empty,
        };
        debug!(
            row = %row,
            product_id = %product_id,
            item_count = removal.item_count,
            total = %self.total(),
            "Cart row removed"
        );
        Ok(removal)
    }

    /// Sum of every current row's subtotal.
    #[must_use]
    pub fn total(&self) -> Price {
        self.rows.values().map(LineItem::subtotal).sum()
    }

    /// Look up a row.
    #[must_use]
    pub fn line_item(&self, row: RowId) -> Option<&LineItem> {
        self.rows.get(&row)
    }

    /// Rendered rows in display order.
    pub fn line_items(&self) -> impl Iterator<Item = &LineItem> {
        self.rows.values()
    }

    /// Number of rendered item rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Notices currently shown.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Describe the table for rendering.
    #[must_use]
    pub fn describe(&self) -> TableDescription {
        let total = self.total();
        TableDescription {
            items: self.rows.values().map(render_row).collect(),
            notices: self.notices.clone(),
            total_text: total.display(),
            total_value: total.amount,
        }
    }
}
