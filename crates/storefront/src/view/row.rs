//! Toolkit-independent description of one cart row.

use cartview_core::{ProductId, Quantity, RowId};
use rust_decimal::Decimal;

use super::LineItem;

/// Accessible label of the per-row removal control.
pub const REMOVE_LABEL: &str = "Remove item";

/// Product image shown in the first column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescription {
    pub src: String,
    pub alt: String,
}

/// What one line-item row shows, free of any UI toolkit types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescription {
    pub row_id: RowId,
    pub product_id: ProductId,
    pub image: ImageDescription,
    /// Label of the removal control overlaid on the image.
    pub remove_label: &'static str,
    pub title: String,
    /// Unit price, e.g. `$9.99`.
    pub unit_price: String,
    pub quantity: u32,
    /// Lowest value the quantity input accepts.
    pub quantity_min: u32,
    /// Formatted subtotal, e.g. `$29.97`.
    pub subtotal: String,
    /// Exact subtotal, attached to the row for the total computation.
    pub subtotal_value: Decimal,
}

/// Describe a line item as a row.
#[must_use]
pub fn render_row(item: &LineItem) -> RowDescription {
    let subtotal = item.subtotal();
    RowDescription {
        row_id: item.row(),
        product_id: item.product_id(),
        image: ImageDescription {
            src: item.thumbnail().to_string(),
            alt: item.title().to_string(),
        },
        remove_label: REMOVE_LABEL,
        title: item.title().to_string(),
        unit_price: item.unit_price().display(),
        quantity: item.quantity().get(),
        quantity_min: Quantity::MIN.get(),
        subtotal: subtotal.display(),
        subtotal_value: subtotal.amount,
    }
}
