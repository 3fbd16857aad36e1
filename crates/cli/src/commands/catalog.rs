//! Catalog preview command.
//!
//! # Usage
//!
//! ```bash
//! # Every catalog product, cart members marked with `*`
//! cartview catalog
//!
//! # Only the products the cart page would render
//! cartview catalog --in-cart
//! ```

use cartview_core::{Product, ProductId};
use cartview_storefront::cart_store::CartStore;
use cartview_storefront::catalog::{CatalogClient, CatalogError};

/// A catalog product and whether the cart references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub product: Product,
    pub in_cart: bool,
}

/// Mark each product with its cart membership, keeping catalog order.
pub fn annotate(products: Vec<Product>, ids: &[ProductId], in_cart_only: bool) -> Vec<CatalogEntry> {
    products
        .into_iter()
        .map(|product| CatalogEntry {
            in_cart: ids.contains(&product.id),
            product,
        })
        .filter(|entry| entry.in_cart || !in_cart_only)
        .collect()
}

/// Fetch the catalog and log it against the cart.
///
/// # Errors
///
/// Returns `CatalogError` if the catalog cannot be fetched or parsed.
pub async fn preview(
    client: &CatalogClient,
    store: &CartStore,
    in_cart_only: bool,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    tracing::info!("Fetching catalog from {}...", client.endpoint());
    let products = client.fetch_all_products().await?;
    let fetched = products.len();

    let ids = store.load_identifiers();
    let entries = annotate(products, &ids, in_cart_only);

    for entry in &entries {
        let marker = if entry.in_cart { "*" } else { " " };
        tracing::info!(
            "{marker} {:>5}  {:>10}  {}",
            entry.product.id.as_i64(),
            entry.product.unit_price().display(),
            entry.product.title
        );
    }

    let in_cart = entries.iter().filter(|entry| entry.in_cart).count();
    tracing::info!("{fetched} product(s) in catalog, {in_cart} in cart");
    Ok(entries)
}
