//! Remote product catalog client.
//!
//! # Architecture
//!
//! - One unauthenticated `GET` against a fixed endpoint returning
//!   `{"products": [...]}`
//! - The full catalog is fetched on every cart page load and filtered
//!   locally; there is no by-id query, no pagination and no caching
//! - No retry and no timeout: a failed fetch is reported to the caller once
//!
//! # Example
//!
//! ```rust,ignore
//! use cartview_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let products = client.fetch_all_products().await?;
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not a product collection.
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
