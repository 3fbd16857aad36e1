//! Core types for Cartview.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use quantity::Quantity;
