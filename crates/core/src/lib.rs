//! Cartview Core - Shared cart types.
//!
//! This crate provides the types shared by the Cartview components:
//! - `storefront` - Cart page server and the cart state/view logic
//! - `cli` - Command-line tools for inspecting and seeding the local cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Everything here can be unit-tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities and catalog products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
