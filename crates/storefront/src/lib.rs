//! Cartview Storefront library.
//!
//! This crate provides the cart page as a library, allowing it to be tested
//! and reused by the CLI.
//!
//! # Modules
//!
//! - [`storage`] - Local key-value persistence
//! - [`cart_store`] - The persisted cart identifier list
//! - [`catalog`] - Remote product catalog client
//! - [`view`] - Line items, totals and their HTML rendering
//! - [`page`] - Page load state machine and loaded page registry
//! - [`routes`] - HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_store;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod state;
pub mod storage;
pub mod view;

#[cfg(test)]
mod test_support;
