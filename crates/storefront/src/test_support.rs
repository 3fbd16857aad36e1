//! Helpers shared by the unit tests: an in-process fake catalog.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use url::Url;

use crate::cart_store::{CART_ITEMS_KEY, CartStore};
use crate::catalog::CatalogClient;
use crate::config::CatalogConfig;
use crate::storage::MemoryStorage;

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A catalog answering `GET /products` with `body`.
pub fn catalog_router(body: Value) -> Router {
    Router::new().route(
        "/products",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}

/// A catalog record as the upstream API returns it.
pub fn product_json(id: i64, price: f64) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "price": price,
        "thumbnail": format!("https://cdn.example.com/{id}/thumbnail.webp"),
        "rating": 4.5
    })
}

/// Serve a catalog holding `products` and return a client pointed at it.
pub async fn spawn_catalog(products: Vec<Value>) -> CatalogClient {
    let addr = serve(catalog_router(json!({ "products": products }))).await;
    catalog_client(addr)
}

/// A catalog client for `http://{addr}/products`.
pub fn catalog_client(addr: SocketAddr) -> CatalogClient {
    let endpoint = Url::parse(&format!("http://{addr}/products")).unwrap();
    CatalogClient::new(&CatalogConfig { endpoint }).unwrap()
}

/// A cart store over fresh in-memory storage holding `raw` as the cart.
pub fn memory_store(raw: &str) -> CartStore {
    CartStore::new(Arc::new(MemoryStorage::with_item(CART_ITEMS_KEY, raw)))
}
