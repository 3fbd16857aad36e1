//! Integration tests for Cartview.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartview-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port, backed by a
//! storage document in a temporary directory and an in-process fake catalog.
//! Nothing outside the test process is contacted.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::get};
use cartview_core::ProductId;
use cartview_storefront::cart_store::CartStore;
use cartview_storefront::config::StorefrontConfig;
use cartview_storefront::routes;
use cartview_storefront::state::AppState;
use cartview_storefront::storage::FileStorage;
use reqwest::Client;
use serde_json::{Value, json};
use tempfile::TempDir;

/// How the fake catalog answers.
pub enum Catalog {
    /// `{"products": [...]}` with these records.
    Products(Vec<Value>),
    /// HTTP 500.
    Failing,
    /// A body that is not JSON.
    Garbage,
}

/// A catalog record with the fields the upstream API always sends.
pub fn product(id: i64, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "category": "home-decoration",
        "price": price,
        "rating": 4.2,
        "stock": 12,
        "thumbnail": format!("https://cdn.example.com/products/{id}/thumbnail.webp")
    })
}

/// A running storefront with its fake catalog and storage.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub store: CartStore,
    _dir: TempDir,
}

/// A cart page as returned by `GET /cart`.
pub struct LoadedPage {
    pub page_id: Option<String>,
    pub html: String,
}

impl TestContext {
    /// Start a storefront whose persisted cart holds `cart`.
    pub async fn start(cart: &[i64], catalog: Catalog) -> Self {
        let catalog_addr = serve(catalog_router(catalog)).await;

        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("local-storage.json");
        let endpoint = format!("http://{catalog_addr}/products");
        let config = StorefrontConfig::from_source(|key| match key {
            "CART_CATALOG_URL" => Some(endpoint.clone()),
            "CART_STORAGE_PATH" => Some(storage_path.display().to_string()),
            _ => None,
        })
        .unwrap();

        let storage = Arc::new(FileStorage::new(&config.storage_path));
        let store = CartStore::new(storage.clone());
        let ids: Vec<ProductId> = cart.iter().copied().map(ProductId::new).collect();
        store.save_identifiers(&ids);

        let state = AppState::with_storage(config, storage).unwrap();
        let addr = serve(routes::app(state)).await;

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            store,
            _dir: dir,
        }
    }

    /// Load the cart page.
    pub async fn load_cart(&self) -> LoadedPage {
        let response = self
            .client
            .get(format!("{}/cart", self.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let html = response.text().await.unwrap();
        LoadedPage {
            page_id: page_id_of(&html),
            html,
        }
    }

    /// Post a quantity change for `row` on `page_id`.
    pub async fn change_quantity(&self, page_id: &str, row: i64, quantity: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/cart/pages/{page_id}/quantity", self.base_url))
            .form(&[("row", row.to_string()), ("quantity", quantity.to_string())])
            .send()
            .await
            .unwrap()
    }

    /// Post a removal of `row` on `page_id`.
    pub async fn remove(&self, page_id: &str, row: i64) -> reqwest::Response {
        self.client
            .post(format!("{}/cart/pages/{page_id}/remove", self.base_url))
            .form(&[("row", row.to_string())])
            .send()
            .await
            .unwrap()
    }

    /// Read the count badge.
    pub async fn count(&self) -> String {
        self.client
            .get(format!("{}/cart/count", self.base_url))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
            .trim()
            .to_string()
    }
}

/// Number of rendered line items in a page or fragment.
pub fn item_rows(html: &str) -> usize {
    html.matches("class=\"cart-item\"").count()
}

/// Number of empty-cart notices.
pub fn empty_notices(html: &str) -> usize {
    html.matches("class=\"cart-notice cart-empty\"").count()
}

/// Number of error notices.
pub fn error_notices(html: &str) -> usize {
    html.matches("class=\"cart-notice cart-error\"").count()
}

/// The text of the total row, e.g. `$15.00`.
pub fn total(html: &str) -> String {
    let start = html.find("Total: ").unwrap() + "Total: ".len();
    html[start..]
        .split('<')
        .next()
        .unwrap()
        .trim()
        .to_string()
}

fn page_id_of(html: &str) -> Option<String> {
    const MARKER: &str = "/cart/pages/";
    let start = html.find(MARKER)? + MARKER.len();
    html.get(start..start + 36).map(str::to_string)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn catalog_router(catalog: Catalog) -> Router {
    match catalog {
        Catalog::Products(products) => {
            let total = products.len();
            let body = json!({ "products": products, "total": total, "skip": 0 });
            Router::new().route(
                "/products",
                get(move || {
                    let body = body.clone();
                    async move { Json(body) }
                }),
            )
        }
        Catalog::Failing => Router::new().route(
            "/products",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        ),
        Catalog::Garbage => Router::new().route("/products", get(|| async { "{\"products\": [" })),
    }
}
