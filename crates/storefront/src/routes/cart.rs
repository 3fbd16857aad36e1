//! Cart route handlers.
//!
//! Row interactions use HTMX: each one posts to the page that rendered the
//! row and receives the re-rendered cart table. Removals additionally emit a
//! `cart-updated` trigger so the count badge refreshes itself.

use axum::{
    Form,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use cartview_core::RowId;
use serde::Deserialize;
use tracing::instrument;

use crate::cart_store::CartStore;
use crate::error::{AppError, Result};
use crate::page::{PageId, SharedPage};
use crate::state::AppState;
use crate::view::html::{CartCountTemplate, CartShowTemplate, CartTableTemplate};

/// HTMX event fired after the persisted cart changes.
pub const CART_UPDATED_TRIGGER: &str = "cart-updated";

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub row: String,
    /// Raw input value; clamped by the view.
    #[serde(default)]
    pub quantity: String,
}

/// Remove row form data.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub row: String,
}

fn parse_row(raw: &str) -> Result<RowId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid row '{raw}'")))
}

async fn find_page(state: &AppState, page_id: PageId) -> Result<SharedPage> {
    state
        .pages()
        .get(page_id)
        .await
        .ok_or(AppError::PageNotFound(page_id))
}

/// Display cart page.
///
/// Every request is a fresh page load: the cart is re-read, the catalog is
/// re-fetched and a new page is registered for the row interactions.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let page = state.controller().load().await;
    let template = CartShowTemplate::new(&page);
    state.pages().insert(page).await;
    template
}

/// Change a row's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let row = parse_row(&form.row)?;
    let shared = find_page(&state, page_id).await?;
    let mut page = shared.lock().await;

    page.view_mut().change_quantity(row, &form.quantity)?;

    Ok(CartTableTemplate::new(&page).into_response())
}

/// Remove a row and its product from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
    Form(form): Form<RemoveForm>,
) -> Result<Response> {
    let row = parse_row(&form.row)?;
    let shared = find_page(&state, page_id).await?;
    let mut page = shared.lock_owned().await;

    // The page stays locked while the store is rewritten off the runtime.
    let (mut page, removal) = state
        .store()
        .with_blocking(move |store| {
            let removal = page.view_mut().remove_row(row, store);
            (page, removal)
        })
        .await?;
    let removal = removal?;
    page.set_item_count(removal.item_count);

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_TRIGGER)]),
        CartTableTemplate::new(&page),
    )
        .into_response())
}

/// Get cart count badge (HTMX).
///
/// Counts entries in the persisted list, not rendered rows.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let count = state.store().with_blocking(CartStore::item_count).await?;
    Ok(CartCountTemplate { count })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use cartview_core::ProductId;
    use tower::ServiceExt;

    use super::*;
    use crate::cart_store::CART_ITEMS_KEY;
    use crate::config::StorefrontConfig;
    use crate::error::HX_REFRESH;
    use crate::routes::app;
    use crate::storage::{LocalStorage, MemoryStorage, StorageError};
    use crate::test_support::{catalog_router, product_json, serve};

    async fn test_app(cart: &str, products: Vec<serde_json::Value>) -> (Router, AppState) {
        let addr = serve(catalog_router(serde_json::json!({ "products": products }))).await;
        let endpoint = format!("http://{addr}/products");
        let config = StorefrontConfig::from_source(|key| {
            (key == "CART_CATALOG_URL").then(|| endpoint.clone())
        })
        .unwrap();
        let storage = Arc::new(MemoryStorage::with_item(CART_ITEMS_KEY, cart));
        let state = AppState::with_storage(config, storage).unwrap();
        (app(state.clone()), state)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
        app.clone()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn page_id_of(html: &str) -> String {
        let start = html.find("/cart/pages/").unwrap() + "/cart/pages/".len();
        html[start..start + 36].to_string()
    }

    #[tokio::test]
    async fn test_show_populated_cart() {
        let (app, _) = test_app("[10,20]", vec![product_json(10, 10.0), product_json(20, 5.0)]).await;

        let response = get(&app, "/cart").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert_eq!(html.matches("class=\"cart-item\"").count(), 2);
        assert!(html.contains("Total: $15.00"));
        assert!(html.contains("class=\"products-count\""));
    }

    #[tokio::test]
    async fn test_quantity_then_remove() {
        let (app, state) =
            test_app("[10,20]", vec![product_json(10, 10.0), product_json(20, 5.0)]).await;
        let page_id = page_id_of(&body_text(get(&app, "/cart").await).await);

        let response = post_form(&app, &format!("/cart/pages/{page_id}/quantity"), "row=0&quantity=3").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Total: $35.00"));

        let response = post_form(&app, &format!("/cart/pages/{page_id}/remove"), "row=1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("HX-Trigger").unwrap(),
            CART_UPDATED_TRIGGER
        );
        let html = body_text(response).await;
        assert!(html.contains("Total: $30.00"));
        assert_eq!(html.matches("class=\"cart-item\"").count(), 1);
        assert_eq!(state.store().load_identifiers(), vec![ProductId::new(10)]);

        let count = body_text(get(&app, "/cart/count").await).await;
        assert_eq!(count.trim(), "1");
    }

    #[tokio::test]
    async fn test_non_numeric_quantity_counts_as_one() {
        let (app, _) = test_app("[10]", vec![product_json(10, 4.25)]).await;
        let page_id = page_id_of(&body_text(get(&app, "/cart").await).await);

        let response =
            post_form(&app, &format!("/cart/pages/{page_id}/quantity"), "row=0&quantity=lots").await;
        let html = body_text(response).await;
        assert!(html.contains("value=\"1\""));
        assert!(html.contains("Total: $4.25"));
    }

    /// Storage whose reads take a while, like a slow disk.
    struct SlowStorage(MemoryStorage);

    impl LocalStorage for SlowStorage {
        fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            std::thread::sleep(Duration::from_millis(300));
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            self.0.set_item(key, value)
        }

        fn update_item(
            &self,
            key: &str,
            update: &mut dyn FnMut(Option<String>) -> std::result::Result<String, StorageError>,
        ) -> std::result::Result<(), StorageError> {
            self.0.update_item(key, update)
        }

        fn remove_item(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.0.remove_item(key)
        }
    }

    #[tokio::test]
    async fn test_storage_reads_leave_the_runtime_free() {
        let config = StorefrontConfig::from_source(|_| None).unwrap();
        let storage = SlowStorage(MemoryStorage::with_item(CART_ITEMS_KEY, "[1,2]"));
        let app = app(AppState::with_storage(config, Arc::new(storage)).unwrap());

        // Single-threaded runtime: the ticker only finishes on time if the
        // handler yields while storage is read.
        let started = Instant::now();
        let ticker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            started.elapsed()
        });

        let response = get(&app, "/cart/count").await;
        assert_eq!(body_text(response).await.trim(), "2");
        assert!(ticker.await.unwrap() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_expired_page_asks_for_reload() {
        let (app, _) = test_app("[]", vec![]).await;
        let uri = format!("/cart/pages/{}/remove", PageId::new());

        let response = post_form(&app, &uri, "row=0").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get(HX_REFRESH).unwrap(), "true");
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let (app, _) = test_app("[]", vec![]).await;
        let uri = format!("/cart/pages/{}/quantity", PageId::new());

        let response = post_form(&app, &uri, "row=0&quantity=2").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_row_is_not_found() {
        let (app, _) = test_app("[10]", vec![product_json(10, 1.0)]).await;
        let page_id = page_id_of(&body_text(get(&app, "/cart").await).await);

        let response = post_form(&app, &format!("/cart/pages/{page_id}/remove"), "row=42").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_row_is_bad_request() {
        let (app, _) = test_app("[10]", vec![product_json(10, 1.0)]).await;
        let page_id = page_id_of(&body_text(get(&app, "/cart").await).await);

        let response = post_form(&app, &format!("/cart/pages/{page_id}/remove"), "row=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
