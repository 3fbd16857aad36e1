//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Redirect to the cart page
//! GET  /health                          - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                            - Cart page (fresh page load)
//! POST /cart/pages/{page_id}/quantity   - Change quantity (returns cart table fragment)
//! POST /cart/pages/{page_id}/remove     - Remove row (returns cart table fragment, triggers cart-updated)
//! GET  /cart/count                      - Cart count badge (fragment)
//! ```

pub mod cart;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/pages/{page_id}/quantity", post(cart::update_quantity))
        .route("/pages/{page_id}/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/cart") }))
        .route("/health", get(health))
        .nest("/cart", cart_routes())
}

/// Build the application with its request tracing layers.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}
