//! Cart page controller.
//!
//! A page load walks one state machine:
//!
//! ```text
//! Loading --(no identifiers)----------------------> Empty
//! Loading --(catalog fetch fails)-----------------> Error
//! Loading --(fetched, nothing matches the cart)---> Empty
//! Loading --(fetched, some products match)--------> Populated
//! ```
//!
//! The display state is terminal for that page: later quantity edits and
//! removals change the rows (a page can end up showing the empty notice after
//! its last removal) but never re-run the load. Only a fresh page load does.

mod registry;

pub use registry::{PageRegistry, SharedPage};

use cartview_core::{Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::cart_store::CartStore;
use crate::catalog::CatalogClient;
use crate::view::CartView;

/// Identifies one loaded cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    /// Generate a fresh page id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display state reached by a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Waiting for the catalog. Never observable on a returned page.
    Loading,
    /// No identifiers, or none of them exist in the catalog.
    Empty,
    /// The catalog could not be fetched or parsed.
    Error,
    /// At least one line item is shown.
    Populated,
}

/// The outcome of one page load: its state, rows and cart count.
#[derive(Debug)]
pub struct CartPage {
    id: PageId,
    state: PageState,
    view: CartView,
    item_count: usize,
}

impl CartPage {
    fn loading() -> Self {
        Self {
            id: PageId::new(),
            state: PageState::Loading,
            view: CartView::new(),
            item_count: 0,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PageId {
        self.id
    }

    /// State reached by the load.
    #[must_use]
    pub const fn state(&self) -> PageState {
        self.state
    }

    #[must_use]
    pub const fn view(&self) -> &CartView {
        &self.view
    }

    /// Mutable access for row interactions.
    pub fn view_mut(&mut self) -> &mut CartView {
        &mut self.view
    }

    /// Entries in the persisted cart, as last refreshed.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Record a new persisted count after a removal.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
    }

    fn enter(&mut self, state: PageState) {
        info!(page_id = %self.id, from = ?self.state, to = ?state, "Cart page state");
        self.state = state;
    }
}

/// Orchestrates Cart Store, Catalog Client and Cart View for a page load.
#[derive(Debug, Clone)]
pub struct PageController {
    store: CartStore,
    catalog: CatalogClient,
}

impl PageController {
    /// Create a controller over an injected store and catalog.
    #[must_use]
    pub const fn new(store: CartStore, catalog: CatalogClient) -> Self {
        Self { store, catalog }
    }

    /// The cart store this controller reads from.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Run a full page load.
    #[instrument(skip(self))]
    pub async fn load(&self) -> CartPage {
        let mut page = CartPage::loading();

        let ids = match self.store.with_blocking(CartStore::load_identifiers).await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "Cart storage read aborted, treating as empty");
                Vec::new()
            }
        };
        page.item_count = ids.len();

        if ids.is_empty() {
            page.view.render_empty();
            page.enter(PageState::Empty);
            return page;
        }

        debug!(ids = ?ids, "Loading cart");

        let products = match self.catalog.fetch_all_products().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Error fetching cart products");
                page.view.render_error();
                page.enter(PageState::Error);
                return page;
            }
        };

        let cart_products = filter_products(products, &ids);
        debug!(count = cart_products.len(), "Found cart products");

        if cart_products.is_empty() {
            page.view.render_empty();
            page.enter(PageState::Empty);
        } else {
            page.view.render_items(cart_products);
            page.enter(PageState::Populated);
        }
        page
    }
}

/// Keep the catalog products whose id is in the cart, in catalog order.
///
/// Each product appears at most once however many times its id is in the
/// cart.
#[must_use]
pub fn filter_products(products: Vec<Product>, ids: &[ProductId]) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| ids.contains(&product.id))
        .collect()
}
