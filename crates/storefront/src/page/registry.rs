//! Registry of loaded cart pages.
//!
//! Row interactions arrive as separate HTTP requests naming the page that
//! rendered the row. The registry keeps each page's view state until it has
//! been idle for the configured time. It never holds catalog data; every page
//! load fetches the catalog again.

use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::Mutex;

use super::{CartPage, PageId};
use crate::config::PageRegistryConfig;

/// A loaded page, locked for the duration of one interaction.
pub type SharedPage = Arc<Mutex<CartPage>>;

/// Loaded cart pages, evicted after a period of inactivity.
#[derive(Clone)]
pub struct PageRegistry {
    pages: Cache<PageId, SharedPage>,
}

impl PageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: &PageRegistryConfig) -> Self {
        let pages = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_idle(config.time_to_idle)
            .build();
        Self { pages }
    }

    /// Register a freshly loaded page and return its shared handle.
    pub async fn insert(&self, page: CartPage) -> SharedPage {
        let id = page.id();
        let shared = Arc::new(Mutex::new(page));
        self.pages.insert(id, Arc::clone(&shared)).await;
        shared
    }

    /// Look up a page. `None` if it never existed or was evicted.
    pub async fn get(&self, id: PageId) -> Option<SharedPage> {
        self.pages.get(&id).await
    }
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("pages", &self.pages.entry_count())
            .finish()
    }
}
