//! Persisted cart membership.
//!
//! The cart is an ordered list of catalog product ids stored as a JSON array
//! under [`CART_ITEMS_KEY`]. [`CartStore`] is the only code that reads or
//! writes that key. It never fails: unreadable or malformed values are
//! treated as an empty cart and write failures are logged.

use std::sync::Arc;

use cartview_core::ProductId;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

use crate::storage::LocalStorage;

/// Storage key holding the serialized identifier list.
pub const CART_ITEMS_KEY: &str = "cartItems";

/// Reads and writes the persisted identifier list.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn LocalStorage>,
}

impl CartStore {
    /// Create a cart store over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted identifiers, in stored order.
    ///
    /// Returns an empty list if nothing is stored, the storage cannot be
    /// read, or the stored value is not a JSON array of integers.
    #[must_use]
    pub fn load_identifiers(&self) -> Vec<ProductId> {
        match self.storage.get_item(CART_ITEMS_KEY) {
            Ok(raw) => parse_identifiers(raw.as_deref()),
            Err(e) => {
                warn!(error = %e, "Failed to read cart from storage, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted identifiers.
    pub fn save_identifiers(&self, ids: &[ProductId]) {
        let serialized = match serde_json::to_string(ids) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart identifiers");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(CART_ITEMS_KEY, &serialized) {
            error!(error = %e, "Failed to write cart to storage");
        } else {
            debug!(count = ids.len(), "Cart identifiers saved");
        }
    }

    /// Remove every occurrence of `id`, keeping the order of the rest.
    ///
    /// Returns the number of entries left in the cart.
    pub fn remove_identifier(&self, id: ProductId) -> usize {
        self.update_identifiers(|ids| ids.retain(|existing| *existing != id))
    }

    /// Append `id` to the cart. Duplicates are kept.
    ///
    /// Returns the number of entries in the cart.
    pub fn add_identifier(&self, id: ProductId) -> usize {
        self.update_identifiers(|ids| ids.push(id))
    }

    /// Run `work` against this store on the blocking thread pool.
    ///
    /// Storage access is synchronous file I/O; async callers go through
    /// here so it never stalls a runtime worker.
    ///
    /// # Errors
    ///
    /// Returns the `JoinError` if `work` panics.
    pub async fn with_blocking<T, F>(&self, work: F) -> Result<T, JoinError>
    where
        F: FnOnce(&Self) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || work(&store)).await
    }

    /// Apply `edit` to the persisted list as one read-modify-write.
    ///
    /// Returns the resulting length, or the unchanged length when the write
    /// fails.
    fn update_identifiers(&self, edit: impl FnOnce(&mut Vec<ProductId>)) -> usize {
        let mut edit = Some(edit);
        let mut count = 0;
        let result = self.storage.update_item(CART_ITEMS_KEY, &mut |raw| {
            let mut ids = parse_identifiers(raw.as_deref());
            if let Some(edit) = edit.take() {
                edit(&mut ids);
            }
            count = ids.len();
            Ok(serde_json::to_string(&ids)?)
        });

        match result {
            Ok(()) => {
                debug!(count, "Cart identifiers saved");
                count
            }
            Err(e) => {
                error!(error = %e, "Failed to write cart to storage");
                self.item_count()
            }
        }
    }

    /// Forget the persisted cart entirely.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(CART_ITEMS_KEY) {
            error!(error = %e, "Failed to clear cart in storage");
        }
    }

    /// Number of entries in the persisted list, duplicates included.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.load_identifiers().len()
    }
}

/// Decode a stored value. Absent or malformed values are an empty cart.
fn parse_identifiers(raw: Option<&str>) -> Vec<ProductId> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<ProductId>>(raw) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Malformed cart value in storage, treating as empty");
            Vec::new()
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &CART_ITEMS_KEY)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    fn store_with(raw: &str) -> CartStore {
        CartStore::new(Arc::new(MemoryStorage::with_item(CART_ITEMS_KEY, raw)))
    }

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl LocalStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn update_item(
            &self,
            _key: &str,
            _update: &mut dyn FnMut(Option<String>) -> Result<String, StorageError>,
        ) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    /// Storage that holds every caller at a barrier before it touches the
    /// inner store, so two callers always overlap.
    struct InterleavingStorage {
        inner: MemoryStorage,
        barrier: Barrier,
    }

    impl LocalStorage for InterleavingStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.barrier.wait();
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set_item(key, value)
        }

        fn update_item(
            &self,
            key: &str,
            update: &mut dyn FnMut(Option<String>) -> Result<String, StorageError>,
        ) -> Result<(), StorageError> {
            self.barrier.wait();
            self.inner.update_item(key, update)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = CartStore::new(Arc::new(MemoryStorage::new()));
        for case in [vec![], vec![1], vec![5, 3, 5, 9], vec![-2, 0, 7]] {
            store.save_identifiers(&ids(&case));
            assert_eq!(store.load_identifiers(), ids(&case));
        }
    }

    #[test]
    fn test_absent_value_is_empty() {
        let store = CartStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.load_identifiers().is_empty());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_malformed_value_is_empty() {
        for raw in ["", "not json", "{\"a\":1}", "[1, \"two\"]", "[1.5]", "null"] {
            assert!(store_with(raw).load_identifiers().is_empty(), "value {raw:?}");
        }
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let store = CartStore::new(Arc::new(BrokenStorage));
        assert!(store.load_identifiers().is_empty());
        store.save_identifiers(&ids(&[1]));
        store.remove_identifier(ProductId::new(1));
        store.clear();
    }

    #[test]
    fn test_remove_absent_id_leaves_list_unchanged() {
        let store = store_with("[4,8,15]");
        store.remove_identifier(ProductId::new(16));
        assert_eq!(store.load_identifiers(), ids(&[4, 8, 15]));
    }

    #[test]
    fn test_remove_drops_every_occurrence_in_order() {
        let store = store_with("[4,8,4,15,4]");
        store.remove_identifier(ProductId::new(4));
        assert_eq!(store.load_identifiers(), ids(&[8, 15]));

        store.remove_identifier(ProductId::new(15));
        assert_eq!(store.load_identifiers(), ids(&[8]));
    }

    #[test]
    fn test_overlapping_removals_keep_both() {
        let storage = Arc::new(InterleavingStorage {
            inner: MemoryStorage::with_item(CART_ITEMS_KEY, "[10,20,30]"),
            barrier: Barrier::new(2),
        });
        let store = CartStore::new(storage.clone());

        let handles: Vec<_> = [10, 20]
            .into_iter()
            .map(|id| {
                let store = store.clone();
                thread::spawn(move || store.remove_identifier(ProductId::new(id)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let persisted = storage.inner.get_item(CART_ITEMS_KEY).unwrap();
        assert_eq!(persisted.as_deref(), Some("[30]"));
    }

    #[test]
    fn test_remove_and_add_report_count() {
        let store = store_with("[1,2,2]");
        assert_eq!(store.remove_identifier(ProductId::new(2)), 1);
        assert_eq!(store.add_identifier(ProductId::new(5)), 2);
        assert_eq!(store.remove_identifier(ProductId::new(9)), 2);
    }

    #[test]
    fn test_add_keeps_duplicates_and_count_follows() {
        let store = CartStore::new(Arc::new(MemoryStorage::new()));
        store.add_identifier(ProductId::new(2));
        store.add_identifier(ProductId::new(2));
        store.add_identifier(ProductId::new(9));
        assert_eq!(store.load_identifiers(), ids(&[2, 2, 9]));
        assert_eq!(store.item_count(), 3);
    }

    #[tokio::test]
    async fn test_with_blocking() {
        let store = store_with("[3,4]");
        let loaded = store.with_blocking(CartStore::load_identifiers).await.unwrap();
        assert_eq!(loaded, ids(&[3, 4]));

        let failed = store
            .with_blocking(|_| -> usize { panic!("storage exploded") })
            .await;
        assert!(failed.is_err());
    }

    #[test]
    fn test_clear() {
        let store = store_with("[1,2]");
        store.clear();
        assert!(store.load_identifiers().is_empty());
    }
}
