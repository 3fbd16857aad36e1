//! Cart identifier commands.
//!
//! # Usage
//!
//! ```bash
//! cartview list
//! cartview add 1 5 12
//! cartview remove 5
//! cartview clear
//! ```
//!
//! These stand in for the product pages that add items to the cart; the
//! storefront itself only ever removes them.

use cartview_core::ProductId;
use cartview_storefront::cart_store::CartStore;

/// Show the persisted identifiers. Returns them for callers that need them.
pub fn list(store: &CartStore) -> Vec<ProductId> {
    let ids = store.load_identifiers();
    if ids.is_empty() {
        tracing::info!("Cart is empty");
    } else {
        tracing::info!("Cart holds {} item(s): {}", ids.len(), join(&ids));
    }
    ids
}

/// Append `ids` in order. Returns the new item count.
pub fn add(store: &CartStore, ids: &[ProductId]) -> usize {
    let mut count = store.item_count();
    for id in ids {
        count = store.add_identifier(*id);
    }
    tracing::info!("Added {}; cart now holds {count} item(s)", join(ids));
    count
}

/// Remove every occurrence of `id`. Returns how many entries were dropped.
pub fn remove(store: &CartStore, id: ProductId) -> usize {
    let before = store.item_count();
    let removed = before.saturating_sub(store.remove_identifier(id));
    if removed == 0 {
        tracing::info!("Product {id} is not in the cart");
    } else {
        tracing::info!("Removed {removed} occurrence(s) of product {id}");
    }
    removed
}

/// Forget the cart.
pub fn clear(store: &CartStore) {
    store.clear();
    tracing::info!("Cart cleared");
}

fn join(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cartview_storefront::storage::MemoryStorage;

    use super::*;

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_list_remove() {
        let store = store();
        let ids = [ProductId::new(1), ProductId::new(5), ProductId::new(1)];

        assert_eq!(add(&store, &ids), 3);
        assert_eq!(list(&store), ids.to_vec());

        assert_eq!(remove(&store, ProductId::new(1)), 2);
        assert_eq!(list(&store), vec![ProductId::new(5)]);
        assert_eq!(remove(&store, ProductId::new(1)), 0);
    }

    #[test]
    fn test_clear() {
        let store = store();
        add(&store, &[ProductId::new(9)]);
        clear(&store);
        assert!(list(&store).is_empty());
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&[ProductId::new(3), ProductId::new(4)]), "3, 4");
    }
}
