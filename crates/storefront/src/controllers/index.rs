//! Store index (home page) controller.
//!
//! Composes the collection directory and the product directory with two
//! independent selection axes:
//!
//! - style → visible collections, derived through the static taxonomy
//!   lookup, never a query;
//! - collection → visible products, resolved through the same association →
//!   product logic the detail page uses.
//!
//! Filtering is a pure projection over already-fetched data; the only fetch
//! an intent can trigger is the token-guarded resolution of a selected
//! collection's products. Changing one axis never resets the other.

use std::sync::Arc;

use amate_core::{CollectionId, StyleId};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::catalog::{CatalogStore, Collection, FailureReason, Product, StoreContext};
use crate::styles::{self, CollectionScope};

use super::detail::resolve_collection_products;
use super::{CollectionDirectory, ProductDirectory, Publisher};

/// Immutable view of the home page.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSnapshot {
    pub collections: Vec<Collection>,
    pub loading_collections: bool,
    pub products: Vec<Product>,
    pub loading: bool,
    pub selected_style: Option<StyleId>,
    pub selected_collection: Option<CollectionId>,
    /// Products of the selected collection, empty while unselected.
    pub collection_products: Vec<Product>,
    pub resolving_selection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections_failure: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products_failure: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_failure: Option<FailureReason>,
}

impl IndexSnapshot {
    fn initial() -> Self {
        Self {
            collections: Vec::new(),
            loading_collections: true,
            products: Vec::new(),
            loading: true,
            selected_style: None,
            selected_collection: None,
            collection_products: Vec::new(),
            resolving_selection: false,
            collections_failure: None,
            products_failure: None,
            selection_failure: None,
        }
    }

    /// Collections visible under the current style selection: the full list
    /// without a selection or when the style scopes to all collections, the
    /// empty list for every other style.
    #[must_use]
    pub fn visible_collections(&self) -> &[Collection] {
        match &self.selected_style {
            None => &self.collections,
            Some(style) => match styles::collection_scope(style) {
                CollectionScope::AllCollections => &self.collections,
                CollectionScope::NoCollections => &[],
            },
        }
    }

    /// Products visible under the current collection selection: the selected
    /// collection's resolved products, or the full active list.
    #[must_use]
    pub fn visible_products(&self) -> &[Product] {
        if self.selected_collection.is_some() {
            &self.collection_products
        } else {
            &self.products
        }
    }

    fn settled(&self) -> bool {
        !self.loading && !self.loading_collections && !self.resolving_selection
    }
}

/// Home-page composition of style filter → collection filter → product
/// filter over the two directories.
pub struct StoreIndex<S> {
    store: Arc<S>,
    publisher: Arc<Publisher<IndexSnapshot>>,
    // Kept alive so their watch senders (and thus the merge task) stay up.
    collections: CollectionDirectory<S>,
    products: ProductDirectory<S>,
}

impl<S: CatalogStore> StoreIndex<S> {
    /// Create the controller; both directory fetches start immediately.
    #[must_use]
    pub fn new(store: Arc<S>, ctx: StoreContext) -> Self {
        let collections = CollectionDirectory::new(Arc::clone(&store), ctx.clone());
        let products = ProductDirectory::new(Arc::clone(&store), ctx);
        let publisher = Arc::new(Publisher::new(IndexSnapshot::initial()));

        // Merge task: forwards directory snapshots into the index snapshot.
        let mut collections_rx = collections.subscribe();
        let mut products_rx = products.subscribe();
        let merge_publisher = Arc::clone(&publisher);
        tokio::spawn(async move {
            // Seed from the current directory values; a directory that
            // settled before this task started would otherwise never be
            // forwarded.
            let collections_seed = collections_rx.borrow_and_update().clone();
            let products_seed = products_rx.borrow_and_update().clone();
            merge_publisher.modify(|index| {
                index.collections = collections_seed.collections;
                index.loading_collections = collections_seed.loading;
                index.collections_failure = collections_seed.failure;
                index.products = products_seed.products;
                index.loading = products_seed.loading;
                index.products_failure = products_seed.failure;
            });
            loop {
                tokio::select! {
                    changed = collections_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = collections_rx.borrow_and_update().clone();
                        merge_publisher.modify(|index| {
                            index.collections = snapshot.collections;
                            index.loading_collections = snapshot.loading;
                            index.collections_failure = snapshot.failure;
                        });
                    }
                    changed = products_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = products_rx.borrow_and_update().clone();
                        merge_publisher.modify(|index| {
                            index.products = snapshot.products;
                            index.loading = snapshot.loading;
                            index.products_failure = snapshot.failure;
                        });
                    }
                }
            }
        });

        Self {
            store,
            publisher,
            collections,
            products,
        }
    }

    /// Select a style. Pure: the visible collection list derives through the
    /// taxonomy lookup, no fetch is issued and the collection axis is left
    /// untouched.
    pub fn select_style(&self, style: StyleId) {
        self.publisher.modify(|s| s.selected_style = Some(style));
    }

    /// Clear the style selection, restoring the full collection list.
    pub fn reset_style(&self) {
        self.publisher.modify(|s| s.selected_style = None);
    }

    /// Select a collection: the visible product set becomes that
    /// collection's resolved products. The resolution is token-guarded so a
    /// slower earlier selection cannot overwrite a newer one.
    pub fn select_collection(&self, collection: CollectionId) {
        let token = self.publisher.begin_with(|s| {
            s.selected_collection = Some(collection.clone());
            s.collection_products.clear();
            s.resolving_selection = true;
            s.selection_failure = None;
        });

        let store = Arc::clone(&self.store);
        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            let result = resolve_collection_products(store.as_ref(), &collection).await;
            let applied = publisher.complete(token, |s| {
                s.resolving_selection = false;
                match result {
                    Ok(products) => s.collection_products = products,
                    Err(reason) => s.selection_failure = Some(reason),
                }
            });
            if !applied {
                debug!(%collection, "stale collection selection discarded");
            }
        });
    }

    /// "Show all products": clear the collection selection, restoring the
    /// full active product list. An in-flight resolution is invalidated.
    pub fn reset_collection(&self) {
        self.publisher.begin_with(|s| {
            s.selected_collection = None;
            s.collection_products.clear();
            s.resolving_selection = false;
            s.selection_failure = None;
        });
    }

    /// The underlying collection directory.
    #[must_use]
    pub const fn collections(&self) -> &CollectionDirectory<S> {
        &self.collections
    }

    /// The underlying product directory.
    #[must_use]
    pub const fn products(&self) -> &ProductDirectory<S> {
        &self.products
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> IndexSnapshot {
        self.publisher.snapshot()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<IndexSnapshot> {
        self.publisher.subscribe()
    }

    /// Wait until no fetch is outstanding and return the settled snapshot.
    pub async fn settled(&self) -> IndexSnapshot {
        let mut rx = self.publisher.subscribe();
        match rx.wait_for(IndexSnapshot::settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.publisher.snapshot(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use amate_core::{ProductId, StoreId};

    use crate::catalog::memory::fixtures::{collection, product};
    use crate::catalog::{Fault, InMemoryCatalog};

    use super::*;

    fn ctx() -> StoreContext {
        StoreContext::new(StoreId::new("store-1"))
    }

    fn seeded_catalog() -> InMemoryCatalog {
        InMemoryCatalog::builder()
            .collection(collection("c-1", "sakura", "store-1", 5))
            .collection(collection("c-2", "koi", "store-1", 3))
            .product(product("p-1", "store-1", true))
            .product(product("p-2", "store-1", true))
            .product(product("p-3", "store-1", true))
            .associate(CollectionId::new("c-1"), ProductId::new("p-1"))
            .associate(CollectionId::new("c-1"), ProductId::new("p-2"))
            .build()
    }

    async fn settled_index() -> StoreIndex<InMemoryCatalog> {
        let index = StoreIndex::new(Arc::new(seeded_catalog()), ctx());
        index.settled().await;
        index
    }

    #[tokio::test]
    async fn test_initial_state_shows_everything() {
        let index = settled_index().await;
        let snapshot = index.snapshot();

        assert!(snapshot.selected_style.is_none());
        assert!(snapshot.selected_collection.is_none());
        assert_eq!(snapshot.visible_collections().len(), 2);
        assert_eq!(snapshot.visible_products().len(), 3);
    }

    #[tokio::test]
    async fn test_select_all_collections_style_keeps_full_list() {
        let index = settled_index().await;
        index.select_style(StyleId::new("acordeon"));
        let snapshot = index.settled().await;

        assert_eq!(snapshot.visible_collections().len(), 2);
        assert_eq!(snapshot.collections.len(), 2);
    }

    #[tokio::test]
    async fn test_select_unmapped_style_empties_collections() {
        let index = settled_index().await;
        index.select_style(StyleId::new("splash"));
        let snapshot = index.settled().await;

        assert!(snapshot.visible_collections().is_empty());
        // The fetched list itself is untouched
        assert_eq!(snapshot.collections.len(), 2);
    }

    #[tokio::test]
    async fn test_select_style_is_idempotent() {
        let index = settled_index().await;
        index.select_style(StyleId::new("acordeon"));
        let once = index.settled().await.visible_collections().len();
        index.select_style(StyleId::new("acordeon"));
        let twice = index.settled().await.visible_collections().len();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_reset_style_restores_full_list() {
        let index = settled_index().await;
        index.select_style(StyleId::new("splash"));
        index.reset_style();
        let snapshot = index.settled().await;
        assert_eq!(snapshot.visible_collections().len(), 2);
    }

    #[tokio::test]
    async fn test_select_collection_filters_products() {
        let index = settled_index().await;
        index.select_collection(CollectionId::new("c-1"));
        let snapshot = index.settled().await;

        assert_eq!(snapshot.visible_products().len(), 2);
        assert!(snapshot.selection_failure.is_none());
    }

    #[tokio::test]
    async fn test_collection_round_trip_restores_full_product_list() {
        let index = settled_index().await;
        let before: Vec<ProductId> = index
            .snapshot()
            .visible_products()
            .iter()
            .map(|p| p.id.clone())
            .collect();

        index.select_collection(CollectionId::new("c-1"));
        index.settled().await;
        index.reset_collection();
        let snapshot = index.settled().await;

        let after: Vec<ProductId> = snapshot
            .visible_products()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_axes_are_independent() {
        let index = settled_index().await;
        index.select_style(StyleId::new("splash"));
        index.select_collection(CollectionId::new("c-1"));
        let snapshot = index.settled().await;

        // Selecting a collection did not reset the style, and vice versa.
        assert_eq!(snapshot.selected_style, Some(StyleId::new("splash")));
        assert_eq!(snapshot.selected_collection, Some(CollectionId::new("c-1")));
        assert!(snapshot.visible_collections().is_empty());
        assert_eq!(snapshot.visible_products().len(), 2);
    }

    #[tokio::test]
    async fn test_selection_resolution_failure_absorbed() {
        let catalog = InMemoryCatalog::builder()
            .collection(collection("c-1", "sakura", "store-1", 5))
            .failing(Fault::Associations)
            .build();
        let index = StoreIndex::new(Arc::new(catalog), ctx());
        index.settled().await;

        index.select_collection(CollectionId::new("c-1"));
        let snapshot = index.settled().await;

        assert!(snapshot.visible_products().is_empty());
        assert_eq!(snapshot.selection_failure, Some(FailureReason::Network));
    }

    #[tokio::test]
    async fn test_reset_collection_invalidates_inflight_resolution() {
        let index = settled_index().await;
        index.select_collection(CollectionId::new("c-1"));
        // Reset before the resolution task has a chance to run.
        index.reset_collection();
        let snapshot = index.settled().await;

        assert!(snapshot.selected_collection.is_none());
        assert_eq!(snapshot.visible_products().len(), 3);
        assert!(snapshot.collection_products.is_empty());
    }
}
