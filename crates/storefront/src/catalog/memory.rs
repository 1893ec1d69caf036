//! In-memory fixture catalog.
//!
//! Implements the same query semantics as the REST backend (active-only,
//! store-scoped, newest-first) over fixture rows. Used for offline
//! development, unit tests, and the integration suite. Supports per-call-site
//! fault injection and per-handle latency so soft-fail and stale-sequence
//! behavior can be exercised deterministically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use amate_core::{CollectionId, ProductId, StoreId};

use super::types::{AssociationRow, Collection, Product};
use super::{CatalogError, CatalogStore};

/// A query site that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// `list_collections`
    Collections,
    /// `find_collection_by_handle`
    CollectionLookup,
    /// `list_collection_product_ids`
    Associations,
    /// `list_products_by_ids` and `list_products`
    Products,
}

/// In-memory implementation of [`CatalogStore`].
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: Vec<Collection>,
    products: Vec<Product>,
    associations: Vec<AssociationRow>,
    faults: Vec<Fault>,
    handle_delays: HashMap<String, Duration>,
}

/// Builder for [`InMemoryCatalog`] fixtures.
#[derive(Default)]
pub struct InMemoryCatalogBuilder {
    inner: Inner,
}

impl InMemoryCatalog {
    /// Start building a fixture catalog.
    #[must_use]
    pub fn builder() -> InMemoryCatalogBuilder {
        InMemoryCatalogBuilder::default()
    }

    fn check_fault(&self, fault: Fault) -> Result<(), CatalogError> {
        if self.inner.faults.contains(&fault) {
            return Err(CatalogError::Api {
                status: 503,
                message: format!("injected fault: {fault:?}"),
            });
        }
        Ok(())
    }
}

impl InMemoryCatalogBuilder {
    /// Add a collection row.
    #[must_use]
    pub fn collection(mut self, collection: Collection) -> Self {
        self.inner.collections.push(collection);
        self
    }

    /// Add a product row.
    #[must_use]
    pub fn product(mut self, product: Product) -> Self {
        self.inner.products.push(product);
        self
    }

    /// Add a join-table row.
    #[must_use]
    pub fn associate(mut self, collection: CollectionId, product: ProductId) -> Self {
        self.inner.associations.push(AssociationRow {
            collection_id: collection,
            product_id: product,
        });
        self
    }

    /// Make a query site fail with a 503.
    #[must_use]
    pub fn failing(mut self, fault: Fault) -> Self {
        self.inner.faults.push(fault);
        self
    }

    /// Delay handle lookups for one handle. Combined with a paused tokio
    /// clock this gives deterministic orderings across in-flight sequences.
    #[must_use]
    pub fn handle_delay(mut self, handle: impl Into<String>, delay: Duration) -> Self {
        self.inner.handle_delays.insert(handle.into(), delay);
        self
    }

    /// Finish the fixture.
    #[must_use]
    pub fn build(self) -> InMemoryCatalog {
        InMemoryCatalog {
            inner: Arc::new(self.inner),
        }
    }
}

fn in_store(product: &Product, store: &StoreId) -> bool {
    product.attribute_str("store_id") == Some(store.as_str())
}

fn created_at_of(product: &Product) -> &str {
    product.attribute_str("created_at").unwrap_or_default()
}

impl CatalogStore for InMemoryCatalog {
    async fn list_collections(&self, store: &StoreId) -> Result<Vec<Collection>, CatalogError> {
        self.check_fault(Fault::Collections)?;
        let mut rows: Vec<Collection> = self
            .inner
            .collections
            .iter()
            .filter(|c| c.status.is_active() && &c.store_id == store)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_collection_by_handle(
        &self,
        store: &StoreId,
        handle: &str,
    ) -> Result<Option<Collection>, CatalogError> {
        if let Some(delay) = self.inner.handle_delays.get(handle) {
            tokio::time::sleep(*delay).await;
        }
        self.check_fault(Fault::CollectionLookup)?;
        Ok(self
            .inner
            .collections
            .iter()
            .find(|c| c.handle == handle && c.status.is_active() && &c.store_id == store)
            .cloned())
    }

    async fn list_collection_product_ids(
        &self,
        collection: &CollectionId,
    ) -> Result<Vec<ProductId>, CatalogError> {
        self.check_fault(Fault::Associations)?;
        Ok(self
            .inner
            .associations
            .iter()
            .filter(|row| &row.collection_id == collection)
            .map(|row| row.product_id.clone())
            .collect())
    }

    async fn list_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        self.check_fault(Fault::Products)?;
        Ok(self
            .inner
            .products
            .iter()
            .filter(|p| p.status.is_active() && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_products(&self, store: &StoreId) -> Result<Vec<Product>, CatalogError> {
        self.check_fault(Fault::Products)?;
        let mut rows: Vec<Product> = self
            .inner
            .products
            .iter()
            .filter(|p| p.status.is_active() && in_store(p, store))
            .cloned()
            .collect();
        // ISO-8601 timestamps compare lexicographically
        rows.sort_by(|a, b| created_at_of(b).cmp(created_at_of(a)));
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        self.check_fault(Fault::Collections)
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::{collection, product};
    use super::*;

    fn store() -> StoreId {
        StoreId::new("store-1")
    }

    #[tokio::test]
    async fn test_list_collections_active_scoped_newest_first() {
        let catalog = InMemoryCatalog::builder()
            .collection(collection("c-old", "old", "store-1", 1))
            .collection(collection("c-new", "new", "store-1", 20))
            .collection(collection("c-other", "other", "store-2", 10))
            .build();

        let rows = catalog.list_collections(&store()).await.unwrap();
        let handles: Vec<&str> = rows.iter().map(|c| c.handle.as_str()).collect();
        assert_eq!(handles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_handle_lookup_ignores_wrong_store() {
        let catalog = InMemoryCatalog::builder()
            .collection(collection("c-1", "sakura", "store-2", 1))
            .build();

        let found = catalog
            .find_collection_by_handle(&store(), "sakura")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_products_by_ids_drops_inactive() {
        let catalog = InMemoryCatalog::builder()
            .product(product("p-1", "store-1", true))
            .product(product("p-2", "store-1", false))
            .build();

        let ids = vec![ProductId::new("p-1"), ProductId::new("p-2")];
        let rows = catalog.list_products_by_ids(&ids).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().unwrap().id, ProductId::new("p-1"));
    }

    #[tokio::test]
    async fn test_injected_fault_errors() {
        let catalog = InMemoryCatalog::builder()
            .failing(Fault::Collections)
            .build();
        let result = catalog.list_collections(&store()).await;
        assert!(matches!(result, Err(CatalogError::Api { status: 503, .. })));
    }
}
