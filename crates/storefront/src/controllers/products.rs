//! Product directory controller.
//!
//! The simpler sibling of [`CollectionDirectory`](super::CollectionDirectory):
//! one query for the store's full active product list, newest first, with the
//! same absorb-to-empty failure contract.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::error;

use crate::catalog::{CatalogStore, FailureReason, Product, StoreContext};

use super::Publisher;

/// Immutable view of the product directory.
#[derive(Debug, Clone, Serialize)]
pub struct ProductsSnapshot {
    pub products: Vec<Product>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl ProductsSnapshot {
    fn loading() -> Self {
        Self {
            products: Vec::new(),
            loading: true,
            failure: None,
        }
    }
}

/// Fetches all active products for the store.
pub struct ProductDirectory<S> {
    store: Arc<S>,
    ctx: StoreContext,
    publisher: Arc<Publisher<ProductsSnapshot>>,
}

impl<S: CatalogStore> ProductDirectory<S> {
    /// Create the controller and issue the initial query.
    #[must_use]
    pub fn new(store: Arc<S>, ctx: StoreContext) -> Self {
        let controller = Self {
            store,
            ctx,
            publisher: Arc::new(Publisher::new(ProductsSnapshot::loading())),
        };
        controller.refresh();
        controller
    }

    /// Re-run the product query.
    pub fn refresh(&self) {
        let token = self.publisher.begin_with(|s| *s = ProductsSnapshot::loading());
        let store = Arc::clone(&self.store);
        let store_id = self.ctx.store_id.clone();
        let publisher = Arc::clone(&self.publisher);

        tokio::spawn(async move {
            let snapshot = match store.list_products(&store_id).await {
                Ok(products) => ProductsSnapshot {
                    products,
                    loading: false,
                    failure: None,
                },
                Err(e) => {
                    error!(error = %e, "product directory fetch failed, absorbing to empty");
                    ProductsSnapshot {
                        products: Vec::new(),
                        loading: false,
                        failure: Some(FailureReason::from(&e)),
                    }
                }
            };
            publisher.complete(token, |s| *s = snapshot);
        });
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProductsSnapshot {
        self.publisher.snapshot()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductsSnapshot> {
        self.publisher.subscribe()
    }

    /// Wait until no fetch is outstanding and return the settled snapshot.
    pub async fn settled(&self) -> ProductsSnapshot {
        let mut rx = self.publisher.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.publisher.snapshot(),
        }
    }
}
