//! Collection detail controller.
//!
//! Resolves a collection handle to a fully-populated collection plus its
//! product list through three dependent fetches:
//!
//! 1. collection row by handle (active, store-scoped, exactly one expected),
//! 2. join-table rows projected to product ids,
//! 3. active products among those ids.
//!
//! The sequence is an explicit state machine
//! `Pending -> ResolvingAssociations -> ResolvingProducts -> Done | NotFound
//! | Failed` driven by a request token; a completion bearing a stale token is
//! discarded, so changing the handle mid-flight can never let the older
//! sequence overwrite the newer terminal state. The snapshot transitions
//! once, from loading to terminal; the intermediate phases are internal.

use std::sync::Arc;

use amate_core::{CollectionId, StoreId};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::catalog::{CatalogStore, Collection, FailureReason, Product, StoreContext};

use super::Publisher;

/// Immutable view of a collection detail page.
#[derive(Debug, Clone, Serialize)]
pub struct DetailSnapshot {
    pub collection: Option<Collection>,
    pub products: Vec<Product>,
    pub loading: bool,
    /// Terminal: the handle did not resolve to an active collection in this
    /// store (or step 1 errored).
    pub not_found: bool,
    /// Internal reason when a step was absorbed. `not_found` with a reason
    /// means step 1 errored; `not_found` without one means genuine zero rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl DetailSnapshot {
    fn loading() -> Self {
        Self {
            collection: None,
            products: Vec::new(),
            loading: true,
            not_found: false,
            failure: None,
        }
    }

    fn not_found(failure: Option<FailureReason>) -> Self {
        Self {
            collection: None,
            products: Vec::new(),
            loading: false,
            not_found: true,
            failure,
        }
    }

    fn done(collection: Collection, products: Vec<Product>) -> Self {
        Self {
            collection: Some(collection),
            products,
            loading: false,
            not_found: false,
            failure: None,
        }
    }

    /// Collection resolved but a later step was absorbed: empty products,
    /// not marked not-found.
    fn soft_failed(collection: Collection, reason: FailureReason) -> Self {
        Self {
            collection: Some(collection),
            products: Vec::new(),
            loading: false,
            not_found: false,
            failure: Some(reason),
        }
    }
}

/// Internal sequence phase, logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    ResolvingAssociations,
    ResolvingProducts,
    Done,
    NotFound,
    Failed,
}

/// Resolves a handle into a collection and its products.
pub struct CollectionDetail<S> {
    store: Arc<S>,
    ctx: StoreContext,
    publisher: Arc<Publisher<DetailSnapshot>>,
}

impl<S: CatalogStore> CollectionDetail<S> {
    /// Create the controller and start resolving the given handle.
    #[must_use]
    pub fn new(store: Arc<S>, ctx: StoreContext, handle: &str) -> Self {
        let controller = Self {
            store,
            ctx,
            publisher: Arc::new(Publisher::new(DetailSnapshot::loading())),
        };
        controller.set_handle(handle);
        controller
    }

    /// Re-run the full sequence for a new handle. The previous sequence is
    /// not cancelled; its completion is discarded as stale.
    pub fn set_handle(&self, handle: &str) {
        let token = self.publisher.begin_with(|s| *s = DetailSnapshot::loading());
        let store = Arc::clone(&self.store);
        let store_id = self.ctx.store_id.clone();
        let handle = handle.to_string();
        let publisher = Arc::clone(&self.publisher);

        tokio::spawn(async move {
            let snapshot = run_sequence(store.as_ref(), &store_id, &handle).await;
            publisher.complete(token, |s| *s = snapshot);
        });
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DetailSnapshot {
        self.publisher.snapshot()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.publisher.subscribe()
    }

    /// Wait until no sequence is outstanding and return the settled snapshot.
    pub async fn settled(&self) -> DetailSnapshot {
        let mut rx = self.publisher.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.publisher.snapshot(),
        }
    }
}

async fn run_sequence<S: CatalogStore>(
    store: &S,
    store_id: &StoreId,
    handle: &str,
) -> DetailSnapshot {
    debug!(%handle, phase = ?Phase::Pending, "detail sequence started");

    let collection = match store.find_collection_by_handle(store_id, handle).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            debug!(%handle, phase = ?Phase::NotFound, "handle did not resolve");
            return DetailSnapshot::not_found(None);
        }
        Err(e) => {
            error!(%handle, error = %e, phase = ?Phase::NotFound, "collection lookup failed, mapping to not-found");
            return DetailSnapshot::not_found(Some(FailureReason::from(&e)));
        }
    };

    match resolve_collection_products(store, &collection.id).await {
        Ok(products) => {
            debug!(%handle, phase = ?Phase::Done, count = products.len(), "detail sequence settled");
            DetailSnapshot::done(collection, products)
        }
        Err(reason) => {
            debug!(%handle, phase = ?Phase::Failed, ?reason, "detail sequence soft-failed");
            DetailSnapshot::soft_failed(collection, reason)
        }
    }
}

/// Resolve the products belonging to one collection (association rows, then
/// the active products among the referenced ids). Shared with the store
/// index's collection selection.
///
/// A failing step is absorbed into a [`FailureReason`]; zero association
/// rows is a valid empty collection, not an error. Fewer products than
/// referenced ids is expected when some are inactive or deleted.
pub(crate) async fn resolve_collection_products<S: CatalogStore>(
    store: &S,
    collection: &CollectionId,
) -> Result<Vec<Product>, FailureReason> {
    debug!(%collection, phase = ?Phase::ResolvingAssociations, "resolving association rows");
    let ids = store
        .list_collection_product_ids(collection)
        .await
        .map_err(|e| {
            error!(%collection, error = %e, "association fetch failed, absorbing to empty");
            FailureReason::from(&e)
        })?;

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    debug!(%collection, phase = ?Phase::ResolvingProducts, ids = ids.len(), "resolving products");
    store.list_products_by_ids(&ids).await.map_err(|e| {
        error!(%collection, error = %e, "product fetch failed, absorbing to empty");
        FailureReason::from(&e)
    })
}
