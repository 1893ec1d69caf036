//! Collection directory controller.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::error;

use crate::catalog::{CatalogStore, Collection, FailureReason, StoreContext};

use super::Publisher;

/// Immutable view of the collection directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectorySnapshot {
    pub collections: Vec<Collection>,
    pub loading: bool,
    /// Internal reason when the fetch was absorbed to empty. Never a
    /// caller-facing error state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl DirectorySnapshot {
    fn loading() -> Self {
        Self {
            collections: Vec::new(),
            loading: true,
            failure: None,
        }
    }

    /// Whether any collection is available, used by navigation chrome to
    /// decide if collection-dependent UI should render at all.
    #[must_use]
    pub fn has_collections(&self) -> bool {
        !self.collections.is_empty()
    }
}

/// Fetches all active collections for the store, newest first.
///
/// One query on construction; [`refresh`](Self::refresh) re-runs it. A query
/// failure is logged and absorbed to an empty list so the navigation chrome
/// can simply hide collection UI instead of showing an error.
pub struct CollectionDirectory<S> {
    store: Arc<S>,
    ctx: StoreContext,
    publisher: Arc<Publisher<DirectorySnapshot>>,
}

impl<S: CatalogStore> CollectionDirectory<S> {
    /// Create the controller and issue the initial query.
    #[must_use]
    pub fn new(store: Arc<S>, ctx: StoreContext) -> Self {
        let controller = Self {
            store,
            ctx,
            publisher: Arc::new(Publisher::new(DirectorySnapshot::loading())),
        };
        controller.refresh();
        controller
    }

    /// Re-run the directory query. A refresh that is overtaken by a newer
    /// one is discarded on completion.
    pub fn refresh(&self) {
        let token = self.publisher.begin_with(|s| *s = DirectorySnapshot::loading());
        let store = Arc::clone(&self.store);
        let store_id = self.ctx.store_id.clone();
        let publisher = Arc::clone(&self.publisher);

        tokio::spawn(async move {
            let snapshot = match store.list_collections(&store_id).await {
                Ok(collections) => DirectorySnapshot {
                    collections,
                    loading: false,
                    failure: None,
                },
                Err(e) => {
                    error!(error = %e, "collection directory fetch failed, absorbing to empty");
                    DirectorySnapshot {
                        collections: Vec::new(),
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
    pub fn snapshot(&self) -> DirectorySnapshot {
        self.publisher.snapshot()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DirectorySnapshot> {
        self.publisher.subscribe()
    }

    /// Wait until no fetch is outstanding and return the settled snapshot.
    pub async fn settled(&self) -> DirectorySnapshot {
        let mut rx = self.publisher.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.publisher.snapshot(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use amate_core::StoreId;

    use crate::catalog::memory::fixtures::collection;
    use crate::catalog::{Fault, InMemoryCatalog};

    use super::*;

    fn ctx() -> StoreContext {
        StoreContext::new(StoreId::new("store-1"))
    }

    #[tokio::test]
    async fn test_directory_fetches_newest_first() {
        let catalog = Arc::new(
            InMemoryCatalog::builder()
                .collection(collection("c-1", "early", "store-1", 2))
                .collection(collection("c-2", "late", "store-1", 9))
                .build(),
        );

        let directory = CollectionDirectory::new(catalog, ctx());
        let snapshot = directory.settled().await;

        assert!(!snapshot.loading);
        assert!(snapshot.has_collections());
        assert!(snapshot.failure.is_none());
        let handles: Vec<&str> = snapshot.collections.iter().map(|c| c.handle.as_str()).collect();
        assert_eq!(handles, vec!["late", "early"]);
    }

    #[tokio::test]
    async fn test_directory_absorbs_failure_to_empty() {
        let catalog = Arc::new(InMemoryCatalog::builder().failing(Fault::Collections).build());

        let directory = CollectionDirectory::new(catalog, ctx());
        let snapshot = directory.settled().await;

        assert!(!snapshot.loading);
        assert!(snapshot.collections.is_empty());
        assert!(!snapshot.has_collections());
        assert_eq!(snapshot.failure, Some(FailureReason::Network));
    }

    #[tokio::test]
    async fn test_directory_never_settles_with_loading_and_failure() {
        let catalog = Arc::new(InMemoryCatalog::builder().failing(Fault::Collections).build());
        let directory = CollectionDirectory::new(catalog, ctx());
        let snapshot = directory.settled().await;
        assert!(!(snapshot.loading && snapshot.failure.is_some()));
    }

    #[tokio::test]
    async fn test_refresh_reruns_query() {
        let catalog = Arc::new(
            InMemoryCatalog::builder()
                .collection(collection("c-1", "only", "store-1", 1))
                .build(),
        );
        let directory = CollectionDirectory::new(catalog, ctx());
        directory.settled().await;

        directory.refresh();
        let snapshot = directory.settled().await;
        assert_eq!(snapshot.collections.len(), 1);
    }
}
