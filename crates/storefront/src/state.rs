//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogStore, StoreContext};
use crate::config::{FailurePolicy, StorefrontConfig};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the catalog backend so the
/// HTTP surface can be exercised against the in-memory store in tests.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<S> {
    config: StorefrontConfig,
    ctx: StoreContext,
    catalog: Arc<S>,
}

impl<S: CatalogStore> AppState<S> {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: S) -> Self {
        let ctx = StoreContext::new(config.catalog.store_id.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                ctx,
                catalog: Arc::new(catalog),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The store scope controllers are constructed with.
    #[must_use]
    pub fn store_context(&self) -> &StoreContext {
        &self.inner.ctx
    }

    /// Get a handle to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &Arc<S> {
        &self.inner.catalog
    }

    /// The configured failure surfacing policy.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.inner.config.failure_policy
    }
}
