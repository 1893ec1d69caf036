//! Remote catalog client.
//!
//! # Architecture
//!
//! - The remote store is a PostgREST-compatible read-only endpoint exposing
//!   three record sets: `collections`, `products`, and the
//!   `collection_products` join table, all scoped to one store.
//! - Controllers depend on the [`CatalogStore`] port trait, never on a
//!   concrete backend. [`RestCatalogStore`] talks to the real endpoint;
//!   [`InMemoryCatalog`] serves fixtures for offline development and tests.
//! - No caching, no retries: a query either resolves, errors, or never
//!   resolves.
//!
//! # Example
//!
//! ```rust,ignore
//! use amate_storefront::catalog::{CatalogStore, RestCatalogStore};
//!
//! let store = RestCatalogStore::new(&config.catalog);
//! let collections = store.list_collections(&ctx.store_id).await?;
//! ```

pub(crate) mod memory;
mod rest;
pub mod types;

pub use memory::{Fault, InMemoryCatalog, InMemoryCatalogBuilder};
pub use rest::RestCatalogStore;
pub use types::{AssociationRow, Collection, Product};

use amate_core::{CollectionId, ProductId, StoreId};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when querying the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Structured reason behind an absorbed failure.
///
/// The presentation contract absorbs every failure into an empty/default
/// result, but snapshots keep the reason internally so observability can
/// distinguish "legitimately empty" from "degraded".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The query never produced a usable response.
    Network,
    /// The response arrived but could not be decoded.
    SchemaMismatch,
    /// A lookup that expected a row found none (or errored finding it).
    NotFound,
}

impl From<&CatalogError> for FailureReason {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::Http(_) | CatalogError::Api { .. } => Self::Network,
            CatalogError::Decode(_) => Self::SchemaMismatch,
        }
    }
}

/// Read-only context every controller is constructed with.
///
/// Carries the tenant scope explicitly instead of reading it from ambient
/// global state.
#[derive(Debug, Clone)]
pub struct StoreContext {
    /// Tenant identifier all catalog queries are filtered by.
    pub store_id: StoreId,
}

impl StoreContext {
    /// Create a context for one store.
    #[must_use]
    pub const fn new(store_id: StoreId) -> Self {
        Self { store_id }
    }
}

/// Port trait over the remote catalog's query capability.
///
/// All methods are read-only and scoped to `active` records. Futures are
/// `Send` so controllers can drive queries from spawned tasks.
pub trait CatalogStore: Send + Sync + 'static {
    /// All active collections for a store, newest first.
    fn list_collections(
        &self,
        store: &StoreId,
    ) -> impl Future<Output = Result<Vec<Collection>, CatalogError>> + Send;

    /// The active collection with the given handle, if any.
    fn find_collection_by_handle(
        &self,
        store: &StoreId,
        handle: &str,
    ) -> impl Future<Output = Result<Option<Collection>, CatalogError>> + Send;

    /// Product ids associated with a collection (join-table projection).
    fn list_collection_product_ids(
        &self,
        collection: &CollectionId,
    ) -> impl Future<Output = Result<Vec<ProductId>, CatalogError>> + Send;

    /// Active products among the given ids. May return fewer rows than ids
    /// when referenced products are inactive or deleted.
    fn list_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// All active products for a store, newest first.
    fn list_products(
        &self,
        store: &StoreId,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Cheap reachability probe for the readiness endpoint.
    fn ping(&self) -> impl Future<Output = Result<(), CatalogError>> + Send;
}
