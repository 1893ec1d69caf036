//! PostgREST-backed catalog store.

use std::sync::Arc;

use amate_core::{CollectionId, ProductId, StoreId};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::CatalogConfig;

use super::types::{Collection, Product, ProductIdRow};
use super::{CatalogError, CatalogStore};

/// Client for a PostgREST-compatible catalog endpoint.
///
/// Builds equality / set-membership / ordering filters as query parameters
/// and decodes JSON row arrays. No caching, no retries.
#[derive(Clone)]
pub struct RestCatalogStore {
    inner: Arc<RestCatalogStoreInner>,
}

struct RestCatalogStoreInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestCatalogStore {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(RestCatalogStoreInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Execute one GET against a record set and decode the row array.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>, CatalogError> {
        let url = format!("{}/{table}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            // PostgREST (Supabase flavor) wants the key in both headers
            .header("apikey", &self.inner.api_key)
            .header("Authorization", format!("Bearer {}", self.inner.api_key))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                table = %table,
                body = %body.chars().take(500).collect::<String>(),
                "catalog endpoint returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    table = %table,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to decode catalog response"
                );
                Err(CatalogError::Decode(e))
            }
        }
    }
}

impl CatalogStore for RestCatalogStore {
    #[instrument(skip(self), fields(store = %store))]
    async fn list_collections(&self, store: &StoreId) -> Result<Vec<Collection>, CatalogError> {
        self.fetch_rows("collections", &collections_query(store))
            .await
    }

    #[instrument(skip(self), fields(store = %store, handle = %handle))]
    async fn find_collection_by_handle(
        &self,
        store: &StoreId,
        handle: &str,
    ) -> Result<Option<Collection>, CatalogError> {
        let rows: Vec<Collection> = self
            .fetch_rows("collections", &collection_by_handle_query(store, handle))
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn list_collection_product_ids(
        &self,
        collection: &CollectionId,
    ) -> Result<Vec<ProductId>, CatalogError> {
        let rows: Vec<ProductIdRow> = self
            .fetch_rows("collection_products", &association_query(collection))
            .await?;
        Ok(rows.into_iter().map(|row| row.product_id).collect())
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()))]
    async fn list_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_rows("products", &products_by_ids_query(ids))
            .await
    }

    #[instrument(skip(self), fields(store = %store))]
    async fn list_products(&self, store: &StoreId) -> Result<Vec<Product>, CatalogError> {
        self.fetch_rows("products", &products_query(store)).await
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        let query = [("select".to_string(), "id".to_string()), ("limit".to_string(), "1".to_string())];
        let _: Vec<serde_json::Value> = self.fetch_rows("collections", &query).await?;
        Ok(())
    }
}

// =============================================================================
// Query construction
// =============================================================================
//
// Kept as pure functions so the exact PostgREST parameter shapes are unit
// testable without a live endpoint.

fn collections_query(store: &StoreId) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "*".to_string()),
        ("status".to_string(), "eq.active".to_string()),
        ("store_id".to_string(), format!("eq.{store}")),
        ("order".to_string(), "created_at.desc".to_string()),
    ]
}

fn collection_by_handle_query(store: &StoreId, handle: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "*".to_string()),
        ("handle".to_string(), format!("eq.{handle}")),
        ("status".to_string(), "eq.active".to_string()),
        ("store_id".to_string(), format!("eq.{store}")),
        ("limit".to_string(), "1".to_string()),
    ]
}

fn association_query(collection: &CollectionId) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "product_id".to_string()),
        ("collection_id".to_string(), format!("eq.{collection}")),
    ]
}

fn products_by_ids_query(ids: &[ProductId]) -> Vec<(String, String)> {
    let id_list = ids
        .iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    vec![
        ("select".to_string(), "*".to_string()),
        ("status".to_string(), "eq.active".to_string()),
        ("id".to_string(), format!("in.({id_list})")),
    ]
}

fn products_query(store: &StoreId) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "*".to_string()),
        ("status".to_string(), "eq.active".to_string()),
        ("store_id".to_string(), format!("eq.{store}")),
        ("order".to_string(), "created_at.desc".to_string()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pairs(query: &[(String, String)]) -> Vec<(&str, &str)> {
        query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_collections_query_shape() {
        let query = collections_query(&StoreId::new("store-1"));
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("status", "eq.active"),
                ("store_id", "eq.store-1"),
                ("order", "created_at.desc"),
            ]
        );
    }

    #[test]
    fn test_collection_by_handle_query_shape() {
        let query = collection_by_handle_query(&StoreId::new("store-1"), "sakura");
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("handle", "eq.sakura"),
                ("status", "eq.active"),
                ("store_id", "eq.store-1"),
                ("limit", "1"),
            ]
        );
    }

    #[test]
    fn test_association_query_shape() {
        let query = association_query(&CollectionId::new("c-9"));
        assert_eq!(
            pairs(&query),
            vec![("select", "product_id"), ("collection_id", "eq.c-9")]
        );
    }

    #[test]
    fn test_products_by_ids_query_shape() {
        let ids = vec![ProductId::new("p-1"), ProductId::new("p-2")];
        let query = products_by_ids_query(&ids);
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("status", "eq.active"),
                ("id", "in.(p-1,p-2)"),
            ]
        );
    }

    #[test]
    fn test_products_query_shape() {
        let query = products_query(&StoreId::new("store-1"));
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("status", "eq.active"),
                ("store_id", "eq.store-1"),
                ("order", "created_at.desc"),
            ]
        );
    }
}
