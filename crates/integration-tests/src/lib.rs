//! Integration tests for Amate.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p amate-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `browsing_flow` - End-to-end controller flows over the in-memory catalog
//! - `http_api` - JSON surface tests via `tower::ServiceExt::oneshot`
//!
//! This library holds the shared fixtures: a seeded in-memory catalog
//! mirroring the store's observed shape (the `sakura` collection with two
//! active products and one inactive, an empty collection, and a second
//! tenant that must stay invisible) plus a config that skips env loading.

use amate_core::{CollectionId, ProductId, RecordStatus, StoreId};
use amate_storefront::catalog::types::{Collection, Product};
use amate_storefront::catalog::InMemoryCatalog;
use amate_storefront::config::{CatalogConfig, FailurePolicy, StorefrontConfig};
use chrono::{TimeZone, Utc};
use secrecy::SecretString;

/// The store scope fixtures are seeded under.
pub const TEST_STORE: &str = "store-amate";

/// Build a collection row.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn collection(id: &str, handle: &str, day: u32) -> Collection {
    Collection {
        id: CollectionId::new(id),
        handle: handle.to_string(),
        name: handle.to_string(),
        description: Some(format!("Colección {handle}")),
        image: None,
        status: RecordStatus::Active,
        store_id: StoreId::new(TEST_STORE),
        created_at: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
    }
}

/// Build a product row with opaque display attributes.
#[must_use]
pub fn product(id: &str, active: bool) -> Product {
    let mut attributes = serde_json::Map::new();
    attributes.insert("name".to_string(), serde_json::json!(format!("Pieza {id}")));
    attributes.insert("price".to_string(), serde_json::json!("450.00"));
    attributes.insert("store_id".to_string(), serde_json::json!(TEST_STORE));
    attributes.insert(
        "created_at".to_string(),
        serde_json::json!("2025-03-01T12:00:00Z"),
    );
    Product {
        id: ProductId::new(id),
        status: if active {
            RecordStatus::Active
        } else {
            RecordStatus::Other("draft".to_string())
        },
        attributes,
    }
}

/// The standard browsing fixture:
/// - `sakura` (newest): products p-1, p-2 active and p-3 inactive
/// - `koi`: empty collection
/// - a foreign-store collection that must never surface
#[must_use]
pub fn seeded_catalog() -> InMemoryCatalog {
    let mut foreign = collection("c-foreign", "sakura", 9);
    foreign.store_id = StoreId::new("store-other");

    InMemoryCatalog::builder()
        .collection(collection("c-sakura", "sakura", 7))
        .collection(collection("c-koi", "koi", 3))
        .collection(foreign)
        .product(product("p-1", true))
        .product(product("p-2", true))
        .product(product("p-3", false))
        .associate(CollectionId::new("c-sakura"), ProductId::new("p-1"))
        .associate(CollectionId::new("c-sakura"), ProductId::new("p-2"))
        .associate(CollectionId::new("c-sakura"), ProductId::new("p-3"))
        .build()
}

/// A config that never touches the environment.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config(policy: FailurePolicy) -> StorefrontConfig {
    StorefrontConfig {
        catalog: CatalogConfig {
            api_url: "http://127.0.0.1:1/rest/v1".to_string(),
            api_key: SecretString::from("test-key"),
            store_id: StoreId::new(TEST_STORE),
        },
        failure_policy: policy,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        sentry_dsn: None,
        sentry_environment: None,
    }
}
