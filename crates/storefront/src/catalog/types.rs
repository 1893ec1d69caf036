//! Row types returned by the remote catalog.

use amate_core::{CollectionId, ProductId, RecordStatus, StoreId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product collection as stored remotely.
///
/// Read-only snapshot; collections are created and mutated externally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    /// URL-safe slug, unique within a store. Lookup key for detail pages.
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub status: RecordStatus,
    pub store_id: StoreId,
    pub created_at: DateTime<Utc>,
}

/// A product as stored remotely.
///
/// Only the identifier and status are meaningful to the browsing layer.
/// Every other column (name, image, price, ...) is opaque display data and
/// passes through verbatim via the flattened attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub status: RecordStatus,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Read an opaque attribute as a string, if present.
    #[must_use]
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Join-table row pairing one collection with one product.
///
/// The REST backend only ever fetches the `product_id` projection; the full
/// row exists for the in-memory fixture store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRow {
    pub collection_id: CollectionId,
    pub product_id: ProductId,
}

/// Projection of the join table down to the product id column.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductIdRow {
    pub product_id: ProductId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_deserializes_remote_row() {
        let row = serde_json::json!({
            "id": "c-1",
            "handle": "sakura",
            "name": "Sakura",
            "description": null,
            "image": "https://cdn.example/sakura.jpg",
            "status": "active",
            "store_id": "store-1",
            "created_at": "2025-03-01T12:00:00Z"
        });
        let collection: Collection = serde_json::from_value(row).unwrap();
        assert_eq!(collection.handle, "sakura");
        assert!(collection.status.is_active());
        assert!(collection.description.is_none());
    }

    #[test]
    fn test_product_attributes_pass_through_verbatim() {
        let row = serde_json::json!({
            "id": "p-1",
            "status": "active",
            "name": "Grulla Roja",
            "price": "450.00",
            "image": "https://cdn.example/grulla.jpg",
            "store_id": "store-1"
        });
        let product: Product = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(product.attribute_str("name"), Some("Grulla Roja"));
        assert_eq!(product.attribute_str("price"), Some("450.00"));

        // Round-trip must not lose or reshape display columns.
        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back, row);
    }
}
