//! Home page (store index) route handler.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{CatalogStore, Collection, Product};
use crate::controllers::{IndexSnapshot, StoreIndex};
use crate::state::AppState;
use crate::view_sync::{self, Section};

use super::surfaced;

/// Selection intents replayed from query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub style: Option<String>,
    pub collection: Option<String>,
}

/// Index snapshot plus the derived lists and the scroll hint a stateless
/// consumer needs to mirror the view-sync behavior.
#[derive(Serialize)]
pub struct HomeResponse {
    #[serde(flatten)]
    pub snapshot: IndexSnapshot,
    pub visible_collections: Vec<Collection>,
    pub visible_products: Vec<Product>,
    pub scroll_to: Option<Section>,
}

/// Store index: directories plus the two selection axes.
#[instrument(skip(state))]
pub async fn index<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<HomeQuery>,
) -> Json<HomeResponse> {
    let index = StoreIndex::new(Arc::clone(state.catalog()), state.store_context().clone());
    index.settled().await;

    // Replay the selection intents carried by the URL. Unknown style ids
    // scope to no collections rather than erroring.
    if let Some(style) = query.style {
        index.select_style(style.into());
    }
    if let Some(collection) = query.collection {
        index.select_collection(collection.into());
    }

    let mut snapshot = index.settled().await;
    let policy = state.failure_policy();
    snapshot.collections_failure = surfaced(policy, snapshot.collections_failure);
    snapshot.products_failure = surfaced(policy, snapshot.products_failure);
    snapshot.selection_failure = surfaced(policy, snapshot.selection_failure);

    let visible_collections = snapshot.visible_collections().to_vec();
    let visible_products = snapshot.visible_products().to_vec();
    let scroll_to = view_sync::scroll_hint(&snapshot);

    Json(HomeResponse {
        snapshot,
        visible_collections,
        visible_products,
        scroll_to,
    })
}
