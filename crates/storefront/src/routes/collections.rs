//! Collection route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::catalog::CatalogStore;
use crate::controllers::{CollectionDetail, CollectionDirectory, DirectorySnapshot};
use crate::state::AppState;

use super::surfaced;

/// Collection directory: all active collections, newest first.
///
/// A failed fetch settles to an empty list (soft fail), never an error
/// response.
#[instrument(skip(state))]
pub async fn index<S: CatalogStore>(State(state): State<AppState<S>>) -> Json<DirectorySnapshot> {
    let directory =
        CollectionDirectory::new(Arc::clone(state.catalog()), state.store_context().clone());
    let mut snapshot = directory.settled().await;
    snapshot.failure = surfaced(state.failure_policy(), snapshot.failure);
    Json(snapshot)
}

/// Collection detail: the collection plus its resolved product list.
///
/// Responds 404 when the handle does not resolve, with the settled snapshot
/// still in the body so the presentation layer can render its not-found
/// state from the same shape.
#[instrument(skip(state), fields(handle = %handle))]
pub async fn show<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(handle): Path<String>,
) -> Response {
    let detail = CollectionDetail::new(
        Arc::clone(state.catalog()),
        state.store_context().clone(),
        &handle,
    );
    let mut snapshot = detail.settled().await;
    snapshot.failure = surfaced(state.failure_policy(), snapshot.failure);

    let status = if snapshot.not_found {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Json(snapshot)).into_response()
}
