//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the catalog endpoint is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
pub async fn readiness<S: CatalogStore>(State(state): State<AppState<S>>) -> Result<StatusCode> {
    state.catalog().ping().await?;
    Ok(StatusCode::OK)
}
