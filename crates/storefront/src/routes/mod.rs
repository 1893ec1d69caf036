//! HTTP route handlers for the headless storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (catalog reachable)
//!
//! # Catalog browsing (JSON)
//! GET  /api/collections           - Collection directory snapshot
//! GET  /api/collections/{handle}  - Collection detail snapshot (404 when not found)
//! GET  /api/home                  - Store index snapshot (?style=&collection=)
//! GET  /api/styles                - Static style registry
//! ```
//!
//! One controller instance is created per request - a page view is one
//! render cycle - and the handler serializes its settled snapshot. Under the
//! `absorb` failure policy the internal failure reasons are stripped before
//! responding, making a degraded result byte-indistinguishable from an empty
//! one; under `annotate` they are carried through.

pub mod collections;
pub mod health;
pub mod home;
pub mod styles;

use axum::{Router, routing::get};

use crate::catalog::{CatalogStore, FailureReason};
use crate::config::FailurePolicy;
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness::<S>))
        .route("/api/collections", get(collections::index::<S>))
        .route("/api/collections/{handle}", get(collections::show::<S>))
        .route("/api/home", get(home::index::<S>))
        .route("/api/styles", get(styles::index))
}

/// Apply the failure surfacing policy to one snapshot field.
pub(crate) fn surfaced(
    policy: FailurePolicy,
    failure: Option<FailureReason>,
) -> Option<FailureReason> {
    match policy {
        FailurePolicy::Absorb => None,
        FailurePolicy::Annotate => failure,
    }
}
