//! Amate Storefront library.
//!
//! The catalog browsing logic layer as a headless service: controllers that
//! fetch collection/product data from the remote catalog store, reconcile
//! multi-step fetches into consistent snapshots, and maintain the selection
//! state that derives the visible product subset. Exposed as a library so
//! the controllers can be embedded directly or served over the JSON routes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod controllers;
pub mod error;
pub mod routes;
pub mod state;
pub mod styles;
pub mod view_sync;
