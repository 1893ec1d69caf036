//! Style registry route handler.

use axum::Json;
use serde::Serialize;

use crate::styles::{self, Style, TAXONOMY_REVISION};

/// The static style registry plus its revision.
#[derive(Serialize)]
pub struct StylesResponse {
    pub revision: u32,
    pub styles: &'static [Style],
}

/// The hand-maintained style taxonomy for the styles section.
pub async fn index() -> Json<StylesResponse> {
    Json(StylesResponse {
        revision: TAXONOMY_REVISION,
        styles: styles::all(),
    })
}
