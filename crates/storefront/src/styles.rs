//! Client-defined style taxonomy.
//!
//! Styles are a hand-maintained grouping tag that does not exist in the
//! remote schema. The style→collection mapping is an explicit lookup table
//! versioned by [`TAXONOMY_REVISION`], never query logic. In the current
//! revision only `acordeon` maps to the full collection list; every other
//! (or unknown) style maps to the empty set. The counters on each style are
//! denormalized display values, not derived from any stored relation.

use std::sync::LazyLock;

use amate_core::StyleId;
use serde::Serialize;

/// Revision of the hand-maintained taxonomy, bumped whenever the registry
/// or the collection scopes change.
pub const TAXONOMY_REVISION: u32 = 1;

/// A client-defined style tag.
#[derive(Debug, Clone, Serialize)]
pub struct Style {
    pub id: StyleId,
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub collections_count: u32,
    pub products_count: u32,
}

/// Which collections a style makes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionScope {
    /// The style maps to every fetched collection.
    AllCollections,
    /// The style has no collections mapped yet.
    NoCollections,
}

static REGISTRY: LazyLock<Vec<Style>> = LazyLock::new(|| {
    vec![
        Style {
            id: StyleId::new("acordeon"),
            name: "Acordeón",
            description: "Diseño clásico con pliegues en zigzag que crean \
                          profundidad y textura. Elegante y versátil.",
            image: "/images/styles/acordeon.jpg",
            collections_count: 3,
            products_count: 17,
        },
        Style {
            id: StyleId::new("splash"),
            name: "Splash",
            description: "Diseño dinámico con explosiones de color y formas \
                          orgánicas. Moderno y vibrante.",
            image: "/images/styles/splash.jpg",
            collections_count: 2,
            products_count: 0,
        },
        Style {
            id: StyleId::new("reguilete"),
            name: "Reguilete",
            description: "Diseño geométrico inspirado en molinillos de \
                          viento. Simétrico y alegre.",
            image: "/images/styles/reguilete.jpg",
            collections_count: 0,
            products_count: 0,
        },
    ]
});

/// All styles, in display order.
#[must_use]
pub fn all() -> &'static [Style] {
    &REGISTRY
}

/// Look up a style by id.
#[must_use]
pub fn find(id: &StyleId) -> Option<&'static Style> {
    REGISTRY.iter().find(|style| &style.id == id)
}

/// The collection scope of a style.
///
/// Only `acordeon` is mapped so far; `splash` and `reguilete` are named
/// placeholders awaiting a mapping, and unknown ids fall through to the
/// empty scope rather than erroring.
#[must_use]
pub fn collection_scope(id: &StyleId) -> CollectionScope {
    if id.as_str() == "acordeon" {
        CollectionScope::AllCollections
    } else {
        CollectionScope::NoCollections
    }
}
