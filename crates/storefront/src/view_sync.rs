//! View synchronization.
//!
//! Not a state owner: watches the store index snapshot stream and reacts to
//! a selection id changing to a new non-null value by scheduling a one-shot,
//! deferred, best-effort scroll request for the matching section. The delay
//! gives the presentation layer one render cycle to mount the section; if
//! the receiver is gone the request is silently skipped. There is no
//! cancellation: two quick distinct selections deliver two requests and the
//! last one wins visually.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::controllers::IndexSnapshot;

/// How long to wait for the derived list to be rendered before scrolling.
pub const RENDER_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// A named page section a scroll can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Scroll target after a style selection.
    Collections,
    /// Scroll target after a collection selection.
    Products,
}

/// A request to bring a section into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub section: Section,
}

/// Attach the watcher to an index snapshot stream.
///
/// Returns the channel scroll requests are delivered on. The watcher task
/// ends when the index controller (and with it the watch sender) is dropped.
pub fn attach(mut rx: watch::Receiver<IndexSnapshot>) -> mpsc::UnboundedReceiver<ScrollRequest> {
    let (tx, requests) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (mut last_style, mut last_collection) = {
            let snapshot = rx.borrow_and_update();
            (
                snapshot.selected_style.clone(),
                snapshot.selected_collection.clone(),
            )
        };

        while rx.changed().await.is_ok() {
            let (style, collection) = {
                let snapshot = rx.borrow_and_update();
                (
                    snapshot.selected_style.clone(),
                    snapshot.selected_collection.clone(),
                )
            };

            if style.is_some() && style != last_style {
                schedule(tx.clone(), Section::Collections);
            }
            if collection.is_some() && collection != last_collection {
                schedule(tx.clone(), Section::Products);
            }

            last_style = style;
            last_collection = collection;
        }
    });

    requests
}

fn schedule(tx: mpsc::UnboundedSender<ScrollRequest>, section: Section) {
    tokio::spawn(async move {
        tokio::time::sleep(RENDER_SETTLE_DELAY).await;
        // Dropped receiver means no section to scroll; skip silently.
        let _ = tx.send(ScrollRequest { section });
    });
}

/// The scroll target the current selection state implies, if any.
///
/// Mirrors the watcher rules for stateless consumers (one-shot JSON
/// responses that cannot hold a channel open): collection selection wins
/// because the products section is the later one on the page.
#[must_use]
pub fn scroll_hint(snapshot: &IndexSnapshot) -> Option<Section> {
    if snapshot.selected_collection.is_some() {
        Some(Section::Products)
    } else if snapshot.selected_style.is_some() {
        Some(Section::Collections)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use amate_core::{CollectionId, StoreId, StyleId};

    use crate::catalog::{InMemoryCatalog, StoreContext};
    use crate::controllers::StoreIndex;

    use super::*;

    async fn empty_index() -> StoreIndex<InMemoryCatalog> {
        let index = StoreIndex::new(
            Arc::new(InMemoryCatalog::builder().build()),
            StoreContext::new(StoreId::new("store-1")),
        );
        index.settled().await;
        index
    }

    // Watch receivers coalesce; the watcher task must be given the scheduler
    // between interesting transitions or it only observes the last one.
    async fn run_watcher() {
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_style_selection_scrolls_collections_after_delay() {
        let index = empty_index().await;
        let mut requests = attach(index.subscribe());
        run_watcher().await;

        index.select_style(StyleId::new("acordeon"));
        index.settled().await;

        tokio::time::sleep(RENDER_SETTLE_DELAY * 2).await;
        let request = requests.try_recv().unwrap();
        assert_eq!(request.section, Section::Collections);
        assert!(requests.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collection_selection_scrolls_products() {
        let index = empty_index().await;
        let mut requests = attach(index.subscribe());
        run_watcher().await;

        index.select_collection(CollectionId::new("c-1"));
        index.settled().await;

        tokio::time::sleep(RENDER_SETTLE_DELAY * 2).await;
        assert_eq!(requests.try_recv().unwrap().section, Section::Products);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_reselection_does_not_refire() {
        let index = empty_index().await;
        let mut requests = attach(index.subscribe());
        run_watcher().await;

        index.select_style(StyleId::new("acordeon"));
        index.settled().await;
        tokio::time::sleep(RENDER_SETTLE_DELAY * 2).await;
        assert!(requests.try_recv().is_ok());

        index.select_style(StyleId::new("acordeon"));
        index.settled().await;
        tokio::time::sleep(RENDER_SETTLE_DELAY * 2).await;
        assert!(requests.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_distinct_selections_both_fire() {
        let index = empty_index().await;
        let mut requests = attach(index.subscribe());
        run_watcher().await;

        index.select_style(StyleId::new("acordeon"));
        run_watcher().await;
        index.select_style(StyleId::new("splash"));
        index.settled().await;

        tokio::time::sleep(RENDER_SETTLE_DELAY * 2).await;
        assert!(requests.try_recv().is_ok());
        assert!(requests.try_recv().is_ok());
    }

    #[test]
    fn test_scroll_hint_prefers_collection_selection() {
        let index_settled = |style: Option<&str>, collection: Option<&str>| {
            crate::controllers::IndexSnapshot {
                collections: Vec::new(),
                loading_collections: false,
                products: Vec::new(),
                loading: false,
                selected_style: style.map(StyleId::new),
                selected_collection: collection.map(CollectionId::new),
                collection_products: Vec::new(),
                resolving_selection: false,
                collections_failure: None,
                products_failure: None,
                selection_failure: None,
            }
        };

        assert_eq!(scroll_hint(&index_settled(None, None)), None);
        assert_eq!(
            scroll_hint(&index_settled(Some("acordeon"), None)),
            Some(Section::Collections)
        );
        assert_eq!(
            scroll_hint(&index_settled(Some("acordeon"), Some("c-1"))),
            Some(Section::Products)
        );
    }
}
