//! Catalog browsing controllers.
//!
//! # Architecture
//!
//! Each controller owns its state exclusively and publishes immutable
//! snapshot values through a `tokio::sync::watch` channel. Presentation
//! treats snapshots as read-only and requests transitions only through the
//! intent methods. No error ever crosses a controller boundary: every public
//! operation settles to a displayable state, with absorbed failures recorded
//! as a structured [`FailureReason`](crate::catalog::FailureReason) on the
//! snapshot.
//!
//! Fetches run on spawned tasks guarded by a monotonically increasing
//! request token; a completion bearing a stale token is discarded, so a slow
//! older sequence can never overwrite a newer one.

pub mod detail;
pub mod directory;
pub mod index;
pub mod products;

pub use detail::{CollectionDetail, DetailSnapshot};
pub use directory::{CollectionDirectory, DirectorySnapshot};
pub use index::{IndexSnapshot, StoreIndex};
pub use products::{ProductDirectory, ProductsSnapshot};

use std::sync::Mutex;

use tokio::sync::watch;

/// Token-guarded snapshot publisher shared by all controllers.
///
/// `begin_with` opens a new request generation and atomically publishes the
/// in-flight state; `complete` applies a terminal mutation only if no newer
/// generation has been opened since. `modify` is for pure transitions that
/// must not invalidate an outstanding fetch.
pub(crate) struct Publisher<T> {
    tx: watch::Sender<T>,
    generation: Mutex<u64>,
}

impl<T: Clone> Publisher<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            tx: watch::Sender::new(initial),
            generation: Mutex::new(0),
        }
    }

    /// Current snapshot value.
    pub(crate) fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Apply a pure transition without touching the request generation.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Open a new request generation, publish the in-flight state, and
    /// return the token the eventual completion must present.
    pub(crate) fn begin_with(&self, f: impl FnOnce(&mut T)) -> u64 {
        let mut generation = self.generation.lock().expect("generation lock poisoned");
        *generation += 1;
        self.tx.send_modify(f);
        *generation
    }

    /// Apply a completion if its token is still current. Returns whether the
    /// mutation was applied; stale completions are dropped.
    pub(crate) fn complete(&self, token: u64, f: impl FnOnce(&mut T)) -> bool {
        let generation = self.generation.lock().expect("generation lock poisoned");
        if *generation == token {
            self.tx.send_modify(f);
            true
        } else {
            tracing::debug!(token, current = *generation, "stale completion discarded");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_completion_is_dropped() {
        let publisher = Publisher::new(0_u32);
        let old = publisher.begin_with(|v| *v = 1);
        let new = publisher.begin_with(|v| *v = 2);

        assert!(!publisher.complete(old, |v| *v = 10));
        assert_eq!(publisher.snapshot(), 2);

        assert!(publisher.complete(new, |v| *v = 20));
        assert_eq!(publisher.snapshot(), 20);
    }

    #[test]
    fn test_modify_does_not_invalidate_generation() {
        let publisher = Publisher::new(0_u32);
        let token = publisher.begin_with(|v| *v = 1);
        publisher.modify(|v| *v += 100);
        assert!(publisher.complete(token, |v| *v += 1));
        assert_eq!(publisher.snapshot(), 102);
    }
}
