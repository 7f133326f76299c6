// ── Reactive service streams ──
//
// Subscription handle for consuming service-list changes from the store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use hotify_api::Service;

use crate::store::SyncState;

/// A subscription to the synchronized service list.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`. Every value
/// observed is a complete, sorted server response.
pub struct ServiceStream {
    current: SyncState,
    receiver: watch::Receiver<SyncState>,
}

impl ServiceStream {
    pub(crate) fn new(receiver: watch::Receiver<SyncState>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &Arc<Vec<Arc<Service>>> {
        &self.current.services
    }

    /// Store version of the snapshot returned by [`current()`](Self::current).
    pub fn current_version(&self) -> u64 {
        self.current.version
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Arc<Service>>> {
        self.receiver.borrow().services.clone()
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<Service>>>> {
        self.receiver.changed().await.ok()?;
        self.current = self.receiver.borrow_and_update().clone();
        Some(self.current.services.clone())
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The first item is the snapshot current at conversion time.
    pub fn into_stream(self) -> ServiceWatchStream {
        ServiceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct ServiceWatchStream {
    inner: WatchStream<SyncState>,
}

impl Stream for ServiceWatchStream {
    type Item = Arc<Vec<Arc<Service>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner)
            .poll_next(cx)
            .map(|state| state.map(|s| s.services))
    }
}
