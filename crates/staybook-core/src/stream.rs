// ── Reactive entity streams ──
//
// Subscription types for consuming cache changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::Snapshot;

/// A subscription to one entity cache.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct EntityStream<T: Send + Sync + 'static> {
    current: Snapshot<T>,
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<Snapshot<T>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &Snapshot<T> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publish, returning the new snapshot.
    /// Returns `None` if the cache has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` that first yields the current snapshot, then
    /// every later one.
    pub fn into_stream(self) -> EntityWatchStream<T> {
        EntityWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the underlying cache publishes. Slow
/// consumers skip intermediate snapshots and only see the latest one.
pub struct EntityWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> Stream for EntityWatchStream<T> {
    type Item = Snapshot<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Snapshot<T> is an Arc and therefore Unpin.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use futures_util::StreamExt;

    use crate::store::EntityCache;

    #[tokio::test]
    async fn stream_replays_latest_then_follows() {
        let cache: EntityCache<u32> = EntityCache::new();
        cache.replace_all(vec![Arc::new(1)]);

        let mut stream = cache.subscribe().into_stream();
        assert_eq!(stream.next().await.unwrap().len(), 1);

        cache.replace_all(vec![Arc::new(1), Arc::new(2)]);
        assert_eq!(stream.next().await.unwrap().len(), 2);
    }

    #[test]
    fn latest_tracks_cache_without_waiting() {
        let cache: EntityCache<u32> = EntityCache::new();
        let stream = cache.subscribe();

        cache.replace_all(vec![Arc::new(7)]);

        assert!(stream.current().is_empty());
        assert_eq!(*stream.latest()[0], 7);
    }
}
