// ── Reactive entity cache ──
//
// Holds the latest snapshot of one entity kind and broadcasts it through a
// `watch` channel. Snapshots are immutable; every publish swaps in a whole
// new `Arc`, so readers never see a half-applied change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::EntityStream;

/// An ordered, shared, immutable sequence of entities.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// Replay-latest cache for a single entity kind.
///
/// New subscribers immediately see the current snapshot, then every later
/// one. The version counter is bumped exactly once per publish.
pub struct EntityCache<T: Send + Sync + 'static> {
    /// Current snapshot, replaced wholesale on every publish.
    snapshot: watch::Sender<Snapshot<T>>,

    /// Version counter, bumped on every publish.
    version: watch::Sender<u64>,
}

impl<T: Send + Sync + 'static> EntityCache<T> {
    /// An empty cache at version 0.
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);

        Self { snapshot, version }
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to this cache, starting from the current snapshot.
    pub fn subscribe(&self) -> EntityStream<T> {
        EntityStream::new(self.snapshot.subscribe())
    }

    /// Replace the entire contents and broadcast the result.
    pub fn replace_all(&self, entities: Vec<Arc<T>>) -> Snapshot<T> {
        let next = Arc::new(entities);
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::clone(&next));
        self.version.send_modify(|v| *v += 1);
        next
    }

    /// Number of publishes since creation.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }
}

impl<T: Send + Sync + 'static> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
