// ── Reactive data store ──
//
// Per-kind snapshot caches with push-based change notification.

mod cache;

pub use cache::{EntityCache, Snapshot};
