// ── Sync pipelines ──
//
// One generic pipeline, instantiated once per entity kind.

mod kind;
mod pipeline;

pub use kind::{Bookings, EntityKind, Places};
pub use pipeline::{KindSnapshot, SyncPipeline};
