// staybook-core: Reactive entity caches kept in sync with the document store.
//
// Each entity kind gets a `SyncPipeline` that resolves the signed-in user,
// talks to its remote collection, and publishes the result to an
// `EntityCache`. Consumers observe caches through `EntityStream`s and call
// the pipeline operations; `Backend` wires both kinds together.

pub mod backend;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod store;
pub mod stream;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{BOOKINGS_COLLECTION, BackendConfig, PLACES_COLLECTION, TlsVerification};
pub use error::{CoreError, Stage};
pub use identity::{IdentityGate, Session, SessionIdentity, UserId};
pub use store::{EntityCache, Snapshot};
pub use stream::{EntityStream, EntityWatchStream};
pub use sync::{Bookings, EntityKind, KindSnapshot, Places, SyncPipeline};

pub use model::{
    Booking, BookingData, BookingUpdate, Entity, EntityId, GuestDetails, NewBooking, NewPlace,
    Place, PlaceData, PlaceLocation, PlaceUpdate,
};
