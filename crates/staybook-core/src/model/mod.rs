// ── Domain model ──
//
// Canonical types held in the caches. Field names on the wire follow the
// document store's existing records (camelCase, `userID` on places).

mod booking;
mod entity;
mod place;

pub use booking::{Booking, BookingData, BookingUpdate, GuestDetails, NewBooking};
pub use entity::{Entity, EntityId};
pub use place::{NewPlace, Place, PlaceData, PlaceLocation, PlaceUpdate};
