// ── Entity kinds ──
//
// Everything that differs between the places and bookings pipelines: the
// record shape, how drafts become records, how patches apply, and whether
// listings are filtered by owner on the server.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use staybook_api::EqualityFilter;

use crate::error::CoreError;
use crate::identity::UserId;
use crate::model::{BookingData, BookingUpdate, NewBooking, NewPlace, PlaceData, PlaceUpdate};

/// One kind of entity kept in sync with a remote collection.
pub trait EntityKind: Send + Sync + 'static {
    /// Stored fields, sent to and received from the store as-is.
    type Data: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Fields supplied on create.
    type Draft: Send + 'static;
    /// Changed fields supplied on update.
    type Patch: Send + 'static;

    /// Human-readable kind name, used in errors and logs.
    const NAME: &'static str;

    /// Server-side filter applied when listing for `user_id`, if any.
    fn list_filter(user_id: &UserId) -> Option<EqualityFilter>;

    fn validate(draft: &Self::Draft) -> Result<(), CoreError>;

    /// Build the stored record for a new entity owned by `owner`.
    fn provision(draft: Self::Draft, owner: UserId) -> Self::Data;

    /// Build the full replacement record from `current` plus `patch`.
    fn apply(patch: Self::Patch, current: &Self::Data) -> Self::Data;
}

/// Offered places. Listed unfiltered: everyone sees every offer.
#[derive(Debug, Clone, Copy)]
pub struct Places;

impl EntityKind for Places {
    type Data = PlaceData;
    type Draft = NewPlace;
    type Patch = PlaceUpdate;

    const NAME: &'static str = "place";

    fn list_filter(_user_id: &UserId) -> Option<EqualityFilter> {
        None
    }

    fn validate(draft: &NewPlace) -> Result<(), CoreError> {
        draft.validate()
    }

    fn provision(draft: NewPlace, owner: UserId) -> PlaceData {
        draft.into_data(owner)
    }

    fn apply(patch: PlaceUpdate, current: &PlaceData) -> PlaceData {
        patch.apply(current)
    }
}

/// Bookings. Listed filtered by the booking user's id on the server.
#[derive(Debug, Clone, Copy)]
pub struct Bookings;

/// Stored field the bookings collection is filtered on.
const BOOKING_OWNER_FIELD: &str = "userId";

impl EntityKind for Bookings {
    type Data = BookingData;
    type Draft = NewBooking;
    type Patch = BookingUpdate;

    const NAME: &'static str = "booking";

    fn list_filter(user_id: &UserId) -> Option<EqualityFilter> {
        Some(EqualityFilter::new(BOOKING_OWNER_FIELD, user_id.as_str()))
    }

    fn validate(draft: &NewBooking) -> Result<(), CoreError> {
        draft.validate()
    }

    fn provision(draft: NewBooking, owner: UserId) -> BookingData {
        draft.into_data(owner)
    }

    fn apply(patch: BookingUpdate, current: &BookingData) -> BookingData {
        patch.apply(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_are_not_filtered() {
        assert!(Places::list_filter(&UserId::from("u1")).is_none());
    }

    #[test]
    fn bookings_are_filtered_by_owner() {
        let filter = Bookings::list_filter(&UserId::from("u1")).expect("bookings filter");
        assert_eq!(filter.field(), "userId");
        assert_eq!(filter.value(), "u1");
    }
}
