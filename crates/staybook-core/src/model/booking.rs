// ── Booking domain types ──
//
// A booking carries a copy of its place's title and image taken when the
// booking is made. Later edits to the place are not reflected here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Place};
use crate::error::CoreError;
use crate::identity::UserId;

/// A reservation as held in the bookings cache.
pub type Booking = Entity<BookingData>;

/// Stored fields of a booking (everything except the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub place_id: String,
    /// The user who made the booking.
    pub user_id: UserId,
    pub place_title: String,
    pub place_image: String,
    pub first_name: String,
    pub last_name: String,
    pub guest_number: u32,
    pub booked_from: DateTime<Utc>,
    pub booked_till: DateTime<Utc>,
}

impl BookingData {
    pub fn guest_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Who is staying and when; the part of a booking the guest fills in.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub guest_number: u32,
    pub booked_from: DateTime<Utc>,
    pub booked_till: DateTime<Utc>,
}

/// Fields supplied when booking a place. The booker's user id is bound from
/// the signed-in user at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub place_id: String,
    pub place_title: String,
    pub place_image: String,
    pub first_name: String,
    pub last_name: String,
    pub guest_number: u32,
    pub booked_from: DateTime<Utc>,
    pub booked_till: DateTime<Utc>,
}

impl NewBooking {
    /// A booking for `place`, copying the place's current title and image.
    pub fn for_place(place: &Place, guest: GuestDetails) -> Result<Self, CoreError> {
        let place_id = match &place.id {
            EntityId::Remote(id) => id.clone(),
            EntityId::Provisional(_) => {
                return Err(CoreError::validation(
                    "cannot book a place that has not been stored yet",
                ));
            }
        };

        Ok(Self {
            place_id,
            place_title: place.data.title.clone(),
            place_image: place.data.image_url.clone(),
            first_name: guest.first_name,
            last_name: guest.last_name,
            guest_number: guest.guest_number,
            booked_from: guest.booked_from,
            booked_till: guest.booked_till,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.place_id.trim().is_empty() {
            return Err(CoreError::validation("booking must reference a place"));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(CoreError::validation("first and last name are required"));
        }
        if self.guest_number == 0 {
            return Err(CoreError::validation("a booking needs at least one guest"));
        }
        if self.booked_from > self.booked_till {
            return Err(CoreError::validation(
                "booked-from must not be after booked-till",
            ));
        }
        Ok(())
    }

    pub(crate) fn into_data(self, booker: UserId) -> BookingData {
        BookingData {
            place_id: self.place_id,
            user_id: booker,
            place_title: self.place_title,
            place_image: self.place_image,
            first_name: self.first_name,
            last_name: self.last_name,
            guest_number: self.guest_number,
            booked_from: self.booked_from,
            booked_till: self.booked_till,
        }
    }
}

/// Changed fields for a booking update. `None` keeps the current value.
///
/// The place reference and its copied title/image are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub guest_number: Option<u32>,
    pub booked_from: Option<DateTime<Utc>>,
    pub booked_till: Option<DateTime<Utc>>,
}

impl BookingUpdate {
    pub(crate) fn apply(self, current: &BookingData) -> BookingData {
        BookingData {
            place_id: current.place_id.clone(),
            user_id: current.user_id.clone(),
            place_title: current.place_title.clone(),
            place_image: current.place_image.clone(),
            first_name: self.first_name.unwrap_or_else(|| current.first_name.clone()),
            last_name: self.last_name.unwrap_or_else(|| current.last_name.clone()),
            guest_number: self.guest_number.unwrap_or(current.guest_number),
            booked_from: self.booked_from.unwrap_or(current.booked_from),
            booked_till: self.booked_till.unwrap_or(current.booked_till),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::PlaceData;

    fn place(id: EntityId) -> Place {
        Place::new(
            id,
            PlaceData {
                title: "Agakhan Palace".into(),
                description: "Not your average city trip!".into(),
                image_url: "https://img.example.com/3.jpg".into(),
                price: 99.99,
                available_from: Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap(),
                available_till: Utc.with_ymd_and_hms(2019, 12, 31, 0, 0, 0).unwrap(),
                user_id: UserId::from("abc"),
                location: None,
            },
        )
    }

    fn guest(guest_number: u32) -> GuestDetails {
        GuestDetails {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            guest_number,
            booked_from: Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap(),
            booked_till: Utc.with_ymd_and_hms(2019, 3, 5, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn for_place_copies_title_and_image() {
        let draft = NewBooking::for_place(&place(EntityId::from("-Np3")), guest(2)).unwrap();

        assert_eq!(draft.place_id, "-Np3");
        assert_eq!(draft.place_title, "Agakhan Palace");
        assert_eq!(draft.place_image, "https://img.example.com/3.jpg");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn for_place_rejects_provisional_place() {
        let result = NewBooking::for_place(&place(EntityId::provisional()), guest(2));
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    }

    #[test]
    fn zero_guests_is_invalid() {
        let draft = NewBooking::for_place(&place(EntityId::from("-Np3")), guest(0)).unwrap();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn update_never_touches_denormalized_place_fields() {
        let data = NewBooking::for_place(&place(EntityId::from("-Np3")), guest(2))
            .unwrap()
            .into_data(UserId::from("u1"));

        let next = BookingUpdate {
            guest_number: Some(4),
            ..BookingUpdate::default()
        }
        .apply(&data);

        assert_eq!(next.guest_number, 4);
        assert_eq!(next.place_title, data.place_title);
        assert_eq!(next.guest_name(), "Ada Lovelace");
    }
}
