// ── Place domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::error::CoreError;
use crate::identity::UserId;

/// An offered place as held in the places cache.
pub type Place = Entity<PlaceData>;

/// Where a place is, as picked on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub static_map_image_url: Option<String>,
}

/// Stored fields of an offered place (everything except the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceData {
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Price per night.
    pub price: f64,
    pub available_from: DateTime<Utc>,
    pub available_till: DateTime<Utc>,
    /// Owner of the listing.
    #[serde(rename = "userID")]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PlaceLocation>,
}

impl PlaceData {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}

/// Fields supplied when offering a new place. The owner is bound from the
/// signed-in user at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub available_from: DateTime<Utc>,
    pub available_till: DateTime<Utc>,
    pub location: Option<PlaceLocation>,
}

impl NewPlace {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("place title must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CoreError::validation(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        if self.available_from > self.available_till {
            return Err(CoreError::validation(
                "available-from must not be after available-till",
            ));
        }
        Ok(())
    }

    pub(crate) fn into_data(self, owner: UserId) -> PlaceData {
        PlaceData {
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            available_from: self.available_from,
            available_till: self.available_till,
            user_id: owner,
            location: self.location,
        }
    }
}

/// Changed fields for a place update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_till: Option<DateTime<Utc>>,
    pub location: Option<PlaceLocation>,
}

impl PlaceUpdate {
    /// Build the full replacement record from `current` plus these changes.
    pub(crate) fn apply(self, current: &PlaceData) -> PlaceData {
        PlaceData {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            image_url: self.image_url.unwrap_or_else(|| current.image_url.clone()),
            price: self.price.unwrap_or(current.price),
            available_from: self.available_from.unwrap_or(current.available_from),
            available_till: self.available_till.unwrap_or(current.available_till),
            user_id: current.user_id.clone(),
            location: self.location.or_else(|| current.location.clone()),
        }
    }
}
