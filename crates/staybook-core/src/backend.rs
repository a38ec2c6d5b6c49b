// ── Backend facade ──
//
// Wires one identity gate and one document store into the places and
// bookings pipelines, and hosts the operations that span both kinds.

use std::sync::Arc;

use staybook_api::DocumentStore;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::CoreError;
use crate::identity::{IdentityGate, SessionIdentity};
use crate::model::{Booking, EntityId, GuestDetails, NewBooking, Place};
use crate::sync::{Bookings, Places, SyncPipeline};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<BackendInner>`. Owns the identity gate and
/// one [`SyncPipeline`] per entity kind; clones share the same caches.
pub struct Backend<G: IdentityGate = SessionIdentity> {
    inner: Arc<BackendInner<G>>,
}

struct BackendInner<G: IdentityGate> {
    config: BackendConfig,
    identity: Arc<G>,
    places: SyncPipeline<Places, G>,
    bookings: SyncPipeline<Bookings, G>,
}

impl<G: IdentityGate> Clone for Backend<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: IdentityGate> Backend<G> {
    /// Build a backend from configuration. Nothing is fetched until an
    /// operation is called.
    pub fn new(config: BackendConfig, identity: G) -> Result<Self, CoreError> {
        let store = DocumentStore::new(config.database_url.clone(), &config.transport())?;
        Ok(Self::with_store(config, store, identity))
    }

    /// Build a backend over an existing store client.
    pub fn with_store(config: BackendConfig, store: DocumentStore, identity: G) -> Self {
        debug!(
            url = %store.base_url(),
            places = %config.places_collection,
            bookings = %config.bookings_collection,
            "backend configured"
        );

        let identity = Arc::new(identity);
        let places = SyncPipeline::new(
            Arc::clone(&identity),
            store.collection(config.places_collection.as_str()),
        );
        let bookings = SyncPipeline::new(
            Arc::clone(&identity),
            store.collection(config.bookings_collection.as_str()),
        );

        Self {
            inner: Arc::new(BackendInner {
                config,
                identity,
                places,
                bookings,
            }),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    pub fn identity(&self) -> &G {
        &self.inner.identity
    }

    pub fn places(&self) -> &SyncPipeline<Places, G> {
        &self.inner.places
    }

    pub fn bookings(&self) -> &SyncPipeline<Bookings, G> {
        &self.inner.bookings
    }

    // ── Cross-kind operations ────────────────────────────────────────

    /// Book `place_id` for the signed-in user.
    ///
    /// The place is taken from the places cache when present, otherwise
    /// read from the store. Its title and image are copied into the
    /// booking as they are at this moment. Users cannot book their own
    /// offers.
    pub async fn book(
        &self,
        place_id: &EntityId,
        guest: GuestDetails,
    ) -> Result<Arc<Booking>, CoreError> {
        let user_id = self.identity().user_id().await?;
        let place = match self.places().find(place_id) {
            Some(place) => place,
            None => self.places().fetch_one(place_id).await?,
        };
        if place.data.is_owned_by(&user_id) {
            return Err(CoreError::validation(format!(
                "place {place_id} is your own offer and cannot be booked"
            )));
        }

        let draft = NewBooking::for_place(&place, guest)?;
        self.bookings().create(draft).await
    }

    /// Cached places not offered by the signed-in user, in cache order.
    pub async fn bookable_places(&self) -> Result<Vec<Arc<Place>>, CoreError> {
        let user_id = self.identity().user_id().await?;
        Ok(self
            .places()
            .snapshot()
            .iter()
            .filter(|place| !place.data.is_owned_by(&user_id))
            .cloned()
            .collect())
    }
}
