// ── Runtime backend configuration ──
//
// These types describe *where* the document store lives and how to reach
// it. They never touch disk; the CLI (via staybook-config) builds a
// `BackendConfig` and hands it in.

use std::time::Duration;

use staybook_api::transport::{TlsMode, TransportConfig};
use url::Url;

/// Default collection holding offered places.
pub const PLACES_COLLECTION: &str = "offered-places";
/// Default collection holding bookings.
pub const BOOKINGS_COLLECTION: &str = "my-bookings";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local emulators).
    DangerAcceptInvalid,
}

/// Configuration for one document store.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Database root URL (e.g., `https://bookings-app.firebaseio.com`).
    pub database_url: Url,
    /// Collection name for places.
    pub places_collection: String,
    /// Collection name for bookings.
    pub bookings_collection: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. The pipeline imposes none of its own.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Config for `database_url` with default collections and transport.
    pub fn new(database_url: Url) -> Self {
        Self {
            database_url,
            places_collection: PLACES_COLLECTION.into(),
            bookings_collection: BOOKINGS_COLLECTION.into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
