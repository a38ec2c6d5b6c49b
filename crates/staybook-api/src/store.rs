// Document store HTTP client
//
// Owns the shared `reqwest::Client` and the store's base URL. Typed
// per-collection clients are vended from here so every collection shares
// one connection pool and one transport configuration.

use url::Url;

use crate::collection::CollectionClient;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Entry point to a REST-over-JSON document store keyed by synthetic ids.
///
/// Documents live at `{base}/{collection}/{id}.json`; whole collections at
/// `{base}/{collection}.json`. Every request carries the caller's token as
/// the `auth` query parameter.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    http: reqwest::Client,
    base_url: Url,
}

impl DocumentStore {
    /// Create a store client from a `TransportConfig`.
    ///
    /// The `base_url` is the database root (e.g.
    /// `https://bookings-app.firebaseio.com`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a store client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The database root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A typed client for one collection of records.
    pub fn collection<R>(&self, name: impl Into<String>) -> CollectionClient<R> {
        CollectionClient::new(self.http.clone(), self.base_url.clone(), name.into())
    }
}
