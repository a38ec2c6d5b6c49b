// Per-collection CRUD client
//
// Wraps the shared `reqwest::Client` with collection-scoped URL
// construction and response decoding. Records are sent and received as
// bare JSON bodies; the store's synthetic key is never part of the body.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::filter::EqualityFilter;

/// Body returned by the store for a `POST` to a collection.
#[derive(Debug, Deserialize)]
struct CreatedKey {
    name: String,
}

/// Typed client for one collection in the document store.
///
/// `R` is the stored record shape (every field except the id).
pub struct CollectionClient<R> {
    http: reqwest::Client,
    base_url: Url,
    name: String,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for CollectionClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for CollectionClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionClient")
            .field("base_url", &self.base_url.as_str())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<R> CollectionClient<R> {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, name: String) -> Self {
        Self {
            http,
            base_url,
            name,
            _record: PhantomData,
        }
    }

    /// The collection name (first path segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/{collection}.json?auth={token}`
    fn collection_url(&self, token: &str) -> Result<Url, Error> {
        let file = format!("{}.json", self.name);
        self.build_url(&[file.as_str()], token)
    }

    /// `{base}/{collection}/{id}.json?auth={token}`
    fn document_url(&self, id: &str, token: &str) -> Result<Url, Error> {
        let file = format!("{id}.json");
        self.build_url(&[self.name.as_str(), file.as_str()], token)
    }

    fn build_url(&self, segments: &[&str], token: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("auth", token);
        Ok(url)
    }
}

impl<R> CollectionClient<R>
where
    R: Serialize + DeserializeOwned,
{
    /// List every record in the collection, optionally filtered server-side.
    ///
    /// Returns `(id, record)` pairs in the order the store sent them. An
    /// empty or `null` body means no matches.
    pub async fn list(
        &self,
        token: &str,
        filter: Option<&EqualityFilter>,
    ) -> Result<Vec<(String, R)>, Error> {
        let mut url = self.collection_url(token)?;
        if let Some(filter) = filter {
            let mut query = url.query_pairs_mut();
            for (key, value) in filter.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        debug!(collection = %self.name, filtered = filter.is_some(), "GET collection");

        let resp = self.http.get(url).send().await?;
        let body = read_body(resp).await?;
        let records: Option<IndexMap<String, R>> = decode_optional(&body)?;

        Ok(records.map(|m| m.into_iter().collect()).unwrap_or_default())
    }

    /// Fetch a single record. A `null` body means the id does not exist.
    pub async fn get(&self, token: &str, id: &str) -> Result<Option<R>, Error> {
        let url = self.document_url(id, token)?;
        debug!(collection = %self.name, id, "GET document");

        let resp = self.http.get(url).send().await?;
        let body = read_body(resp).await?;
        decode_optional(&body)
    }

    /// Store a new record and return the id the store assigned to it.
    pub async fn create(&self, token: &str, record: &R) -> Result<String, Error> {
        let url = self.collection_url(token)?;
        debug!(collection = %self.name, "POST document");

        let resp = self.http.post(url).json(record).send().await?;
        let body = read_body(resp).await?;
        let created: CreatedKey = decode(&body)?;

        debug!(collection = %self.name, id = %created.name, "document created");
        Ok(created.name)
    }

    /// Overwrite the record stored at `id`.
    pub async fn replace(&self, token: &str, id: &str, record: &R) -> Result<(), Error> {
        let url = self.document_url(id, token)?;
        debug!(collection = %self.name, id, "PUT document");

        let resp = self.http.put(url).json(record).send().await?;
        read_body(resp).await?;
        Ok(())
    }

    /// Remove the record stored at `id`.
    pub async fn delete(&self, token: &str, id: &str) -> Result<(), Error> {
        let url = self.document_url(id, token)?;
        debug!(collection = %self.name, id, "DELETE document");

        let resp = self.http.delete(url).send().await?;
        read_body(resp).await?;
        Ok(())
    }
}

// ── Response helpers ─────────────────────────────────────────────────

/// Read the body, turning any non-2xx status into `Error::Http`.
async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Like [`decode`], but an empty body counts as `null`.
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    decode(body)
}
