// ── Sync pipeline ──
//
// identity → token → remote call → cache publish, one stage at a time.
// Operations are not serialized against each other: each reads the snapshot
// it needs, builds the next one, and publishes it whole.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use staybook_api::CollectionClient;
use tracing::{debug, info, warn};

use super::kind::EntityKind;
use crate::error::{CoreError, Stage};
use crate::identity::{IdentityGate, UserId};
use crate::model::{Entity, EntityId};
use crate::store::{EntityCache, Snapshot};
use crate::stream::EntityStream;

/// Snapshot of one kind's cache.
pub type KindSnapshot<K> = Snapshot<Entity<<K as EntityKind>::Data>>;

/// Identity resolved once at the start of an operation.
struct Credentials {
    user_id: UserId,
    token: SecretString,
}

impl Credentials {
    fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Keeps one entity cache in step with one remote collection.
///
/// Every operation resolves the user id and then the token exactly once,
/// performs at most one remote write, and publishes the cache at most once
/// (the empty-cache path of [`update`](Self::update) publishes its re-fetch
/// first). Failures propagate unchanged and leave the cache as it was.
pub struct SyncPipeline<K: EntityKind, G> {
    identity: Arc<G>,
    remote: CollectionClient<K::Data>,
    cache: EntityCache<Entity<K::Data>>,
}

impl<K: EntityKind, G: IdentityGate> SyncPipeline<K, G> {
    pub fn new(identity: Arc<G>, remote: CollectionClient<K::Data>) -> Self {
        Self {
            identity,
            remote,
            cache: EntityCache::new(),
        }
    }

    // ── Cache access ─────────────────────────────────────────────────

    /// Subscribe to the cache; the current snapshot is available at once.
    pub fn observe(&self) -> EntityStream<Entity<K::Data>> {
        self.cache.subscribe()
    }

    pub fn snapshot(&self) -> KindSnapshot<K> {
        self.cache.snapshot()
    }

    pub fn cache(&self) -> &EntityCache<Entity<K::Data>> {
        &self.cache
    }

    /// Look up a cached entity without touching the network.
    pub fn find(&self, id: &EntityId) -> Option<Arc<Entity<K::Data>>> {
        self.cache.snapshot().iter().find(|e| e.id == *id).cloned()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Replace the cache with the store's current contents.
    pub async fn fetch_all(&self) -> Result<KindSnapshot<K>, CoreError> {
        let creds = self.authorize().await?;
        self.list_into_cache(&creds).await
    }

    /// Read one entity straight from the store. The cache is not touched.
    pub async fn fetch_one(&self, id: &EntityId) -> Result<Arc<Entity<K::Data>>, CoreError> {
        let creds = self.authorize().await?;
        let key = remote_key::<K>(id)?;

        let data = self
            .remote
            .get(creds.token(), key)
            .await
            .map_err(CoreError::remote(Stage::Get))?
            .ok_or_else(|| not_found::<K>(id))?;

        Ok(Arc::new(Entity::new(id.clone(), data)))
    }

    /// Store a new entity owned by the signed-in user and append it to the
    /// cache under the id the store assigned.
    pub async fn create(&self, draft: K::Draft) -> Result<Arc<Entity<K::Data>>, CoreError> {
        K::validate(&draft)?;
        let creds = self.authorize().await?;

        let provisional = Entity::new(EntityId::provisional(), K::provision(draft, creds.user_id));
        debug!(kind = K::NAME, id = %provisional.id, "sending new entity");

        let key = self
            .remote
            .create(creds.token.expose_secret(), &provisional.data)
            .await
            .map_err(CoreError::remote(Stage::Create))?;
        let stored = Arc::new(provisional.with_id(EntityId::Remote(key)));

        let current = self.cache.snapshot();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Arc::clone(&stored));
        self.cache.replace_all(next);

        info!(kind = K::NAME, id = %stored.id, "entity created");
        Ok(stored)
    }

    /// Apply `patch` to the cached entity `id`, write the full record, and
    /// replace that one element in the cache.
    ///
    /// An empty cache is re-fetched first rather than treated as "not
    /// found". If that re-fetch fails the error propagates and the cache
    /// stays empty.
    pub async fn update(
        &self,
        id: &EntityId,
        patch: K::Patch,
    ) -> Result<Arc<Entity<K::Data>>, CoreError> {
        let creds = self.authorize().await?;

        let mut snapshot = self.cache.snapshot();
        if snapshot.is_empty() {
            snapshot = self.self_heal(&creds).await?;
        }

        let (index, current) = snapshot
            .iter()
            .enumerate()
            .find(|(_, e)| e.id == *id)
            .ok_or_else(|| not_found::<K>(id))?;
        let key = remote_key::<K>(id)?;
        let updated = Arc::new(current.with_data(K::apply(patch, &current.data)));

        self.remote
            .replace(creds.token(), key, &updated.data)
            .await
            .map_err(CoreError::remote(Stage::Replace))?;

        let next = snapshot
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == index {
                    Arc::clone(&updated)
                } else {
                    Arc::clone(e)
                }
            })
            .collect();
        self.cache.replace_all(next);

        info!(kind = K::NAME, %id, "entity updated");
        Ok(updated)
    }

    /// Delete `id` in the store, then drop it from the cache.
    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let creds = self.authorize().await?;
        let key = remote_key::<K>(id)?;

        self.remote
            .delete(creds.token(), key)
            .await
            .map_err(CoreError::remote(Stage::Delete))?;

        let current = self.cache.snapshot();
        let next = current.iter().filter(|e| e.id != *id).cloned().collect();
        self.cache.replace_all(next);

        info!(kind = K::NAME, %id, "entity deleted");
        Ok(())
    }

    // ── Stages ───────────────────────────────────────────────────────

    /// Resolve the user id, then the token, each exactly once.
    async fn authorize(&self) -> Result<Credentials, CoreError> {
        let user_id = self.identity.user_id().await?;
        let token = self.identity.token().await?;
        Ok(Credentials { user_id, token })
    }

    async fn list_into_cache(&self, creds: &Credentials) -> Result<KindSnapshot<K>, CoreError> {
        let filter = K::list_filter(&creds.user_id);
        let rows = self
            .remote
            .list(creds.token(), filter.as_ref())
            .await
            .map_err(CoreError::remote(Stage::List))?;

        let entities = rows
            .into_iter()
            .map(|(key, data)| Arc::new(Entity::new(EntityId::Remote(key), data)))
            .collect();
        let snapshot = self.cache.replace_all(entities);

        debug!(kind = K::NAME, count = snapshot.len(), "cache refreshed");
        Ok(snapshot)
    }

    /// Re-fetch with already resolved credentials when an update finds the
    /// cache empty.
    async fn self_heal(&self, creds: &Credentials) -> Result<KindSnapshot<K>, CoreError> {
        warn!(kind = K::NAME, "cache empty before update, re-fetching");
        self.list_into_cache(creds).await
    }
}

fn not_found<K: EntityKind>(id: &EntityId) -> CoreError {
    CoreError::EntityNotFound {
        kind: K::NAME,
        id: id.to_string(),
    }
}

/// Provisional ids never exist in the store.
fn remote_key<K: EntityKind>(id: &EntityId) -> Result<&str, CoreError> {
    id.as_remote().ok_or_else(|| not_found::<K>(id))
}
