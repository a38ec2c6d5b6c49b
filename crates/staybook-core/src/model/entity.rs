// ── Core identity types ──
//
// `EntityId` and `Entity<T>` wrap every record held in a cache. The id is
// either the key the document store assigned or a client-side placeholder
// that only exists while a create is in flight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── EntityId ────────────────────────────────────────────────────────

/// Identifier of a cached entity.
///
/// `Remote` ids come from the store and never change. `Provisional` ids
/// are random v4 UUIDs minted for an optimistic entity before the store
/// answers; they are replaced before the entity is published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Remote(String),
    Provisional(Uuid),
}

impl EntityId {
    /// A fresh placeholder id, unique within the session.
    pub fn provisional() -> Self {
        Self::Provisional(Uuid::new_v4())
    }

    /// The store key, if the id has been assigned by the store.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Self::Remote(s) => Some(s),
            Self::Provisional(_) => None,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(s) => write!(f, "{s}"),
            Self::Provisional(u) => write!(f, "provisional:{u}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Parsed ids are always treated as store keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Remote(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Remote(s.to_owned())
    }
}

// ── Entity ──────────────────────────────────────────────────────────

/// One cached record: its id plus the kind-specific fields.
///
/// Entities are immutable values. Every change builds a new `Entity`
/// (see [`with_id`](Self::with_id) and [`with_data`](Self::with_data)); the
/// previous value stays valid for anyone still holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity<T> {
    pub id: EntityId,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Entity<T> {
    pub fn new(id: EntityId, data: T) -> Self {
        Self { id, data }
    }

    /// A new entity with the same fields and a different id.
    pub fn with_id(&self, id: EntityId) -> Self
    where
        T: Clone,
    {
        Self {
            id,
            data: self.data.clone(),
        }
    }

    /// A new entity with the same id and replacement fields.
    pub fn with_data(&self, data: T) -> Self {
        Self {
            id: self.id.clone(),
            data,
        }
    }
}
