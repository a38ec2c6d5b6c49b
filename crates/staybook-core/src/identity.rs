// ── Identity gate ──
//
// One-shot access to the signed-in user and their session token. The sign-in
// flow itself lives outside this crate; whatever owns it feeds a
// `SessionIdentity` (or any other `IdentityGate`) and the sync pipelines read
// from it once per operation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;

// ── UserId ──────────────────────────────────────────────────────────

/// Identifier of a signed-in user, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── IdentityGate ────────────────────────────────────────────────────

/// Source of the current user id and auth token.
///
/// Each call resolves once with the value current *at the moment of the
/// call*; it is not a subscription. Both reads fail with
/// [`CoreError::NotAuthenticated`] when nobody is signed in.
pub trait IdentityGate: Send + Sync + 'static {
    fn user_id(&self) -> impl Future<Output = Result<UserId, CoreError>> + Send;

    fn token(&self) -> impl Future<Output = Result<SecretString, CoreError>> + Send;
}

impl<G: IdentityGate> IdentityGate for Arc<G> {
    fn user_id(&self) -> impl Future<Output = Result<UserId, CoreError>> + Send {
        (**self).user_id()
    }

    fn token(&self) -> impl Future<Output = Result<SecretString, CoreError>> + Send {
        (**self).token()
    }
}

// ── SessionIdentity ─────────────────────────────────────────────────

/// A signed-in user together with their session token.
pub struct Session {
    pub user_id: UserId,
    pub token: SecretString,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// In-process identity holder backed by a `watch` cell.
///
/// The latest session is always readable without waiting; consumers that
/// care about sign-in/sign-out transitions can [`subscribe`](Self::subscribe).
#[derive(Debug)]
pub struct SessionIdentity {
    session: watch::Sender<Option<Session>>,
}

impl SessionIdentity {
    /// An identity with nobody signed in.
    pub fn signed_out() -> Self {
        let (session, _) = watch::channel(None);
        Self { session }
    }

    /// An identity already holding `user_id` / `token`.
    pub fn signed_in(user_id: impl Into<UserId>, token: SecretString) -> Self {
        let identity = Self::signed_out();
        identity.sign_in(user_id, token);
        identity
    }

    pub fn sign_in(&self, user_id: impl Into<UserId>, token: SecretString) {
        let user_id = user_id.into();
        debug!(%user_id, "session started");
        self.session.send_replace(Some(Session { user_id, token }));
    }

    pub fn sign_out(&self) {
        if self.session.send_replace(None).is_some() {
            debug!("session ended");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Watch session transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl IdentityGate for SessionIdentity {
    async fn user_id(&self) -> Result<UserId, CoreError> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.user_id.clone())
            .ok_or(CoreError::NotAuthenticated)
    }

    async fn token(&self) -> Result<SecretString, CoreError> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| SecretString::from(s.token.expose_secret().to_owned()))
            .ok_or(CoreError::NotAuthenticated)
    }
}
