// ── Core error types ──
//
// Errors surfaced by the sync pipeline. Every remote failure is tagged with
// the stage it happened in so the UI layer can tell a failed listing from a
// failed write without inspecting HTTP details.

use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// The remote call a pipeline operation was making when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    List,
    Get,
    Create,
    Replace,
    Delete,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Identity ─────────────────────────────────────────────────────
    #[error("Not authenticated: no user is signed in")]
    NotAuthenticated,

    // ── Remote ───────────────────────────────────────────────────────
    #[error("Remote {stage} failed: {source}")]
    RemoteOperationFailed {
        stage: Stage,
        #[source]
        source: staybook_api::Error,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{kind} not found: {id}")]
    EntityNotFound { kind: &'static str, id: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn remote(stage: Stage) -> impl FnOnce(staybook_api::Error) -> Self {
        move |source| Self::RemoteOperationFailed { stage, source }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// The failed remote stage, if this is a remote failure.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::RemoteOperationFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns `true` if the store rejected the session token.
    pub fn is_auth_rejected(&self) -> bool {
        match self {
            Self::NotAuthenticated => true,
            Self::RemoteOperationFailed { source, .. } => source.is_auth_rejected(),
            _ => false,
        }
    }
}

impl From<staybook_api::Error> for CoreError {
    /// Failures outside a pipeline stage (building the client) are config errors.
    fn from(err: staybook_api::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_displays_lowercase() {
        assert_eq!(Stage::Replace.to_string(), "replace");
        assert_eq!("delete".parse::<Stage>().ok(), Some(Stage::Delete));
    }

    #[test]
    fn remote_error_carries_stage() {
        let err = CoreError::remote(Stage::Create)(staybook_api::Error::Http {
            status: 500,
            body: "boom".into(),
        });
        assert_eq!(err.stage(), Some(Stage::Create));
        assert_eq!(
            err.to_string(),
            "Remote create failed: Document store returned HTTP 500: boom"
        );
    }
}
