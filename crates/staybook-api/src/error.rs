use thiserror::Error;

/// Top-level error type for the `staybook-api` crate.
///
/// Covers every failure mode of the document store client: transport,
/// URL construction, non-success HTTP statuses, and undecodable bodies.
/// `staybook-core` wraps these together with the pipeline stage that failed.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for document paths: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup error (unreadable or malformed CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Store ───────────────────────────────────────────────────────
    /// The store answered with a non-2xx status.
    #[error("Document store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl From<reqwest::Error> for Error {
    /// Request URLs carry the auth token as a query parameter; drop it
    /// before the error can be displayed or logged.
    fn from(mut err: reqwest::Error) -> Self {
        if let Some(url) = err.url_mut() {
            url.set_query(None);
        }
        Self::Transport(err)
    }
}

impl Error {
    /// Returns `true` if the store rejected the auth token.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The sync pipeline never retries on its own; this is for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Http { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_rejection_covers_401_and_403() {
        let unauthorized = Error::Http { status: 401, body: String::new() };
        let forbidden = Error::Http { status: 403, body: String::new() };
        let missing = Error::Http { status: 404, body: String::new() };

        assert!(unauthorized.is_auth_rejected());
        assert!(forbidden.is_auth_rejected());
        assert!(!missing.is_auth_rejected());
        assert!(missing.is_not_found());
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(Error::Http { status: 503, body: String::new() }.is_transient());
        assert!(Error::Http { status: 429, body: String::new() }.is_transient());
        assert!(!Error::Http { status: 400, body: String::new() }.is_transient());
    }
}
