//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use staybook_api::Error as StoreError;
use staybook_config::ConfigError;
use staybook_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the document store at {url}")]
    #[diagnostic(
        code(staybook::connection_failed),
        help(
            "Check the database URL and your network connection.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not set up the HTTP client: {message}")]
    #[diagnostic(
        code(staybook::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) for local emulators.")
    )]
    TlsError { message: String },

    #[error("Request timed out during {operation}")]
    #[diagnostic(
        code(staybook::timeout),
        help("Increase the timeout with --timeout or check store responsiveness.")
    )]
    Timeout { operation: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The document store rejected the auth token")]
    #[diagnostic(
        code(staybook::auth_failed),
        help(
            "The token may have expired.\n\
             Run: staybook config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(staybook::no_credentials),
        help(
            "Configure a user id and token with: staybook config init\n\
             Or pass --user-id and --token (STAYBOOK_USER_ID / STAYBOOK_TOKEN)."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(staybook::not_found),
        help("Run: staybook {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Store ────────────────────────────────────────────────────────
    #[error("Document store error during {operation} ({code}): {message}")]
    #[diagnostic(code(staybook::api_error))]
    ApiError {
        operation: String,
        code: String,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(staybook::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(staybook::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: staybook config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(staybook::no_config),
        help(
            "Create one with: staybook config init\n\
             Or pass --database-url, --user-id and --token.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(staybook::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(staybook::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON output: {0}")]
    #[diagnostic(code(staybook::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    #[diagnostic(code(staybook::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Name the profile in credential errors raised below the config layer,
    /// which does not know which profile was resolved.
    pub fn in_profile(self, name: &str) -> Self {
        match self {
            Self::NoCredentials { .. } => Self::NoCredentials {
                profile: name.to_owned(),
            },
            Self::AuthFailed { .. } => Self::AuthFailed {
                profile: name.to_owned(),
            },
            other => other,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } | ConfigError::NoUserId { profile } => {
                CliError::NoCredentials { profile }
            }
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => CliError::NoCredentials {
                profile: String::new(),
            },

            CoreError::RemoteOperationFailed { stage, source } => {
                from_remote(stage.to_string(), source)
            }

            CoreError::EntityNotFound { kind, id } => CliError::NotFound {
                resource_type: kind.into(),
                identifier: id,
                list_command: format!("{kind}s list"),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::TlsError { message },
        }
    }
}

fn from_remote(operation: String, source: StoreError) -> CliError {
    if source.is_auth_rejected() {
        return CliError::AuthFailed {
            profile: String::new(),
        };
    }

    match source {
        StoreError::Transport(e) if e.is_timeout() => CliError::Timeout { operation },
        StoreError::Transport(e) if e.is_connect() => CliError::ConnectionFailed {
            url: e.url().map_or_else(|| "(unknown)".into(), ToString::to_string),
            source: Box::new(e),
        },
        StoreError::Tls(message) => CliError::TlsError { message },
        StoreError::Http { status, body } => CliError::ApiError {
            operation,
            code: status.to_string(),
            message: body,
        },
        StoreError::Deserialization { message, .. } => CliError::ApiError {
            operation,
            code: "decode".into(),
            message,
        },
        other => CliError::ApiError {
            operation,
            code: "transport".into(),
            message: other.to_string(),
        },
    }
}
