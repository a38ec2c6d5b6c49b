//! CLI configuration: thin wrapper around `staybook_config`.
//!
//! Adds the flag-aware resolution that respects `GlobalOpts` overrides
//! (--database-url, --user-id, --token, --timeout, --insecure).

use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use staybook_core::{BackendConfig, SessionIdentity, TlsVerification, UserId};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use staybook_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Everything needed to build a `Backend`.
pub struct Resolved {
    pub profile_name: String,
    pub backend: BackendConfig,
    pub identity: SessionIdentity,
}

/// Build backend config and identity from the config file, the active
/// profile, and CLI overrides. Flags alone suffice when no profile exists.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, &cfg.defaults, global),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        }),
        None => resolve_flags_only(profile_name, &cfg.defaults, global),
    }
}

/// Translate a `Profile` + global flags. Flags take priority.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<Resolved, CliError> {
    let mut backend = staybook_config::profile_to_backend_config(profile, defaults)?;
    if let Some(ref url) = global.database_url {
        backend.database_url = parse_url(url)?;
    }
    apply_transport_flags(&mut backend, global);

    let user_id = match global.user_id {
        Some(ref id) => UserId::from(id.as_str()),
        None => staybook_config::resolve_user_id(profile, profile_name)?,
    };
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => staybook_config::resolve_token(profile, profile_name)?,
    };

    debug!(profile = profile_name, %user_id, "resolved profile");
    Ok(Resolved {
        profile_name: profile_name.to_owned(),
        backend,
        identity: SessionIdentity::signed_in(user_id, token),
    })
}

fn resolve_flags_only(
    profile_name: String,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<Resolved, CliError> {
    let url = global.database_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let mut backend = BackendConfig::new(parse_url(url)?);
    backend.timeout = Duration::from_secs(defaults.timeout);
    if defaults.insecure {
        backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    apply_transport_flags(&mut backend, global);

    let (Some(user_id), Some(token)) = (&global.user_id, &global.token) else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    Ok(Resolved {
        identity: SessionIdentity::signed_in(
            user_id.as_str(),
            SecretString::from(token.clone()),
        ),
        profile_name,
        backend,
    })
}

fn apply_transport_flags(backend: &mut BackendConfig, global: &GlobalOpts) {
    if global.insecure {
        backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        backend.timeout = Duration::from_secs(secs);
    }
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "database-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
