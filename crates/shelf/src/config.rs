//! CLI configuration: thin wrapper around `shelf_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--url,
//! --api-key, --memory, --timeout, --insecure).

use std::time::Duration;

use secrecy::SecretString;

use shelf_config::{BackendChoice, Config, Defaults, Profile};
use shelf_core::{BackendKind, StoreConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the `StoreConfig` for a resource command from the config file,
/// the active profile, and CLI overrides.
pub fn build_store_config(cfg: &Config, global: &GlobalOpts) -> Result<StoreConfig, CliError> {
    if global.memory {
        return Ok(StoreConfig {
            timeout: resolve_timeout(global, None, &cfg.defaults),
            ..StoreConfig::default()
        });
    }

    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly named profile must exist
    if global.profile.is_some() {
        cfg.profile(&profile_name)?;
    }

    // No profile found -- build from CLI flags / env vars alone
    let raw = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: shelf_config::config_path().display().to_string(),
    })?;
    let url = shelf_config::parse_url(raw, "url")?;
    let api_key = global
        .api_key
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    Ok(StoreConfig {
        tls: flag_tls(global).unwrap_or_default(),
        timeout: resolve_timeout(global, None, &cfg.defaults),
        ..StoreConfig::rest(url, api_key)
    })
}

/// Translate a `Profile` + global flags into a `StoreConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<StoreConfig, CliError> {
    let backend = match profile.backend {
        BackendChoice::Memory => BackendKind::Memory,
        BackendChoice::Rest => {
            let raw = global
                .url
                .as_deref()
                .or(profile.url.as_deref())
                .ok_or_else(|| CliError::Validation {
                    field: "url".into(),
                    reason: format!(
                        "profile '{profile_name}' has no url; set one with: shelf config set url <URL>"
                    ),
                })?;
            BackendKind::Rest {
                url: shelf_config::parse_url(raw, "url")?,
                api_key: resolve_api_key_with_flag(profile, profile_name, global)?,
            }
        }
    };

    Ok(StoreConfig {
        backend,
        tables: profile.table_overrides(),
        order_by: profile.order_by.clone(),
        return_representation: profile.return_representation.unwrap_or(false),
        tls: flag_tls(global).unwrap_or_else(|| profile.tls()),
        timeout: resolve_timeout(global, profile.timeout, defaults),
        error_ttl: profile.error_ttl.map(Duration::from_secs),
    })
}

/// Timeout precedence: flag > profile > `[defaults]`.
fn resolve_timeout(global: &GlobalOpts, profile: Option<u64>, defaults: &Defaults) -> Duration {
    Duration::from_secs(global.timeout.or(profile).unwrap_or(defaults.timeout))
}

fn flag_tls(global: &GlobalOpts) -> Option<TlsVerification> {
    global.insecure.then_some(TlsVerification::DangerAcceptInvalid)
}

/// Resolve API key with CLI flag override, then fall through to shared resolution.
fn resolve_api_key_with_flag(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref key) = global.api_key {
        return Ok(SecretString::from(key.clone()));
    }
    Ok(shelf_config::resolve_api_key(profile, profile_name)?)
}
