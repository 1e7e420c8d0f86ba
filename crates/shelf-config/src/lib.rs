//! Shared configuration for shelf.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `shelf_core::StoreConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use shelf_core::{BackendKind, Fields, Movie, Product, StoreConfig, TlsVerification};

/// Keyring service name; entries are keyed `<profile>/api-key`.
pub const KEYRING_SERVICE: &str = "shelf";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found (available: {available})")]
    UnknownProfile { name: String, available: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use: the explicit choice, else `default_profile`,
    /// else `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.into(),
                available: self.profile_names().join(", "),
            })
    }

    /// Sorted profile names, or `["(none)"]` when there are none.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.profiles.keys().cloned().collect();
        names.sort();
        if names.is_empty() {
            names.push("(none)".into());
        }
        names
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile's records live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Hosted table service over HTTP.
    #[default]
    Rest,
    /// In-process demo catalog; nothing persists between runs.
    Memory,
}

/// A named backend profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// REST base URL (e.g. "https://xyz.supabase.co/rest/v1").
    pub url: Option<String>,

    #[serde(default)]
    pub backend: BackendChoice,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Table holding movies, if not "movies".
    pub movies_table: Option<String>,

    /// Table holding products, if not "products".
    pub products_table: Option<String>,

    /// Sort column for listings, overriding each resource's default.
    pub order_by: Option<String>,

    /// Ask the server to echo rows on PATCH.
    pub return_representation: Option<bool>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Seconds before a failure message is dismissed.
    pub error_ttl: Option<u64>,
}

impl Profile {
    /// Table-name overrides keyed by resource.
    pub fn table_overrides(&self) -> HashMap<String, String> {
        [
            (Movie::RESOURCE, &self.movies_table),
            (Product::RESOURCE, &self.products_table),
        ]
        .into_iter()
        .filter_map(|(resource, table)| table.clone().map(|t| (resource.to_owned(), t)))
        .collect()
    }

    /// TLS mode from `insecure` / `ca_cert`.
    pub fn tls(&self) -> TlsVerification {
        if self.insecure.unwrap_or(false) {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "shelf", "shelf").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shelf");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
///
/// Use for resolving a run's settings. A missing file yields defaults; a
/// file that fails to parse is an error.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, layered over defaults and under `SHELF_*` env vars
/// (`SHELF_PROFILES__DEMO__URL` sets `profiles.demo.url`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path)
        .merge(Env::prefixed("SHELF_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load only what is on disk at the canonical path, for read-modify-write.
///
/// Environment overrides are left out so `save_config` never persists them.
pub fn load_config_file() -> Result<Config, ConfigError> {
    load_config_file_from(&config_path())
}

pub fn load_config_file_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path).extract()?;
    Ok(config)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {e}")))
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's API key in the system keyring.
pub fn store_api_key(profile_name: &str, secret: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(secret)
        .map_err(|e| ConfigError::Keyring(format!("failed to store API key: {e}")))
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a REST base URL, naming the field it came from on failure.
pub fn parse_url(raw: &str, field: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

/// Build a `StoreConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_store_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<StoreConfig, ConfigError> {
    let backend = match profile.backend {
        BackendChoice::Memory => BackendKind::Memory,
        BackendChoice::Rest => {
            let raw = profile.url.as_deref().ok_or_else(|| ConfigError::Validation {
                field: "url".into(),
                reason: format!("profile '{profile_name}' has no url"),
            })?;
            BackendKind::Rest {
                url: parse_url(raw, "url")?,
                api_key: resolve_api_key(profile, profile_name)?,
            }
        }
    };

    Ok(StoreConfig {
        backend,
        tables: profile.table_overrides(),
        order_by: profile.order_by.clone(),
        return_representation: profile.return_representation.unwrap_or(false),
        tls: profile.tls(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
        error_ttl: profile.error_ttl.map(Duration::from_secs),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "cloud"

[defaults]
output = "json"

[profiles.cloud]
url = "https://xyz.supabase.co/rest/v1"
api_key = "anon-key"
api_key_env = "SHELF_TEST_UNSET_VARIABLE"
movies_table = "peliculas"
return_representation = true
timeout = 10
error_ttl = 5

[profiles.demo]
backend = "memory"
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("cloud"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.profiles["demo"].backend, BackendChoice::Memory);
        assert_eq!(cfg.profiles["cloud"].backend, BackendChoice::Rest);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.staging]\ntimeout = \"ten\"\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
        assert!(matches!(load_config_file_from(&path), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn file_only_load_skips_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("SHELF_PROFILES__DEMO__API_KEY", "env-only-secret");

            let path = jail.directory().join("config.toml");
            let layered = load_config_from(&path).unwrap();
            assert_eq!(layered.profiles["demo"].api_key.as_deref(), Some("env-only-secret"));

            let on_disk = load_config_file_from(&path).unwrap();
            assert_eq!(on_disk.profiles["demo"].api_key, None);
            assert_eq!(on_disk.profiles["cloud"].api_key.as_deref(), Some("anon-key"));
            Ok(())
        });
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "local".into(),
            Profile {
                url: Some("http://localhost:54321/rest/v1".into()),
                order_by: Some("nombre".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let local = loaded.profile("local").unwrap();
        assert_eq!(local.url.as_deref(), Some("http://localhost:54321/rest/v1"));
        assert_eq!(local.order_by.as_deref(), Some("nombre"));
    }

    #[test]
    fn unknown_profile_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        let err = cfg.profile("staging").unwrap_err();
        assert_eq!(
            err.to_string(),
            "profile 'staging' not found (available: cloud, demo)"
        );
    }

    #[test]
    fn active_profile_prefers_explicit_choice() {
        let cfg = Config::default();
        assert_eq!(cfg.active_profile_name(None), "default");
        assert_eq!(cfg.active_profile_name(Some("demo")), "demo");
    }

    #[test]
    fn rest_profile_translates_to_store_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        let store = profile_to_store_config(cfg.profile("cloud").unwrap(), "cloud").unwrap();

        let BackendKind::Rest { url, api_key } = &store.backend else {
            panic!("expected REST backend");
        };
        assert_eq!(url.as_str(), "https://xyz.supabase.co/rest/v1");
        assert_eq!(api_key.expose_secret(), "anon-key");
        assert_eq!(store.table_for::<Movie>(), "peliculas");
        assert_eq!(store.table_for::<Product>(), "products");
        assert!(store.return_representation);
        assert_eq!(store.timeout, Duration::from_secs(10));
        assert_eq!(store.error_ttl, Some(Duration::from_secs(5)));
        assert_eq!(store.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn memory_profile_needs_no_url_or_key() {
        let profile = Profile {
            backend: BackendChoice::Memory,
            ..Profile::default()
        };
        let store = profile_to_store_config(&profile, "demo").unwrap();
        assert!(matches!(store.backend, BackendKind::Memory));
    }

    #[test]
    fn rest_profile_without_url_is_invalid() {
        let err = profile_to_store_config(&Profile::default(), "empty").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let profile = Profile {
            insecure: Some(true),
            ca_cert: Some("/etc/ssl/local-ca.pem".into()),
            ..Profile::default()
        };
        assert_eq!(profile.tls(), TlsVerification::DangerAcceptInvalid);
    }
}
