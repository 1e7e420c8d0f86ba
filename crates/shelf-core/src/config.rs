// ── Runtime store configuration ──
//
// Describes *where* records live and how to reach them. Carries credential
// data and transport tuning, but never touches disk: `shelf-config` (or an
// embedding application) builds a `StoreConfig` and hands it in.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use shelf_api::{TlsMode, TransportConfig};
use url::Url;

use crate::model::Fields;

/// Which data source backs the store.
#[derive(Debug, Clone)]
pub enum BackendKind {
    /// Hosted table service at `url` (e.g. `https://xyz.supabase.co/rest/v1`).
    Rest { url: Url, api_key: SecretString },
    /// In-process collection seeded with the demo catalog.
    Memory,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed local stacks).
    DangerAcceptInvalid,
}

/// Configuration for one store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Table-name overrides keyed by the field set's default resource name.
    pub tables: HashMap<String, String>,
    /// Sort column for `list()`, overriding each field set's default.
    pub order_by: Option<String>,
    /// Ask the server to echo rows on PATCH instead of re-reading them.
    pub return_representation: bool,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Clear a failure message after this long. `None` keeps it until the
    /// next operation.
    pub error_ttl: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            tables: HashMap::new(),
            order_by: None,
            return_representation: false,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            error_ttl: None,
        }
    }
}

impl StoreConfig {
    /// A REST config with every other setting at its default.
    pub fn rest(url: Url, api_key: SecretString) -> Self {
        Self {
            backend: BackendKind::Rest { url, api_key },
            ..Self::default()
        }
    }

    /// Table that holds `F` records.
    pub fn table_for<F: Fields>(&self) -> &str {
        self.tables
            .get(F::RESOURCE)
            .map_or(F::RESOURCE, String::as_str)
    }

    /// Column `F` lists are sorted by.
    pub fn order_for<F: Fields>(&self) -> &str {
        self.order_by.as_deref().unwrap_or(F::DEFAULT_ORDER)
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
