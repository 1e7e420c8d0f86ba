//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use shelf_config::ConfigError;
use shelf_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(shelf::connection_failed),
        help(
            "Check that the server is running and the URL includes the REST path\n\
             (e.g. https://xyz.supabase.co/rest/v1).\n\
             Try the demo catalog instead: shelf --memory movies list"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(shelf::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed (HTTP {status})")]
    #[diagnostic(
        code(shelf::auth_failed),
        help(
            "The server refused the API key: {message}\n\
             Store a new key with: shelf config set-key"
        )
    )]
    AuthFailed { status: u16, message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(shelf::no_credentials),
        help(
            "Configure one with: shelf config init\n\
             Or pass --api-key / set SHELF_API_KEY."
        )
    )]
    NoCredentials { profile: String },

    // ── Records ──────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shelf::not_found),
        help("Run: shelf {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(shelf::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Server rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(shelf::api_error))]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(shelf::invalid_response),
        help("Check that the table's columns match the record fields.")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shelf::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shelf::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shelf config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(shelf::no_config),
        help(
            "Create one with: shelf config init\n\
             Expected at: {path}\n\
             Or pass --url and --api-key, or use --memory."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(shelf::config))]
    Config { message: String },

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(shelf::keyring),
        help("Use api_key_env or a plaintext api_key in the profile instead.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shelf::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(shelf::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(shelf::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Point a not-found hint at the `shelf <command> list` subcommand
    /// rather than the table, whose name may be overridden.
    pub fn for_command(self, command: &str) -> Self {
        match self {
            Self::NotFound {
                resource_type,
                identifier,
                ..
            } => Self::NotFound {
                resource_type,
                identifier,
                list_command: format!("{command} list"),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound { resource, id } => CliError::NotFound {
                list_command: format!("{resource} list"),
                resource_type: resource,
                identifier: id,
            },

            CoreError::Rejected {
                status: status @ (401 | 403),
                message,
            } => CliError::AuthFailed { status, message },

            CoreError::Rejected {
                status: 409,
                message,
            } => CliError::Conflict { message },

            CoreError::Rejected { status, message } => CliError::Rejected { status, message },

            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Keyring(message) => CliError::Keyring { message },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_exit_4() {
        let err = CliError::from(CoreError::NotFound {
            resource: "movies".into(),
            id: "99".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "movies '99' not found");
    }

    #[test]
    fn not_found_hint_names_the_subcommand() {
        let err = CliError::from(CoreError::NotFound {
            resource: "peliculas".into(),
            id: "99".into(),
        })
        .for_command("movies");

        let CliError::NotFound { list_command, .. } = &err else {
            panic!("expected NotFound, got {err:?}");
        };
        assert_eq!(list_command, "movies list");
        assert_eq!(err.to_string(), "peliculas '99' not found");
    }

    #[test]
    fn forbidden_is_auth() {
        let err = CliError::from(CoreError::Rejected {
            status: 401,
            message: "Invalid API key".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn duplicate_key_is_conflict() {
        let err = CliError::from(CoreError::Rejected {
            status: 409,
            message: "duplicate key value violates unique constraint".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn unknown_profile_keeps_available_list() {
        let err = CliError::from(ConfigError::UnknownProfile {
            name: "staging".into(),
            available: "cloud, demo".into(),
        });
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "cloud, demo"));
    }
}
