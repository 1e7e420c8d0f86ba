// ── Core error types ──
//
// User-facing errors from shelf-core. Consumers never see reqwest errors
// or raw JSON failures directly; the `From<shelf_api::Error>` impl
// translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No {resource} record with id {id}")]
    NotFound { resource: String, id: String },

    #[error("Server rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the targeted record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the backend refused the credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shelf_api::Error> for CoreError {
    fn from(err: shelf_api::Error) -> Self {
        match err {
            shelf_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            shelf_api::Error::Status { status, body } => CoreError::Rejected {
                status,
                message: body,
            },
            shelf_api::Error::NotFound { resource, id } => CoreError::NotFound { resource, id },
            shelf_api::Error::MissingRepresentation { operation } => CoreError::InvalidResponse {
                message: format!("server returned no row for {operation}"),
            },
            shelf_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            shelf_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shelf_api::Error::InvalidHeader(message) => CoreError::Config { message },
            shelf_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}
