//! Record model and list-state management between `shelf-api` and
//! consumers (the `shelf` CLI, or any embedding application).
//!
//! - **[`ListStore`]**: Owns the client-side sequence of records for one
//!   resource and keeps it consistent with backend outcomes. State is
//!   published on a `tokio::sync::watch` channel, so consumers can take
//!   snapshots or await the next transition.
//!
//! - **[`Backend`]**: The seam the store talks through. Implemented by
//!   `shelf_api::ResourceClient` (hosted table over HTTP) and by
//!   [`MemoryBackend`] (in-process collection), unified by [`AnyBackend`]
//!   for runtime selection from a [`StoreConfig`].
//!
//! - **Domain model** ([`model`]): [`RecordId`], [`Record<F>`] and the
//!   concrete field sets [`Movie`] and [`Product`].

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{AnyBackend, Backend, MemoryBackend};
pub use config::{BackendKind, StoreConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Fields, Movie, Product, Record, RecordId};
pub use store::{DEFAULT_ERROR_TTL, ListStore, Status, StoreState};
