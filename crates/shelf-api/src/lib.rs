// shelf-api: Async Rust client for PostgREST-style table resources

pub mod auth;
pub mod error;
pub mod resource;
pub mod transport;

pub use auth::api_key_headers;
pub use error::Error;
pub use resource::ResourceClient;
pub use transport::{TlsMode, TransportConfig};
