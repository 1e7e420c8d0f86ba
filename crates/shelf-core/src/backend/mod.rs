// ── Backend seam ──
//
// The store never talks HTTP directly. Everything it needs from a data
// source is the five calls below, so a hosted table and an in-process
// collection are interchangeable.

mod memory;
mod rest;

use std::future::Future;

use shelf_api::ResourceClient;

use crate::config::{BackendKind, StoreConfig};
use crate::error::CoreError;
use crate::model::{Fields, Record, RecordId};

pub use memory::MemoryBackend;

/// A source of records for one resource.
///
/// Each call is a single logical operation; implementations must not retry.
pub trait Backend<F: Fields>: Send + Sync {
    /// Name of the resource, used in logs and error messages.
    fn resource(&self) -> &str;

    fn list(&self) -> impl Future<Output = Result<Vec<Record<F>>, CoreError>> + Send;

    fn get(&self, id: &RecordId) -> impl Future<Output = Result<Record<F>, CoreError>> + Send;

    fn create(&self, fields: &F) -> impl Future<Output = Result<Record<F>, CoreError>> + Send;

    /// Full-field replace of the record at `id`. An unknown id is
    /// [`CoreError::NotFound`].
    fn update(
        &self,
        id: &RecordId,
        fields: &F,
    ) -> impl Future<Output = Result<Record<F>, CoreError>> + Send;

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── Runtime selection ───────────────────────────────────────────────

/// Either backend, chosen at runtime from a [`StoreConfig`].
#[derive(Debug)]
pub enum AnyBackend<F: Fields> {
    Rest(ResourceClient<Record<F>>),
    Memory(MemoryBackend<F>),
}

impl<F: Fields> AnyBackend<F> {
    /// Build the backend the config asks for.
    ///
    /// REST backends get the resolved table name, ordering and transport
    /// settings; the memory backend is seeded with the demo catalog.
    pub fn from_config(config: &StoreConfig) -> Result<Self, CoreError> {
        match &config.backend {
            BackendKind::Rest { url, api_key } => {
                let client = ResourceClient::from_api_key(
                    url.as_str(),
                    config.table_for::<F>(),
                    api_key,
                    &config.transport(),
                )?
                .with_order(config.order_for::<F>())
                .with_return_representation(config.return_representation);
                Ok(Self::Rest(client))
            }
            BackendKind::Memory => Ok(Self::Memory(MemoryBackend::seeded(F::demo_catalog()))),
        }
    }
}

impl<F: Fields> Backend<F> for AnyBackend<F> {
    fn resource(&self) -> &str {
        match self {
            Self::Rest(b) => Backend::<F>::resource(b),
            Self::Memory(b) => b.resource(),
        }
    }

    async fn list(&self) -> Result<Vec<Record<F>>, CoreError> {
        match self {
            Self::Rest(b) => Backend::list(b).await,
            Self::Memory(b) => b.list().await,
        }
    }

    async fn get(&self, id: &RecordId) -> Result<Record<F>, CoreError> {
        match self {
            Self::Rest(b) => Backend::get(b, id).await,
            Self::Memory(b) => b.get(id).await,
        }
    }

    async fn create(&self, fields: &F) -> Result<Record<F>, CoreError> {
        match self {
            Self::Rest(b) => Backend::create(b, fields).await,
            Self::Memory(b) => b.create(fields).await,
        }
    }

    async fn update(&self, id: &RecordId, fields: &F) -> Result<Record<F>, CoreError> {
        match self {
            Self::Rest(b) => Backend::update(b, id, fields).await,
            Self::Memory(b) => b.update(id, fields).await,
        }
    }

    async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        match self {
            Self::Rest(b) => Backend::delete(b, id).await,
            Self::Memory(b) => b.delete(id).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Product;

    #[tokio::test]
    async fn memory_config_seeds_demo_catalog() {
        let backend = AnyBackend::<Product>::from_config(&StoreConfig::default()).unwrap();
        assert!(matches!(backend, AnyBackend::Memory(_)));
        assert_eq!(backend.list().await.unwrap().len(), 6);
        assert_eq!(backend.resource(), "products");
    }

    #[test]
    fn rest_config_uses_table_override() {
        let mut config = StoreConfig::rest(
            "https://db.example.com/rest/v1".parse().unwrap(),
            "anon-key".to_owned().into(),
        );
        config.tables.insert("products".into(), "catalogo".into());

        let backend = AnyBackend::<Product>::from_config(&config).unwrap();
        let AnyBackend::Rest(client) = backend else {
            panic!("expected REST backend");
        };
        assert_eq!(
            client.endpoint().as_str(),
            "https://db.example.com/rest/v1/catalogo"
        );
    }
}
