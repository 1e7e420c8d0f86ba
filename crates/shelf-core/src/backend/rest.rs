use shelf_api::ResourceClient;

use super::Backend;
use crate::error::CoreError;
use crate::model::{Fields, Record, RecordId};

// Inherent methods shadow the trait ones; the calls below go to the HTTP
// client and only translate ids and errors.
impl<F: Fields> Backend<F> for ResourceClient<Record<F>> {
    fn resource(&self) -> &str {
        ResourceClient::resource(self)
    }

    async fn list(&self) -> Result<Vec<Record<F>>, CoreError> {
        Ok(ResourceClient::list(self).await?)
    }

    async fn get(&self, id: &RecordId) -> Result<Record<F>, CoreError> {
        Ok(self.get_by_id(&id.to_string()).await?)
    }

    async fn create(&self, fields: &F) -> Result<Record<F>, CoreError> {
        Ok(ResourceClient::create(self, fields).await?)
    }

    async fn update(&self, id: &RecordId, fields: &F) -> Result<Record<F>, CoreError> {
        Ok(ResourceClient::update(self, &id.to_string(), fields).await?)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        Ok(ResourceClient::delete(self, &id.to_string()).await?)
    }
}
