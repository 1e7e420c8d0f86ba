// ── In-process backend ──
//
// Records live in a Vec behind a mutex, in insertion order. Ids are
// integers handed out as `max + 1`, so they stay unique across deletes.

use tokio::sync::Mutex;
use tracing::debug;

use super::Backend;
use crate::error::CoreError;
use crate::model::{Fields, Record, RecordId};

/// A collection held in memory for demos and tests.
#[derive(Debug)]
pub struct MemoryBackend<F> {
    resource: String,
    rows: Mutex<Vec<Record<F>>>,
}

impl<F: Fields> MemoryBackend<F> {
    /// An empty collection.
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// A collection pre-filled with `seed`, numbered `1..=n`.
    pub fn seeded(seed: Vec<F>) -> Self {
        let rows = (1_i64..)
            .zip(seed)
            .map(|(id, fields)| Record::new(id, fields))
            .collect();
        Self {
            resource: F::RESOURCE.to_owned(),
            rows: Mutex::new(rows),
        }
    }

    fn not_found(&self, id: &RecordId) -> CoreError {
        CoreError::NotFound {
            resource: self.resource.clone(),
            id: id.to_string(),
        }
    }
}

impl<F: Fields> Default for MemoryBackend<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fields> Backend<F> for MemoryBackend<F> {
    fn resource(&self) -> &str {
        &self.resource
    }

    async fn list(&self) -> Result<Vec<Record<F>>, CoreError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn get(&self, id: &RecordId) -> Result<Record<F>, CoreError> {
        self.rows
            .lock()
            .await
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, fields: &F) -> Result<Record<F>, CoreError> {
        let mut rows = self.rows.lock().await;
        let next = rows
            .iter()
            .filter_map(|r| r.id.as_int())
            .max()
            .map_or(1, |max| max + 1);
        let record = Record::new(next, fields.clone());
        rows.push(record.clone());
        debug!(resource = %self.resource, id = next, "memory insert");
        Ok(record)
    }

    async fn update(&self, id: &RecordId, fields: &F) -> Result<Record<F>, CoreError> {
        let mut rows = self.rows.lock().await;
        let Some(slot) = rows.iter_mut().find(|r| &r.id == id) else {
            return Err(self.not_found(id));
        };
        slot.fields = fields.clone();
        Ok(slot.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|r| &r.id != id);
        if rows.len() == before {
            return Err(self.not_found(id));
        }
        Ok(())
    }
}
