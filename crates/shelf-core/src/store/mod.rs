// ── Reactive list store ──
//
// Owns the client-side sequence of records for one resource. Every
// operation moves the status through `loading` to `succeeded` or `failed`
// and reconciles `items` with what the backend returned. State is
// published on a `watch` channel; a failed operation never clears `items`.

mod state;

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{AnyBackend, Backend};
use crate::config::StoreConfig;
use crate::error::CoreError;
use crate::model::{Fields, Record, RecordId};

pub use state::{Status, StoreState};

/// How long a failure message stays up when auto-dismiss is enabled.
pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(5);

/// Client-side cache of one resource's records, kept consistent with
/// backend outcomes.
///
/// Cheaply cloneable; clones share state. Operations may overlap, and
/// their reconciliations apply in completion order.
pub struct ListStore<F: Fields, B: Backend<F> = AnyBackend<F>> {
    inner: Arc<Inner<F, B>>,
    error_ttl: Option<Duration>,
}

struct Inner<F, B> {
    backend: B,
    state: watch::Sender<StoreState<F>>,
    /// Pending error auto-dismissal, cancelled by the next transition.
    dismiss: Mutex<Option<CancellationToken>>,
}

impl<F, B> Drop for Inner<F, B> {
    fn drop(&mut self) {
        if let Some(token) = self.dismiss.get_mut().take() {
            token.cancel();
        }
    }
}

impl<F: Fields, B: Backend<F>> Clone for ListStore<F, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            error_ttl: self.error_ttl,
        }
    }
}

impl<F: Fields> ListStore<F, AnyBackend<F>> {
    /// Build a store over the backend `config` selects.
    pub fn open(config: &StoreConfig) -> Result<Self, CoreError> {
        let store = Self::new(AnyBackend::from_config(config)?);
        Ok(match config.error_ttl {
            Some(ttl) => store.with_error_ttl(ttl),
            None => store,
        })
    }
}

impl<F: Fields, B: Backend<F> + 'static> ListStore<F, B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                state,
                dismiss: Mutex::new(None),
            }),
            error_ttl: None,
        }
    }

    /// Clear failure messages automatically after `ttl`.
    pub fn with_error_ttl(mut self, ttl: Duration) -> Self {
        self.error_ttl = Some(ttl);
        self
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn items(&self) -> Vec<Record<F>> {
        self.inner.state.borrow().items.clone()
    }

    pub fn status(&self) -> Status {
        self.inner.state.borrow().status
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> StoreState<F> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<F>> {
        self.inner.state.subscribe()
    }

    // ━━ Operations ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Load every record, replacing `items` wholesale.
    pub async fn fetch_all(&self) -> Result<Vec<Record<F>>, CoreError> {
        self.begin().await;
        match self.inner.backend.list().await {
            Ok(records) => {
                info!(resource = self.resource(), count = records.len(), "loaded records");
                let cached = records.clone();
                self.succeed(|items| *items = cached).await;
                Ok(records)
            }
            Err(e) => Err(self.fail("failed to load records", e).await),
        }
    }

    /// Create a record and append it to `items`.
    pub async fn create(&self, fields: &F) -> Result<Record<F>, CoreError> {
        self.begin().await;
        match self.inner.backend.create(fields).await {
            Ok(record) => {
                info!(resource = self.resource(), id = %record.id, "created record");
                let appended = record.clone();
                self.succeed(|items| items.push(appended)).await;
                Ok(record)
            }
            Err(e) => Err(self.fail("failed to create record", e).await),
        }
    }

    /// Replace the fields of the record at `id`.
    ///
    /// The cached entry matching the *returned* id is replaced in place.
    /// If no cached entry matches, `items` is left as is.
    pub async fn update(&self, id: &RecordId, fields: &F) -> Result<Record<F>, CoreError> {
        self.begin().await;
        match self.inner.backend.update(id, fields).await {
            Ok(record) => {
                info!(resource = self.resource(), id = %record.id, "updated record");
                let replacement = record.clone();
                self.succeed(|items| {
                    match items.iter_mut().find(|r| r.id == replacement.id) {
                        Some(slot) => *slot = replacement,
                        None => debug!(id = %replacement.id, "updated record not cached"),
                    }
                })
                .await;
                Ok(record)
            }
            Err(e) => Err(self.fail("failed to update record", e).await),
        }
    }

    /// Delete the record at `id` and drop every cached entry with that id.
    pub async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        self.begin().await;
        match self.inner.backend.delete(id).await {
            Ok(()) => {
                info!(resource = self.resource(), %id, "deleted record");
                self.succeed(|items| items.retain(|r| &r.id != id)).await;
                Ok(())
            }
            Err(e) => Err(self.fail("failed to delete record", e).await),
        }
    }

    /// Read one record from the backend. `items` is not touched.
    pub async fn get(&self, id: &RecordId) -> Result<Record<F>, CoreError> {
        self.begin().await;
        match self.inner.backend.get(id).await {
            Ok(record) => {
                self.succeed(|_| {}).await;
                Ok(record)
            }
            Err(e) => Err(self.fail("failed to load record", e).await),
        }
    }

    /// Dismiss the current failure message.
    pub async fn clear_error(&self) {
        self.cancel_dismissal().await;
        self.inner.state.send_modify(|s| s.error = None);
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn resource(&self) -> &str {
        self.inner.backend.resource()
    }

    async fn begin(&self) {
        self.cancel_dismissal().await;
        self.inner.state.send_modify(|s| {
            s.status = Status::Loading;
            s.error = None;
        });
    }

    async fn succeed(&self, reconcile: impl FnOnce(&mut Vec<Record<F>>)) {
        self.cancel_dismissal().await;
        self.inner.state.send_modify(|s| {
            reconcile(&mut s.items);
            s.status = Status::Succeeded;
            s.error = None;
        });
    }

    /// Record `err` as the failure message and hand it back to the caller.
    async fn fail(&self, context: &str, err: CoreError) -> CoreError {
        warn!(resource = self.resource(), error = %err, "{context}");
        let message = format!("{context}: {err}");
        self.cancel_dismissal().await;
        self.inner.state.send_modify(|s| {
            s.status = Status::Failed;
            s.error = Some(message);
        });
        self.schedule_dismissal().await;
        err
    }

    async fn cancel_dismissal(&self) {
        if let Some(token) = self.inner.dismiss.lock().await.take() {
            token.cancel();
        }
    }

    async fn schedule_dismissal(&self) {
        let Some(ttl) = self.error_ttl else {
            return;
        };
        let token = CancellationToken::new();
        if let Some(stale) = self.inner.dismiss.lock().await.replace(token.clone()) {
            stale.cancel();
        }
        tokio::spawn(dismiss_after(Arc::downgrade(&self.inner), ttl, token));
    }
}

async fn dismiss_after<F, B>(inner: Weak<Inner<F, B>>, ttl: Duration, cancel: CancellationToken) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {}
        () = tokio::time::sleep(ttl) => {
            if let Some(inner) = inner.upgrade() {
                inner.state.send_modify(|s| s.error = None);
                debug!("failure message dismissed");
            }
        }
    }
}
