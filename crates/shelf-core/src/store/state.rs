use serde::Serialize;

use crate::model::Record;

/// Where the store is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// An operation is in flight.
    Loading,
    /// The last operation to complete succeeded.
    Succeeded,
    /// The last operation to complete failed; see [`StoreState::error`].
    Failed,
}

/// Everything a consumer renders from: the cached records, the lifecycle
/// status, and the message of the last failure (if not yet dismissed).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<F> {
    pub items: Vec<Record<F>>,
    pub status: Status,
    pub error: Option<String>,
}

impl<F> Default for StoreState<F> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: Status::Idle,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_displays_lowercase() {
        assert_eq!(Status::Succeeded.to_string(), "succeeded");
        assert_eq!(Status::default().to_string(), "idle");
    }
}
