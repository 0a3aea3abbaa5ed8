//! Mock transport for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::transport::{SubmitRequest, TransferProgress, Transport, TransportError};

/// A recorded submission for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    /// The request that was made.
    pub request: SubmitRequest,
    /// When the request was made.
    pub timestamp: DateTime<Utc>,
}

/// Mock implementation of the [`Transport`] trait.
///
/// Provides controllable behavior for testing:
/// - Record every submission for assertions
/// - Script per-item failures with a server message
/// - Script per-item progress event sequences
/// - Inject a one-shot error for the next call
///
/// By default every submission succeeds after emitting a half-way and a
/// final progress event derived from the file size.
#[derive(Debug, Default)]
pub struct MockTransport {
    recorded: Arc<RwLock<Vec<RecordedSubmission>>>,
    failures: Arc<RwLock<HashMap<Uuid, String>>>,
    progress_scripts: Arc<RwLock<HashMap<Uuid, Vec<(u64, u64)>>>>,
    next_error: Arc<RwLock<Option<TransportError>>>,
}

impl MockTransport {
    /// Creates a mock transport where every submission succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the given item to fail with a server message.
    pub async fn fail_item(&self, item_id: Uuid, message: impl Into<String>) {
        self.failures.write().await.insert(item_id, message.into());
    }

    /// Removes a scripted failure so the item succeeds again.
    pub async fn clear_failure(&self, item_id: Uuid) {
        self.failures.write().await.remove(&item_id);
    }

    /// Scripts the `(loaded, total)` progress events emitted for an item.
    pub async fn set_progress_script(&self, item_id: Uuid, events: Vec<(u64, u64)>) {
        self.progress_scripts.write().await.insert(item_id, events);
    }

    /// Configures the next submission to fail with the given error.
    pub async fn set_next_error(&self, error: TransportError) {
        *self.next_error.write().await = Some(error);
    }

    /// All recorded submissions, in call order.
    pub async fn recorded_submissions(&self) -> Vec<RecordedSubmission> {
        self.recorded.read().await.clone()
    }

    /// Number of submissions made so far.
    pub async fn submission_count(&self) -> usize {
        self.recorded.read().await.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(
        &self,
        request: SubmitRequest,
        progress_tx: mpsc::Sender<TransferProgress>,
    ) -> Result<(), TransportError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let item_id = request.item_id;
        let size = request.file.size_bytes;

        self.recorded.write().await.push(RecordedSubmission {
            request,
            timestamp: Utc::now(),
        });

        let script = self.progress_scripts.read().await.get(&item_id).cloned();
        let events = script.unwrap_or_else(|| {
            if size == 0 {
                vec![]
            } else {
                vec![(size / 2, size), (size, size)]
            }
        });
        for (loaded, total) in events {
            let _ = progress_tx
                .send(TransferProgress {
                    loaded_bytes: loaded,
                    total_bytes: total,
                })
                .await;
        }

        if let Some(message) = self.failures.read().await.get(&item_id) {
            return Err(TransportError::rejected(message.clone()));
        }

        Ok(())
    }
}
