//! Upload orchestrator implementation.
//!
//! Owns the item queue, the speed estimator, and batch-level state, and
//! drives `submit_batch`: validate everything locally, then hand items to the
//! transport one at a time in queue order, stopping at the first failure.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::item::{FileHandle, ItemField, ItemStatus, UploadItem, UploadProgress};
use crate::queue::ItemQueue;
use crate::speed::{SpeedEstimate, SpeedEstimator};
use crate::transport::{SubmitRequest, TransferProgress, Transport, TransportError};
use crate::validate::validate_batch;

use super::config::UploadConfig;
use super::types::{BatchOutcome, BatchStatus, UploadError};

/// Callback invoked with the aggregate outcome when a batch run finishes.
pub type BatchCompleteCallback = Arc<dyn Fn(&BatchOutcome) + Send + Sync>;

/// The upload orchestrator: queue mutations, batch submission, and state
/// queries for a single batch of lesson media.
///
/// All state lives on the instance, so independent batches can coexist.
/// Public methods return errors and outcomes as values; none of them panic.
pub struct UploadOrchestrator<T: Transport> {
    config: UploadConfig,
    transport: Arc<T>,
    queue: ItemQueue,
    estimator: SpeedEstimator,
    is_submitting: bool,
    global_error: Option<String>,
    on_complete: Option<BatchCompleteCallback>,
}

impl<T: Transport> UploadOrchestrator<T> {
    /// Creates an orchestrator with one empty item slot.
    pub fn new(config: UploadConfig, transport: Arc<T>) -> Self {
        let estimator = SpeedEstimator::new(config.speed_window);
        Self {
            config,
            transport,
            queue: ItemQueue::new(),
            estimator,
            is_submitting: false,
            global_error: None,
            on_complete: None,
        }
    }

    /// Registers a completion callback, invoked after every batch run.
    pub fn with_completion_callback(mut self, callback: BatchCompleteCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    // ------------------------------------------------------------------
    // Queue facade
    // ------------------------------------------------------------------

    /// Appends a new empty item and returns its id.
    pub fn add_item(&mut self) -> Result<Uuid, UploadError> {
        self.ensure_not_submitting()?;
        Ok(self.queue.add())
    }

    /// Removes an item along with its progress and speed-window state.
    pub fn remove_item(&mut self, id: Uuid) -> Result<(), UploadError> {
        self.ensure_not_submitting()?;
        self.queue.remove(id)?;
        self.estimator.reset(id);
        Ok(())
    }

    /// Whether the item may be removed (false for the last remaining item).
    pub fn can_remove(&self, id: Uuid) -> bool {
        self.queue.can_remove(id)
    }

    /// Updates a text field, clearing exactly that field's error.
    pub fn update_item(
        &mut self,
        id: Uuid,
        field: ItemField,
        value: &str,
    ) -> Result<(), UploadError> {
        self.ensure_not_submitting()?;
        self.queue.update_field(id, field, value)?;
        Ok(())
    }

    /// Attaches a file, clearing the file error, prior progress, and any
    /// speed samples from a previously attached file.
    pub fn attach_file(&mut self, id: Uuid, file: FileHandle) -> Result<(), UploadError> {
        self.ensure_not_submitting()?;
        self.queue.set_file(id, file)?;
        self.estimator.reset(id);
        Ok(())
    }

    /// Resets a failed item to `Idle` so it can be retried on the next run.
    pub fn reset_item(&mut self, id: Uuid) -> Result<(), UploadError> {
        self.ensure_not_submitting()?;
        let item = self.queue.get_mut(id)?;
        if item.status != ItemStatus::Failed {
            return Err(UploadError::InvalidStatus {
                expected: ItemStatus::Failed.as_str(),
                actual: item.status.as_str(),
            });
        }
        item.status = ItemStatus::Idle;
        item.errors.clear();
        item.upload_error = None;
        item.progress = None;
        self.estimator.reset(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// All items in submission order.
    pub fn items(&self) -> &[UploadItem] {
        self.queue.items()
    }

    /// Returns one item by id.
    pub fn get_item(&self, id: Uuid) -> Option<&UploadItem> {
        self.queue.get(id).ok()
    }

    /// Batch-level error from the last run, if any.
    pub fn global_error(&self) -> Option<&str> {
        self.global_error.as_deref()
    }

    /// True for the whole duration of a batch run.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Current throughput estimate for an item, if enough samples exist.
    pub fn estimate(&self, id: Uuid) -> Option<SpeedEstimate> {
        self.estimator.estimate(id)
    }

    /// Batch-level snapshot for display.
    pub fn status(&self) -> BatchStatus {
        let items = self.queue.items();
        BatchStatus {
            is_submitting: self.is_submitting,
            global_error: self.global_error.clone(),
            total: items.len(),
            succeeded: items
                .iter()
                .filter(|i| i.status == ItemStatus::Succeeded)
                .count(),
            failed: items
                .iter()
                .filter(|i| i.status == ItemStatus::Failed)
                .count(),
        }
    }

    // ------------------------------------------------------------------
    // Batch submission
    // ------------------------------------------------------------------

    /// Runs the whole batch: validate, then upload sequentially, fail-fast.
    ///
    /// Never returns an error; validation failures populate per-item error
    /// maps, transfer failures mark the failing item and stop the run, and
    /// the aggregate outcome is both returned and passed to the completion
    /// callback.
    pub async fn submit_batch(&mut self, context_id: &str) -> BatchOutcome {
        self.global_error = None;

        if self.is_submitting {
            // A previous run was cancelled mid-flight; refuse to overlap.
            warn!("batch submission refused: a run is already in progress");
            return self.finish(BatchOutcome {
                all_succeeded: false,
                failed_at: None,
            });
        }

        if context_id.trim().is_empty() {
            warn!("batch submission aborted: missing course context");
            self.global_error =
                Some("A course context is required before uploading".to_string());
            return self.finish(BatchOutcome {
                all_succeeded: false,
                failed_at: None,
            });
        }

        // Items that already succeeded in a previous run are kept as-is, so
        // a reset-and-retry does not re-upload completed transfers.
        let pending: Vec<UploadItem> = self
            .queue
            .items()
            .iter()
            .filter(|i| i.status != ItemStatus::Succeeded)
            .cloned()
            .collect();

        // Local validation of the whole batch; no network traffic on failure.
        for item in self.queue.items_mut() {
            if item.status != ItemStatus::Succeeded {
                item.status = ItemStatus::Validating;
            }
        }
        let failures = validate_batch(&pending, &self.config.limits);
        if !failures.is_empty() {
            debug!(failing = failures.len(), "batch blocked by validation");
            for (id, errors) in failures {
                if let Ok(item) = self.queue.get_mut(id) {
                    item.errors = errors;
                }
            }
            for item in self.queue.items_mut() {
                if item.status == ItemStatus::Validating {
                    item.status = ItemStatus::Idle;
                }
            }
            return self.finish(BatchOutcome {
                all_succeeded: false,
                failed_at: None,
            });
        }

        for item in self.queue.items_mut() {
            if item.status != ItemStatus::Succeeded {
                item.status = ItemStatus::Queued;
                item.errors.clear();
                item.upload_error = None;
            }
        }
        self.is_submitting = true;
        info!(
            items = pending.len(),
            context = context_id,
            transport = self.transport.name(),
            "starting batch upload"
        );

        let pending_ids: Vec<Uuid> = pending.iter().map(|i| i.id).collect();
        let mut failed_at = None;
        for id in pending_ids {
            let request = match self.build_request(id, context_id) {
                Ok(request) => request,
                Err(message) => {
                    self.mark_failed(id, message);
                    failed_at = Some(id);
                    break;
                }
            };

            if let Ok(item) = self.queue.get_mut(id) {
                item.status = ItemStatus::Uploading;
            }
            debug!(item_id = %id, "uploading item");

            match self.run_transfer(request).await {
                Ok(()) => {
                    if let Ok(item) = self.queue.get_mut(id) {
                        item.status = ItemStatus::Succeeded;
                        item.progress = None;
                    }
                    self.estimator.reset(id);
                    debug!(item_id = %id, "item upload succeeded");
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(item_id = %id, error = %message, "item upload failed, stopping batch");
                    self.mark_failed(id, message);
                    failed_at = Some(id);
                    break;
                }
            }
        }

        self.is_submitting = false;
        let outcome = BatchOutcome {
            all_succeeded: failed_at.is_none(),
            failed_at,
        };
        info!(
            all_succeeded = outcome.all_succeeded,
            "batch upload finished"
        );
        self.finish(outcome)
    }

    /// Drives one transfer, feeding progress events into the estimator and
    /// the item's progress snapshot as they arrive.
    async fn run_transfer(&mut self, request: SubmitRequest) -> Result<(), TransportError> {
        let item_id = request.item_id;
        let (tx, mut rx) = mpsc::channel(self.config.progress_buffer);
        let transport = Arc::clone(&self.transport);
        let submit = transport.submit(request, tx);
        tokio::pin!(submit);

        loop {
            tokio::select! {
                result = &mut submit => {
                    // Flush progress that raced with completion.
                    while let Ok(event) = rx.try_recv() {
                        self.record_progress(item_id, event);
                    }
                    break result;
                }
                Some(event) = rx.recv() => {
                    self.record_progress(item_id, event);
                }
            }
        }
    }

    fn record_progress(&mut self, item_id: Uuid, event: TransferProgress) {
        self.estimator.observe(
            item_id,
            event.loaded_bytes,
            event.total_bytes,
            chrono::Utc::now(),
        );
        if let Ok(item) = self.queue.get_mut(item_id) {
            item.progress = Some(UploadProgress::from_bytes(
                event.loaded_bytes,
                event.total_bytes,
            ));
        }
    }

    fn build_request(&self, id: Uuid, context_id: &str) -> Result<SubmitRequest, String> {
        let item = self.queue.get(id).map_err(|e| e.to_string())?;
        // Validation guarantees a file; guard anyway rather than panic.
        let file = item
            .file
            .clone()
            .ok_or_else(|| "no media file attached".to_string())?;
        Ok(SubmitRequest {
            item_id: id,
            context_id: context_id.to_string(),
            title: item.title.clone(),
            description: item.description.clone(),
            file,
        })
    }

    fn mark_failed(&mut self, id: Uuid, message: String) {
        if let Ok(item) = self.queue.get_mut(id) {
            item.status = ItemStatus::Failed;
            item.upload_error = Some(message);
        }
    }

    fn finish(&self, outcome: BatchOutcome) -> BatchOutcome {
        if let Some(ref callback) = self.on_complete {
            callback(&outcome);
        }
        outcome
    }

    fn ensure_not_submitting(&self) -> Result<(), UploadError> {
        if self.is_submitting {
            Err(UploadError::BatchInProgress)
        } else {
            Ok(())
        }
    }
}
