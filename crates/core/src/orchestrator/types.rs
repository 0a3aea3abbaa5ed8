//! Types for the upload orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::queue::QueueError;

/// Errors from the orchestrator's caller-facing operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// Queue operation failed.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Items cannot be edited while a batch run is in progress.
    #[error("a batch is currently submitting")]
    BatchInProgress,

    /// The item is not in the status the operation requires.
    #[error("invalid item status: expected {expected}, got {actual}")]
    InvalidStatus {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// True when every item reached `Succeeded`.
    pub all_succeeded: bool,
    /// Id of the item that stopped the batch, if any.
    pub failed_at: Option<Uuid>,
}

/// Snapshot of batch-level state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStatus {
    /// True for the whole duration of a batch run.
    pub is_submitting: bool,
    /// Batch-level error set before any item was touched.
    pub global_error: Option<String>,
    /// Total items in the queue.
    pub total: usize,
    /// Items that have completed successfully.
    pub succeeded: usize,
    /// Items in failed state.
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let id = Uuid::new_v4();
        let outcome = BatchOutcome {
            all_succeeded: false,
            failed_at: Some(id),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: BatchOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }

    #[test]
    fn test_status_default() {
        let status = BatchStatus::default();
        assert!(!status.is_submitting);
        assert!(status.global_error.is_none());
        assert_eq!(status.total, 0);
    }

    #[test]
    fn test_error_display() {
        let err = UploadError::InvalidStatus {
            expected: "failed",
            actual: "uploading",
        };
        assert_eq!(
            err.to_string(),
            "invalid item status: expected failed, got uploading"
        );
    }
}
