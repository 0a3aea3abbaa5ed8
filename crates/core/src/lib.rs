//! Batch media-upload orchestration for course lesson content.
//!
//! An ordered queue of upload items (title, description, media file) is
//! validated locally, then transferred one at a time to an ingestion endpoint
//! through a pluggable [`Transport`], with per-item progress, sliding-window
//! throughput estimation, and fail-fast failure policy.

pub mod item;
pub mod orchestrator;
pub mod queue;
pub mod speed;
pub mod testing;
pub mod transport;
pub mod validate;

pub use item::{FileHandle, ItemField, ItemStatus, UploadItem, UploadProgress};
pub use orchestrator::{
    BatchCompleteCallback, BatchOutcome, BatchStatus, UploadConfig, UploadError,
    UploadOrchestrator,
};
pub use queue::{ItemQueue, QueueError};
pub use speed::{format_bytes, format_duration, SpeedEstimate, SpeedEstimator};
pub use transport::{
    HttpTransport, HttpTransportConfig, SubmitRequest, TransferProgress, Transport,
    TransportError,
};
pub use validate::{validate_batch, validate_item, ValidationLimits};
