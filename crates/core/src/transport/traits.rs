//! Trait definition for the transport seam.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{SubmitRequest, TransferProgress, TransportError};

/// A transport that can deliver one item to the ingestion endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the name of this transport implementation.
    fn name(&self) -> &str;

    /// Submits one item, reporting progress through the channel.
    ///
    /// Zero or more progress events are sent before the call resolves, and it
    /// resolves exactly once; the orchestrator never retries automatically.
    /// If the receiver is dropped, the transfer continues without progress
    /// reporting.
    async fn submit(
        &self,
        request: SubmitRequest,
        progress_tx: mpsc::Sender<TransferProgress>,
    ) -> Result<(), TransportError>;
}
