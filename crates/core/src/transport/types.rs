//! Request, progress, and error types for the transport seam.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::item::FileHandle;

/// A single item transfer request.
///
/// Carries everything the remote ingestion endpoint needs: the batch's shared
/// course/context identifier, the item metadata, and the file to stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Id of the item being transferred.
    pub item_id: Uuid,
    /// Shared course/context identifier for the batch.
    pub context_id: String,
    /// Lesson title.
    pub title: String,
    /// Lesson description.
    pub description: String,
    /// The media file to send.
    pub file: FileHandle,
}

/// A progress event emitted while a transfer is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProgress {
    /// Bytes sent so far.
    pub loaded_bytes: u64,
    /// Total bytes in the transfer.
    pub total_bytes: u64,
}

/// Errors that can occur during a transfer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server rejected the upload.
    #[error("{message}")]
    Rejected { message: String },

    /// The HTTP request itself failed (connection, timeout, protocol).
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The local file could not be read.
    #[error("failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransportError {
    /// Creates a rejection with a server-provided or generic message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_raw_message() {
        let err = TransportError::rejected("server rejected format");
        assert_eq!(err.to_string(), "server rejected format");
    }

    #[test]
    fn test_file_read_display() {
        let err = TransportError::FileRead {
            path: PathBuf::from("/videos/missing.mp4"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to read /videos/missing.mp4");
    }
}
