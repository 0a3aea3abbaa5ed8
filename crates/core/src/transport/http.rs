//! HTTP multipart transport.
//!
//! Posts each item as a multipart form: the metadata fields as text parts and
//! the media file as a streamed binary part. The file body is read in chunks
//! and each chunk feeds the progress channel before it is handed to the HTTP
//! client.

use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::traits::Transport;
use super::types::{SubmitRequest, TransferProgress, TransportError};

const CHUNK_SIZE: usize = 64 * 1024;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// Ingestion endpoint URL.
    pub endpoint: String,

    /// Per-request timeout in seconds. Long because transfers are large.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    3600
}

impl HttpTransportConfig {
    /// Creates a config for the given endpoint with default timeouts.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Multipart HTTP implementation of [`Transport`].
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Creates a transport for the configured endpoint.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http-multipart"
    }

    async fn submit(
        &self,
        request: SubmitRequest,
        progress_tx: mpsc::Sender<TransferProgress>,
    ) -> Result<(), TransportError> {
        let total_bytes = request.file.size_bytes;
        let file = tokio::fs::File::open(&request.file.path)
            .await
            .map_err(|source| TransportError::FileRead {
                path: request.file.path.clone(),
                source,
            })?;

        debug!(
            item_id = %request.item_id,
            file = %request.file.name,
            size = total_bytes,
            "starting multipart upload"
        );

        let body = reqwest::Body::wrap_stream(counting_stream(file, total_bytes, progress_tx));
        let part = multipart::Part::stream_with_length(body, total_bytes)
            .file_name(request.file.name.clone())
            .mime_str(&request.file.mime_type)?;

        let form = multipart::Form::new()
            .text("context_id", request.context_id.clone())
            .text("title", request.title.clone())
            .text("description", request.description.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(item_id = %request.item_id, "upload accepted");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                format!("server returned HTTP {}", status)
            } else {
                message
            };
            warn!(item_id = %request.item_id, %status, "upload rejected");
            Err(TransportError::rejected(message))
        }
    }
}

/// Wraps a file in a chunked stream that reports cumulative bytes sent.
///
/// Progress events are best-effort: a dropped receiver does not stop the
/// transfer.
fn counting_stream(
    file: tokio::fs::File,
    total_bytes: u64,
    progress_tx: mpsc::Sender<TransferProgress>,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send {
    struct ReadState {
        file: tokio::fs::File,
        sent: u64,
        total: u64,
        progress_tx: mpsc::Sender<TransferProgress>,
    }

    futures::stream::unfold(
        ReadState {
            file,
            sent: 0,
            total: total_bytes,
            progress_tx,
        },
        |mut state| async move {
            let mut buf = vec![0u8; CHUNK_SIZE];
            match state.file.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    state.sent += n as u64;
                    let _ = state
                        .progress_tx
                        .send(TransferProgress {
                            loaded_bytes: state.sent,
                            total_bytes: state.total,
                        })
                        .await;
                    Some((Ok(buf), state))
                }
                Err(e) => Some((Err(e), state)),
            }
        },
    )
}
