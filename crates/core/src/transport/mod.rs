//! Transport module: the network seam the orchestrator submits items through.
//!
//! The orchestrator only depends on the `Transport` trait; the bundled
//! `HttpTransport` posts multipart form data to an ingestion endpoint and
//! streams the file body through a byte-counting progress channel. Tests use
//! the mock in `crate::testing` instead.

mod http;
mod traits;
mod types;

pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::Transport;
pub use types::{SubmitRequest, TransferProgress, TransportError};
