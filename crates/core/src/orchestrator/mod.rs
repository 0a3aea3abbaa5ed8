//! Upload orchestrator: drives a batch of items through the state machine.
//!
//! - **Validation**: whole batch, locally, before any network traffic
//! - **Transfer**: strictly sequential, one item at a time
//! - **Failure policy**: fail-fast; remaining items are not attempted

mod config;
mod runner;
mod types;

pub use config::UploadConfig;
pub use runner::{BatchCompleteCallback, UploadOrchestrator};
pub use types::{BatchOutcome, BatchStatus, UploadError};
