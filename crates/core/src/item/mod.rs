//! Core upload item data types.
//!
//! An item is one lesson/media unit awaiting transfer: metadata, an optional
//! file handle, and the per-item status the orchestrator drives through the
//! upload state machine.

mod types;

pub use types::{FileHandle, ItemField, ItemStatus, UploadItem, UploadProgress};
