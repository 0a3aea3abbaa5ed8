//! Item, file, and progress types shared across the crate.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-item upload status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not yet part of a batch run.
    Idle,
    /// Being checked by the validation engine.
    Validating,
    /// Accepted into the current batch run, waiting its turn.
    Queued,
    /// Transfer in flight.
    Uploading,
    /// Transfer completed successfully.
    Succeeded,
    /// Transfer rejected or aborted; holds the batch (fail-fast).
    Failed,
}

impl ItemStatus {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Idle => "idle",
            ItemStatus::Validating => "validating",
            ItemStatus::Queued => "queued",
            ItemStatus::Uploading => "uploading",
            ItemStatus::Succeeded => "succeeded",
            ItemStatus::Failed => "failed",
        }
    }

    /// Whether this status ends the item's participation in a batch run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Succeeded | ItemStatus::Failed)
    }
}

/// A user-editable field of an upload item.
///
/// Validation errors are keyed by field so the UI can render inline messages
/// next to the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Title,
    Description,
    File,
}

impl ItemField {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::Title => "title",
            ItemField::Description => "description",
            ItemField::File => "file",
        }
    }

    /// DOM-style error key of the form `{item_id}-{field}`.
    pub fn error_key(&self, item_id: Uuid) -> String {
        format!("{}-{}", item_id, self.as_str())
    }
}

/// Handle to a selected media file.
///
/// Carries enough metadata to validate locally and a path the transport can
/// stream from; the bytes themselves are never held in memory by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// Original file name, sent as the multipart filename.
    pub name: String,
    /// Local path to read the bytes from.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// MIME type as reported by the file picker (e.g. `video/mp4`).
    pub mime_type: String,
}

/// Transfer progress for an item, updated as the transport reports bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Bytes confirmed sent so far.
    pub loaded_bytes: u64,
    /// Total bytes to send.
    pub total_bytes: u64,
    /// Whole-percent completion for display.
    pub percent: f64,
}

impl UploadProgress {
    /// Builds a progress snapshot, deriving the display percentage.
    pub fn from_bytes(loaded_bytes: u64, total_bytes: u64) -> Self {
        let percent = if total_bytes == 0 {
            0.0
        } else {
            (loaded_bytes as f64 / total_bytes as f64 * 100.0).round()
        };
        Self {
            loaded_bytes,
            total_bytes,
            percent,
        }
    }
}

/// One lesson/media unit in the upload queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadItem {
    /// Stable identity, independent of queue position.
    pub id: Uuid,
    /// Lesson title.
    pub title: String,
    /// Lesson description.
    pub description: String,
    /// Selected media file, if any.
    pub file: Option<FileHandle>,
    /// Current status in the upload state machine.
    pub status: ItemStatus,
    /// Validation errors keyed by field.
    pub errors: HashMap<ItemField, String>,
    /// Transfer progress; `None` before the upload starts.
    pub progress: Option<UploadProgress>,
    /// Message from a failed transfer; `None` unless status is `Failed`.
    pub upload_error: Option<String>,
}

impl UploadItem {
    /// Creates an empty item with a fresh id in `Idle` status.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            file: None,
            status: ItemStatus::Idle,
            errors: HashMap::new(),
            progress: None,
            upload_error: None,
        }
    }

    /// Whether the item currently has no validation errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for UploadItem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names_match_serde() {
        for status in [
            ItemStatus::Idle,
            ItemStatus::Validating,
            ItemStatus::Queued,
            ItemStatus::Uploading,
            ItemStatus::Succeeded,
            ItemStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ItemStatus::Succeeded.is_terminal());
        assert!(ItemStatus::Failed.is_terminal());
        assert!(!ItemStatus::Queued.is_terminal());
        assert!(!ItemStatus::Uploading.is_terminal());
    }

    #[test]
    fn test_error_key_format() {
        let id = Uuid::new_v4();
        assert_eq!(ItemField::Title.error_key(id), format!("{}-title", id));
        assert_eq!(ItemField::File.error_key(id), format!("{}-file", id));
    }

    #[test]
    fn test_progress_percent_rounds() {
        let progress = UploadProgress::from_bytes(333, 1000);
        assert_eq!(progress.percent, 33.0);

        let progress = UploadProgress::from_bytes(1000, 1000);
        assert_eq!(progress.percent, 100.0);
    }

    #[test]
    fn test_progress_zero_total() {
        let progress = UploadProgress::from_bytes(0, 0);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn test_new_item_is_idle_and_empty() {
        let item = UploadItem::new();
        assert_eq!(item.status, ItemStatus::Idle);
        assert!(item.title.is_empty());
        assert!(item.file.is_none());
        assert!(item.progress.is_none());
        assert!(item.is_valid());
    }

    #[test]
    fn test_item_ids_are_unique() {
        assert_ne!(UploadItem::new().id, UploadItem::new().id);
    }
}
