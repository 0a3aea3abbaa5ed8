//! Validation engine for upload items.
//!
//! Pure functions: no I/O, no side effects. Every field is checked
//! independently so multiple errors can surface together, and the whole batch
//! is validated before a single byte reaches the transport.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{ItemField, UploadItem};

/// Field and file constraints applied to every item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Maximum title length in characters.
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,

    /// Maximum description length in characters.
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,

    /// Maximum file size in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Accepted MIME types, matched exactly.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_max_title_chars() -> usize {
    80
}

fn default_max_description_chars() -> usize {
    300
}

fn default_max_file_bytes() -> u64 {
    500 * 1024 * 1024 // 500 MiB
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "video/mp4".to_string(),
        "video/webm".to_string(),
        "video/ogg".to_string(),
    ]
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_title_chars: default_max_title_chars(),
            max_description_chars: default_max_description_chars(),
            max_file_bytes: default_max_file_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl ValidationLimits {
    /// Sets the maximum file size.
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Sets the accepted MIME types.
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }
}

/// Validates a single item against the limits.
///
/// Returns a map of field errors; empty when the item is valid. File size and
/// MIME type are both checked even when one already failed, so both messages
/// surface together.
pub fn validate_item(
    item: &UploadItem,
    limits: &ValidationLimits,
) -> HashMap<ItemField, String> {
    let mut errors = HashMap::new();

    if item.title.trim().is_empty() {
        errors.insert(ItemField::Title, "Title is required".to_string());
    } else if item.title.chars().count() > limits.max_title_chars {
        errors.insert(
            ItemField::Title,
            format!("Title must be {} characters or fewer", limits.max_title_chars),
        );
    }

    if item.description.trim().is_empty() {
        errors.insert(ItemField::Description, "Description is required".to_string());
    } else if item.description.chars().count() > limits.max_description_chars {
        errors.insert(
            ItemField::Description,
            format!(
                "Description must be {} characters or fewer",
                limits.max_description_chars
            ),
        );
    }

    match &item.file {
        None => {
            errors.insert(ItemField::File, "A media file is required".to_string());
        }
        Some(file) => {
            let mut messages = Vec::new();
            if file.size_bytes > limits.max_file_bytes {
                messages.push(format!(
                    "File exceeds the {} limit",
                    crate::speed::format_bytes(limits.max_file_bytes)
                ));
            }
            if !limits
                .allowed_mime_types
                .iter()
                .any(|t| t == &file.mime_type)
            {
                messages.push(format!(
                    "Unsupported file type {} (allowed: {})",
                    file.mime_type,
                    limits.allowed_mime_types.join(", ")
                ));
            }
            if !messages.is_empty() {
                errors.insert(ItemField::File, messages.join("; "));
            }
        }
    }

    errors
}

/// Validates every item in a batch.
///
/// Returns `(item_id, errors)` for items that failed; an empty vec means the
/// batch may be submitted.
pub fn validate_batch(
    items: &[UploadItem],
    limits: &ValidationLimits,
) -> Vec<(Uuid, HashMap<ItemField, String>)> {
    items
        .iter()
        .filter_map(|item| {
            let errors = validate_item(item, limits);
            if errors.is_empty() {
                None
            } else {
                Some((item.id, errors))
            }
        })
        .collect()
}
