//! Testing utilities and mock implementations.
//!
//! Provides a mock transport so batch behavior can be exercised end to end
//! without a network stack, plus fixtures for building test items and files.

mod mock_transport;

pub use mock_transport::{MockTransport, RecordedSubmission};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::PathBuf;

    use crate::item::FileHandle;

    /// Creates a video file handle with a plausible local path.
    ///
    /// The MIME type is derived from the extension; unknown extensions fall
    /// back to `video/mp4`.
    pub fn video_file(name: &str, size_bytes: u64) -> FileHandle {
        let mime_type = match name.rsplit('.').next() {
            Some("webm") => "video/webm",
            Some("ogv") | Some("ogg") => "video/ogg",
            _ => "video/mp4",
        };
        FileHandle {
            name: name.to_string(),
            path: PathBuf::from("/videos").join(name),
            size_bytes,
            mime_type: mime_type.to_string(),
        }
    }
}
