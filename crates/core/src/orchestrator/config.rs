//! Configuration for the upload orchestrator.

use serde::{Deserialize, Serialize};

use crate::speed::DEFAULT_WINDOW_CAPACITY;
use crate::validate::ValidationLimits;

/// Configuration for the upload orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Samples kept per item in the speed estimator's sliding window.
    #[serde(default = "default_speed_window")]
    pub speed_window: usize,

    /// Capacity of the progress event channel per transfer.
    #[serde(default = "default_progress_buffer")]
    pub progress_buffer: usize,

    /// Field and file constraints applied before submission.
    #[serde(default)]
    pub limits: ValidationLimits,
}

fn default_speed_window() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

fn default_progress_buffer() -> usize {
    32
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            speed_window: default_speed_window(),
            progress_buffer: default_progress_buffer(),
            limits: ValidationLimits::default(),
        }
    }
}

impl UploadConfig {
    /// Sets the speed estimator window capacity.
    pub fn with_speed_window(mut self, samples: usize) -> Self {
        self.speed_window = samples;
        self
    }

    /// Sets the validation limits.
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }
}
