//! Error types for trajectory loading and validation.

use thiserror::Error;

/// Errors detected at the trajectory load boundary.
///
/// Every variant is raised before the tick loop starts; a trajectory that
/// validates never fails during playback.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// Document contains no samples
    #[error("trajectory has no samples")]
    Empty,

    /// positions and times arrays disagree in length
    #[error("length mismatch: {positions} positions vs {times} times")]
    LengthMismatch { positions: usize, times: usize },

    /// times must be non-decreasing
    #[error("times go backwards at index {index}")]
    NonMonotonicTimes { index: usize },

    /// The loop period must be positive
    #[error("non-positive duration: {duration}")]
    NonPositiveDuration { duration: f64 },

    /// Malformed JSON document
    #[error("malformed trajectory document: {0}")]
    Parse(#[from] serde_json::Error),
}
