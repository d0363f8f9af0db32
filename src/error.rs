//! Error types for cinecam.
//!
//! This module defines all error types used throughout the library.
//! Configuration problems (bad frame counts, dangling subject references) are
//! rejected before synthesis starts; resolver gaps and degenerate geometry are
//! not errors and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CameraError`].
pub type Result<T> = std::result::Result<T, CameraError>;

/// Errors that can occur while authoring, validating, synthesizing or
/// exchanging camera trajectories.
#[derive(Error, Debug)]
pub enum CameraError {
    /// An instruction has a frame count below the allowed minimum.
    #[error("instruction {instruction} has frame count {frame_count} (minimum is {minimum})")]
    InvalidFrameCount {
        /// The instruction index.
        instruction: usize,
        /// The offending frame count.
        frame_count: usize,
        /// The minimum frame count that was enforced.
        minimum: usize,
    },

    /// An instruction references a subject that does not exist.
    #[error("instruction {instruction} references subject {index}, but only {subject_count} subjects exist")]
    SubjectOutOfRange {
        /// The instruction index.
        instruction: usize,
        /// The referenced subject index.
        index: usize,
        /// Number of subjects available.
        subject_count: usize,
    },

    /// A subject violates its invariants (non-positive or non-finite size).
    #[error("subject {index} is invalid: {reason}")]
    InvalidSubject {
        /// The subject index.
        index: usize,
        /// Why the subject is invalid.
        reason: &'static str,
    },

    /// A numeric input is NaN or infinite.
    #[error("non-finite value in {field}")]
    NonFinite {
        /// Description of where the value was found.
        field: String,
    },

    /// An instruction store index is out of bounds.
    #[error("instruction index {index} is out of range (store holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of instructions in the store.
        len: usize,
    },

    /// Playback was requested over an empty frame sequence.
    #[error("cannot play back an empty frame sequence")]
    EmptyPlayback,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading simulation data from a file.
    #[error("failed to load simulation data from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl CameraError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        CameraError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a non-finite value error for the named field.
    pub fn non_finite(field: impl Into<String>) -> Self {
        CameraError::NonFinite {
            field: field.into(),
        }
    }
}
