//! Error types for the caption core.

/// Errors raised by caption segmentation and timing.
///
/// Only caller mistakes are errors. Problems with timing marks are recovered
/// inside [`crate::timing`] and logged instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptionError {
    #[error("audio duration must be a positive, finite number of seconds (got {0})")]
    InvalidAudioDuration(f64),

    #[error("max width must be a positive, finite number of pixels (got {0})")]
    InvalidMaxWidth(f64),

    #[error("lines per page must be at least 1")]
    ZeroLinesPerPage,

    #[error("minimum page duration must be a positive, finite number of seconds (got {0})")]
    InvalidDurationFloor(f64),

    #[error("early tolerance must be a non-negative, finite number of seconds (got {0})")]
    InvalidTolerance(f64),

    #[error("lead of {value}s is outside the allowed range 0..={max}s")]
    LeadOutOfRange { value: f64, max: f64 },
}

/// Result type alias using CaptionError.
pub type Result<T> = std::result::Result<T, CaptionError>;
