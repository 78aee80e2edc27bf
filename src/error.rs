//! Error types for pulsecam
//!
//! - Configuration errors are fatal at construction.
//! - Malformed frames are rejected and leave the session untouched.
//! - Everything else (finger lifted, warm-up) is ordinary session flow and is
//!   reported through `SessionEvent`s, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Malformed frame ({width}x{height}, {len} bytes): {reason}")]
    MalformedFrame {
        width: usize,
        height: usize,
        len: usize,
        reason: String,
    },

    #[error("Cannot load config '{path}': {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PulseError>;

impl PulseError {
    /// True for errors that only reject one frame; the session can keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PulseError::MalformedFrame { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_frame_is_recoverable() {
        let err = PulseError::MalformedFrame {
            width: 4,
            height: 4,
            len: 3,
            reason: "too short".into(),
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("4x4"));
    }

    #[test]
    fn configuration_errors_are_fatal() {
        let err = PulseError::InvalidConfiguration("fps must be positive".into());
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Invalid configuration: fps must be positive");
    }
}
