use thiserror::Error;

/// Errors that can occur while recording or parsing audio files.
///
/// Buffer overflow is deliberately absent: a rejected realtime write is
/// counted in the session diagnostics, not reported as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Structural problem with a WAV file or header. Never retried.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Whether the error describes a malformed or unsupported file, as opposed
    /// to an I/O or lifecycle failure.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = CaptureError::StorageError("disk full".into());
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn only_format_errors_are_structural() {
        assert!(CaptureError::InvalidFormat("bad magic".into()).is_structural());
        assert!(!CaptureError::StorageError("io".into()).is_structural());
        assert!(!CaptureError::InvalidState("idle".into()).is_structural());
    }
}
