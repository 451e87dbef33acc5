// Detection error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Detection error code constants
///
/// Error code range: 1001-1004
pub struct DetectionErrorCodes {}

impl DetectionErrorCodes {
    /// Transport payload is not valid base64 even after sanitization
    pub const INVALID_ENCODING: i32 = 1001;

    /// Blob is empty or too short for entropy computation
    pub const INSUFFICIENT_DATA: i32 = 1002;

    /// Unexpected failure during feature extraction
    pub const PROCESSING: i32 = 1003;

    /// Detector configuration failed validation
    pub const INVALID_CONFIG: i32 = 1004;
}

/// Log a detection error with structured context
///
/// This function logs detection errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_detection_error(err: &DetectionError, context: &str) {
    error!(
        "Detection error in {}: code={}, component=DetectionPipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Terminal detection failures
///
/// Every variant ends the request. Decode failures are not listed here: the
/// pipeline recovers from them by falling back to entropy analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Payload could not be decoded as base64 after sanitization
    InvalidEncoding { reason: String },

    /// Blob too short to compute a byte distribution
    InsufficientData { required: usize, received: usize },

    /// Feature extraction produced an unusable value
    Processing { reason: String },

    /// Detector configuration is inconsistent
    InvalidConfig { reason: String },
}

impl ErrorCode for DetectionError {
    fn code(&self) -> i32 {
        match self {
            DetectionError::InvalidEncoding { .. } => DetectionErrorCodes::INVALID_ENCODING,
            DetectionError::InsufficientData { .. } => DetectionErrorCodes::INSUFFICIENT_DATA,
            DetectionError::Processing { .. } => DetectionErrorCodes::PROCESSING,
            DetectionError::InvalidConfig { .. } => DetectionErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            DetectionError::InvalidEncoding { reason } => {
                format!("Invalid base64 audio payload: {}", reason)
            }
            DetectionError::InsufficientData { required, received } => {
                format!(
                    "Insufficient audio data: need at least {} byte(s), got {}",
                    required, received
                )
            }
            DetectionError::Processing { reason } => {
                format!("Audio processing failed: {}", reason)
            }
            DetectionError::InvalidConfig { reason } => {
                format!("Invalid detector configuration: {}", reason)
            }
        }
    }
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DetectionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for DetectionError {}

impl From<base64::DecodeError> for DetectionError {
    fn from(err: base64::DecodeError) -> Self {
        DetectionError::InvalidEncoding {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_error_codes() {
        assert_eq!(
            DetectionError::InvalidEncoding {
                reason: "test".to_string()
            }
            .code(),
            DetectionErrorCodes::INVALID_ENCODING
        );
        assert_eq!(
            DetectionError::InsufficientData {
                required: 1,
                received: 0
            }
            .code(),
            DetectionErrorCodes::INSUFFICIENT_DATA
        );
        assert_eq!(
            DetectionError::Processing {
                reason: "test".to_string()
            }
            .code(),
            DetectionErrorCodes::PROCESSING
        );
        assert_eq!(
            DetectionError::InvalidConfig {
                reason: "test".to_string()
            }
            .code(),
            DetectionErrorCodes::INVALID_CONFIG
        );
    }

    #[test]
    fn test_detection_error_messages() {
        let err = DetectionError::InsufficientData {
            required: 1,
            received: 0,
        };
        assert_eq!(
            err.message(),
            "Insufficient audio data: need at least 1 byte(s), got 0"
        );

        let err = DetectionError::InvalidEncoding {
            reason: "Invalid padding".to_string(),
        };
        assert!(err.message().contains("Invalid padding"));
    }

    #[test]
    fn test_detection_error_display() {
        let err = DetectionError::Processing {
            reason: "NaN rolloff".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("DetectionError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_from_base64_error() {
        let err: DetectionError = base64::DecodeError::InvalidPadding.into();
        match err {
            DetectionError::InvalidEncoding { reason } => {
                assert!(!reason.is_empty());
            }
            _ => panic!("Expected InvalidEncoding"),
        }
    }
}
