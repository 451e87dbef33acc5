// Error types for the voice authenticity detector
//
// This module defines the terminal failures the detection pipeline can report
// and the recoverable decode failure that triggers the entropy fallback.

mod decode;
mod detection;

pub use decode::DecodeFailure;
pub use detection::{log_detection_error, DetectionError, DetectionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library, CLI and HTTP boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
