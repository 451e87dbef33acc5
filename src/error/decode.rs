// Recoverable decode failure

use std::fmt;

/// Cause reported when a blob cannot be interpreted as audio
///
/// This is an expected branch of the detection pipeline, not a terminal error:
/// the pipeline routes the blob to entropy analysis instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub reason: String,
}

impl DecodeFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio decode failed: {}", self.reason)
    }
}

impl std::error::Error for DecodeFailure {}
