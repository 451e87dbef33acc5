// Audio module - transport payload repair, decoding and resampling

pub mod decoder;
pub mod payload;
pub mod resample;

// Re-export commonly used types for convenience
pub use decoder::{AudioDecoder, DecodeOutcome, Waveform};
pub use payload::{AudioPayload, ByteSanitizer};
