// Voice Authenticity Core - AI-generated vs human speech detection
// Transport repair, audio decoding, spectral/entropy evidence and a threshold classifier

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod telemetry;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use analysis::classifier::{Classification, ClassificationResult, Classifier};
pub use analysis::features::{FeaturePath, FeatureValue};
pub use analysis::{DetectionPipeline, DetectionReport, Evidence, PipelineStage};
pub use config::{AppConfig, DetectorConfig, ServerConfig};
pub use error::{DecodeFailure, DetectionError, ErrorCode};
