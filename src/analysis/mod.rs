// Analysis module - detection pipeline for transport-encoded audio
//
// This module orchestrates one detection request end to end:
//
// Sanitizing -> Decoding -> SpectralAnalysis | EntropyAnalysis -> Classifying -> Done
//
// Architecture:
// - ByteSanitizer repairs the transport string and recovers the blob
// - AudioDecoder turns the blob into a mono waveform, or reports it undecodable
// - Decoded clips go through SpectralFeatureExtractor; undecodable blobs fall
//   back to EntropyFeatureExtractor (the only fallback edge)
// - Classifier maps the single feature value to a label and confidence
//
// The pipeline is immutable after construction and holds no per-request state,
// so one instance can be shared behind an Arc across worker threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audio::{AudioDecoder, ByteSanitizer, DecodeOutcome};
use crate::config::DetectorConfig;
use crate::error::DetectionError;

pub mod classifier;
pub mod features;

use classifier::{ClassificationResult, Classifier};
use features::{
    EntropyFeatureExtractor, EntropySummary, FeatureValue, SpectralFeatureExtractor,
    SpectralSummary,
};

/// States visited by one pipeline run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Sanitizing,
    Decoding,
    SpectralAnalysis,
    EntropyAnalysis,
    Classifying,
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Sanitizing => "SANITIZE",
            PipelineStage::Decoding => "DECODE",
            PipelineStage::SpectralAnalysis => "SPECTRAL",
            PipelineStage::EntropyAnalysis => "ENTROPY",
            PipelineStage::Classifying => "CLASSIFY",
            PipelineStage::Done => "DONE",
        }
    }
}

/// Path-specific evidence behind a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum Evidence {
    /// Blob decoded as audio
    Spectral(SpectralSummary),
    /// Blob could not be decoded; `decode_failure` is the decoder's cause
    Entropy {
        summary: EntropySummary,
        decode_failure: String,
    },
}

/// Everything one pipeline run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub result: ClassificationResult,
    pub feature: FeatureValue,
    pub evidence: Evidence,
    pub stages: Vec<PipelineStage>,
}

/// DetectionPipeline wires sanitizer, decoder, extractors and classifier
pub struct DetectionPipeline {
    config: DetectorConfig,
    decoder: AudioDecoder,
    spectral: SpectralFeatureExtractor,
    entropy: EntropyFeatureExtractor,
    classifier: Classifier,
}

impl DetectionPipeline {
    /// Build a pipeline from explicit configuration
    ///
    /// # Returns
    /// * `Ok(DetectionPipeline)` - Ready to analyze requests
    /// * `Err(DetectionError::InvalidConfig)` - Configuration failed validation
    pub fn new(config: DetectorConfig) -> Result<Self, DetectionError> {
        config.validate()?;

        info!(
            "[DetectionPipeline] T_s={} Hz, T_e={} bits/byte, {} Hz, frame={} hop={}",
            config.spectral_threshold_hz,
            config.entropy_threshold_bits,
            config.sample_rate,
            config.frame_size,
            config.hop_size
        );

        Ok(Self {
            decoder: AudioDecoder::new(config.sample_rate),
            spectral: SpectralFeatureExtractor::from_config(&config),
            entropy: EntropyFeatureExtractor::new(),
            classifier: Classifier::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Analyze a transport-encoded (base64) audio payload
    ///
    /// # Returns
    /// * `Ok(DetectionReport)` - Classification plus the evidence behind it
    /// * `Err(InvalidEncoding)` - Payload is not repairable base64
    /// * `Err(InsufficientData)` - Payload carried no bytes at all
    /// * `Err(Processing)` - Feature extraction produced a non-finite value
    pub fn analyze(&self, transport: &str) -> Result<DetectionReport, DetectionError> {
        debug!(
            "[DetectionPipeline] {} ({} chars)",
            PipelineStage::Sanitizing.as_str(),
            transport.len()
        );
        let payload = ByteSanitizer::sanitize(transport).map_err(|err| {
            warn!("[DetectionPipeline] Rejected payload: {}", err);
            err
        })?;
        if payload.is_empty() {
            info!("[DetectionPipeline] Transport string carried no bytes");
        } else {
            debug!("[DetectionPipeline] Recovered {} byte blob", payload.len());
        }

        self.run(payload.as_bytes(), vec![PipelineStage::Sanitizing])
    }

    /// Analyze an already-decoded byte blob, skipping the sanitizer
    pub fn analyze_bytes(&self, blob: &[u8]) -> Result<DetectionReport, DetectionError> {
        self.run(blob, Vec::new())
    }

    fn run(
        &self,
        blob: &[u8],
        mut stages: Vec<PipelineStage>,
    ) -> Result<DetectionReport, DetectionError> {
        stages.push(PipelineStage::Decoding);
        debug!(
            "[DetectionPipeline] {} ({} bytes)",
            PipelineStage::Decoding.as_str(),
            blob.len()
        );

        let (feature, evidence) = match self.decoder.decode(blob) {
            DecodeOutcome::Decoded(waveform) => {
                stages.push(PipelineStage::SpectralAnalysis);
                let summary = self.spectral.extract(&waveform);
                debug!(
                    "[DetectionPipeline] {} rolloff={:.1} Hz zcr={:.4} frames={}",
                    PipelineStage::SpectralAnalysis.as_str(),
                    summary.rolloff_hz,
                    summary.zero_crossing_rate,
                    summary.frame_count
                );
                (
                    FeatureValue::spectral(summary.rolloff_hz),
                    Evidence::Spectral(summary),
                )
            }
            DecodeOutcome::NotDecodable(failure) => {
                info!(
                    "[DetectionPipeline] Falling back to entropy analysis: {}",
                    failure
                );
                stages.push(PipelineStage::EntropyAnalysis);
                let summary = self.entropy.extract(blob).map_err(|err| {
                    warn!("[DetectionPipeline] Entropy analysis failed: {}", err);
                    err
                })?;
                debug!(
                    "[DetectionPipeline] {} entropy={:.4} bits/byte over {} bytes",
                    PipelineStage::EntropyAnalysis.as_str(),
                    summary.entropy_bits,
                    summary.byte_count
                );
                (
                    FeatureValue::entropy(summary.entropy_bits),
                    Evidence::Entropy {
                        summary,
                        decode_failure: failure.reason,
                    },
                )
            }
        };

        let feature = ensure_finite(feature)?;

        stages.push(PipelineStage::Classifying);
        let result = self.classifier.classify(feature);
        stages.push(PipelineStage::Done);

        debug!(
            "[DetectionPipeline] {} {} via {} (confidence {:.3})",
            PipelineStage::Done.as_str(),
            result.label.as_str(),
            feature.path.as_str(),
            result.confidence
        );

        Ok(DetectionReport {
            result,
            feature,
            evidence,
            stages,
        })
    }
}

fn ensure_finite(feature: FeatureValue) -> Result<FeatureValue, DetectionError> {
    if feature.value.is_finite() {
        return Ok(feature);
    }

    warn!(
        "[DetectionPipeline] Non-finite {} feature: {}",
        feature.path.as_str(),
        feature.value
    );
    Err(DetectionError::Processing {
        reason: format!(
            "{} feature value is not finite ({})",
            feature.path.as_str(),
            feature.value
        ),
    })
}
