// Classifier - threshold rule mapping evidence to an authenticity label
//
// Each feature path has exactly one threshold and one comparison:
//
// spectral: rolloff < T_s  => AiGenerated, otherwise HumanAuthentic
// entropy:  entropy < T_e  => AiGenerated, otherwise HumanAuthentic
//
// Confidence grows with the relative distance from the threshold and is
// bounded by a per-path, per-label floor and the global 0.99 ceiling.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{FeaturePath, FeatureValue};
use crate::config::{ConfidenceFloors, DetectorConfig, LabelFloors, MAX_CONFIDENCE};

const SPECTRAL_AI_EXPLANATION: &str =
    "Unnatural frequency consistency: spectral energy rolls off well below the range of live speech";
const SPECTRAL_HUMAN_EXPLANATION: &str =
    "Natural harmonic decay: spectral energy extends across the range of live speech";
const ENTROPY_AI_EXPLANATION: &str =
    "Low-entropy bitstream: byte distribution is more regular than compressed natural audio";
const ENTROPY_HUMAN_EXPLANATION: &str =
    "High-variance bitstream: byte distribution matches compressed natural audio";

/// Authenticity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Synthetic or machine-generated voice
    AiGenerated,
    /// Recorded human voice
    HumanAuthentic,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::AiGenerated => "AI_GENERATED",
            Classification::HumanAuthentic => "HUMAN_AUTHENTIC",
        }
    }
}

/// Label, confidence and explanation for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Classification,
    /// Always within `[floor(path, label), 0.99]`
    pub confidence: f64,
    pub explanation: String,
}

/// Classifier applies the per-path threshold rule
///
/// Holds only configuration; `classify` is a pure function of its input.
#[derive(Debug, Clone)]
pub struct Classifier {
    spectral_threshold_hz: f64,
    entropy_threshold_bits: f64,
    floors: ConfidenceFloors,
    sharpness: f64,
}

impl Classifier {
    /// Create a classifier from a validated detector configuration
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            spectral_threshold_hz: config.spectral_threshold_hz,
            entropy_threshold_bits: config.entropy_threshold_bits,
            floors: config.confidence_floors.clone(),
            sharpness: config.confidence_sharpness,
        }
    }

    /// Classify a finite feature value
    ///
    /// Values equal to the threshold are labelled `HumanAuthentic`.
    pub fn classify(&self, feature: FeatureValue) -> ClassificationResult {
        let threshold = self.threshold(feature.path);
        let label = if feature.value < threshold {
            Classification::AiGenerated
        } else {
            Classification::HumanAuthentic
        };

        let distance = (feature.value - threshold).abs() / threshold;
        let floor = self.floor(feature.path, label);

        ClassificationResult {
            label,
            confidence: self.confidence(distance, floor),
            explanation: explanation(feature.path, label).to_string(),
        }
    }

    pub fn threshold(&self, path: FeaturePath) -> f64 {
        match path {
            FeaturePath::Spectral => self.spectral_threshold_hz,
            FeaturePath::Entropy => self.entropy_threshold_bits,
        }
    }

    fn floor(&self, path: FeaturePath, label: Classification) -> f64 {
        let floors: &LabelFloors = match path {
            FeaturePath::Spectral => &self.floors.spectral,
            FeaturePath::Entropy => &self.floors.entropy,
        };
        match label {
            Classification::AiGenerated => floors.ai_generated,
            Classification::HumanAuthentic => floors.human_authentic,
        }
    }

    /// Saturating map from relative distance to confidence
    ///
    /// `floor + (0.99 - floor) * (1 - e^(-k * d))`, which equals the floor at
    /// the threshold and approaches 0.99 as the distance grows.
    fn confidence(&self, distance: f64, floor: f64) -> f64 {
        let span = MAX_CONFIDENCE - floor;
        let confidence = floor + span * (1.0 - (-self.sharpness * distance).exp());
        confidence.clamp(floor, MAX_CONFIDENCE)
    }
}

fn explanation(path: FeaturePath, label: Classification) -> &'static str {
    match (path, label) {
        (FeaturePath::Spectral, Classification::AiGenerated) => SPECTRAL_AI_EXPLANATION,
        (FeaturePath::Spectral, Classification::HumanAuthentic) => SPECTRAL_HUMAN_EXPLANATION,
        (FeaturePath::Entropy, Classification::AiGenerated) => ENTROPY_AI_EXPLANATION,
        (FeaturePath::Entropy, Classification::HumanAuthentic) => ENTROPY_HUMAN_EXPLANATION,
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
