// Types module - Data structures for extracted evidence
//
// A feature value is always tagged with the path that produced it: rolloff in
// Hz and entropy in bits per byte live on unrelated scales and are compared
// against different thresholds.

use serde::{Deserialize, Serialize};

/// Which extractor produced a feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePath {
    /// Mean spectral rolloff of a decoded waveform
    Spectral,
    /// Shannon entropy of an undecodable blob
    Entropy,
}

impl FeaturePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeaturePath::Spectral => "spectral",
            FeaturePath::Entropy => "entropy",
        }
    }
}

/// Scalar evidence fed to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub path: FeaturePath,
    /// Rolloff in Hz on the spectral path, bits per byte on the entropy path
    pub value: f64,
}

impl FeatureValue {
    pub fn spectral(rolloff_hz: f64) -> Self {
        Self {
            path: FeaturePath::Spectral,
            value: rolloff_hz,
        }
    }

    pub fn entropy(bits_per_byte: f64) -> Self {
        Self {
            path: FeaturePath::Entropy,
            value: bits_per_byte,
        }
    }
}

/// Output of the spectral extractor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralSummary {
    /// Mean 85% spectral rolloff across frames, in Hz
    pub rolloff_hz: f64,

    /// Mean zero-crossing rate across frames (0.0 to 1.0)
    ///
    /// Reported as diagnostic evidence only; the decision uses the rolloff.
    pub zero_crossing_rate: f64,

    /// Number of STFT frames analyzed
    pub frame_count: usize,

    /// Clip length in seconds
    pub duration_seconds: f64,
}

/// Output of the entropy extractor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropySummary {
    /// Shannon entropy in bits per byte (0.0 to 8.0)
    pub entropy_bits: f64,
    pub byte_count: usize,
    /// Number of distinct byte values present
    pub distinct_values: usize,
}
