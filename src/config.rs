//! Configuration management for the detector and its HTTP boundary
//!
//! This module provides runtime configuration loading from JSON files so
//! thresholds and confidence floors can be tuned without recompilation.
//! Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::DetectionError;

/// Upper bound on every confidence score; the detector never claims certainty
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    pub server: ServerConfig,
}

/// Decision pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Mean spectral rolloff (Hz) below which a clip is labeled AI-generated
    pub spectral_threshold_hz: f64,
    /// Byte entropy (bits/byte) below which an undecodable blob is labeled AI-generated
    pub entropy_threshold_bits: f64,
    /// Minimum confidence per feature path and label
    pub confidence_floors: ConfidenceFloors,
    /// How quickly confidence saturates with relative distance from the threshold
    pub confidence_sharpness: f64,
    /// Sample rate every decoded waveform is resampled to
    pub sample_rate: u32,
    /// STFT frame length in samples
    pub frame_size: usize,
    /// STFT hop length in samples
    pub hop_size: usize,
    /// Fraction of per-frame spectral energy that defines the rolloff
    pub rolloff_percent: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            spectral_threshold_hz: 3300.0,
            entropy_threshold_bits: 7.5,
            confidence_floors: ConfidenceFloors::default(),
            confidence_sharpness: 3.0,
            sample_rate: 16_000,
            frame_size: 2048,
            hop_size: 512,
            rolloff_percent: 0.85,
        }
    }
}

/// Confidence floors for both feature paths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfidenceFloors {
    pub spectral: LabelFloors,
    pub entropy: LabelFloors,
}

impl Default for ConfidenceFloors {
    fn default() -> Self {
        // The entropy path only runs on unparseable input, so it starts lower
        Self {
            spectral: LabelFloors {
                ai_generated: 0.70,
                human_authentic: 0.65,
            },
            entropy: LabelFloors {
                ai_generated: 0.55,
                human_authentic: 0.50,
            },
        }
    }
}

/// Confidence floor per label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LabelFloors {
    pub ai_generated: f64,
    pub human_authentic: f64,
}

impl DetectorConfig {
    /// Check that thresholds, floors and framing are usable
    ///
    /// # Returns
    /// * `Ok(())` - Configuration can drive the pipeline
    /// * `Err(DetectionError::InvalidConfig)` - First violated constraint
    pub fn validate(&self) -> Result<(), DetectionError> {
        let invalid = |reason: String| Err(DetectionError::InvalidConfig { reason });

        if !(self.spectral_threshold_hz.is_finite() && self.spectral_threshold_hz > 0.0) {
            return invalid(format!(
                "spectral_threshold_hz must be positive (got {})",
                self.spectral_threshold_hz
            ));
        }
        if !(self.entropy_threshold_bits > 0.0 && self.entropy_threshold_bits <= 8.0) {
            return invalid(format!(
                "entropy_threshold_bits must be in (0, 8] (got {})",
                self.entropy_threshold_bits
            ));
        }
        if !(self.confidence_sharpness.is_finite() && self.confidence_sharpness > 0.0) {
            return invalid(format!(
                "confidence_sharpness must be positive (got {})",
                self.confidence_sharpness
            ));
        }
        if self.sample_rate == 0 {
            return invalid("sample_rate must be > 0".to_string());
        }
        if self.frame_size < 2 || self.hop_size == 0 {
            return invalid(format!(
                "frame_size must be >= 2 and hop_size > 0 (got {} / {})",
                self.frame_size, self.hop_size
            ));
        }
        if !(self.rolloff_percent > 0.0 && self.rolloff_percent <= 1.0) {
            return invalid(format!(
                "rolloff_percent must be in (0, 1] (got {})",
                self.rolloff_percent
            ));
        }

        let floors = &self.confidence_floors;
        for (name, value) in [
            ("spectral.ai_generated", floors.spectral.ai_generated),
            ("spectral.human_authentic", floors.spectral.human_authentic),
            ("entropy.ai_generated", floors.entropy.ai_generated),
            ("entropy.human_authentic", floors.entropy.human_authentic),
        ] {
            if !(0.0..=MAX_CONFIDENCE).contains(&value) {
                return invalid(format!(
                    "confidence floor {} must be in [0, {}] (got {})",
                    name, MAX_CONFIDENCE, value
                ));
            }
        }
        if floors.entropy.ai_generated > floors.spectral.ai_generated
            || floors.entropy.human_authentic > floors.spectral.human_authentic
        {
            return invalid("entropy confidence floors must not exceed spectral floors".to_string());
        }

        Ok(())
    }
}

/// HTTP boundary configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API binds to
    pub bind_addr: String,
    /// Expected value of the `x-api-key` header
    pub api_key: String,
    /// Canonical language names accepted by the detection endpoint
    pub supported_languages: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            api_key: "sk_test_123456789".to_string(),
            supported_languages: ["Tamil", "English", "Hindi", "Malayalam", "Telugu"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or the defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    tracing::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Apply `VOICE_AUTH_ADDR` and `VOICE_AUTH_API_KEY` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var("VOICE_AUTH_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Ok(key) = std::env::var("VOICE_AUTH_API_KEY") {
            self.server.api_key = key;
        }
        self
    }
}
