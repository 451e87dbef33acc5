// Feature extraction - numeric evidence for the authenticity decision
//
// Two mutually exclusive extractors produce the evidence the classifier
// consumes:
//
// - SpectralFeatureExtractor: runs on decoded waveforms. Mean 85% spectral
//   rolloff over centered STFT frames, plus the mean zero-crossing rate as a
//   diagnostic.
// - EntropyFeatureExtractor: runs on raw blobs that failed to decode. Shannon
//   entropy in bits per byte.
//
// Module organization:
// - types: FeaturePath, FeatureValue and per-path summaries
// - fft: STFT framing and magnitude spectra
// - spectral: Frequency-domain features (rolloff)
// - temporal: Time-domain features (ZCR)
// - entropy: Byte-level statistics
// - mod.rs: SpectralFeatureExtractor coordinator

mod entropy;
mod fft;
mod spectral;
mod temporal;
mod types;

pub use entropy::EntropyFeatureExtractor;
pub use types::{EntropySummary, FeaturePath, FeatureValue, SpectralSummary};

use crate::audio::Waveform;
use crate::config::DetectorConfig;
use fft::{centered_frames, pad_centered, FftProcessor};
use spectral::SpectralFeatures;

/// SpectralFeatureExtractor coordinates STFT framing and per-frame features
///
/// Holds a pre-planned FFT and window; extraction borrows `&self` only, so one
/// extractor can serve concurrent requests.
pub struct SpectralFeatureExtractor {
    fft_processor: FftProcessor,
    hop_size: usize,
    rolloff_percent: f64,
}

impl SpectralFeatureExtractor {
    /// Create an extractor with explicit framing
    ///
    /// # Arguments
    /// * `frame_size` - STFT frame length in samples (e.g., 2048)
    /// * `hop_size` - Distance between frame centers in samples (e.g., 512)
    /// * `rolloff_percent` - Energy fraction defining the rolloff (e.g., 0.85)
    pub fn new(frame_size: usize, hop_size: usize, rolloff_percent: f64) -> Self {
        Self {
            fft_processor: FftProcessor::new(frame_size),
            hop_size,
            rolloff_percent,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.frame_size, config.hop_size, config.rolloff_percent)
    }

    /// Extract the spectral summary of a whole clip
    ///
    /// 1. Zero-pad by half a frame on both sides and slice centered frames
    /// 2. Compute the magnitude spectrum and rolloff of every frame
    /// 3. Average rolloff and zero-crossing rate across frames
    ///
    /// A silent waveform yields a rolloff of 0 Hz.
    pub fn extract(&self, waveform: &Waveform) -> SpectralSummary {
        let frame_size = self.fft_processor.fft_size();
        let spectral = SpectralFeatures::new(
            waveform.sample_rate(),
            frame_size,
            self.rolloff_percent,
        );

        let padded = pad_centered(waveform.samples(), frame_size);
        let frames = centered_frames(&padded, frame_size, self.hop_size);

        let mut rolloff_sum = 0.0;
        let mut zcr_sum = 0.0;
        for frame in &frames {
            let spectrum = self.fft_processor.compute_magnitude_spectrum(frame);
            rolloff_sum += spectral.compute_rolloff(&spectrum);
            zcr_sum += temporal::compute_zcr(frame);
        }

        let frame_count = frames.len();
        SpectralSummary {
            rolloff_hz: rolloff_sum / frame_count as f64,
            zero_crossing_rate: zcr_sum / frame_count as f64,
            frame_count,
            duration_seconds: waveform.duration_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sine_wave;

    const SAMPLE_RATE: u32 = 16_000;

    fn extractor() -> SpectralFeatureExtractor {
        SpectralFeatureExtractor::from_config(&DetectorConfig::default())
    }

    /// Generate white noise for testing
    fn white_noise(duration_samples: usize) -> Vec<f32> {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        (0..duration_samples)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect()
    }

    #[test]
    fn test_silence_has_zero_rolloff() {
        let waveform = Waveform::new(vec![0.0; SAMPLE_RATE as usize], SAMPLE_RATE);
        let summary = extractor().extract(&waveform);

        assert_eq!(summary.rolloff_hz, 0.0, "Rolloff should be 0 for silence");
        assert_eq!(summary.zero_crossing_rate, 0.0);
        assert_eq!(summary.frame_count, 1 + SAMPLE_RATE as usize / 512);
    }

    #[test]
    fn test_rolloff_tracks_frequency() {
        let low = Waveform::new(sine_wave(SAMPLE_RATE, 200.0, 16_000), SAMPLE_RATE);
        let high = Waveform::new(sine_wave(SAMPLE_RATE, 6000.0, 16_000), SAMPLE_RATE);

        let low_summary = extractor().extract(&low);
        let high_summary = extractor().extract(&high);

        println!("Low freq (200 Hz) rolloff: {} Hz", low_summary.rolloff_hz);
        println!("High freq (6000 Hz) rolloff: {} Hz", high_summary.rolloff_hz);

        assert!(
            low_summary.rolloff_hz < 600.0,
            "Expected rolloff < 600 Hz for 200 Hz sine, got {} Hz",
            low_summary.rolloff_hz
        );
        assert!(
            high_summary.rolloff_hz > 5000.0,
            "Expected rolloff > 5000 Hz for 6000 Hz sine, got {} Hz",
            high_summary.rolloff_hz
        );
    }

    #[test]
    fn test_white_noise_rolloff_near_85_percent_of_nyquist() {
        let waveform = Waveform::new(white_noise(32_000), SAMPLE_RATE);
        let summary = extractor().extract(&waveform);
        let expected = 0.85 * SAMPLE_RATE as f64 / 2.0;

        assert!(
            (summary.rolloff_hz - expected).abs() < 800.0,
            "Expected noise rolloff near {} Hz, got {} Hz",
            expected,
            summary.rolloff_hz
        );
        assert!(
            summary.zero_crossing_rate > 0.3,
            "Expected noise ZCR > 0.3, got {}",
            summary.zero_crossing_rate
        );
    }

    #[test]
    fn test_rolloff_within_nyquist() {
        let waveform = Waveform::new(sine_wave(SAMPLE_RATE, 1000.0, 8000), SAMPLE_RATE);
        let summary = extractor().extract(&waveform);
        assert!(summary.rolloff_hz >= 0.0 && summary.rolloff_hz <= SAMPLE_RATE as f64 / 2.0);
        assert!((0.0..=1.0).contains(&summary.zero_crossing_rate));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let waveform = Waveform::new(white_noise(12_345), SAMPLE_RATE);
        let extractor = extractor();
        assert_eq!(extractor.extract(&waveform), extractor.extract(&waveform));
    }

    #[test]
    fn test_non_finite_samples_give_non_finite_rolloff() {
        let mut samples = sine_wave(SAMPLE_RATE, 1000.0, 8000);
        samples[4000] = f32::NAN;
        let summary = extractor().extract(&Waveform::new(samples, SAMPLE_RATE));
        assert!(
            !summary.rolloff_hz.is_finite(),
            "Expected non-finite rolloff, got {} Hz",
            summary.rolloff_hz
        );
    }

    #[test]
    fn test_short_and_empty_waveforms() {
        let short = Waveform::new(sine_wave(SAMPLE_RATE, 1000.0, 100), SAMPLE_RATE);
        let summary = extractor().extract(&short);
        assert_eq!(summary.frame_count, 1);
        assert!(summary.rolloff_hz.is_finite());

        let empty = Waveform::new(Vec::new(), SAMPLE_RATE);
        let summary = extractor().extract(&empty);
        assert_eq!(summary.frame_count, 1);
        assert_eq!(summary.rolloff_hz, 0.0);
    }
}
