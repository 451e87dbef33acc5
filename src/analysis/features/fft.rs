// FFT module - Short-time Fourier transform framing and magnitude spectra
//
// This module handles frame slicing and FFT computation with Hann windowing
// to reduce spectral leakage. The magnitude spectrum of each frame is used by
// the spectral feature functions.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT processor that computes magnitude spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Periodic Hann window (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT frame size (2048 for 16 kHz speech)
    pub fn new(fft_size: usize) -> Self {
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / fft_size as f32).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies Hann windowing, performs FFT, and returns magnitude spectrum
    /// for positive frequencies only (exploiting symmetry of real-valued FFT).
    ///
    /// # Arguments
    /// * `frame` - Audio frame (length <= fft_size, zero-padded if shorter)
    ///
    /// # Returns
    /// Magnitude spectrum (size = fft_size / 2 + 1)
    pub fn compute_magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

/// Slice a padded signal into frames of `frame_size` every `hop_size` samples
///
/// Fed with the output of [`pad_centered`], frame `t` is centered on sample
/// `t * hop_size` of the original signal and there are `1 + len / hop_size`
/// frames. A padded signal shorter than one frame yields a single short frame.
pub fn centered_frames(padded: &[f32], frame_size: usize, hop_size: usize) -> Vec<&[f32]> {
    if padded.len() < frame_size {
        return vec![padded];
    }

    let frame_count = 1 + (padded.len() - frame_size) / hop_size;
    (0..frame_count)
        .map(|t| {
            let start = t * hop_size;
            &padded[start..start + frame_size]
        })
        .collect()
}

/// Zero-pad a signal by half a frame on each side
pub fn pad_centered(signal: &[f32], frame_size: usize) -> Vec<f32> {
    let pad = frame_size / 2;
    let mut padded = Vec::with_capacity(signal.len() + 2 * pad);
    padded.resize(pad, 0.0);
    padded.extend_from_slice(signal);
    padded.resize(signal.len() + 2 * pad, 0.0);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_matches_hop() {
        let signal = vec![0.0f32; 16_000];
        let padded = pad_centered(&signal, 2048);
        let frames = centered_frames(&padded, 2048, 512);
        assert_eq!(frames.len(), 1 + 16_000 / 512);
        assert!(frames.iter().all(|f| f.len() == 2048));
    }

    #[test]
    fn test_empty_signal_yields_one_frame() {
        let padded = pad_centered(&[], 2048);
        let frames = centered_frames(&padded, 2048, 512);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_spectrum_size_and_peak_bin() {
        let processor = FftProcessor::new(2048);
        let sample_rate = 16_000.0f32;
        let frame: Vec<f32> = (0..2048)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sample_rate).sin())
            .collect();

        let spectrum = processor.compute_magnitude_spectrum(&frame);
        assert_eq!(spectrum.len(), 1025);

        let (peak_bin, _) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        // 1000 Hz at 16 kHz / 2048 = 128
        assert_eq!(peak_bin, 128);
    }

    #[test]
    fn test_short_frame_is_zero_padded() {
        let processor = FftProcessor::new(2048);
        let spectrum = processor.compute_magnitude_spectrum(&[0.5; 100]);
        assert_eq!(spectrum.len(), 1025);
        assert!(spectrum.iter().all(|m| m.is_finite()));
    }
}
