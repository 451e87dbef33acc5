// Spectral module - Frequency-domain feature extraction
//
// This module computes spectral features from magnitude spectra.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
    rolloff_percent: f64,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT frame size
    /// * `rolloff_percent` - Fraction of spectral energy that defines the rolloff
    pub fn new(sample_rate: u32, fft_size: usize, rolloff_percent: f64) -> Self {
        Self {
            sample_rate,
            fft_size,
            rolloff_percent,
        }
    }

    /// Compute spectral rolloff for one frame
    ///
    /// Finds the first bin whose cumulative magnitude reaches `rolloff_percent`
    /// of the frame total, and returns that bin's center frequency
    /// (`k * sample_rate / fft_size`). A silent frame has a zero total, so the
    /// first bin already satisfies the comparison and the rolloff is 0 Hz.
    ///
    /// # Arguments
    /// * `spectrum` - Magnitude spectrum (fft_size / 2 + 1 bins)
    ///
    /// # Returns
    /// Rolloff frequency in Hz, or NaN when the spectrum holds non-finite
    /// magnitudes
    pub fn compute_rolloff(&self, spectrum: &[f32]) -> f64 {
        let freq_bin_width = self.sample_rate as f64 / self.fft_size as f64;
        let total: f64 = spectrum.iter().map(|&mag| mag as f64).sum();
        if !total.is_finite() {
            return f64::NAN;
        }
        let threshold = self.rolloff_percent * total;

        let mut cumulative = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            cumulative += mag as f64;
            if cumulative >= threshold {
                return i as f64 * freq_bin_width;
            }
        }

        // Rounding can leave the last partial sum just short of the threshold
        spectrum.len().saturating_sub(1) as f64 * freq_bin_width
    }
}
