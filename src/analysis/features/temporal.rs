// Temporal module - Time-domain feature extraction
//
// This module computes features directly from time-domain audio frames.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Compute zero-crossing rate (ZCR)
///
/// Formula: ZCR = (1 / (N - 1)) × Σ [sign(x[n]) ≠ sign(x[n-1])]
///
/// ZCR measures how often the signal changes sign. High ZCR indicates
/// breath noise or fricatives; very low ZCR indicates tonal, smooth content.
/// Zero counts as positive.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0)
pub fn compute_zcr(frame: &[f32]) -> f64 {
    if frame.len() < 2 {
        return 0.0;
    }

    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();

    crossings as f64 / (frame.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zcr_alternating_signal() {
        let frame: Vec<f32> = (0..100)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        assert_eq!(compute_zcr(&frame), 1.0);
    }

    #[test]
    fn test_zcr_silence_and_short_frames() {
        assert_eq!(compute_zcr(&[0.0; 64]), 0.0);
        assert_eq!(compute_zcr(&[0.3]), 0.0);
        assert_eq!(compute_zcr(&[]), 0.0);
    }
}
