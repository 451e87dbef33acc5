// Entropy module - Byte-level statistics for undecodable blobs
//
// When a blob cannot be decoded as audio the only evidence left is the raw
// byte stream. Compressed speech is close to uniformly distributed (about
// 8 bits/byte); text, padding and repetitive generated data are not.

use super::types::EntropySummary;
use crate::error::DetectionError;

/// Computes Shannon entropy over the 256 byte values of a blob
#[derive(Debug, Default, Clone, Copy)]
pub struct EntropyFeatureExtractor;

impl EntropyFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Compute `-Σ p·log2(p)` over the byte values present in `blob`
    ///
    /// # Returns
    /// * `Ok(EntropySummary)` - Entropy in bits per byte plus counts
    /// * `Err(DetectionError::InsufficientData)` - `blob` is empty
    pub fn extract(&self, blob: &[u8]) -> Result<EntropySummary, DetectionError> {
        if blob.is_empty() {
            return Err(DetectionError::InsufficientData {
                required: 1,
                received: 0,
            });
        }

        let mut counts = [0u64; 256];
        for &byte in blob {
            counts[byte as usize] += 1;
        }

        let total = blob.len() as f64;
        let entropy_bits = counts
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum::<f64>();

        Ok(EntropySummary {
            entropy_bits,
            byte_count: blob.len(),
            distinct_values: counts.iter().filter(|&&count| count > 0).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_distinct_bytes() {
        let summary = EntropyFeatureExtractor::new().extract(b"abc").unwrap();
        assert!((summary.entropy_bits - 3f64.log2()).abs() < 1e-12);
        assert_eq!(summary.byte_count, 3);
        assert_eq!(summary.distinct_values, 3);
    }

    #[test]
    fn test_constant_blob_has_zero_entropy() {
        let summary = EntropyFeatureExtractor::new().extract(&[0x7f; 512]).unwrap();
        assert_eq!(summary.entropy_bits, 0.0);
        assert_eq!(summary.distinct_values, 1);
    }

    #[test]
    fn test_uniform_bytes_have_eight_bits() {
        let blob: Vec<u8> = (0..4).flat_map(|_| 0u8..=255).collect();
        let summary = EntropyFeatureExtractor::new().extract(&blob).unwrap();
        assert!((summary.entropy_bits - 8.0).abs() < 1e-12);
        assert_eq!(summary.distinct_values, 256);
    }

    #[test]
    fn test_single_byte_is_enough() {
        let summary = EntropyFeatureExtractor::new().extract(&[0x00]).unwrap();
        assert_eq!(summary.entropy_bits, 0.0);
    }

    #[test]
    fn test_empty_blob_is_insufficient() {
        let err = EntropyFeatureExtractor::new().extract(&[]).unwrap_err();
        assert_eq!(
            err,
            DetectionError::InsufficientData {
                required: 1,
                received: 0
            }
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let blob: Vec<u8> = (0..1000u32).map(|i| (i * 37 % 251) as u8).collect();
        let extractor = EntropyFeatureExtractor::new();
        assert_eq!(
            extractor.extract(&blob).unwrap(),
            extractor.extract(&blob).unwrap()
        );
    }
}
