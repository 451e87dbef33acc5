//! Transport payload repair.
//!
//! Clients send audio as standard base64, often wrapped in quotes, split over
//! several lines or stripped of its trailing padding by an intermediate layer.
//! [`ByteSanitizer`] removes everything outside the base64 alphabet, restores
//! the padding and decodes the result into an [`AudioPayload`].

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::DetectionError;

/// Standard alphabet decoder that tolerates non-zero trailing bits.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Opaque audio bytes owned by one detection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Repairs base64 transport strings into binary blobs.
pub struct ByteSanitizer;

impl ByteSanitizer {
    /// Strip characters outside `A-Z a-z 0-9 + / =` and right-pad with `=`
    /// until the length is a multiple of four.
    pub fn clean(transport: &str) -> String {
        let mut cleaned: String = transport
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
            .collect();

        let remainder = cleaned.len() % 4;
        if remainder != 0 {
            cleaned.extend(std::iter::repeat('=').take(4 - remainder));
        }

        cleaned
    }

    /// Clean and decode a transport string.
    ///
    /// # Returns
    /// * `Ok(AudioPayload)` - Decoded bytes (possibly empty)
    /// * `Err(DetectionError::InvalidEncoding)` - Still not valid base64 after cleaning
    pub fn sanitize(transport: &str) -> Result<AudioPayload, DetectionError> {
        let cleaned = Self::clean(transport);
        if cleaned.len() != transport.len() {
            tracing::debug!(
                "[ByteSanitizer] Repaired transport string ({} -> {} chars)",
                transport.len(),
                cleaned.len()
            );
        }

        let bytes = LENIENT_STANDARD.decode(cleaned.as_bytes())?;
        Ok(AudioPayload::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_clean_leaves_valid_base64_untouched() {
        let encoded = STANDARD.encode(b"RIFF\x24\x00\x00\x00WAVE");
        assert_eq!(ByteSanitizer::clean(&encoded), encoded);
    }

    #[test]
    fn test_valid_base64_round_trips() {
        let original: Vec<u8> = (0u8..=255).collect();
        let encoded = STANDARD.encode(&original);
        let payload = ByteSanitizer::sanitize(&encoded).unwrap();
        assert_eq!(payload.as_bytes(), original.as_slice());
    }

    #[test]
    fn test_contaminated_and_unpadded_matches_clean() {
        let original = b"human speech sample".to_vec();
        let encoded = STANDARD.encode(&original);
        let trimmed = encoded.trim_end_matches('=');
        let (head, tail) = trimmed.split_at(trimmed.len() / 2);
        let contaminated = format!("[\"{}\n  {}\"]\r\n", head, tail);

        let payload = ByteSanitizer::sanitize(&contaminated).unwrap();
        assert_eq!(payload.as_bytes(), original.as_slice());
    }

    #[test]
    fn test_padding_is_restored() {
        assert_eq!(ByteSanitizer::clean("YWI"), "YWI=");
        assert_eq!(ByteSanitizer::clean("YQ"), "YQ==");
        assert_eq!(ByteSanitizer::sanitize("YWI").unwrap().as_bytes(), b"ab");
        assert_eq!(ByteSanitizer::sanitize("YQ").unwrap().as_bytes(), b"a");
    }

    #[test]
    fn test_abc_decodes_to_three_bytes() {
        let payload = ByteSanitizer::sanitize("YWJj").unwrap();
        assert_eq!(payload.as_bytes(), &[0x61, 0x62, 0x63]);
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn test_empty_input_yields_empty_payload() {
        let payload = ByteSanitizer::sanitize("").unwrap();
        assert!(payload.is_empty());

        let payload = ByteSanitizer::sanitize(" \n\t\"\" ").unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_unrepairable_length_is_invalid_encoding() {
        // Five alphabet characters cannot be completed by padding
        let err = ByteSanitizer::sanitize("YWJjZ").unwrap_err();
        assert!(matches!(err, DetectionError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_misplaced_padding_is_invalid_encoding() {
        let err = ByteSanitizer::sanitize("YW=jZGVm").unwrap_err();
        assert!(matches!(err, DetectionError::InvalidEncoding { .. }));
    }
}
