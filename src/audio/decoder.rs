//! Audio decoding from in-memory blobs.
//!
//! The decoder probes the blob with symphonia, decodes every packet of the
//! first audio track, down-mixes to mono and resamples to the detector's
//! sample rate. A blob that cannot be decoded is reported as
//! [`DecodeOutcome::NotDecodable`] rather than as an error, because the
//! pipeline treats that case as a normal branch.

use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::resample::resample_mono;
use crate::error::DecodeFailure;

/// Mono PCM samples at a known sample rate. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Result of a decode attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// Blob held audio; waveform is at the decoder's target sample rate
    Decoded(Waveform),
    /// Blob is not decodable audio
    NotDecodable(DecodeFailure),
}

/// Decodes arbitrary blobs into mono waveforms at a fixed sample rate
pub struct AudioDecoder {
    target_sample_rate: u32,
}

impl AudioDecoder {
    /// Create a decoder that resamples everything to `target_sample_rate`
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Attempt to decode `blob` as audio
    ///
    /// Never fails: unrecognized containers, empty or truncated blobs and
    /// decoder panics on hostile input all come back as `NotDecodable`.
    pub fn decode(&self, blob: &[u8]) -> DecodeOutcome {
        if blob.is_empty() {
            return DecodeOutcome::NotDecodable(DecodeFailure::new("empty blob"));
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.try_decode(blob))) {
            Ok(Ok(waveform)) => DecodeOutcome::Decoded(waveform),
            Ok(Err(failure)) => DecodeOutcome::NotDecodable(failure),
            Err(_) => DecodeOutcome::NotDecodable(DecodeFailure::new(
                "decoder panicked on malformed input",
            )),
        }
    }

    fn try_decode(&self, blob: &[u8]) -> Result<Waveform, DecodeFailure> {
        let (mono, native_rate) = decode_to_mono(blob)?;
        if mono.is_empty() {
            return Err(DecodeFailure::new("stream contains no audio samples"));
        }

        let samples = if native_rate != self.target_sample_rate {
            debug!(
                "[AudioDecoder] Resampling {} samples from {} Hz to {} Hz",
                mono.len(),
                native_rate,
                self.target_sample_rate
            );
            resample_mono(&mono, native_rate, self.target_sample_rate)?
        } else {
            mono
        };

        Ok(Waveform::new(samples, self.target_sample_rate))
    }
}

/// Decode every packet of the first audio track into mono samples
fn decode_to_mono(blob: &[u8]) -> Result<(Vec<f32>, u32), DecodeFailure> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(blob.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| DecodeFailure::new(format!("unrecognized container: {err}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeFailure::new("no audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|err| DecodeFailure::new(format!("unsupported codec: {err}")))?;

    let mut native_rate = codec_params.sample_rate;
    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) if mono.is_empty() => {
                return Err(DecodeFailure::new(format!("failed to read packet: {err}")));
            }
            Err(err) => {
                debug!("[AudioDecoder] Stopping at unreadable packet: {}", err);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                native_rate.get_or_insert(spec.rate);
                let channels = spec.channels.count().max(1);

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                downmix_into(&mut mono, buffer.samples(), channels);
            }
            Err(SymphoniaError::DecodeError(err)) => {
                debug!("[AudioDecoder] Skipping corrupt packet: {}", err);
            }
            Err(SymphoniaError::IoError(_)) => break,
            Err(err) => {
                return Err(DecodeFailure::new(format!("decoder error: {err}")));
            }
        }
    }

    let native_rate =
        native_rate.ok_or_else(|| DecodeFailure::new("sample rate not specified by stream"))?;

    Ok((mono, native_rate))
}

/// Average interleaved frames into mono samples
fn downmix_into(target: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels == 1 {
        target.extend_from_slice(interleaved);
        return;
    }

    target.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
