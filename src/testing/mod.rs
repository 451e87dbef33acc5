//! Signal and clip generators shared by unit tests.
//!
//! Only compiled for unit tests; integration tests under `tests/` carry their
//! own copies since `cfg(test)` items are not visible to them.

use std::f32::consts::PI;
use std::io::Cursor;

/// Encode interleaved 16-bit samples as an in-memory WAV file
pub fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer =
            hound::WavWriter::new(Cursor::new(&mut bytes), spec).expect("WAV writer");
        for &sample in samples {
            writer.write_sample(sample).expect("WAV sample");
        }
        writer.finalize().expect("WAV finalize");
    }
    bytes
}

/// Encode 32-bit float samples as an in-memory IEEE-float WAV file
pub fn float_wav_bytes(sample_rate: u32, samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut bytes = Vec::new();
    {
        let mut writer =
            hound::WavWriter::new(Cursor::new(&mut bytes), spec).expect("WAV writer");
        for &sample in samples {
            writer.write_sample(sample).expect("WAV sample");
        }
        writer.finalize().expect("WAV finalize");
    }
    bytes
}

/// Generate a pure sine wave
pub fn sine_wave(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<f32> {
    (0..duration_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Quantize a float signal in [-1, 1] to 16-bit PCM
pub fn to_pcm16(signal: &[f32], amplitude: f32) -> Vec<i16> {
    signal
        .iter()
        .map(|&s| (s * amplitude * i16::MAX as f32) as i16)
        .collect()
}
