//! Clip builders shared by the integration tests.

#![allow(dead_code)]

use std::f32::consts::PI;
use std::io::Cursor;

use base64::Engine as _;

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

/// One second of digital silence at 16 kHz
pub fn silent_wav() -> Vec<u8> {
    wav_bytes(16_000, 1, &vec![0i16; 16_000])
}

/// Pure tone quantized to 16-bit PCM at half scale
pub fn sine_pcm(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<i16> {
    (0..duration_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            ((2.0 * PI * frequency * t).sin() * 0.5 * i16::MAX as f32) as i16
        })
        .collect()
}

/// White noise quantized to 16-bit PCM at half scale
pub fn noise_pcm(duration_samples: usize) -> Vec<i16> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..duration_samples)
        .map(|_| rng.gen_range(-16_000i16..16_000))
        .collect()
}

/// Deterministic high-entropy bytes that carry no container signature
///
/// 0xFF never appears, so no MPEG/ADTS frame sync can be found by probing.
pub fn opaque_bytes(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 255) as u8
        })
        .collect()
}

pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
