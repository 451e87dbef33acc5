//! Sample-rate conversion for decoded audio.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::DecodeFailure;

/// Upper bound on zero-filled chunks pushed through the filter after the input
const MAX_FLUSH_CHUNKS: usize = 4;

/// Resample a mono signal from `source_rate` to `target_rate`
///
/// Uses sinc interpolation with a BlackmanHarris2 window, a 256-tap filter and
/// a 0.95 cutoff to avoid aliasing. The whole signal is processed as a single
/// chunk, then the filter is flushed with silence. The filter delay is trimmed
/// from the front, so output sample `n` lines up with input time
/// `n / target_rate` and the output holds `round(len * ratio)` samples.
pub fn resample_mono(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, DecodeFailure> {
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, samples.len(), 1)
        .map_err(|err| DecodeFailure::new(format!("failed to create resampler: {err}")))?;

    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();

    let input = vec![samples.to_vec()];
    let mut output = resampler
        .process(&input, None)
        .map_err(|err| DecodeFailure::new(format!("resampling failed: {err}")))?
        .swap_remove(0);

    // Each flush pushes a full chunk of zeros; one is normally enough
    for _ in 0..MAX_FLUSH_CHUNKS {
        if output.len() >= delay + expected {
            break;
        }
        let tail = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|err| DecodeFailure::new(format!("resampler flush failed: {err}")))?;
        match tail.into_iter().next() {
            Some(chunk) if !chunk.is_empty() => output.extend_from_slice(&chunk),
            _ => break,
        }
    }

    output.drain(..delay.min(output.len()));
    output.truncate(expected);
    Ok(output)
}
