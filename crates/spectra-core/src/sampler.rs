//! Amplitude envelope generation
//!
//! Reduces a PCM channel to `target_count` mean-absolute-amplitude blocks.
//! Very long tracks are first decimated to [`MAX_ANALYSIS_FRAMES`] frames so
//! the cost of a full-track envelope stays bounded.

use std::borrow::Cow;

use crate::types::{Sample, MAX_ANALYSIS_FRAMES, MAX_TARGET_COUNT};

/// Compute the amplitude envelope of `pcm`
///
/// `target_count` is clamped to [`MAX_TARGET_COUNT`]. Each output value is the
/// mean absolute amplitude of one contiguous block; the last block absorbs any
/// remainder frames. Empty input yields an all-zero envelope.
///
/// # Example
///
/// ```
/// use spectra_core::sampler::sample;
///
/// let envelope = sample(&[0.5, -0.5, 1.0, -1.0], 2);
/// assert_eq!(envelope, vec![0.5, 1.0]);
/// ```
pub fn sample(pcm: &[Sample], target_count: usize) -> Vec<f32> {
    let target_count = target_count.min(MAX_TARGET_COUNT);
    if pcm.is_empty() || target_count == 0 {
        return vec![0.0; target_count];
    }

    let frames = decimate(pcm, MAX_ANALYSIS_FRAMES);
    let block_size = frames.len() / target_count;

    let mut envelope = Vec::with_capacity(target_count);
    for block in 0..target_count - 1 {
        let start = block * block_size;
        envelope.push(mean_abs(&frames[start..start + block_size]));
    }

    // Last block runs to the end of the buffer
    let last_start = (target_count - 1) * block_size;
    envelope.push(mean_abs(&frames[last_start..]));

    envelope
}

/// Nearest-index decimation down to exactly `max_frames` frames
///
/// Buffers at or below the limit are borrowed unchanged.
pub fn decimate(pcm: &[Sample], max_frames: usize) -> Cow<'_, [Sample]> {
    if pcm.len() <= max_frames {
        return Cow::Borrowed(pcm);
    }

    let step = pcm.len() as f64 / max_frames as f64;
    let decimated = (0..max_frames)
        .map(|i| pcm[((i as f64 * step) as usize).min(pcm.len() - 1)])
        .collect();
    Cow::Owned(decimated)
}

/// Mean absolute amplitude of a block (0 for an empty block)
///
/// Sums four samples per iteration, then the remainder individually.
#[inline]
pub fn mean_abs(block: &[Sample]) -> f32 {
    if block.is_empty() {
        return 0.0;
    }

    let chunks = block.chunks_exact(4);
    let remainder = chunks.remainder();

    let mut sum = 0.0f32;
    for chunk in chunks {
        sum += chunk[0].abs() + chunk[1].abs() + chunk[2].abs() + chunk[3].abs();
    }
    for sample in remainder {
        sum += sample.abs();
    }

    sum / block.len() as f32
}
