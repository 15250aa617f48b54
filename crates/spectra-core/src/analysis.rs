//! Track analysis pipeline
//!
//! Runs the sampler and the band-energy analyzer over channel 0 of a decoded
//! track, producing the cacheable [`WaveformRenderData`]. Batches of
//! independent tracks can be analyzed on a rayon pool.

use std::time::Instant;

use rayon::prelude::*;

use crate::sampler;
use crate::spectral;
use crate::types::{PcmBuffer, WaveformRenderData, MAX_TARGET_COUNT};

/// Upper bound for batch analysis workers
pub const MAX_ANALYSIS_WORKERS: usize = 16;

/// Analyze one decoded track
///
/// Sampler first, then the analyzer over the same channel using the envelope
/// length. `target_count` is clamped to [`MAX_TARGET_COUNT`]. An empty buffer
/// yields all-zero data of the requested length.
pub fn analyze_track(pcm: &PcmBuffer, target_count: usize) -> WaveformRenderData {
    let target_count = target_count.min(MAX_TARGET_COUNT);
    let samples = pcm.primary_channel();

    if samples.is_empty() {
        log::debug!("analyze_track: empty buffer, returning {} silent positions", target_count);
        return WaveformRenderData::silent(target_count);
    }

    let start = Instant::now();
    let waveform_data = sampler::sample(samples, target_count);
    let spectral_data = spectral::analyze(samples, &waveform_data);

    log::debug!(
        "analyze_track: {} frames ({} channels, {} Hz) -> {} positions in {:?}",
        samples.len(),
        pcm.channel_count(),
        pcm.sample_rate,
        waveform_data.len(),
        start.elapsed()
    );

    match WaveformRenderData::new(waveform_data, spectral_data) {
        Ok(data) => data,
        Err(e) => {
            log::error!("analyze_track: {}, returning silent data", e);
            WaveformRenderData::silent(target_count)
        }
    }
}

/// Analyze many tracks in parallel, preserving input order
///
/// `workers` is clamped to `1..=MAX_ANALYSIS_WORKERS`. If a dedicated pool
/// cannot be built the global rayon pool is used instead.
pub fn analyze_batch(
    tracks: &[PcmBuffer],
    target_count: usize,
    workers: usize,
) -> Vec<WaveformRenderData> {
    let workers = workers.clamp(1, MAX_ANALYSIS_WORKERS);
    let start = Instant::now();

    log::info!(
        "analyze_batch: Analyzing {} tracks with {} workers",
        tracks.len(),
        workers
    );

    let run = || {
        tracks
            .par_iter()
            .map(|pcm| analyze_track(pcm, target_count))
            .collect::<Vec<_>>()
    };

    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("spectra-analysis-{}", i))
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!("analyze_batch: Failed to build thread pool: {}, using global pool", e);
            run()
        }
    };

    log::info!(
        "analyze_batch: Finished {} tracks in {:?}",
        results.len(),
        start.elapsed()
    );

    results
}
