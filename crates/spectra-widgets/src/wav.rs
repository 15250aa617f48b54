//! WAV decoding for the command-line renderer

use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use spectra_core::PcmBuffer;

/// Decode a WAV file into per-channel `f32` samples
///
/// Integer formats are scaled into `[-1, 1]` by their bit depth.
pub fn read_wav(path: &Path) -> Result<PcmBuffer> {
    let mut reader =
        WavReader::open(path).with_context(|| format!("Failed to open WAV file: {:?}", path))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("WAV file {:?} declares no channels", path);
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to read samples from {:?}", path))?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 * scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to read samples from {:?}", path))?
        }
    };

    let pcm = PcmBuffer::from_interleaved(&interleaved, spec.channels as usize, spec.sample_rate);
    log::debug!(
        "read_wav: {:?}: {} channels, {} Hz, {:.2}s",
        path,
        pcm.channel_count(),
        pcm.sample_rate,
        pcm.duration_secs()
    );

    Ok(pcm)
}
