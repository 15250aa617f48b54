//! Common types for Spectra
//!
//! This module contains the data model shared between analysis and rendering:
//! the decoded PCM input, the per-position band energies, and the cacheable
//! `WaveformRenderData` artifact.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling for the number of envelope positions per track
pub const MAX_TARGET_COUNT: usize = 600;

/// Default number of envelope positions requested by displays
pub const DEFAULT_TARGET_COUNT: usize = MAX_TARGET_COUNT;

/// Tracks longer than this are decimated before block reduction
pub const MAX_ANALYSIS_FRAMES: usize = 100_000;

/// Amplitude envelope quantization (pixel height buckets)
pub const WAVEFORM_QUANTIZATION_LEVELS: u32 = 8;

/// Band ratio and band height quantization
pub const FREQUENCY_QUANTIZATION_LEVELS: u32 = 16;

/// Audio sample type (32-bit float, nominally in [-1.0, 1.0])
pub type Sample = f32;

/// Errors raised when assembling render data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderDataError {
    /// Envelope and band energies must describe the same positions
    #[error("Length mismatch: {waveform} waveform positions, {spectral} spectral positions")]
    LengthMismatch { waveform: usize, spectral: usize },
}

/// Relative low/mid/high band energy for one envelope position
///
/// These are variation proxies, not physical units; values are only
/// comparable within the same track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralTriple {
    pub low_energy: f32,
    pub mid_energy: f32,
    pub high_energy: f32,
}

impl SpectralTriple {
    /// All-zero energies (silent or empty window)
    pub const ZERO: Self = Self {
        low_energy: 0.0,
        mid_energy: 0.0,
        high_energy: 0.0,
    };

    pub fn new(low_energy: f32, mid_energy: f32, high_energy: f32) -> Self {
        Self {
            low_energy,
            mid_energy,
            high_energy,
        }
    }

    /// Sum of the three band energies
    pub fn total(&self) -> f32 {
        self.low_energy + self.mid_energy + self.high_energy
    }

    /// Linear interpolation between two positions (`t` in [0, 1])
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            low_energy: self.low_energy + (other.low_energy - self.low_energy) * t,
            mid_energy: self.mid_energy + (other.mid_energy - self.mid_energy) * t,
            high_energy: self.high_energy + (other.high_energy - self.high_energy) * t,
        }
    }
}

/// Precomputed display data for one track
///
/// Produced once per (buffer, requested length) pair and read-only afterwards.
/// Both arrays always have the same length. Serializes to
/// `{ "waveformData": [...], "spectralData": [{ "lowEnergy", ... }] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRenderData")]
pub struct WaveformRenderData {
    waveform_data: Vec<f32>,
    spectral_data: Vec<SpectralTriple>,
}

/// Unvalidated wire shape, checked on deserialization
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRenderData {
    waveform_data: Vec<f32>,
    spectral_data: Vec<SpectralTriple>,
}

impl TryFrom<RawRenderData> for WaveformRenderData {
    type Error = RenderDataError;

    fn try_from(raw: RawRenderData) -> Result<Self, Self::Error> {
        Self::new(raw.waveform_data, raw.spectral_data)
    }
}

impl WaveformRenderData {
    /// Pair an envelope with its band energies
    pub fn new(
        waveform_data: Vec<f32>,
        spectral_data: Vec<SpectralTriple>,
    ) -> Result<Self, RenderDataError> {
        if waveform_data.len() != spectral_data.len() {
            return Err(RenderDataError::LengthMismatch {
                waveform: waveform_data.len(),
                spectral: spectral_data.len(),
            });
        }
        Ok(Self {
            waveform_data,
            spectral_data,
        })
    }

    /// All-zero data with `len` positions (degenerate audio)
    pub fn silent(len: usize) -> Self {
        Self {
            waveform_data: vec![0.0; len],
            spectral_data: vec![SpectralTriple::ZERO; len],
        }
    }

    /// Mean-absolute amplitude envelope
    pub fn waveform_data(&self) -> &[f32] {
        &self.waveform_data
    }

    /// Band energies, one per envelope position
    pub fn spectral_data(&self) -> &[SpectralTriple] {
        &self.spectral_data
    }

    /// Number of envelope positions
    pub fn len(&self) -> usize {
        self.waveform_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waveform_data.is_empty()
    }
}

/// Decoded PCM handed over by the decode layer
///
/// Only channel 0 is analyzed; the remaining channels are kept so callers
/// can pass decoder output through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PcmBuffer {
    /// One sample vector per channel
    pub channels: Vec<Vec<Sample>>,
    /// Sample rate in Hz (metadata only)
    pub sample_rate: u32,
}

impl PcmBuffer {
    /// Wrap a single mono channel
    pub fn mono(samples: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// De-interleave decoder output (`[l0, r0, l1, r1, ...]`)
    ///
    /// A trailing partial frame is dropped. `channel_count == 0` yields an
    /// empty buffer.
    pub fn from_interleaved(samples: &[Sample], channel_count: usize, sample_rate: u32) -> Self {
        if channel_count == 0 {
            return Self {
                channels: Vec::new(),
                sample_rate,
            };
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self {
            channels,
            sample_rate,
        }
    }

    /// Channel 0, or an empty slice when the buffer has no channels
    pub fn primary_channel(&self) -> &[Sample] {
        self.channels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of frames in channel 0
    pub fn frame_count(&self) -> usize {
        self.primary_channel().len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Duration in seconds (0 when the sample rate is unknown)
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }
}
