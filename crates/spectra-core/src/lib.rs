//! Spectra Core - waveform envelope and band-energy analysis
//!
//! Turns decoded PCM into [`WaveformRenderData`]: a mean-absolute amplitude
//! envelope plus a cheap low/mid/high energy estimate per position. The data
//! is resolution-stable, so it is computed once per track and cached; display
//! size, palette and normalization changes only re-run the render step in
//! `spectra-widgets`.
//!
//! Pipeline, in order:
//!
//! 1. [`sampler::sample`] - PCM to amplitude envelope
//! 2. [`spectral::analyze`] - PCM + envelope length to band energies
//! 3. [`normalize::normalize`] - envelope to quantized pixel heights (render time)
//!
//! Every step is a pure function over its arguments; independent tracks can be
//! analyzed concurrently with [`analysis::analyze_batch`].

pub mod analysis;
pub mod config;
pub mod normalize;
pub mod sampler;
pub mod spectral;
pub mod store;
pub mod types;

pub use analysis::{analyze_batch, analyze_track};
pub use normalize::{normalize, quantize_amplitude, NormalizationConfig, NormalizationConstraint};
pub use store::{cache_key, load_or_analyze, FileStore, MemoryStore, RenderDataStore, StoreError};
pub use types::*;
