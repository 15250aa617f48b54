//! spectra-render - draw a stacked spectral waveform of a WAV file to an image
//!
//! ```text
//! spectra-render <input.wav> <output.png> [--config <settings.yaml>]
//!                [--width N] [--height N] [--dpr F]
//! ```
//!
//! The image format follows the output extension (`.png`, `.bmp`, `.ppm`, ...).
//!
//! Without `--config`, settings are read from `~/.config/spectra/render.yaml`
//! (defaults when missing). Analysis results are cached per input path, so
//! re-rendering at another size skips decoding.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use spectra_core::config::{default_config_path, load_config, parse_config};
use spectra_core::{load_or_analyze, FileStore};
use spectra_widgets::wav::read_wav;
use spectra_widgets::{render, setup_surface, PixelBuffer, RenderSettings};

const USAGE: &str = "usage: spectra-render <input.wav> <output.png> [--config <settings.yaml>] [--width N] [--height N] [--dpr F]";

/// Parsed command line
struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    width: Option<f32>,
    height: Option<f32>,
    dpr: Option<f32>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut width = None;
    let mut height = None;
    let mut dpr = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
            "--width" => width = Some(parse_number(flag_value(&mut iter, arg)?, arg)?),
            "--height" => height = Some(parse_number(flag_value(&mut iter, arg)?, arg)?),
            "--dpr" => dpr = Some(parse_number(flag_value(&mut iter, arg)?, arg)?),
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(input), Some(output), None) => Ok(Args {
            input,
            output,
            config,
            width,
            height,
            dpr,
        }),
        _ => bail!("{}", USAGE),
    }
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str> {
    iter.next()
        .map(String::as_str)
        .with_context(|| format!("{} needs a value", flag))
}

fn parse_number(value: &str, flag: &str) -> Result<f32> {
    value
        .parse()
        .with_context(|| format!("{} expects a number, got {:?}", flag, value))
}

fn load_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings: RenderSettings = match &args.config {
        Some(path) => {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            parse_config(&yaml).with_context(|| format!("Invalid config file: {:?}", path))?
        }
        None => load_config(&default_config_path("render.yaml")),
    };

    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(dpr) = args.dpr {
        settings.device_pixel_ratio = dpr;
    }
    Ok(settings)
}

/// Stable cache identity for a local file
fn audio_url(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

fn run(args: Args) -> Result<()> {
    let settings = load_settings(&args)?;
    let store = FileStore::new(settings.resolved_cache_dir())
        .context("Failed to open render-data cache")?;

    let started = Instant::now();
    let data = load_or_analyze(
        &store,
        &audio_url(&args.input),
        settings.analysis.effective_target_count(),
        || read_wav(&args.input),
    )?;
    log::info!(
        "Render data for {:?} ready in {:.1}ms ({} positions)",
        args.input,
        started.elapsed().as_secs_f64() * 1000.0,
        data.len()
    );

    let started = Instant::now();
    let mut surface = PixelBuffer::new(settings.device_pixel_ratio);
    setup_surface(&mut surface, settings.width, settings.height)?;
    render(
        &mut surface,
        &data,
        &settings.palette.to_palette(),
        &settings.normalization,
    )?;
    log::info!(
        "Rendered {}x{} @ {}x in {:.1}ms",
        settings.width,
        settings.height,
        settings.device_pixel_ratio,
        started.elapsed().as_secs_f64() * 1000.0
    );

    surface
        .save_image(&args.output)
        .with_context(|| format!("Failed to write image: {:?}", args.output))?;
    log::info!("Wrote {:?}", args.output);

    Ok(())
}

fn main() -> Result<()> {
    // Set RUST_LOG=debug for pipeline details
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    run(parse_args(&args)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&strings(&["in.wav", "--width", "640", "out.png", "--dpr", "2"])).unwrap();
        assert_eq!(args.input, PathBuf::from("in.wav"));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.height, None);
        assert_eq!(args.dpr, Some(2.0));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&strings(&["only.wav"])).is_err());
        assert!(parse_args(&strings(&["a.wav", "b.png", "c"])).is_err());
        assert!(parse_args(&strings(&["a.wav", "b.png", "--width"])).is_err());
        assert!(parse_args(&strings(&["a.wav", "b.png", "--width", "wide"])).is_err());
        assert!(parse_args(&strings(&["a.wav", "b.png", "--bogus"])).is_err());
    }
}
