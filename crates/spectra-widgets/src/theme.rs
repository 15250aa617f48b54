//! Color palette for band-colored waveforms
//!
//! Palettes are configured as hex strings (e.g. `"#33CC66"`) in YAML and
//! converted to iced colors for rendering. Every field is optional in the
//! file; unparsable values fall back to white with a warning.

use iced::Color;
use serde::{Deserialize, Serialize};

/// Default background (#111114)
pub const DEFAULT_BACKGROUND: Color = Color::from_rgb(17.0 / 255.0, 17.0 / 255.0, 20.0 / 255.0);
/// Default low band color, Orange-Red (#E6604D)
pub const DEFAULT_LOW_FREQUENCY: Color = Color::from_rgb(230.0 / 255.0, 96.0 / 255.0, 77.0 / 255.0);
/// Default mid band color, Green (#33CC66)
pub const DEFAULT_MID_FREQUENCY: Color = Color::from_rgb(51.0 / 255.0, 204.0 / 255.0, 102.0 / 255.0);
/// Default high band color, Cyan (#00CCCC)
pub const DEFAULT_HIGH_FREQUENCY: Color = Color::from_rgb(0.0, 204.0 / 255.0, 204.0 / 255.0);

/// Resolved colors used by the compositor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    pub background: Color,
    pub low_frequency: Color,
    pub mid_frequency: Color,
    pub high_frequency: Color,
    /// Baseline bar under the waveform
    pub center_line: Color,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            low_frequency: DEFAULT_LOW_FREQUENCY,
            mid_frequency: DEFAULT_MID_FREQUENCY,
            high_frequency: DEFAULT_HIGH_FREQUENCY,
            center_line: DEFAULT_LOW_FREQUENCY,
        }
    }
}

/// Palette as stored in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteColors {
    pub background: String,
    pub low_frequency: String,
    pub mid_frequency: String,
    pub high_frequency: String,
    pub center_line: String,
}

impl Default for PaletteColors {
    fn default() -> Self {
        Self {
            background: "#111114".to_string(),
            low_frequency: "#E6604D".to_string(),
            mid_frequency: "#33CC66".to_string(),
            high_frequency: "#00CCCC".to_string(),
            center_line: "#E6604D".to_string(),
        }
    }
}

impl PaletteColors {
    /// Resolve hex strings into a [`ColorPalette`]
    pub fn to_palette(&self) -> ColorPalette {
        ColorPalette {
            background: parse_hex_color(&self.background),
            low_frequency: parse_hex_color(&self.low_frequency),
            mid_frequency: parse_hex_color(&self.mid_frequency),
            high_frequency: parse_hex_color(&self.high_frequency),
            center_line: parse_hex_color(&self.center_line),
        }
    }
}

/// Parse `"#RRGGBB"` or `"RRGGBB"` into an opaque color
///
/// Returns white on parse failure.
pub fn parse_hex_color(hex: &str) -> Color {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        log::warn!("parse_hex_color: Invalid hex color '{}', using white", hex);
        return Color::WHITE;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => Color::from_rgb8(r, g, b),
        _ => {
            log::warn!("parse_hex_color: Invalid hex color '{}', using white", hex);
            Color::WHITE
        }
    }
}

/// Pack a color as `0xAARRGGBB`
pub fn pack_argb(color: Color) -> u32 {
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (to_byte(color.a) << 24) | (to_byte(color.r) << 16) | (to_byte(color.g) << 8) | to_byte(color.b)
}
