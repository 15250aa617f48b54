/// Map a click at logical `x` to a playback fraction in `0.0..=1.0`
///
/// Positions left of the surface map to 0, right of it to 1. A surface with
/// no width always seeks to the start.
pub fn seek_fraction(x: f32, display_width: f32) -> f64 {
    if !(display_width > 0.0) || x.is_nan() {
        return 0.0;
    }
    (x / display_width).clamp(0.0, 1.0) as f64
}
