//! Lone-peak shaving
//!
//! A column that towers over both neighbours reads as noise at overview
//! scale. Such spikes are scaled down to the taller neighbour, keeping their
//! band mix.

use super::columns::Column;

/// Shave strict lone peaks in place
///
/// Interior column `i` is shaved when its total exceeds both neighbours;
/// every amplitude is multiplied by `max(left, right) / total`. The first and
/// last columns are never touched. The shaved total is pinned to the taller
/// neighbour exactly, so a second pass over the result is a no-op.
pub fn smooth_peaks(columns: &mut [Column]) {
    if columns.len() < 3 {
        return;
    }

    for i in 1..columns.len() - 1 {
        let left = columns[i - 1].total_amplitude;
        let right = columns[i + 1].total_amplitude;
        let current = columns[i].total_amplitude;

        if current > left && current > right {
            let max_neighbor = left.max(right);
            columns[i].scale(max_neighbor / current);
            // `current * (max / current)` can round one ulp above the neighbour
            columns[i].total_amplitude = max_neighbor;
        }
    }
}
