//! View function for the spectral waveform widget

use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::SpectralWaveformCanvas;
use super::state::{SpectralWaveformState, WAVEFORM_HEIGHT};

/// Create a spectral waveform element with click-to-seek
///
/// * `state` - render data, palette and normalization for the track
/// * `on_seek` - called with the normalized position (0.0 to 1.0) on click/drag
///
/// ```ignore
/// let waveform = spectral_waveform(&self.waveform, |pos| Message::Seek(pos));
/// ```
pub fn spectral_waveform<'a, Message>(
    state: &'a SpectralWaveformState,
    on_seek: impl Fn(f64) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(SpectralWaveformCanvas { state, on_seek })
        .width(Length::Fill)
        .height(Length::Fixed(WAVEFORM_HEIGHT))
        .into()
}
