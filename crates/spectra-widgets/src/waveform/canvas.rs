//! iced canvas adapter
//!
//! [`FrameSurface`] lets the compositor draw straight into a canvas
//! [`Frame`], and [`SpectralWaveformCanvas`] wraps it in a `Program` with
//! click and drag to seek.

use iced::widget::canvas::{self, Event, Frame, Geometry, Program};
use iced::{mouse, Color, Point, Rectangle, Size, Theme};

use super::compositor::{center_line_height, render};
use super::seek::seek_fraction;
use super::state::SpectralWaveformState;
use crate::surface::{DrawContext, Surface, SurfaceError};

/// A canvas frame seen as a [`Surface`]
///
/// iced applies the window scale factor itself, so the frame is addressed in
/// logical pixels and reports a pixel ratio of 1.
pub struct FrameSurface<'f> {
    frame: &'f mut Frame,
    size: Size,
    scale: (f32, f32),
}

impl<'f> FrameSurface<'f> {
    pub fn new(frame: &'f mut Frame, size: Size) -> Self {
        Self {
            frame,
            size,
            scale: (1.0, 1.0),
        }
    }
}

impl Surface for FrameSurface<'_> {
    type Context = Self;

    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    fn backing_size(&self) -> (u32, u32) {
        (
            self.size.width.max(0.0).round() as u32,
            self.size.height.max(0.0).round() as u32,
        )
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        // The frame is sized by the layout; only track what was requested
        self.size = Size::new(width as f32, height as f32);
        self.scale = (1.0, 1.0);
    }

    fn css_size(&self) -> (f32, f32) {
        (self.size.width, self.size.height)
    }

    fn set_css_size(&mut self, width: f32, height: f32) {
        self.size = Size::new(width, height);
    }

    fn context(&mut self) -> Result<&mut Self::Context, SurfaceError> {
        Ok(self)
    }
}

impl DrawContext for FrameSurface<'_> {
    fn set_transform(&mut self, scale_x: f32, scale_y: f32) {
        self.scale = (scale_x, scale_y);
    }

    fn transform(&self) -> (f32, f32) {
        self.scale
    }

    // Canvas rectangles are never resampled
    fn set_image_smoothing(&mut self, _enabled: bool) {}

    fn clear(&mut self, color: Color) {
        self.frame.fill_rectangle(Point::ORIGIN, self.size, color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (sx, sy) = self.scale;
        self.frame.fill_rectangle(
            Point::new(x * sx, y * sy),
            Size::new(width * sx, height * sy),
            color,
        );
    }
}

/// Drag state of the seek gesture
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveformInteraction {
    pub is_dragging: bool,
}

/// Canvas program for the stacked spectral waveform
///
/// `on_seek` is called with a position in `0.0..=1.0` when the user clicks
/// or drags on the canvas.
pub struct SpectralWaveformCanvas<'a, Message, F>
where
    F: Fn(f64) -> Message,
{
    pub state: &'a SpectralWaveformState,
    pub on_seek: F,
}

impl<'a, Message, F> Program<Message> for SpectralWaveformCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(f64) -> Message,
{
    type State = WaveformInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if let Some(position) = cursor.position_in(bounds) {
            match event {
                Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                    interaction.is_dragging = true;
                    let fraction = seek_fraction(position.x, bounds.width);
                    return Some(canvas::Action::publish((self.on_seek)(fraction)));
                }
                Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                    interaction.is_dragging = false;
                }
                Event::Mouse(mouse::Event::CursorMoved { .. }) if interaction.is_dragging => {
                    let fraction = seek_fraction(position.x, bounds.width);
                    return Some(canvas::Action::publish((self.on_seek)(fraction)));
                }
                _ => {}
            }
        } else if matches!(event, Event::Mouse(mouse::Event::ButtonReleased(_))) {
            interaction.is_dragging = false;
        }

        None
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let palette = &self.state.palette;

        match &self.state.data {
            Some(data) => {
                let mut surface = FrameSurface::new(&mut frame, bounds.size());
                if let Err(e) = render(&mut surface, data, palette, &self.state.normalization) {
                    log::error!("SpectralWaveformCanvas::draw: {}", e);
                }
            }
            None => {
                // Placeholder line while analysis is pending
                frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette.background);
                let line_height = center_line_height(bounds.height.round() as u32, 1.0).max(1.0);
                frame.fill_rectangle(
                    Point::new(0.0, (bounds.height - line_height) / 2.0),
                    Size::new(bounds.width, line_height),
                    palette.center_line,
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
