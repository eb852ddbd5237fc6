//! Coordinate Mapping
//!
//! Stateless transform from semantic envelope space (time in [0, 100],
//! amplitude in [0, 1]) to drawing-surface pixels. Y grows downward, so
//! amplitude 1.0 maps to the top of the drawing area and 0.0 to the bottom.

use serde::{Deserialize, Serialize};

/// A drawing surface, supplied per render call by the presentation shell.
///
/// `padding` is the margin, in pixels, reserved on all four sides for axes and
/// labels. A viewport smaller than twice the padding yields a negative drawing
/// area; the arithmetic passes that through rather than failing, and the
/// resulting primitives simply collapse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: 20.0,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Horizontal extent of the drawing area between the padded margins.
    pub fn draw_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    /// Vertical extent of the drawing area between the padded margins.
    pub fn draw_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(400.0, 200.0)
    }
}

/// A point in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps (time, amplitude) pairs onto a [`Viewport`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    viewport: Viewport,
}

impl CoordinateMapper {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    /// Pixel x for a time value on the [0, 100] axis.
    pub fn time_to_x(&self, t: f64) -> f64 {
        self.viewport.padding + (t / 100.0) * self.viewport.draw_width()
    }

    /// Pixel y for an amplitude in [0, 1]. Amplitude 1.0 is the top edge of
    /// the drawing area.
    pub fn amplitude_to_y(&self, amplitude: f64) -> f64 {
        self.viewport.padding + (1.0 - amplitude) * self.viewport.draw_height()
    }

    /// Map a (time, amplitude) pair to a drawing-surface point.
    pub fn map(&self, t: f64, amplitude: f64) -> Point {
        Point::new(self.time_to_x(t), self.amplitude_to_y(amplitude))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
