//! Render Planning
//!
//! Composes the envelope model and coordinate mapper into an ordered list of
//! drawing primitives for a presentation backend to consume. Nothing here
//! draws: the planner returns plain data (serde-serializable, so a remote or
//! scripted backend works as well as an in-process canvas).
//!
//! Plan order, back to front: axes, grid, axis labels, envelope polyline,
//! control-point markers, then the time-cursor group (guide line, amplitude
//! marker, value label) when the cursor is on the [0, 100] axis.

use crate::envelope::{compute_sample, EnvelopeParams};
use crate::geometry::{CoordinateMapper, Point, Viewport};
use serde::{Deserialize, Serialize};

// =============================================================================
// Drawing Primitives
// =============================================================================

/// Text anchor, naming which side of the text sits on the given point
/// (compass convention: `East` means the text extends to the west).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    North,
    South,
    East,
    West,
    Center,
}

/// One drawable item. Colors are CSS-style names or hex strings; the backend
/// resolves them. `dash` is an (on, off) pixel pattern, solid when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: String,
        dash: Option<(f64, f64)>,
    },
    Polyline {
        points: Vec<Point>,
        width: f64,
        color: String,
        /// Rendering nicety only: the underlying geometry is always the
        /// listed vertices, a smoothing backend may round the joins.
        smooth: bool,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: String,
        outline: Option<String>,
    },
    Text {
        at: Point,
        text: String,
        anchor: Anchor,
        color: String,
    },
}

// =============================================================================
// Plot Style
// =============================================================================

/// Colors, widths and marker radii for the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub axis_color: String,
    pub axis_width: f64,
    pub grid_color: String,
    pub grid_dash: (f64, f64),
    pub label_color: String,
    pub curve_color: String,
    pub curve_width: f64,
    pub attack_point_color: String,
    pub decay_point_color: String,
    pub control_point_radius: f64,
    pub cursor_guide_color: String,
    pub cursor_marker_fill: String,
    pub cursor_marker_outline: String,
    pub cursor_marker_radius: f64,
    pub cursor_label_color: String,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            axis_color: "black".to_string(),
            axis_width: 2.0,
            grid_color: "gray".to_string(),
            grid_dash: (2.0, 2.0),
            label_color: "black".to_string(),
            curve_color: "blue".to_string(),
            curve_width: 2.0,
            attack_point_color: "red".to_string(),
            decay_point_color: "green".to_string(),
            control_point_radius: 5.0,
            cursor_guide_color: "purple".to_string(),
            cursor_marker_fill: "gold".to_string(),
            cursor_marker_outline: "black".to_string(),
            cursor_marker_radius: 6.0,
            cursor_label_color: "darkred".to_string(),
        }
    }
}

impl PlotStyle {
    /// A grayscale style for monochrome or print backends.
    pub fn monochrome() -> Self {
        Self {
            curve_color: "black".to_string(),
            attack_point_color: "black".to_string(),
            decay_point_color: "white".to_string(),
            cursor_guide_color: "gray".to_string(),
            cursor_marker_fill: "white".to_string(),
            cursor_label_color: "black".to_string(),
            ..Default::default()
        }
    }

    pub fn with_curve_color(mut self, color: impl Into<String>) -> Self {
        self.curve_color = color.into();
        self
    }
}

// =============================================================================
// Planner
// =============================================================================

/// Builds the ordered primitive list for one (params, cursor, viewport) state.
#[derive(Debug, Clone, Default)]
pub struct RenderPlanner {
    style: PlotStyle,
}

impl RenderPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: PlotStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Produce the full primitive list for the current state.
    pub fn plan(&self, params: &EnvelopeParams, t: f64, viewport: Viewport) -> Vec<Primitive> {
        let m = CoordinateMapper::new(viewport);
        let Viewport {
            width,
            height,
            padding,
        } = viewport;
        let s = &self.style;

        let mut out = Vec::with_capacity(30);

        // Axes: an L along the left and bottom edges of the drawing area.
        out.push(Primitive::Line {
            from: Point::new(padding, height - padding),
            to: Point::new(width - padding, height - padding),
            width: s.axis_width,
            color: s.axis_color.clone(),
            dash: None,
        });
        out.push(Primitive::Line {
            from: Point::new(padding, padding),
            to: Point::new(padding, height - padding),
            width: s.axis_width,
            color: s.axis_color.clone(),
            dash: None,
        });

        // 9x9 internal grid.
        for i in 1..10 {
            let x = padding + i as f64 * viewport.draw_width() / 10.0;
            out.push(Primitive::Line {
                from: Point::new(x, padding),
                to: Point::new(x, height - padding),
                width: 1.0,
                color: s.grid_color.clone(),
                dash: Some(s.grid_dash),
            });
        }
        for i in 1..10 {
            let y = padding + i as f64 * viewport.draw_height() / 10.0;
            out.push(Primitive::Line {
                from: Point::new(padding, y),
                to: Point::new(width - padding, y),
                width: 1.0,
                color: s.grid_color.clone(),
                dash: Some(s.grid_dash),
            });
        }

        // Fixed axis labels.
        for (at, text, anchor) in [
            (Point::new(padding - 10.0, padding), "1.0", Anchor::East),
            (Point::new(padding - 10.0, height - padding), "0.0", Anchor::East),
            (
                Point::new(width - padding, height - padding + 15.0),
                "Time",
                Anchor::North,
            ),
            (Point::new(padding - 15.0, padding - 10.0), "Ampl", Anchor::East),
        ] {
            out.push(Primitive::Text {
                at,
                text: text.to_string(),
                anchor,
                color: s.label_color.clone(),
            });
        }

        // Envelope polyline: origin, attack peak, decay end.
        let attack_peak = m.map(params.attack, 1.0);
        let decay_end = m.map(params.effective_decay(), 0.0);
        out.push(Primitive::Polyline {
            points: vec![m.map(0.0, 0.0), attack_peak, decay_end],
            width: s.curve_width,
            color: s.curve_color.clone(),
            smooth: true,
        });

        // Control-point markers.
        out.push(Primitive::Circle {
            center: attack_peak,
            radius: s.control_point_radius,
            fill: s.attack_point_color.clone(),
            outline: None,
        });
        out.push(Primitive::Circle {
            center: decay_end,
            radius: s.control_point_radius,
            fill: s.decay_point_color.clone(),
            outline: None,
        });

        // Time-cursor group, only when the cursor is on the axis.
        if (0.0..=100.0).contains(&t) {
            let sample = compute_sample(params.attack, params.decay, t);
            let x = m.time_to_x(t);
            let marker = m.map(t, sample.amplitude);

            out.push(Primitive::Line {
                from: Point::new(x, padding),
                to: Point::new(x, height - padding),
                width: 1.0,
                color: s.cursor_guide_color.clone(),
                dash: Some(s.grid_dash),
            });
            out.push(Primitive::Circle {
                center: marker,
                radius: s.cursor_marker_radius,
                fill: s.cursor_marker_fill.clone(),
                outline: Some(s.cursor_marker_outline.clone()),
            });
            out.push(Primitive::Text {
                at: Point::new(marker.x, marker.y - 15.0),
                text: format!("t={:.1}\na={:.2}", t, sample.amplitude),
                anchor: Anchor::South,
                color: s.cursor_label_color.clone(),
            });
        }

        out
    }
}
