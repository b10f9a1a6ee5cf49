use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::geometry::{Point, Rect};

/// A gradient colour stop; `offset` is in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// How a shape is filled or stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Rgba),
    /// Linear gradient along the axis `from → to`, padded beyond both ends.
    LinearGradient {
        from: Point,
        to: Point,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Two-stop linear gradient.
    pub fn linear(from: Point, to: Point, start: Rgba, end: Rgba) -> Self {
        Paint::LinearGradient {
            from,
            to,
            stops: vec![ColorStop::new(0.0, start), ColorStop::new(1.0, end)],
        }
    }

    /// Colour of this paint at `p`.
    ///
    /// Hosts that cannot rasterize gradients natively sample per point.
    pub fn sample(&self, p: Point) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::LinearGradient { from, to, stops } => {
                let dx = to.x - from.x;
                let dy = to.y - from.y;
                let len_sq = dx * dx + dy * dy;
                let t = if len_sq > 0.0 {
                    (((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq) as f32
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
        }
    }
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgba::rgba(0, 0, 0, 0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    last.color
}

/// Stroke end style for open arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    Round,
}

/// A single drawing instruction in logical pixels.
///
/// A renderer emits a `Vec<RenderCommand>` per frame; hosts replay it in
/// order. Angles are in radians, clockwise from the positive x axis (screen
/// coordinates, y down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Reset the drawing transform to a uniform device scale.
    SetTransform { scale: f64 },

    /// Clear a region to transparent.
    Clear { rect: Rect },

    FillRect { rect: Rect, paint: Paint },

    FillCircle {
        center: Point,
        radius: f64,
        paint: Paint,
    },

    FillEllipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        paint: Paint,
    },

    /// Stroke a circular arc from `start_angle` to `end_angle`.
    StrokeArc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        width: f64,
        cap: LineCap,
        paint: Paint,
    },
}
