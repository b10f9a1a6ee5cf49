//! Analog clock drawn as three concentric progress rings (stateless).

use std::f64::consts::{FRAC_PI_2, TAU};

use chrono::{NaiveTime, Timelike};
use nebula_core::{LineCap, Paint, Point, RenderCommand, Rgba, Surface};

use crate::palette::{AQUA, CAP, CYAN, INDIGO, RING_GLOW, SHADOW, VIOLET};

/// Peak vertical wobble of the face, in pixels.
const WOBBLE_AMPLITUDE: f64 = 8.0;
/// Padding between the outermost ring and the surface edge.
const FACE_PADDING: f64 = 10.0;
/// Vertical offset of the drop shadow below the face centre.
const SHADOW_DROP: f64 = 6.0;
const GLOW_WIDTH: f64 = 1.2;
const CAP_RADIUS: f64 = 3.0;

/// Fractional progress of each hand through its cycle, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingProgress {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl RingProgress {
    /// Progress at a wall-clock time, with millisecond resolution.
    ///
    /// Each hand includes the fraction carried from the smaller unit, so the
    /// hour ring advances continuously through the hour.
    pub fn at(time: NaiveTime) -> Self {
        // Leap seconds report nanos >= 1e9; keep the second below 60.
        let millis = (time.nanosecond() / 1_000_000).min(999);
        let sec = time.second() as f64 + millis as f64 / 1000.0;
        let min = time.minute() as f64 + sec / 60.0;
        let hr = (time.hour() % 12) as f64 + min / 60.0;
        Self {
            hour: hr / 12.0,
            minute: min / 60.0,
            second: sec / 60.0,
        }
    }
}

/// Vertical wobble in pixels for the given whole second.
pub fn wobble(second: u32) -> f64 {
    (second as f64 / 60.0 * TAU).sin() * WOBBLE_AMPLITUDE
}

/// One ring band, expressed as fractions of the face radius.
struct Band {
    inner: f64,
    outer: f64,
    start: Rgba,
    end: Rgba,
}

const HOUR_BAND: Band = Band {
    inner: 0.55,
    outer: 0.78,
    start: CYAN,
    end: VIOLET,
};
const MINUTE_BAND: Band = Band {
    inner: 0.35,
    outer: 0.52,
    start: VIOLET,
    end: INDIGO,
};
const SECOND_BAND: Band = Band {
    inner: 0.18,
    outer: 0.30,
    start: AQUA,
    end: CYAN,
};

/// Face radius for a surface; zero when the surface is too small to draw.
pub fn face_radius(surface: &Surface) -> f64 {
    (surface.width().min(surface.height()) / 2.0 - FACE_PADDING).max(0.0)
}

/// Emit the shadow, the three rings and the centre cap for `time`.
pub fn paint(surface: &Surface, time: NaiveTime, out: &mut Vec<RenderCommand>) {
    let radius = face_radius(surface);
    if radius <= 0.0 {
        return;
    }
    let center = surface.center();

    out.push(RenderCommand::FillEllipse {
        center: center.offset(0.0, SHADOW_DROP),
        radius_x: radius * 0.9,
        radius_y: radius * 0.9 * 0.2,
        paint: Paint::Solid(SHADOW),
    });

    let face = center.offset(0.0, -wobble(time.second()));
    let progress = RingProgress::at(time);

    ring(out, face, radius, &HOUR_BAND, progress.hour);
    ring(out, face, radius, &MINUTE_BAND, progress.minute);
    ring(out, face, radius, &SECOND_BAND, progress.second);

    out.push(RenderCommand::FillCircle {
        center: face,
        radius: CAP_RADIUS,
        paint: Paint::Solid(CAP),
    });
}

fn ring(out: &mut Vec<RenderCommand>, face: Point, radius: f64, band: &Band, progress: f64) {
    let inner = radius * band.inner;
    let outer = radius * band.outer;
    let start_angle = -FRAC_PI_2;

    out.push(RenderCommand::StrokeArc {
        center: face,
        radius: (inner + outer) / 2.0,
        start_angle,
        end_angle: start_angle + progress * TAU,
        width: outer - inner,
        cap: LineCap::Round,
        // The gradient axis is fixed to the surface origin, not the face.
        paint: Paint::linear(
            Point::new(-outer, -outer),
            Point::new(outer, outer),
            band.start,
            band.end,
        ),
    });
    out.push(RenderCommand::StrokeArc {
        center: face,
        radius: inner,
        start_angle: 0.0,
        end_angle: TAU,
        width: GLOW_WIDTH,
        cap: LineCap::Butt,
        paint: Paint::Solid(RING_GLOW),
    });
}
