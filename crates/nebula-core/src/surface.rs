//! Drawing surface geometry.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Upper bound for the device-scale factor.
///
/// Higher densities multiply the backing store without a visible gain for
/// the soft, translucent shapes the renderer draws.
pub const MAX_DEVICE_SCALE: f64 = 2.0;

/// A drawing surface: logical layout size plus device-scale factor.
///
/// The backing store is `floor(layout × scale)` physical pixels and the
/// drawing transform is a uniform scale by the same factor, so all drawing
/// happens in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    width: f64,
    height: f64,
    scale: f64,
}

impl Surface {
    /// Create a surface from a measured layout size and the host's raw
    /// device-pixel ratio.
    ///
    /// Negative or non-finite sizes collapse to zero. The scale is capped at
    /// `MAX_DEVICE_SCALE` but has no floor, so zoomed-out pages keep ratios
    /// below 1; a missing (non-finite or non-positive) ratio counts as 1.
    pub fn new(width: f64, height: f64, device_scale: f64) -> Self {
        Self {
            width: sanitize_len(width),
            height: sanitize_len(height),
            scale: cap_scale(device_scale),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Effective device-scale factor after capping.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Physical backing-store dimensions.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.scale).floor() as u32,
            (self.height * self.scale).floor() as u32,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether a freshly measured layout differs from this surface.
    pub fn differs_from(&self, width: f64, height: f64, device_scale: f64) -> bool {
        *self != Self::new(width, height, device_scale)
    }
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn cap_scale(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v.min(MAX_DEVICE_SCALE)
    } else {
        1.0
    }
}
