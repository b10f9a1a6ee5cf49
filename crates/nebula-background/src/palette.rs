//! Colour constants for the backdrop and clock face.

use nebula_core::Rgba;

/// Diagonal wash behind the starfield, top-left end.
pub const WASH_START: Rgba = Rgba::rgba(0, 229, 255, 0.06);
/// Diagonal wash behind the starfield, bottom-right end.
pub const WASH_END: Rgba = Rgba::rgba(181, 23, 255, 0.06);

pub const CYAN: Rgba = Rgba::rgb(0x00, 0xe5, 0xff);
pub const VIOLET: Rgba = Rgba::rgb(0xb5, 0x17, 0xff);
pub const INDIGO: Rgba = Rgba::rgb(0x6a, 0x00, 0xf4);
pub const AQUA: Rgba = Rgba::rgb(0x31, 0xf5, 0xff);

/// Thin full circle drawn inside every ring.
pub const RING_GLOW: Rgba = Rgba::rgba(0, 229, 255, 0.15);
/// Flattened ellipse under the clock face.
pub const SHADOW: Rgba = Rgba::rgba(0, 0, 0, 0.35);
/// Centre cap.
pub const CAP: Rgba = Rgba::rgb(0xe6, 0xf1, 0xff);
