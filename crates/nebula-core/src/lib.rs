//! Core types shared by the nebula renderer and its hosts.
//!
//! Everything here is plain data: the drawing surface description, colours,
//! paints, and the [`RenderCommand`] list a renderer emits for each frame.
//! Hosts (terminal, browser canvas) consume the commands in order.

mod color;
mod command;
mod geometry;
mod surface;
mod view;

pub use color::Rgba;
pub use command::{ColorStop, LineCap, Paint, RenderCommand};
pub use geometry::{Point, Rect};
pub use surface::{MAX_DEVICE_SCALE, Surface};
pub use view::{Variant, View};
