//! Animated canvas backdrop for nebula.
//!
//! This crate owns the renderer state machine and the two visual variants it
//! can draw: a depth-layered starfield with pointer parallax, and an analog
//! clock made of three gradient progress rings. A [`Renderer`] never touches
//! a real drawing surface; each frame it returns a list of
//! [`RenderCommand`](nebula_core::RenderCommand)s for the host to replay.

mod animations;
mod palette;
mod pointer;
mod settings;
mod state;
mod time;

pub use animations::rings::{RingProgress, face_radius, wobble};
pub use animations::starfield::{LEFT_EDGE, RESPAWN_SPREAD, Star};
pub use pointer::{PointerTilt, normalize};
pub use settings::{
    ClockSettings, MAX_LAYERS, MAX_PER_LAYER, RendererSettings, SettingsError, StarfieldSettings,
};
pub use state::{Lifecycle, Renderer};
pub use time::{Clock, FixedClock, SystemClock};
