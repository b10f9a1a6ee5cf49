//! Tunable renderer parameters.

use serde::{Deserialize, Serialize};

/// Largest supported number of depth layers.
pub const MAX_LAYERS: u8 = 8;
/// Largest supported number of stars per layer.
pub const MAX_PER_LAYER: usize = 2000;

/// A setting outside the range the renderer can draw with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value for `{field}`: {reason}")]
pub struct SettingsError {
    pub field: &'static str,
    pub reason: String,
}

impl SettingsError {
    fn new(field: &'static str, reason: &str) -> Self {
        Self {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Starfield population and motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldSettings {
    /// Number of depth layers; layer `z` runs from 1 (far) upward.
    pub layers: u8,
    /// Stars created per layer.
    pub per_layer: usize,
    /// Horizontal drift per frame, multiplied by each star's velocity.
    pub speed: f64,
    /// Pointer parallax in pixels per depth layer at full tilt.
    pub parallax: f64,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            layers: 3,
            per_layer: 90,
            speed: 0.3,
            parallax: 6.0,
        }
    }
}

/// Clock-ring face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Side length used when the host reports an empty layout.
    pub fallback_size: f64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            fallback_size: 160.0,
        }
    }
}

/// Everything a [`Renderer`](crate::Renderer) needs besides its surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub starfield: StarfieldSettings,
    pub clock: ClockSettings,
    /// Fraction of the remaining distance to the pointer target covered per
    /// frame, in `(0, 1]`. `1.0` snaps to the pointer immediately.
    pub pointer_smoothing: f64,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            starfield: StarfieldSettings::default(),
            clock: ClockSettings::default(),
            pointer_smoothing: 0.2,
        }
    }
}

impl RendererSettings {
    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let sf = &self.starfield;
        if !(1..=MAX_LAYERS).contains(&sf.layers) {
            return Err(SettingsError::new("starfield.layers", "must be between 1 and 8"));
        }
        if sf.per_layer > MAX_PER_LAYER {
            return Err(SettingsError::new("starfield.per_layer", "must be at most 2000"));
        }
        if !(sf.speed.is_finite() && sf.speed > 0.0) {
            return Err(SettingsError::new("starfield.speed", "must be a positive number"));
        }
        if !sf.parallax.is_finite() {
            return Err(SettingsError::new("starfield.parallax", "must be a finite number"));
        }
        let side = self.clock.fallback_size;
        if !(side.is_finite() && side > 0.0) {
            return Err(SettingsError::new("clock.fallback_size", "must be a positive number"));
        }
        if !(self.pointer_smoothing > 0.0 && self.pointer_smoothing <= 1.0) {
            return Err(SettingsError::new("pointer_smoothing", "must be in (0, 1]"));
        }
        Ok(())
    }
}
