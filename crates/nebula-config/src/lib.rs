//! Configuration file handling for nebula.
//!
//! The configuration lives in `config.toml` under the platform config
//! directory. Every field has a default, so a partial (or absent) file is
//! fine.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use nebula_background::{ClockSettings, RendererSettings, StarfieldSettings};
use nebula_core::View;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading, validating or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How the terminal host lays out and paces the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Which renderers to show.
    pub view: View,
    /// Target frames per second.
    pub fps: u32,
    /// Device-scale factor reported to the renderers.
    pub device_scale: f64,
    /// Pointer easing per frame, in `(0, 1]`.
    pub pointer_smoothing: f64,
    /// Fixed random seed; a time-based seed is used when absent.
    pub seed: Option<u64>,
    /// Side of the clock panel as a fraction of the shorter screen side.
    pub clock_panel: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            view: View::Both,
            fps: 30,
            device_scale: 1.0,
            pointer_smoothing: RendererSettings::default().pointer_smoothing,
            seed: None,
            clock_panel: 0.6,
        }
    }
}

/// Canvas element ids used by the browser host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub background_canvas: String,
    pub clock_canvas: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            background_canvas: "bg-canvas".to_string(),
            clock_canvas: "clock3d".to_string(),
        }
    }
}

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub starfield: StarfieldSettings,
    pub clock: ClockSettings,
    pub web: WebConfig,
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("dev", "nebula", "nebula")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(write_err)
    }

    /// Reject values the renderers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if !(1..=240).contains(&self.display.fps) {
            return invalid("display.fps", "must be between 1 and 240");
        }
        if !(self.display.pointer_smoothing > 0.0 && self.display.pointer_smoothing <= 1.0) {
            return invalid("display.pointer_smoothing", "must be in (0, 1]");
        }
        if !(self.display.device_scale.is_finite() && self.display.device_scale > 0.0) {
            return invalid("display.device_scale", "must be a positive number");
        }
        if !(self.display.clock_panel > 0.0 && self.display.clock_panel <= 1.0) {
            return invalid("display.clock_panel", "must be in (0, 1]");
        }
        self.renderer_settings()
            .validate()
            .map_err(|err| ConfigError::Invalid {
                field: err.field,
                reason: err.reason,
            })
    }

    /// Renderer parameters derived from this configuration.
    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            starfield: self.starfield.clone(),
            clock: self.clock.clone(),
            pointer_smoothing: self.display.pointer_smoothing,
        }
    }
}
