//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nebula_config::{Config, ConfigError};
use nebula_core::View;

#[derive(Parser, Debug, Clone)]
#[command(name = "nebula", version)]
#[command(about = "Animated starfield and ring clock for the terminal", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Which renderers to show
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Fixed random seed for the starfield
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (default: nebula.log in the cache directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Save the effective configuration and exit
    #[arg(long = "write-config", default_value = "false")]
    pub write_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewArg {
    Both,
    Starfield,
    Clock,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Both => View::Both,
            ViewArg::Starfield => View::Starfield,
            ViewArg::Clock => View::Clock,
        }
    }
}

impl Cli {
    /// Path of the configuration file this run uses.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::default_path(),
        }
    }

    /// Load the configuration file and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load_from(&self.config_path()?)?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(view) = self.view {
            config.display.view = view.into();
        }
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
        if let Some(seed) = self.seed {
            config.display.seed = Some(seed);
        }
    }
}
