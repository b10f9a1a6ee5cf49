//! File logging.
//!
//! The terminal belongs to the UI, so log records go to a file instead of
//! stderr. `RUST_LOG` selects the level (default `info`).

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};

const LOG_FILE: &str = "nebula.log";

/// Default log file location in the platform cache directory.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "nebula", "nebula").map(|dirs| dirs.cache_dir().join(LOG_FILE))
}

/// Install the global logger writing to `path`, or to the default location.
///
/// Returns the file in use, or `None` when no location is available.
pub fn init(path: Option<&Path>) -> color_eyre::Result<Option<PathBuf>> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_log_path) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(Some(path))
}
