//! Viewer configuration.
//!
//! Settings live in a JSON file, by default `~/.exosky/config.json`. Every key
//! is optional; missing keys take their default values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use catalogs::exoplanet_archive::EXOPLANET_ARCHIVE_URL;
use catalogs::gaia::{DEFAULT_ROW_LIMIT, GAIA_TAP_URL};
use serde::{Deserialize, Serialize};
use skyview::snapshot::DEFAULT_SNAPSHOT_PATH;
use skyview::{SessionConfig, StarFieldParams, ViewConfig};
use thiserror::Error;

/// Directory under `$HOME` holding the config file
pub const CONFIG_DIR: &str = ".exosky";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window size, zoom and pan steps
    pub view: ViewConfig,
    /// Where F2 writes the current frame
    pub snapshot_path: PathBuf,
    /// Seconds a snapshot confirmation stays on screen
    pub status_seconds: f64,
    /// Cone radius and inclusion threshold for the star field
    pub star_field: StarFieldParams,
    /// Row cap for each Gaia cone query
    pub gaia_row_limit: u32,
    pub gaia_url: String,
    pub exoplanet_archive_url: String,
    /// Timeout for any single HTTP request, in seconds
    pub http_timeout_seconds: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            status_seconds: 3.0,
            star_field: StarFieldParams::default(),
            gaia_row_limit: DEFAULT_ROW_LIMIT,
            gaia_url: GAIA_TAP_URL.to_string(),
            exoplanet_archive_url: EXOPLANET_ARCHIVE_URL.to_string(),
            http_timeout_seconds: 60,
        }
    }
}

impl ViewerConfig {
    /// Default config location, `~/.exosky/config.json`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given, else the default path if it exists,
    /// else built-in defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            view: self.view,
            snapshot_path: self.snapshot_path.clone(),
            status_duration: Duration::from_secs_f64(self.status_seconds.max(0.0).min(3600.0)),
        }
    }
}
