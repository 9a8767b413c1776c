//! User settings persistence.
//!
//! Report defaults can be stored in a JSON file so they need not be repeated
//! on every invocation. Command line flags can only switch options on.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::report::{ReportOptions, SortKey};

/// Errors reading an explicitly requested settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub show_types: bool,
}

fn default_version() -> u32 {
    1
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: 1,
            verbose: false,
            sort: SortKey::default(),
            show_types: false,
        }
    }
}

impl UserSettings {
    /// Get the config directory path for bagstat
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bagstat"))
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = match Self::get_settings_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Combine stored defaults with command line flags
    pub fn report_options(&self, verbose: bool, by_count: bool, show_types: bool) -> ReportOptions {
        ReportOptions {
            sort: if by_count { SortKey::Count } else { self.sort },
            verbose: self.verbose || verbose,
            show_types: self.show_types || show_types,
        }
    }
}
