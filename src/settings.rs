//! User settings persistence.
//!
//! Settings are read from `<config dir>/potlog/settings.json`. A missing or
//! unreadable file falls back to the defaults; command-line flags override
//! individual values after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::archive::DEFAULT_POTTING_ENTRY;
use crate::lookup::DEFAULT_LOOKUP_URL;

/// Output file written to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "Potting_Logs.json";

/// Number of most recent gluing logs taken from an archive
pub const DEFAULT_GLUING_WINDOW: usize = 5;

/// Settings file version written by this build
pub const SETTINGS_VERSION: u32 = 1;

/// Settings shared by both binaries
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// HDI summary endpoint used to resolve module ids
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// Log entry name inside each nested potting archive
    #[serde(default = "default_potting_entry")]
    pub potting_entry: String,
    #[serde(default = "default_gluing_window")]
    pub gluing_window: usize,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_lookup_url() -> String {
    DEFAULT_LOOKUP_URL.to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_potting_entry() -> String {
    DEFAULT_POTTING_ENTRY.to_string()
}

fn default_gluing_window() -> usize {
    DEFAULT_GLUING_WINDOW
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            lookup_url: default_lookup_url(),
            output_file: default_output_file(),
            potting_entry: default_potting_entry(),
            gluing_window: default_gluing_window(),
        }
    }
}

impl Settings {
    /// Get the config directory path for potlog
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("potlog"))
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(mut settings) => {
                    tracing::debug!("Loaded settings from {:?}", path);
                    if settings.version > SETTINGS_VERSION {
                        tracing::warn!(
                            "Settings file {:?} has version {}, newer than {}; unknown fields are ignored",
                            path,
                            settings.version,
                            SETTINGS_VERSION
                        );
                    }
                    settings.version = SETTINGS_VERSION;
                    settings
                }
                Err(e) => {
                    tracing::warn!("Ignoring invalid settings file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        self.save_to(&path)
    }

    /// Load from `config` when given, else from the default location
    pub fn load_with(config: Option<&Path>) -> Self {
        match config {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Save to `config` when given, else to the default location
    pub fn save_with(&self, config: Option<&Path>) -> Result<(), String> {
        match config {
            Some(path) => self.save_to(path),
            None => self.save(),
        }
    }
}
