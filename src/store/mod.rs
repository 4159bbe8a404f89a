//! Settings persistence
//!
//! Loads and saves the settings document (configurations, their last test
//! results, and the tester options) as JSON on disk.

use crate::error::{AppError, Result};
use crate::models::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file name, resolved against the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// File-backed store for the application settings
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store over the given settings file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(&self) -> Result<AppSettings> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let settings = serde_json::from_str(&contents).map_err(|e| {
                    AppError::parse(format!(
                        "settings file {} is not valid: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
            Err(e) => Err(AppError::io(format!(
                "failed to read settings file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Save settings, creating parent directories as needed
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::io(format!(
                        "failed to create settings directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents).map_err(|e| {
            AppError::io(format!(
                "failed to write settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}
