// netpreset - Local Storage
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Local data for the front end.
//!
//! Handles:
//! - Application settings (`settings.toml`, read-only)
//! - Locating and loading the preset file
//!
//! Nothing is written back to disk.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::models::{AppConfig, Presets, Result, CONFIG_DIR_NAME, PRESET_FILE_NAME, SETTINGS_FILE_NAME};
use crate::presets;

/// Outcome of reading `settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsStatus {
    /// No settings file; defaults in use.
    Missing(PathBuf),
    /// Settings read from the file.
    Loaded(PathBuf),
    /// The file could not be used; defaults in use.
    Ignored { path: PathBuf, reason: String },
}

/// Local data store.
#[derive(Debug)]
pub struct DataStore {
    /// Configuration directory path.
    config_dir: PathBuf,
    /// Directory of the running executable, if known.
    exe_dir: Option<PathBuf>,
    /// Preset file given on the command line.
    preset_override: Option<PathBuf>,
    /// Application settings.
    settings: AppConfig,
    /// How the settings were obtained.
    settings_status: SettingsStatus,
    /// Presets from the last successful load.
    presets: Option<Presets>,
}

impl DataStore {
    /// Create a new data store with default directories.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::with_dirs(config_dir, exe_dir)
    }

    /// Create a new data store with specific directories.
    pub fn with_dirs(config_dir: PathBuf, exe_dir: Option<PathBuf>) -> Self {
        let (settings, settings_status) = Self::load_settings(&config_dir.join(SETTINGS_FILE_NAME));
        Self {
            config_dir,
            exe_dir,
            preset_override: None,
            settings,
            settings_status,
            presets: None,
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Settings are read before logging is set up, so nothing is logged
    /// here; see [`log_settings_status`](Self::log_settings_status).
    fn load_settings(path: &Path) -> (AppConfig, SettingsStatus) {
        if !path.exists() {
            return (AppConfig::default(), SettingsStatus::Missing(path.to_path_buf()));
        }

        match AppConfig::load_from_file(path) {
            Ok(settings) => (settings, SettingsStatus::Loaded(path.to_path_buf())),
            Err(e) => (
                AppConfig::default(),
                SettingsStatus::Ignored {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
            ),
        }
    }

    /// How the settings were obtained.
    pub fn settings_status(&self) -> &SettingsStatus {
        &self.settings_status
    }

    /// Log how the settings were obtained.
    pub fn log_settings_status(&self) {
        match &self.settings_status {
            SettingsStatus::Missing(path) => debug!("No settings file at {:?}, using defaults", path),
            SettingsStatus::Loaded(path) => info!("Loaded settings from {:?}", path),
            SettingsStatus::Ignored { path, reason } => {
                warn!("Ignoring settings file {:?}: {}", path, reason)
            }
        }
    }

    /// Get the current settings.
    pub fn settings(&self) -> &AppConfig {
        &self.settings
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// Use `path` as the preset file, taking precedence over settings.
    pub fn set_preset_override(&mut self, path: PathBuf) {
        self.preset_override = Some(path);
        self.presets = None;
    }

    /// Preset file that [`presets`](Self::presets) reads.
    ///
    /// Order: command-line override, `preset_file` setting, `config.txt`
    /// next to the executable, `config.txt` in the configuration directory.
    /// When none of the default candidates exists the executable location
    /// is returned so the missing-file error names it.
    pub fn preset_path(&self) -> PathBuf {
        if let Some(path) = self.preset_override.as_ref().or(self.settings.preset_file.as_ref()) {
            return path.clone();
        }

        let beside_exe = self.exe_dir.as_ref().map(|dir| dir.join(PRESET_FILE_NAME));
        let in_config_dir = self.config_dir.join(PRESET_FILE_NAME);

        match beside_exe {
            Some(path) if path.exists() => path,
            _ if in_config_dir.exists() => in_config_dir,
            Some(path) => path,
            None => in_config_dir,
        }
    }

    /// Presets, loading them on first use.
    pub fn presets(&mut self) -> Result<&Presets> {
        let presets = match self.presets.take() {
            Some(presets) => presets,
            None => presets::load(&self.preset_path())?,
        };
        Ok(&*self.presets.insert(presets))
    }

    /// Discard loaded presets and read the file again.
    ///
    /// On failure no presets remain loaded.
    pub fn reload_presets(&mut self) -> Result<&Presets> {
        self.presets = None;
        self.presets()
    }

    /// Get the config directory path.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
