// netpreset - Application Configuration
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Application settings model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the subnet mask for an apply action comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaskSource {
    /// Reuse the mask currently bound to the adapter.
    #[default]
    Adapter,
    /// The user types the mask.
    Manual,
}

impl MaskSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adapter => "adapter",
            Self::Manual => "manual",
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Preset file location; defaults to `config.txt` next to the executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_file: Option<PathBuf>,

    /// Subnet mask source for apply actions.
    #[serde(default)]
    pub mask_source: MaskSource,

    /// How long action status messages stay visible.
    #[serde(default = "default_status_message_secs")]
    pub status_message_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_status_message_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preset_file: None,
            mask_source: MaskSource::Adapter,
            status_message_secs: default_status_message_secs(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, super::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_file() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.status_message_secs, 5);
        assert_eq!(config.mask_source, MaskSource::Adapter);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "preset_file = \"/etc/netpreset/config.txt\"\nmask_source = \"manual\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.preset_file, Some(PathBuf::from("/etc/netpreset/config.txt")));
        assert_eq!(config.mask_source, MaskSource::Manual);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "mask_source = \"sideways\"\n").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(super::super::Error::ConfigParseFailed(_))
        ));
    }
}
