// netpreset - Error Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shared error types for netpreset.

use std::path::PathBuf;
use thiserror::Error;

use super::result::FailureStage;
use super::validation::ValidationError;

/// Result type alias for netpreset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netpreset operations.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================
    // Preset Errors
    // ========================================
    #[error("Configuration file not found: {}", .0.display())]
    ConfigFileMissing(PathBuf),

    // ========================================
    // Inventory Errors
    // ========================================
    #[error("Adapter query failed: {0}")]
    AdapterQuery(String),

    // ========================================
    // Workflow Errors
    // ========================================
    #[error("{0}")]
    ValidationRejected(#[from] ValidationError),

    #[error("Selected network adapter not found or not configured: {0}")]
    AdapterNotFound(String),

    #[error("{stage} failed: {reason}")]
    StageFailure { stage: FailureStage, reason: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    // ========================================
    // Settings Errors
    // ========================================
    #[error("Failed to parse settings: {0}")]
    ConfigParseFailed(String),

    // ========================================
    // System Errors
    // ========================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new stage failure error.
    pub fn stage_failure(stage: FailureStage, reason: impl Into<String>) -> Self {
        Self::StageFailure {
            stage,
            reason: reason.into(),
        }
    }

    /// Check if this error is remedied by elevating privileges.
    pub fn is_authorization_error(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }

    /// Check if the adapter may have been left partially configured.
    pub fn is_partial_apply(&self) -> bool {
        matches!(self, Self::StageFailure { stage, .. } if stage.leaves_partial_state())
    }
}

// Convert from toml parse errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_apply_stages() {
        assert!(!Error::stage_failure(FailureStage::SetAddress, "x").is_partial_apply());
        assert!(Error::stage_failure(FailureStage::SetGateway, "x").is_partial_apply());
        assert!(Error::stage_failure(FailureStage::SetDns, "x").is_partial_apply());
    }

    #[test]
    fn test_missing_file_message() {
        let err = Error::ConfigFileMissing(PathBuf::from("/tmp/config.txt"));
        assert_eq!(err.to_string(), "Configuration file not found: /tmp/config.txt");
    }
}
