// netpreset - Configuration Results
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Outcome of an apply attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{Error, Result};

/// Guidance shown when the platform refuses a change for lack of privilege.
pub const ELEVATION_HINT: &str =
    "Please run the application as Administrator (or root) to change network settings.";

/// Message used when the requested adapter has no configuration object.
pub const ADAPTER_NOT_FOUND: &str = "Selected network adapter not found or not configured.";

/// Where an apply attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Stage 1, static address and mask.
    SetAddress,
    /// Stage 2, default gateway.
    SetGateway,
    /// Stage 3, DNS server search order.
    SetDns,
    /// No configuration object matched the adapter id.
    AdapterNotFound,
    /// The platform refused the change for lack of privilege.
    AccessDenied,
    /// Any other platform error.
    Unexpected,
}

impl FailureStage {
    /// Whether earlier stages were already committed when this one failed.
    pub fn leaves_partial_state(&self) -> bool {
        matches!(self, Self::SetGateway | Self::SetDns)
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SetAddress => "Setting IP address and subnet mask",
            Self::SetGateway => "Setting gateway",
            Self::SetDns => "Setting DNS servers",
            Self::AdapterNotFound => "Locating adapter",
            Self::AccessDenied => "Access check",
            Self::Unexpected => "Applying settings",
        };
        f.write_str(name)
    }
}

/// Outcome of one apply attempt. Consumed once by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConfigurationResult {
    Success,
    Failure { stage: FailureStage, detail: String },
}

impl ConfigurationResult {
    pub fn failure(stage: FailureStage, detail: impl Into<String>) -> Self {
        Self::Failure {
            stage,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failure_stage(&self) -> Option<FailureStage> {
        match self {
            Self::Success => None,
            Self::Failure { stage, .. } => Some(*stage),
        }
    }

    /// Human-readable summary for status displays.
    pub fn message(&self) -> String {
        match self {
            Self::Success => "Settings Saved!".to_string(),
            Self::Failure { stage, detail } => match stage {
                FailureStage::SetAddress => {
                    format!("Failed to confirm/set IP Address and Subnet Mask: {}", detail)
                }
                FailureStage::SetGateway => format!("Failed to set Gateway: {}", detail),
                FailureStage::SetDns => format!("Failed to set DNS Servers: {}", detail),
                FailureStage::AdapterNotFound => ADAPTER_NOT_FOUND.to_string(),
                FailureStage::AccessDenied => format!("Access Denied! {}", detail),
                FailureStage::Unexpected => format!("An unexpected error occurred: {}", detail),
            },
        }
    }

    /// Map the result into the crate error taxonomy.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Success => Ok(()),
            Self::Failure { stage, detail } => Err(match stage {
                FailureStage::AdapterNotFound => Error::AdapterNotFound(detail),
                FailureStage::AccessDenied => Error::AccessDenied(detail),
                FailureStage::Unexpected => Error::Unexpected(detail),
                stage => Error::stage_failure(stage, detail),
            }),
        }
    }
}
