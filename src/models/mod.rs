// netpreset - Shared Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # netpreset models
//!
//! Types shared by the preset store, the adapter inventory, the platform
//! backends and the configuration workflow:
//!
//! - **Adapter**: adapter handles and current addressing
//! - **Preset**: named gateway and DNS presets
//! - **Request**: raw selections and the validated static configuration
//! - **Validation**: pure pre-apply checks
//! - **Result**: outcome of an apply attempt
//! - **Status**: transient messages for the front end
//! - **Error**: shared error types

pub mod adapter;
pub mod config;
pub mod error;
pub mod preset;
pub mod request;
pub mod result;
pub mod status;
pub mod validation;

// Re-export main types for convenience
pub use adapter::{AdapterHandle, AdapterKind, CurrentIpv4};
pub use config::{AppConfig, MaskSource};
pub use error::{Error, Result};
pub use preset::Presets;
pub use request::{ApplySelection, MaskInput, StaticConfigRequest};
pub use result::{ConfigurationResult, FailureStage};
pub use status::StatusMessage;
pub use validation::ValidationError;

/// Configuration directory name (under XDG_CONFIG_HOME).
pub const CONFIG_DIR_NAME: &str = "netpreset";

/// Default preset file name.
pub const PRESET_FILE_NAME: &str = "config.txt";

/// Settings file name inside the configuration directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
