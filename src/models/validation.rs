// netpreset - Validation Utilities
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Pre-apply validation of user selections.
//!
//! Validation is pure: it never touches the platform and stops at the first
//! problem found. Checks run in a fixed order (adapter, gateway preset, DNS
//! preset, subnet mask, then address literals) so the reported reason is
//! deterministic.

use serde::Serialize;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

use super::request::{ApplySelection, MaskInput, StaticConfigRequest};

/// Input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Adapter,
    Gateway,
    Dns,
    SubnetMask,
    IpAddress,
}

/// Reason a selection was rejected before any platform call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a network adapter.")]
    NoAdapter,

    #[error("Please select a modem (gateway).")]
    NoGateway,

    #[error("Please select DNS servers.")]
    NoDns,

    #[error("Could not retrieve current Subnet Mask. Cannot proceed.")]
    MaskUnavailable,

    #[error("Invalid Subnet Mask format: {0}")]
    InvalidMask(String),

    #[error("Invalid Static IP Address format.")]
    InvalidIpAddress(String),

    #[error("Invalid Gateway IP Address format.")]
    InvalidGateway(String),

    #[error("Invalid DNS IP Address format: {0}")]
    InvalidDns(String),
}

impl ValidationError {
    /// The field that was rejected.
    pub fn field(&self) -> Field {
        match self {
            Self::NoAdapter => Field::Adapter,
            Self::NoGateway | Self::InvalidGateway(_) => Field::Gateway,
            Self::NoDns | Self::InvalidDns(_) => Field::Dns,
            Self::MaskUnavailable | Self::InvalidMask(_) => Field::SubnetMask,
            Self::InvalidIpAddress(_) => Field::IpAddress,
        }
    }
}

/// Parse a dotted-quad IPv4 literal.
pub fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    Ipv4Addr::from_str(s.trim()).ok()
}

/// Validate a selection and build the request the workflow applies.
///
/// Subnet consistency between address, mask and gateway is not checked.
pub fn validate(selection: ApplySelection) -> Result<StaticConfigRequest, ValidationError> {
    let adapter = selection.adapter.ok_or(ValidationError::NoAdapter)?;
    let gateway = selection.gateway.ok_or(ValidationError::NoGateway)?;
    let dns_servers = selection
        .dns_servers
        .filter(|servers| !servers.is_empty())
        .ok_or(ValidationError::NoDns)?;

    let subnet_mask = match selection.subnet_mask {
        MaskInput::FromAdapter(None) => return Err(ValidationError::MaskUnavailable),
        MaskInput::FromAdapter(Some(mask)) if mask.trim().is_empty() => {
            return Err(ValidationError::MaskUnavailable)
        }
        MaskInput::FromAdapter(Some(mask)) | MaskInput::Entered(mask) => {
            parse_ipv4(&mask).ok_or(ValidationError::InvalidMask(mask))?
        }
    };

    let ip_address = parse_ipv4(&selection.ip_address)
        .ok_or_else(|| ValidationError::InvalidIpAddress(selection.ip_address.clone()))?;
    let gateway = parse_ipv4(&gateway).ok_or(ValidationError::InvalidGateway(gateway))?;
    let dns_servers = dns_servers
        .into_iter()
        .map(|dns| parse_ipv4(&dns).ok_or(ValidationError::InvalidDns(dns)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StaticConfigRequest::new(
        adapter,
        ip_address,
        subnet_mask,
        gateway,
        dns_servers,
    ))
}
