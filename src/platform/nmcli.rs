// netpreset - NetworkManager Backend
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Adapter configuration through NetworkManager's `nmcli`.
//!
//! Each active connection is one configuration object; its setting id is the
//! device name, which is also what the sysfs inventory uses as adapter id.
//! Every stage modifies the connection profile and then reapplies it to the
//! device so the change takes effect immediately.
//!
//! nmcli exit statuses are folded into the return-code table: invalid input
//! (2) becomes the stage's "invalid" code, "NetworkManager not running" (8)
//! becomes Not Supported, anything else Unknown Failure. Polkit refusals are
//! reported as [`PlatformError::AccessDenied`].

use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::process::Command;
use tracing::{debug, warn};

use super::{AdapterConfiguration, ConfigurationPlatform, PlatformError, PlatformResult, ReturnCode};
use crate::models::adapter::mask_to_prefix;
use crate::network_utils::query_ipv4;

/// nmcli exit status for invalid user input.
const EXIT_INVALID_INPUT: i32 = 2;

/// nmcli exit status when NetworkManager is not running.
const EXIT_NM_NOT_RUNNING: i32 = 8;

/// Captured result of one nmcli invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NmcliOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl NmcliOutput {
    fn success(&self) -> bool {
        self.code == Some(0)
    }
}

fn run_nmcli(args: &[&str]) -> PlatformResult<NmcliOutput> {
    debug!("nmcli {}", args.join(" "));
    let output = Command::new("nmcli").args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PlatformError::Unavailable("nmcli not found".to_string())
        } else {
            PlatformError::Unexpected(format!("Failed to run nmcli: {}", e))
        }
    })?;

    Ok(NmcliOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

fn is_access_denied(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("not authorized")
        || stderr.contains("insufficient privileges")
        || stderr.contains("permission denied")
}

/// Map an nmcli outcome onto the return-code table.
fn return_code(output: &NmcliOutput, invalid: ReturnCode) -> PlatformResult<ReturnCode> {
    if output.success() {
        return Ok(ReturnCode::SUCCESS);
    }
    if is_access_denied(&output.stderr) {
        return Err(PlatformError::AccessDenied(output.stderr.clone()));
    }

    warn!("nmcli exited with {:?}: {}", output.code, output.stderr);
    Ok(match output.code {
        Some(EXIT_INVALID_INPUT) => invalid,
        Some(EXIT_NM_NOT_RUNNING) => ReturnCode::NOT_SUPPORTED,
        _ => ReturnCode::UNKNOWN_FAILURE,
    })
}

/// Split one line of `nmcli -t` output, honouring `\:` and `\\` escapes.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let (Some(next), Some(field)) = (chars.next(), fields.last_mut()) {
                    field.push(next);
                }
            }
            ':' => fields.push(String::new()),
            c => {
                if let Some(field) = fields.last_mut() {
                    field.push(c);
                }
            }
        }
    }
    fields
}

/// Parse `nmcli -t -f NAME,UUID,DEVICE connection show --active`.
fn parse_active_connections(output: &str) -> Vec<(String, String, String)> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = split_terse(line).into_iter();
            let name = fields.next()?;
            let uuid = fields.next()?;
            let device = fields.next()?;
            if uuid.is_empty() || device.is_empty() {
                return None;
            }
            Some((name, uuid, device))
        })
        .collect()
}

/// One active NetworkManager connection.
#[derive(Debug, Clone)]
pub struct NmConnection {
    name: String,
    uuid: String,
    device: String,
    addresses: Vec<String>,
    subnets: Vec<String>,
}

impl NmConnection {
    /// Modify the connection profile, then reapply it to the device.
    fn modify(&self, settings: &[&str], invalid: ReturnCode) -> PlatformResult<ReturnCode> {
        debug!("Modifying connection '{}' on {}", self.name, self.device);
        let mut args = vec!["connection", "modify", self.uuid.as_str()];
        args.extend_from_slice(settings);

        let code = return_code(&run_nmcli(&args)?, invalid)?;
        if !code.is_success() {
            return Ok(code);
        }

        return_code(
            &run_nmcli(&["device", "reapply", self.device.as_str()])?,
            ReturnCode::UNKNOWN_FAILURE,
        )
    }
}

impl AdapterConfiguration for NmConnection {
    fn setting_id(&self) -> &str {
        &self.device
    }

    fn ip_addresses(&self) -> &[String] {
        &self.addresses
    }

    fn ip_subnets(&self) -> &[String] {
        &self.subnets
    }

    fn enable_static(&self, addresses: &[Ipv4Addr], masks: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
        if addresses.is_empty() {
            return Ok(ReturnCode::INVALID_IP_ADDRESS);
        }
        if masks.len() != addresses.len() {
            return Ok(ReturnCode::INVALID_SUBNET_MASK);
        }

        let mut cidrs = Vec::with_capacity(addresses.len());
        for (address, mask) in addresses.iter().zip(masks) {
            let Some(prefix) = mask_to_prefix(*mask) else {
                return Ok(ReturnCode::INVALID_SUBNET_MASK);
            };
            cidrs.push(format!("{}/{}", address, prefix));
        }
        let cidrs = cidrs.join(",");

        self.modify(
            &["ipv4.method", "manual", "ipv4.addresses", cidrs.as_str()],
            ReturnCode::INVALID_IP_ADDRESS,
        )
    }

    fn set_gateways(&self, gateways: &[Ipv4Addr], metrics: &[u16]) -> PlatformResult<ReturnCode> {
        // NetworkManager holds a single default gateway per connection.
        let Some(gateway) = gateways.first() else {
            return Ok(ReturnCode::INVALID_GATEWAY);
        };
        if gateways.len() > 1 {
            warn!("Ignoring {} additional gateway(s) on {}", gateways.len() - 1, self.device);
        }

        let gateway = gateway.to_string();
        let metric = metrics.first().copied().unwrap_or(1).to_string();
        self.modify(
            &["ipv4.gateway", gateway.as_str(), "ipv4.route-metric", metric.as_str()],
            ReturnCode::INVALID_GATEWAY,
        )
    }

    fn set_dns_server_search_order(&self, servers: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
        if servers.is_empty() {
            return Ok(ReturnCode::INVALID_DNS_SEARCH_ORDER);
        }

        let servers = servers
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.modify(
            &["ipv4.dns", servers.as_str(), "ipv4.ignore-auto-dns", "yes"],
            ReturnCode::INVALID_DNS_SEARCH_ORDER,
        )
    }
}

/// NetworkManager-backed configuration platform.
#[derive(Debug, Clone, Default)]
pub struct NmcliPlatform;

impl NmcliPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigurationPlatform for NmcliPlatform {
    type Configuration = NmConnection;

    fn configurations(&self) -> PlatformResult<Vec<NmConnection>> {
        let output = run_nmcli(&["-t", "-f", "NAME,UUID,DEVICE", "connection", "show", "--active"])?;
        if !output.success() {
            if is_access_denied(&output.stderr) {
                return Err(PlatformError::AccessDenied(output.stderr));
            }
            if output.code == Some(EXIT_NM_NOT_RUNNING) {
                return Err(PlatformError::Unavailable(output.stderr));
            }
            return Err(PlatformError::Unexpected(format!(
                "nmcli connection show failed: {}",
                output.stderr
            )));
        }

        let connections = parse_active_connections(&output.stdout)
            .into_iter()
            .map(|(name, uuid, device)| {
                let current = query_ipv4(&device).unwrap_or_else(|e| {
                    warn!("Could not read addresses of {}: {}", device, e);
                    Vec::new()
                });
                NmConnection {
                    name,
                    uuid,
                    addresses: current.iter().map(|c| c.address.to_string()).collect(),
                    subnets: current.iter().map(|c| c.subnet_mask.to_string()).collect(),
                    device,
                }
            })
            .collect::<Vec<_>>();

        debug!("Found {} active NetworkManager connection(s)", connections.len());
        Ok(connections)
    }
}
