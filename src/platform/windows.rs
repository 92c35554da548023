// netpreset - Windows Backend
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Adapter configuration through WMI `Win32_NetworkAdapterConfiguration`.
//!
//! Calls go through PowerShell's CIM cmdlets; `Invoke-CimMethod` reports the
//! WMI `ReturnValue` directly, so codes need no translation. Query results
//! are exchanged as JSON.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::process::Command;
use tracing::{debug, warn};

use super::{
    first_ipv4, AdapterConfiguration, AdapterInventory, ConfigurationPlatform, PlatformError,
    PlatformResult, ReturnCode,
};
use crate::models::{AdapterHandle, AdapterKind, CurrentIpv4, Error, Result};

/// IANA ifType for Ethernet.
const IF_TYPE_ETHERNET: u32 = 6;

/// IANA ifType for 802.11 wireless.
const IF_TYPE_IEEE80211: u32 = 71;

const LIST_CONFIGURATIONS: &str = "ConvertTo-Json -Compress -InputObject @(\
Get-CimInstance -ClassName Win32_NetworkAdapterConfiguration | \
Select-Object SettingID, IPAddress, IPSubnet)";

const LIST_ADAPTERS: &str = "ConvertTo-Json -Compress -InputObject @(\
Get-NetAdapter | ForEach-Object { [pscustomobject]@{ \
Id = $_.InterfaceGuid; \
Description = $_.InterfaceDescription; \
Status = [string]$_.Status; \
InterfaceType = [int]$_.InterfaceType; \
HasIPv4 = [bool](Get-NetIPAddress -InterfaceIndex $_.ifIndex -AddressFamily IPv4 -ErrorAction SilentlyContinue) } })";

/// Captured result of one PowerShell invocation.
struct PsOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

fn run_powershell(script: &str) -> PlatformResult<PsOutput> {
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script])
        .output()
        .map_err(|e| PlatformError::Unavailable(format!("Failed to run PowerShell: {}", e)))?;

    let result = PsOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    if !result.success || !result.stderr.is_empty() {
        if is_access_denied(&result.stderr) {
            return Err(PlatformError::AccessDenied(result.stderr));
        }
        if !result.success {
            return Err(PlatformError::Unexpected(result.stderr));
        }
    }
    Ok(result)
}

fn is_access_denied(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("access denied")
        || stderr.contains("access is denied")
        || stderr.contains("0x80041003")
        || stderr.contains("unauthorizedaccess")
}

/// Quote a value as a PowerShell single-quoted literal.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn ps_string_array<T: ToString>(values: &[T]) -> String {
    let items = values
        .iter()
        .map(|v| ps_quote(&v.to_string()))
        .collect::<Vec<_>>()
        .join(",");
    format!("[string[]]@({})", items)
}

/// ConvertTo-Json emits `null` for empty WMI arrays.
#[derive(Debug, Deserialize)]
struct RawConfiguration {
    #[serde(rename = "SettingID")]
    setting_id: Option<String>,
    #[serde(rename = "IPAddress", default)]
    ip_address: Option<Vec<String>>,
    #[serde(rename = "IPSubnet", default)]
    ip_subnet: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAdapter {
    id: Option<String>,
    description: Option<String>,
    status: Option<String>,
    interface_type: u32,
    #[serde(rename = "HasIPv4")]
    has_ipv4: bool,
}

fn parse_configurations(json: &str) -> PlatformResult<Vec<CimConfiguration>> {
    if json.is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<RawConfiguration> = serde_json::from_str(json)
        .map_err(|e| PlatformError::Unexpected(format!("Unreadable WMI output: {}", e)))?;

    Ok(raw
        .into_iter()
        .filter_map(|r| {
            Some(CimConfiguration {
                setting_id: r.setting_id?,
                addresses: r.ip_address.unwrap_or_default(),
                subnets: r.ip_subnet.unwrap_or_default(),
            })
        })
        .collect())
}

fn parse_adapters(json: &str) -> Result<Vec<AdapterHandle>> {
    if json.is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<RawAdapter> = serde_json::from_str(json)
        .map_err(|e| Error::AdapterQuery(format!("Unreadable adapter list: {}", e)))?;

    Ok(raw
        .into_iter()
        .filter(|a| a.status.as_deref() == Some("Up") && a.has_ipv4)
        .filter_map(|a| {
            let kind = match a.interface_type {
                IF_TYPE_ETHERNET => AdapterKind::Ethernet,
                IF_TYPE_IEEE80211 => AdapterKind::Wifi,
                _ => return None,
            };
            let id = a.id?;
            let description = a.description.unwrap_or_else(|| id.clone());
            Some(AdapterHandle::new(id, description, kind))
        })
        .collect())
}

/// One `Win32_NetworkAdapterConfiguration` instance.
#[derive(Debug, Clone)]
pub struct CimConfiguration {
    setting_id: String,
    addresses: Vec<String>,
    subnets: Vec<String>,
}

impl CimConfiguration {
    fn invoke(&self, method: &str, arguments: &str) -> PlatformResult<ReturnCode> {
        let script = format!(
            "$id = {}; \
$c = Get-CimInstance -ClassName Win32_NetworkAdapterConfiguration | Where-Object {{ $_.SettingID -eq $id }} | Select-Object -First 1; \
(Invoke-CimMethod -InputObject $c -MethodName {} -Arguments @{{ {} }} -ErrorAction Stop).ReturnValue",
            ps_quote(&self.setting_id),
            method,
            arguments
        );
        debug!("Invoking {} on {}", method, self.setting_id);

        let output = run_powershell(&script)?;
        output
            .stdout
            .lines()
            .last()
            .and_then(|line| line.trim().parse::<u32>().ok())
            .map(ReturnCode)
            .ok_or_else(|| {
                PlatformError::Unexpected(format!(
                    "{} returned no status: {}",
                    method, output.stderr
                ))
            })
    }
}

impl AdapterConfiguration for CimConfiguration {
    fn setting_id(&self) -> &str {
        &self.setting_id
    }

    fn ip_addresses(&self) -> &[String] {
        &self.addresses
    }

    fn ip_subnets(&self) -> &[String] {
        &self.subnets
    }

    fn enable_static(&self, addresses: &[Ipv4Addr], masks: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
        self.invoke(
            "EnableStatic",
            &format!(
                "IPAddress = {}; SubnetMask = {}",
                ps_string_array(addresses),
                ps_string_array(masks)
            ),
        )
    }

    fn set_gateways(&self, gateways: &[Ipv4Addr], metrics: &[u16]) -> PlatformResult<ReturnCode> {
        let metrics = metrics
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.invoke(
            "SetGateways",
            &format!(
                "DefaultIPGateway = {}; GatewayCostMetric = [uint16[]]@({})",
                ps_string_array(gateways),
                metrics
            ),
        )
    }

    fn set_dns_server_search_order(&self, servers: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
        self.invoke(
            "SetDNSServerSearchOrder",
            &format!("DNSServerSearchOrder = {}", ps_string_array(servers)),
        )
    }
}

/// WMI-backed configuration platform and adapter inventory.
#[derive(Debug, Clone, Default)]
pub struct CimPlatform;

impl CimPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigurationPlatform for CimPlatform {
    type Configuration = CimConfiguration;

    fn configurations(&self) -> PlatformResult<Vec<CimConfiguration>> {
        let output = run_powershell(LIST_CONFIGURATIONS)?;
        parse_configurations(&output.stdout)
    }
}

impl AdapterInventory for CimPlatform {
    fn list_adapters(&self) -> Result<Vec<AdapterHandle>> {
        let output = run_powershell(LIST_ADAPTERS).map_err(|e| Error::AdapterQuery(e.to_string()))?;
        parse_adapters(&output.stdout)
    }

    fn current_ipv4(&self, adapter: &AdapterHandle) -> Result<Option<CurrentIpv4>> {
        let configurations = self
            .configurations()
            .map_err(|e| Error::AdapterQuery(e.to_string()))?;

        match configurations.iter().find(|c| c.setting_id == adapter.id) {
            Some(config) => Ok(first_ipv4(config)),
            None => {
                warn!("No WMI configuration for adapter {}", adapter.id);
                Ok(None)
            }
        }
    }
}
