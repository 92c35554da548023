// netpreset - Network Utilities
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Network interface detection on Linux.
//!
//! Interfaces are read from /sys/class/net; IPv4 addressing comes from
//! `ip -4 -o addr show`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use crate::models::adapter::prefix_to_mask;
use crate::models::{AdapterHandle, AdapterKind, CurrentIpv4, Error, Result};
use crate::platform::AdapterInventory;

/// Matches the `inet a.b.c.d/nn` part of `ip -o` output.
static INET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\binet\s+(\d{1,3}(?:\.\d{1,3}){3})/(\d{1,2})\b").expect("valid inet pattern")
});

/// Adapter inventory backed by sysfs and iproute2.
#[derive(Debug, Clone)]
pub struct SysfsInventory {
    net_path: PathBuf,
}

impl SysfsInventory {
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    /// Use a different sysfs net directory.
    pub fn with_root(net_path: impl Into<PathBuf>) -> Self {
        Self {
            net_path: net_path.into(),
        }
    }

    /// Interfaces that are up and look like Ethernet or Wi-Fi, in natural
    /// name order, without checking addresses.
    pub fn operational_interfaces(&self) -> Result<Vec<AdapterHandle>> {
        let entries = fs::read_dir(&self.net_path).map_err(|e| {
            Error::AdapterQuery(format!("cannot read {}: {}", self.net_path.display(), e))
        })?;

        let mut adapters = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            let kind = determine_adapter_kind(&path, &name);
            if !kind.is_candidate() {
                continue;
            }

            let operstate = fs::read_to_string(path.join("operstate")).unwrap_or_default();
            if operstate.trim() != "up" {
                debug!("Skipping {}: operstate {}", name, operstate.trim());
                continue;
            }

            let description = driver_name(&path).unwrap_or_else(|| name.clone());
            adapters.push(AdapterHandle::new(name, description, kind));
        }

        adapters.sort_by(|a, b| natural_sort_key(&a.id).cmp(&natural_sort_key(&b.id)));
        Ok(adapters)
    }
}

impl Default for SysfsInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterInventory for SysfsInventory {
    fn list_adapters(&self) -> Result<Vec<AdapterHandle>> {
        let mut adapters = Vec::new();
        for adapter in self.operational_interfaces()? {
            if query_ipv4(&adapter.id)?.is_empty() {
                debug!("Skipping {}: no IPv4 address", adapter.id);
                continue;
            }
            adapters.push(adapter);
        }
        Ok(adapters)
    }

    fn current_ipv4(&self, adapter: &AdapterHandle) -> Result<Option<CurrentIpv4>> {
        Ok(query_ipv4(&adapter.id)?.into_iter().next())
    }
}

/// IPv4 addresses bound to `interface`, in kernel order.
pub fn query_ipv4(interface: &str) -> Result<Vec<CurrentIpv4>> {
    let output = Command::new("ip")
        .args(["-4", "-o", "addr", "show", "dev", interface])
        .output()
        .map_err(|e| Error::AdapterQuery(format!("failed to run ip: {}", e)))?;

    if !output.status.success() {
        // The device vanished between listing and query.
        warn!(
            "ip addr show {} failed: {}",
            interface,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(Vec::new());
    }

    Ok(parse_ip_addr_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `ip -4 -o addr show` output into address/mask pairs.
pub fn parse_ip_addr_output(output: &str) -> Vec<CurrentIpv4> {
    output
        .lines()
        .filter_map(|line| {
            let caps = INET_RE.captures(line)?;
            let address: Ipv4Addr = caps[1].parse().ok()?;
            let prefix: u8 = caps[2].parse().ok()?;
            Some(CurrentIpv4 {
                address,
                subnet_mask: prefix_to_mask(prefix)?,
            })
        })
        .collect()
}

/// Determine the type of network adapter.
fn determine_adapter_kind(path: &Path, name: &str) -> AdapterKind {
    if path.join("wireless").exists() || path.join("phy80211").exists() {
        return AdapterKind::Wifi;
    }

    if let Ok(uevent) = fs::read_to_string(path.join("uevent")) {
        if uevent.contains("DEVTYPE=wlan") {
            return AdapterKind::Wifi;
        }
    }

    // 1 = ARPHRD_ETHER
    let type_num: u32 = fs::read_to_string(path.join("type"))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    if type_num == 1 && !is_virtual_interface(name) {
        return AdapterKind::Ethernet;
    }

    AdapterKind::Other
}

/// Driver name, used as the human-readable description.
fn driver_name(path: &Path) -> Option<String> {
    let link = fs::read_link(path.join("device").join("driver")).ok()?;
    Some(link.file_name()?.to_string_lossy().to_string())
}

/// Check if interface name suggests a virtual/tunnel interface.
fn is_virtual_interface(name: &str) -> bool {
    const PREFIXES: [&str; 11] = [
        "veth", "br", "virbr", "docker", "vnet", "tun", "tap", "bond", "team", "vlan", "lo",
    ];
    PREFIXES.iter().any(|p| name.starts_with(p)) || name.contains("podman")
}

/// Piece of an interface name for natural ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NameChunk {
    Number(u64),
    Text(String),
}

/// Generate a sort key that sorts numbers naturally.
///
/// Runs of digits compare as numbers, so `enp2s10` < `enp3s0` < `enp3s1`.
fn natural_sort_key(s: &str) -> Vec<NameChunk> {
    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                chunks.push(NameChunk::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                chunks.push(number_chunk(&std::mem::take(&mut digits)));
            }
            text.push(c);
        }
    }

    if !text.is_empty() {
        chunks.push(NameChunk::Text(text));
    }
    if !digits.is_empty() {
        chunks.push(number_chunk(&digits));
    }
    chunks
}

fn number_chunk(digits: &str) -> NameChunk {
    // Only overflows past u64::MAX; saturate.
    NameChunk::Number(digits.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_interface(root: &Path, name: &str, type_num: &str, operstate: &str, wireless: bool) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type"), type_num).unwrap();
        fs::write(dir.join("operstate"), operstate).unwrap();
        if wireless {
            fs::create_dir_all(dir.join("wireless")).unwrap();
        }
    }

    #[test]
    fn test_natural_sort_key() {
        assert_eq!(
            natural_sort_key("enp3s0"),
            vec![
                NameChunk::Text("enp".into()),
                NameChunk::Number(3),
                NameChunk::Text("s".into()),
                NameChunk::Number(0),
            ]
        );

        let mut names = vec!["enp3s1", "eth10", "enp2s10", "eth2", "enp3s0", "eth"];
        names.sort_by_key(|name| natural_sort_key(name));
        assert_eq!(names, vec!["enp2s10", "enp3s0", "enp3s1", "eth", "eth2", "eth10"]);
    }

    #[test]
    fn test_parse_ip_addr_output() {
        let output = "2: eth0    inet 192.168.1.10/24 brd 192.168.1.255 scope global dynamic eth0\\       valid_lft 86000sec preferred_lft 86000sec\n\
                      2: eth0    inet 10.0.0.5/8 scope global secondary eth0\n";
        let parsed = parse_ip_addr_output(output);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].address, Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(parsed[0].subnet_mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(parsed[1].subnet_mask, Ipv4Addr::new(255, 0, 0, 0));
        assert!(parse_ip_addr_output("").is_empty());
    }

    #[test]
    fn test_operational_interfaces_filter() {
        let dir = tempfile::tempdir().unwrap();
        fake_interface(dir.path(), "eth10", "1\n", "up\n", false);
        fake_interface(dir.path(), "eth2", "1\n", "up\n", false);
        fake_interface(dir.path(), "eth3", "1\n", "down\n", false);
        fake_interface(dir.path(), "wlan0", "1\n", "up\n", true);
        fake_interface(dir.path(), "docker0", "1\n", "up\n", false);
        fake_interface(dir.path(), "lo", "772\n", "unknown\n", false);

        let inventory = SysfsInventory::with_root(dir.path());
        let adapters = inventory.operational_interfaces().unwrap();
        let ids: Vec<&str> = adapters.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["eth2", "eth10", "wlan0"]);
        assert_eq!(adapters[2].kind, AdapterKind::Wifi);
        assert_eq!(adapters[0].description, "eth2");
    }

    #[test]
    fn test_missing_sysfs_is_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = SysfsInventory::with_root(dir.path().join("absent"));
        assert!(matches!(
            inventory.operational_interfaces(),
            Err(Error::AdapterQuery(_))
        ));
    }
}
