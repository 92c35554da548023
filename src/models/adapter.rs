// netpreset - Adapter Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Network adapter identification types.
//!
//! An [`AdapterHandle`] is produced by inventory enumeration and names one
//! adapter by its platform setting identifier. Handles are immutable and are
//! re-created on every inventory refresh.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Type of network adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Wired Ethernet adapter.
    Ethernet,
    /// 802.11 wireless adapter.
    Wifi,
    /// Anything else (virtual, loopback, tunnels).
    Other,
}

impl AdapterKind {
    /// Get human-readable name for this adapter type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ethernet => "Ethernet",
            Self::Wifi => "Wi-Fi",
            Self::Other => "Network",
        }
    }

    /// Whether adapters of this kind can be offered for configuration.
    pub fn is_candidate(&self) -> bool {
        matches!(self, Self::Ethernet | Self::Wifi)
    }
}

/// Identifies one network adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterHandle {
    /// Opaque stable identifier (interface GUID on Windows, name on Linux).
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Type of adapter.
    pub kind: AdapterKind,
}

impl AdapterHandle {
    /// Create a new handle.
    pub fn new(id: impl Into<String>, description: impl Into<String>, kind: AdapterKind) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            kind,
        }
    }

    /// Get a display label for the adapter.
    pub fn display_label(&self) -> String {
        if self.description.is_empty() || self.description == self.id {
            format!("{} - {}", self.id, self.kind.display_name())
        } else {
            format!("{} ({})", self.description, self.id)
        }
    }

    /// Whether `query` names this adapter, by id or by description.
    pub fn matches(&self, query: &str) -> bool {
        self.id == query || self.description == query
    }
}

impl fmt::Display for AdapterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}

/// Address and mask currently bound to an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentIpv4 {
    pub address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
}

impl fmt::Display for CurrentIpv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.address, self.subnet_mask)
    }
}

/// Convert a prefix length to a dotted subnet mask.
pub fn prefix_to_mask(prefix: u8) -> Option<Ipv4Addr> {
    match prefix {
        0 => Some(Ipv4Addr::UNSPECIFIED),
        1..=32 => Some(Ipv4Addr::from(u32::MAX << (32 - u32::from(prefix)))),
        _ => None,
    }
}

/// Convert a dotted subnet mask to a prefix length.
///
/// Returns `None` for non-contiguous masks such as `255.0.255.0`.
pub fn mask_to_prefix(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let prefix = bits.leading_ones();
    if bits.checked_shl(prefix).unwrap_or(0) != 0 {
        return None;
    }
    u8::try_from(prefix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_to_mask() {
        assert_eq!(prefix_to_mask(24), Some(Ipv4Addr::new(255, 255, 255, 0)));
        assert_eq!(prefix_to_mask(32), Some(Ipv4Addr::BROADCAST));
        assert_eq!(prefix_to_mask(0), Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(prefix_to_mask(33), None);
    }

    #[test]
    fn test_mask_to_prefix() {
        assert_eq!(mask_to_prefix(Ipv4Addr::new(255, 255, 255, 0)), Some(24));
        assert_eq!(mask_to_prefix(Ipv4Addr::new(255, 255, 252, 0)), Some(22));
        assert_eq!(mask_to_prefix(Ipv4Addr::BROADCAST), Some(32));
        assert_eq!(mask_to_prefix(Ipv4Addr::UNSPECIFIED), Some(0));
        assert_eq!(mask_to_prefix(Ipv4Addr::new(255, 0, 255, 0)), None);
    }

    #[test]
    fn test_handle_matching() {
        let handle = AdapterHandle::new("eth0", "e1000e", AdapterKind::Ethernet);
        assert!(handle.matches("eth0"));
        assert!(handle.matches("e1000e"));
        assert!(!handle.matches("wlan0"));
        assert_eq!(handle.display_label(), "e1000e (eth0)");
    }
}
