// netpreset - Platform Backends
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Adapter-configuration surface of the host operating system.
//!
//! The workflow only talks to the traits in this module:
//! - [`ConfigurationPlatform`] enumerates live adapter configuration objects
//! - [`AdapterConfiguration`] exposes the three apply operations of one object
//! - [`AdapterInventory`] lists candidate adapters and their current address
//!
//! Operations return a numeric [`ReturnCode`]; `0` means success and every
//! other value maps to a fixed reason string. A [`PlatformError`] means the
//! call itself could not be carried out.

use std::fmt;
use std::net::Ipv4Addr;
use thiserror::Error;

use crate::models::{AdapterHandle, CurrentIpv4, Result};

#[cfg(target_os = "linux")]
pub mod nmcli;
#[cfg(windows)]
pub mod windows;

/// Result of a platform call.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Failure to perform a platform call at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The caller lacks the privilege to change network settings.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The configuration service or tool is not available.
    #[error("Configuration service unavailable: {0}")]
    Unavailable(String),

    /// Anything else.
    #[error("{0}")]
    Unexpected(String),
}

/// Numeric status returned by an apply operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnCode(pub u32);

impl ReturnCode {
    pub const SUCCESS: Self = Self(0);
    pub const NOT_SUPPORTED: Self = Self(1);
    pub const UNKNOWN_FAILURE: Self = Self(2);
    pub const INVALID_SUBNET_MASK: Self = Self(3);
    pub const INVALID_GATEWAY: Self = Self(4);
    pub const INVALID_IP_ADDRESS: Self = Self(5);
    pub const INVALID_DNS_SEARCH_ORDER: Self = Self(13);

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Human-readable reason for this code.
    pub fn reason(&self) -> String {
        match self.0 {
            0 => "Successful".to_string(),
            1 => "Not Supported".to_string(),
            2 => "Unknown Failure".to_string(),
            3 => "Invalid Subnet Mask".to_string(),
            4 => "Invalid Gateway".to_string(),
            5 => "Invalid IP Address".to_string(),
            13 => "Invalid DNSServerSearchOrder".to_string(),
            code => format!("WMI Return Code: {}", code),
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// One live adapter configuration object.
pub trait AdapterConfiguration {
    /// Stable identifier matched against [`AdapterHandle::id`].
    fn setting_id(&self) -> &str;

    /// Addresses currently bound, as reported by the platform.
    fn ip_addresses(&self) -> &[String];

    /// Subnet masks matching [`ip_addresses`](Self::ip_addresses) by index.
    fn ip_subnets(&self) -> &[String];

    /// Switch to static addressing with the given address/mask lists.
    fn enable_static(&self, addresses: &[Ipv4Addr], masks: &[Ipv4Addr]) -> PlatformResult<ReturnCode>;

    /// Set default gateways with per-gateway cost metrics.
    fn set_gateways(&self, gateways: &[Ipv4Addr], metrics: &[u16]) -> PlatformResult<ReturnCode>;

    /// Replace the DNS server search order; the first entry is primary.
    fn set_dns_server_search_order(&self, servers: &[Ipv4Addr]) -> PlatformResult<ReturnCode>;
}

/// Source of live adapter configuration objects.
pub trait ConfigurationPlatform {
    type Configuration: AdapterConfiguration;

    /// Enumerate every configuration object currently known to the platform.
    fn configurations(&self) -> PlatformResult<Vec<Self::Configuration>>;
}

/// Enumeration of candidate adapters.
pub trait AdapterInventory {
    /// Adapters that are up, Ethernet or Wi-Fi, and have an IPv4 address.
    fn list_adapters(&self) -> Result<Vec<AdapterHandle>>;

    /// Address and mask currently bound to `adapter`, if any.
    fn current_ipv4(&self, adapter: &AdapterHandle) -> Result<Option<CurrentIpv4>>;
}

/// First IPv4 address/mask pair reported by a configuration object.
///
/// Address lists may mix IPv4 and IPv6 entries; masks are matched by index.
#[cfg(any(windows, test))]
pub fn first_ipv4<C: AdapterConfiguration + ?Sized>(config: &C) -> Option<CurrentIpv4> {
    config
        .ip_addresses()
        .iter()
        .zip(config.ip_subnets())
        .find_map(|(address, mask)| {
            Some(CurrentIpv4 {
                address: address.parse().ok()?,
                subnet_mask: mask.parse().ok()?,
            })
        })
}

/// Backend for the current operating system.
#[cfg(target_os = "linux")]
pub fn native() -> nmcli::NmcliPlatform {
    nmcli::NmcliPlatform::new()
}

/// Backend for the current operating system.
#[cfg(windows)]
pub fn native() -> windows::CimPlatform {
    windows::CimPlatform::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_table() {
        assert_eq!(ReturnCode(0).reason(), "Successful");
        assert_eq!(ReturnCode(1).reason(), "Not Supported");
        assert_eq!(ReturnCode(2).reason(), "Unknown Failure");
        assert_eq!(ReturnCode(3).reason(), "Invalid Subnet Mask");
        assert_eq!(ReturnCode(4).reason(), "Invalid Gateway");
        assert_eq!(ReturnCode(5).reason(), "Invalid IP Address");
        assert_eq!(ReturnCode(13).reason(), "Invalid DNSServerSearchOrder");
        assert_eq!(ReturnCode(42).reason(), "WMI Return Code: 42");
        assert!(ReturnCode::SUCCESS.is_success());
        assert!(!ReturnCode::INVALID_GATEWAY.is_success());
    }

    struct Snapshot {
        addresses: Vec<String>,
        subnets: Vec<String>,
    }

    impl AdapterConfiguration for Snapshot {
        fn setting_id(&self) -> &str {
            "snapshot"
        }
        fn ip_addresses(&self) -> &[String] {
            &self.addresses
        }
        fn ip_subnets(&self) -> &[String] {
            &self.subnets
        }
        fn enable_static(&self, _: &[Ipv4Addr], _: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
            Ok(ReturnCode::NOT_SUPPORTED)
        }
        fn set_gateways(&self, _: &[Ipv4Addr], _: &[u16]) -> PlatformResult<ReturnCode> {
            Ok(ReturnCode::NOT_SUPPORTED)
        }
        fn set_dns_server_search_order(&self, _: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
            Ok(ReturnCode::NOT_SUPPORTED)
        }
    }

    #[test]
    fn test_first_ipv4_skips_ipv6() {
        let snapshot = Snapshot {
            addresses: vec!["fe80::1".into(), "192.168.1.20".into()],
            subnets: vec!["64".into(), "255.255.255.0".into()],
        };
        let current = first_ipv4(&snapshot).unwrap();
        assert_eq!(current.address, Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(current.subnet_mask, Ipv4Addr::new(255, 255, 255, 0));

        let empty = Snapshot {
            addresses: Vec::new(),
            subnets: Vec::new(),
        };
        assert!(first_ipv4(&empty).is_none());
    }
}
