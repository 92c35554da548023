// netpreset - Apply Requests
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Raw selections collected by the front end and the validated request
//! built from them.

use serde::Serialize;
use std::net::Ipv4Addr;

use super::adapter::AdapterHandle;

/// Where the subnet mask comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskInput {
    /// Read from the adapter; `None` when retrieval failed.
    FromAdapter(Option<String>),
    /// Typed by the user.
    Entered(String),
}

/// Unvalidated user selections for one apply action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySelection {
    pub adapter: Option<AdapterHandle>,
    /// Resolved value of the selected gateway preset.
    pub gateway: Option<String>,
    /// Resolved value of the selected DNS preset.
    pub dns_servers: Option<Vec<String>>,
    pub ip_address: String,
    pub subnet_mask: MaskInput,
}

/// Fully validated static configuration, built only by
/// [`validate`](super::validation::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticConfigRequest {
    pub adapter: AdapterHandle,
    pub ip_address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    /// Resolver order; the first entry is primary.
    pub dns_servers: Vec<Ipv4Addr>,
}

impl StaticConfigRequest {
    pub(super) fn new(
        adapter: AdapterHandle,
        ip_address: Ipv4Addr,
        subnet_mask: Ipv4Addr,
        gateway: Ipv4Addr,
        dns_servers: Vec<Ipv4Addr>,
    ) -> Self {
        Self {
            adapter,
            ip_address,
            subnet_mask,
            gateway,
            dns_servers,
        }
    }

    /// One-line summary for logs and status output.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} via {}, DNS {}",
            self.ip_address,
            self.subnet_mask,
            self.gateway,
            self.dns_servers
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
