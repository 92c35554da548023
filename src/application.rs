// netpreset - Application
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Command handlers behind the command line front end.
//!
//! Each handler writes its result to the given writer, as text or as JSON.
//! Handlers return `Ok(false)` when they have already reported a failure.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::models::{
    AdapterHandle, AdapterKind, ApplySelection, CurrentIpv4, Error, MaskInput, MaskSource,
    Result, StatusMessage,
};
use crate::platform::{AdapterInventory, ConfigurationPlatform};
use crate::storage::DataStore;
use crate::workflow::{Outcome, Workflow, WorkflowReport};

/// Arguments of the `apply` command. Missing values are left for
/// validation to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyArgs {
    pub adapter: Option<String>,
    pub gateway: Option<String>,
    pub dns: Option<String>,
    pub ip: Option<String>,
    pub mask: Option<String>,
}

/// One row of the adapter listing.
#[derive(Debug, Serialize)]
struct AdapterRow<'a> {
    #[serde(flatten)]
    adapter: &'a AdapterHandle,
    #[serde(flatten)]
    current: Option<CurrentIpv4>,
}

pub struct Application<I, P> {
    store: DataStore,
    inventory: I,
    platform: P,
    json: bool,
}

impl<I: AdapterInventory, P: ConfigurationPlatform> Application<I, P> {
    pub fn new(store: DataStore, inventory: I, platform: P, json: bool) -> Self {
        Self {
            store,
            inventory,
            platform,
            json,
        }
    }

    fn current_ipv4(&self, adapter: &AdapterHandle) -> Option<CurrentIpv4> {
        match self.inventory.current_ipv4(adapter) {
            Ok(current) => current,
            Err(e) => {
                warn!("Could not read current address of {}: {}", adapter.id, e);
                None
            }
        }
    }

    fn find_adapter(&self, query: &str) -> Result<Option<AdapterHandle>> {
        Ok(self
            .inventory
            .list_adapters()?
            .into_iter()
            .find(|adapter| adapter.matches(query)))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// List candidate adapters with their current address.
    pub fn adapters(&self, out: &mut dyn Write) -> Result<bool> {
        let adapters = self.inventory.list_adapters()?;
        info!("Found {} candidate adapter(s)", adapters.len());

        let rows: Vec<AdapterRow> = adapters
            .iter()
            .map(|adapter| AdapterRow {
                adapter,
                current: self.current_ipv4(adapter),
            })
            .collect();

        if self.json {
            writeln!(out, "{}", json_string(&rows)?)?;
            return Ok(true);
        }

        if rows.is_empty() {
            writeln!(out, "No active Ethernet or Wi-Fi adapters with an IPv4 address.")?;
        }
        for row in &rows {
            match row.current {
                Some(current) => writeln!(out, "{}  {}", row.adapter, current)?,
                None => writeln!(out, "{}", row.adapter)?,
            }
        }
        Ok(true)
    }

    /// List gateway and DNS presets.
    pub fn presets(&mut self, out: &mut dyn Write) -> Result<bool> {
        let path = self.store.preset_path();
        let presets = self.store.reload_presets()?;
        debug!("Sections in {:?}: {:?}", path, presets.sections);
        debug!("Gateway presets: {:?}", presets.gateways.names());
        debug!("DNS presets: {:?}", presets.dns.names());

        if self.json {
            let value = json!({
                "file": path,
                "gateways": presets.gateway_entries(),
                "dns": presets.dns_entries(),
            });
            writeln!(out, "{}", json_string(&value)?)?;
            return Ok(true);
        }

        if presets.is_empty() {
            writeln!(out, "No presets defined in {}", path.display())?;
            return Ok(true);
        }
        writeln!(out, "Modems:")?;
        for entry in presets.gateway_entries() {
            writeln!(out, "  {}", entry.label())?;
        }
        writeln!(out, "DNS:")?;
        for entry in presets.dns_entries() {
            writeln!(out, "  {}", entry.label())?;
        }
        Ok(true)
    }

    /// Show the current address of one adapter.
    pub fn show(&self, query: &str, out: &mut dyn Write) -> Result<bool> {
        let adapter = self
            .find_adapter(query)?
            .ok_or_else(|| Error::AdapterNotFound(query.to_string()))?;
        let current = self.current_ipv4(&adapter);

        if self.json {
            let row = AdapterRow {
                adapter: &adapter,
                current,
            };
            writeln!(out, "{}", json_string(&row)?)?;
            return Ok(true);
        }

        writeln!(out, "Adapter:      {}", adapter)?;
        writeln!(out, "Type:         {}", adapter.kind.display_name())?;
        match current {
            Some(current) => {
                writeln!(out, "IP Address:   {}", current.address)?;
                writeln!(out, "Subnet Mask:  {}", current.subnet_mask)?;
            }
            None => writeln!(out, "IP Address:   (none)")?,
        }
        Ok(true)
    }

    /// Build the selection for `args` and run the workflow.
    pub fn apply(&mut self, args: &ApplyArgs, out: &mut dyn Write) -> Result<bool> {
        let selection = self.selection(args)?;
        let report = Workflow::new(&self.platform).run(selection);
        self.report(&report, out)?;
        Ok(report.is_success())
    }

    fn selection(&mut self, args: &ApplyArgs) -> Result<ApplySelection> {
        let mask_source = self.store.settings().mask_source;
        debug!("Mask source: {}", mask_source.as_str());
        let presets = self.store.presets()?;

        let gateway = args.gateway.as_deref().and_then(|name| {
            let value = presets.gateway(name);
            if value.is_none() {
                warn!("Unknown gateway preset '{}'", name);
            }
            value.map(str::to_string)
        });
        let dns_servers = args.dns.as_deref().and_then(|name| {
            let value = presets.dns_servers(name);
            if value.is_none() {
                warn!("Unknown DNS preset '{}'", name);
            }
            value.map(<[String]>::to_vec)
        });

        let (adapter, current) = match args.adapter.as_deref() {
            None => (None, None),
            Some(query) => match self.find_adapter(query)? {
                Some(adapter) => {
                    let current = self.current_ipv4(&adapter);
                    (Some(adapter), current)
                }
                None => {
                    // Unknown adapters still go through the workflow. Without
                    // --mask validation stops at the missing mask first.
                    warn!(
                        "Adapter '{}' is not an active candidate; its current address and mask are unknown",
                        query
                    );
                    (Some(AdapterHandle::new(query, query, AdapterKind::Other)), None)
                }
            },
        };

        let ip_address = args
            .ip
            .clone()
            .or_else(|| current.map(|c| c.address.to_string()))
            .unwrap_or_default();

        let subnet_mask = match (&args.mask, mask_source) {
            (Some(mask), _) => MaskInput::Entered(mask.clone()),
            (None, MaskSource::Adapter) => {
                MaskInput::FromAdapter(current.map(|c| c.subnet_mask.to_string()))
            }
            (None, MaskSource::Manual) => MaskInput::Entered(String::new()),
        };

        Ok(ApplySelection {
            adapter,
            gateway,
            dns_servers,
            ip_address,
            subnet_mask,
        })
    }

    fn report(&self, report: &WorkflowReport, out: &mut dyn Write) -> Result<()> {
        let success = report.is_success();
        let status = StatusMessage::action(
            report.message(),
            !success,
            Utc::now(),
            self.store.settings().status_message_secs,
        );

        let error = match &report.outcome {
            Outcome::Rejected(err) => Some(Error::from(err.clone())),
            Outcome::Completed(result) => result.clone().into_result().err(),
        };
        if let Some(error) = &error {
            warn!("Apply failed: {}", error);
        }

        if self.json {
            let outcome = match &report.outcome {
                Outcome::Rejected(err) => json!({
                    "status": "rejected",
                    "field": err.field(),
                    "reason": err.to_string(),
                }),
                Outcome::Completed(result) => serde_json::to_value(result)
                    .map_err(|e| Error::Unexpected(e.to_string()))?,
            };
            let value = json!({
                "outcome": outcome,
                "states": report.states,
                "message": status,
            });
            writeln!(out, "{}", json_string(&value)?)?;
            return Ok(());
        }

        writeln!(out, "{}", status.text)?;
        if let Some(error) = &error {
            if error.is_partial_apply() {
                writeln!(
                    out,
                    "Earlier settings were already applied and remain in effect."
                )?;
            }
            if error.is_authorization_error() {
                debug!("Elevation required for network changes");
            }
        }
        Ok(())
    }
}

fn json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Unexpected(e.to_string()))
}
