// netpreset - Preset Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Named gateway and DNS presets.

use serde::{Deserialize, Serialize};

/// Ordered name → value mapping.
///
/// Re-inserting an existing name replaces the value in place, so the first
/// occurrence decides the display position and the last one decides the
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for PresetMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> PresetMap<V> {
    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named, reusable value offered as a selectable shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresetEntry {
    /// A modem/router address used as default gateway.
    Gateway { name: String, address: String },
    /// An ordered list of resolvers; the first one is primary.
    Dns { name: String, addresses: Vec<String> },
}

impl PresetEntry {
    /// Label shown to the user, e.g. `ISP_DNS (8.8.8.8, 8.8.4.4)`.
    pub fn label(&self) -> String {
        match self {
            Self::Gateway { name, address } => format!("{} ({})", name, address),
            Self::Dns { name, addresses } => format!("{} ({})", name, addresses.join(", ")),
        }
    }
}

/// All presets loaded from one preset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presets {
    /// Gateway presets from the `[Modems]` section.
    pub gateways: PresetMap<String>,
    /// DNS presets from the `[DNS]` section.
    pub dns: PresetMap<Vec<String>>,
    /// Every section header seen, recognized or not.
    pub sections: Vec<String>,
}

impl Presets {
    /// Look up a gateway preset value by name.
    pub fn gateway(&self, name: &str) -> Option<&str> {
        self.gateways.get(name).map(String::as_str)
    }

    /// Look up a DNS preset value by name.
    pub fn dns_servers(&self, name: &str) -> Option<&[String]> {
        self.dns.get(name).map(Vec::as_slice)
    }

    pub fn gateway_entries(&self) -> Vec<PresetEntry> {
        self.gateways
            .iter()
            .map(|(name, address)| PresetEntry::Gateway {
                name: name.to_string(),
                address: address.clone(),
            })
            .collect()
    }

    pub fn dns_entries(&self) -> Vec<PresetEntry> {
        self.dns
            .iter()
            .map(|(name, addresses)| PresetEntry::Dns {
                name: name.to_string(),
                addresses: addresses.clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty() && self.dns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_position() {
        let mut map = PresetMap::default();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        assert_eq!(map.names(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_entry_labels() {
        let gw = PresetEntry::Gateway {
            name: "Modem1".into(),
            address: "192.168.1.1".into(),
        };
        let dns = PresetEntry::Dns {
            name: "ISP_DNS".into(),
            addresses: vec!["8.8.8.8".into(), "8.8.4.4".into()],
        };
        assert_eq!(gw.label(), "Modem1 (192.168.1.1)");
        assert_eq!(dns.label(), "ISP_DNS (8.8.8.8, 8.8.4.4)");
    }
}
