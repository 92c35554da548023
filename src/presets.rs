// netpreset - Preset File
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Parser for the sectioned preset file.
//!
//! ```text
//! # comment
//! [Modems]
//! Modem1 = 192.168.1.1
//!
//! [DNS]
//! ISP_DNS = 8.8.8.8, 8.8.4.4
//! ```
//!
//! Values are kept as strings. Address validation happens in the workflow
//! at apply time.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{Error, Presets, Result};

/// Section holding gateway presets.
pub const MODEMS_SECTION: &str = "Modems";

/// Section holding DNS presets.
pub const DNS_SECTION: &str = "DNS";

/// Load presets from `path`.
///
/// Fails with [`Error::ConfigFileMissing`] when the file does not exist;
/// nothing is returned in that case.
pub fn load(path: &Path) -> Result<Presets> {
    if !path.exists() {
        return Err(Error::ConfigFileMissing(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let presets = parse(&content);
    info!(
        "Loaded {} gateway and {} DNS presets from {:?}",
        presets.gateways.len(),
        presets.dns.len(),
        path
    );
    Ok(presets)
}

/// Parse preset file content. Never fails; malformed lines are skipped.
///
/// A leading UTF-8 byte order mark is ignored.
pub fn parse(content: &str) -> Presets {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut presets = Presets::default();
    let mut section = String::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = section_header(line) {
            section = name.to_string();
            presets.sections.push(section.clone());
            continue;
        }

        if section != MODEMS_SECTION && section != DNS_SECTION {
            continue;
        }

        let Some((key, value)) = split_assignment(line) else {
            debug!("Skipping malformed line {} in [{}]", index + 1, section);
            continue;
        };

        if section == MODEMS_SECTION {
            presets.gateways.insert(key, value.to_string());
        } else {
            let addresses = split_dns_list(value);
            if addresses.is_empty() {
                debug!("Skipping DNS preset '{}' with no addresses", key);
                continue;
            }
            presets.dns.insert(key, addresses);
        }
    }

    presets
}

/// Return the name inside a `[Name]` header line.
fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Split `key = value` on the first `=`; both sides trimmed, key non-empty.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Split a comma-separated address list, dropping empty fragments.
fn split_dns_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# comment
[Modems]
Modem1 = 192.168.1.1
Modem2 = 192.168.0.1

[DNS]
ISP_DNS = 8.8.8.8, 8.8.4.4
";

    #[test]
    fn test_parse_sample() {
        let presets = parse(SAMPLE);
        assert_eq!(presets.gateways.names(), vec!["Modem1", "Modem2"]);
        assert_eq!(presets.gateway("Modem2"), Some("192.168.0.1"));
        assert_eq!(
            presets.dns_servers("ISP_DNS"),
            Some(&["8.8.8.8".to_string(), "8.8.4.4".to_string()][..])
        );
        assert_eq!(presets.sections, vec!["Modems", "DNS"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse(SAMPLE), parse(SAMPLE));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let presets = parse("[Modems]\nA = 1.1.1.1\nB = 2.2.2.2\nA = 3.3.3.3\n");
        assert_eq!(presets.gateway("A"), Some("3.3.3.3"));
        assert_eq!(presets.gateways.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_dns_list_trimming() {
        let presets = parse("[DNS]\nX = 1.1.1.1 ,, 1.0.0.1 ,\nEmpty = , ,\n");
        assert_eq!(
            presets.dns_servers("X"),
            Some(&["1.1.1.1".to_string(), "1.0.0.1".to_string()][..])
        );
        assert!(presets.dns_servers("Empty").is_none());
    }

    #[test]
    fn test_unknown_sections_and_malformed_lines() {
        let presets = parse(
            "Stray = 9.9.9.9\n[Other]\nK = 1.2.3.4\n[Modems]\nno equals here\n = 5.5.5.5\nM = 10.0.0.1\n",
        );
        assert_eq!(presets.gateways.names(), vec!["M"]);
        assert!(presets.dns.is_empty());
        assert_eq!(presets.sections, vec!["Other", "Modems"]);
    }

    #[test]
    fn test_value_with_equals_sign() {
        let presets = parse("[Modems]\nM = a=b\n");
        assert_eq!(presets.gateway("M"), Some("a=b"));
    }

    #[test]
    fn test_values_are_not_validated() {
        let presets = parse("[Modems]\nBroken = 999.1.1.1\n");
        assert_eq!(presets.gateway("Broken"), Some("999.1.1.1"));
    }

    #[test]
    fn test_byte_order_mark_and_crlf() {
        let presets = parse("\u{feff}[Modems]\r\nModem1 = 192.168.1.1\r\n[DNS]\r\nX = 8.8.8.8\r\n");
        assert_eq!(presets.gateway("Modem1"), Some("192.168.1.1"));
        assert_eq!(presets.dns_servers("X"), Some(&["8.8.8.8".to_string()][..]));
        assert_eq!(presets.sections, vec!["Modems", "DNS"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        assert!(matches!(load(&path), Err(Error::ConfigFileMissing(p)) if p == path));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, SAMPLE).unwrap();
        let presets = load(&path).unwrap();
        assert_eq!(presets.gateways.len(), 2);
        assert_eq!(presets.dns.len(), 1);
    }
}
