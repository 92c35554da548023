// netpreset - Status Messages
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Transient status messages for the presentation layer.
//!
//! Messages carry their own expiry instant; whoever renders them clears
//! them once `expires_at` has passed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for action message lifetimes (one day).
const MAX_LIFETIME_SECS: u64 = 86_400;

/// Which status area a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusChannel {
    /// Persistent general status line.
    General,
    /// Short-lived feedback next to the apply action.
    Action,
}

/// A status message with an optional expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub channel: StatusChannel,
    pub text: String,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StatusMessage {
    /// A general message that stays until replaced.
    pub fn general(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            channel: StatusChannel::General,
            text: text.into(),
            is_error,
            expires_at: None,
        }
    }

    /// An action message that expires `lifetime_secs` after `now`.
    pub fn action(text: impl Into<String>, is_error: bool, now: DateTime<Utc>, lifetime_secs: u64) -> Self {
        let secs = lifetime_secs.min(MAX_LIFETIME_SECS) as i64;
        let lifetime = Duration::seconds(secs);
        Self {
            channel: StatusChannel::Action,
            text: text.into(),
            is_error,
            expires_at: now.checked_add_signed(lifetime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_message_expiry() {
        let now = Utc::now();
        let msg = StatusMessage::action("Settings Saved!", false, now, 5);
        assert_eq!(msg.expires_at, Some(now + Duration::seconds(5)));
        assert_eq!(msg.channel, StatusChannel::Action);

        let capped = StatusMessage::action("Settings Saved!", false, now, u64::MAX);
        assert_eq!(capped.expires_at, Some(now + Duration::days(1)));
    }

    #[test]
    fn test_general_message_never_expires() {
        let msg = StatusMessage::general("Configuration loaded successfully.", false);
        assert_eq!(msg.expires_at, None);
        assert_eq!(msg.channel, StatusChannel::General);
    }
}
