//! Server-provided limits and account settings consulted by message rules.

use serde::{Deserialize, Serialize};

use super::TimeId;

/// Limits and switches threaded into the message predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Seconds during which a group message can be deleted for everyone.
    #[serde(default = "default_revoke_time_limit")]
    pub revoke_time_limit: TimeId,

    /// Seconds during which a private message can be deleted for everyone.
    #[serde(default = "default_revoke_time_limit")]
    pub revoke_private_time_limit: TimeId,

    /// Whether incoming private messages may be deleted for both sides.
    #[serde(default)]
    pub revoke_private_inbox: bool,

    /// Seconds during which a sent message can be edited.
    #[serde(default = "default_edit_time_limit")]
    pub edit_time_limit: TimeId,

    /// Seconds after which unread-media marks in channels are ignored.
    #[serde(default = "default_channels_read_media_period")]
    pub channels_read_media_period: TimeId,

    /// Whether pinned-message notices count as mentions.
    #[serde(default = "default_true")]
    pub notify_about_pinned: bool,
}

const fn default_revoke_time_limit() -> TimeId {
    2 * 24 * 60 * 60
}

const fn default_edit_time_limit() -> TimeId {
    2 * 24 * 60 * 60
}

const fn default_channels_read_media_period() -> TimeId {
    7 * 24 * 60 * 60
}

const fn default_true() -> bool {
    true
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            revoke_time_limit: default_revoke_time_limit(),
            revoke_private_time_limit: default_revoke_time_limit(),
            revoke_private_inbox: false,
            edit_time_limit: default_edit_time_limit(),
            channels_read_media_period: default_channels_read_media_period(),
            notify_about_pinned: true,
        }
    }
}
