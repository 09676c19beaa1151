//! Message flag set and the send state derived from it.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Independent boolean facts about a message.
    ///
    /// The low bits mirror what the server sends; the high bits are kept by
    /// the client only and never leave the process.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MessageFlags: u32 {
        const OUT = 1 << 1;
        const MENTIONED = 1 << 4;
        const MEDIA_UNREAD = 1 << 5;
        const HAS_REPLY_MARKUP = 1 << 6;
        const SILENT = 1 << 13;
        const POST = 1 << 14;
        const POST_AUTHOR = 1 << 16;
        const EDIT_HIDE = 1 << 21;
        const LEGACY = 1 << 19;

        const SENDING = 1 << 24;
        const FAILED = 1 << 25;
        const CLIENTSIDE_UNREAD = 1 << 26;
        const ADMIN_LOG_ENTRY = 1 << 27;
        const MIGRATION_MARKER = 1 << 28;
    }
}

impl MessageFlags {
    /// Flags that only exist on the client.
    pub const CLIENT_ONLY: Self = Self::SENDING
        .union(Self::FAILED)
        .union(Self::CLIENTSIDE_UNREAD)
        .union(Self::ADMIN_LOG_ENTRY)
        .union(Self::MIGRATION_MARKER);
}

/// Position of a message in the send reconciliation protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendState {
    /// Waiting for the server to acknowledge a locally echoed message.
    Provisional,
    /// Accepted by the server, or never sent by this client.
    Confirmed,
    /// Send failed; the local id is kept.
    Failed,
}

impl SendState {
    /// Derives the state from a flag set.
    #[must_use]
    pub const fn from_flags(flags: MessageFlags) -> Self {
        if flags.contains(MessageFlags::SENDING) {
            Self::Provisional
        } else if flags.contains(MessageFlags::FAILED) {
            Self::Failed
        } else {
            Self::Confirmed
        }
    }
}

impl std::fmt::Display for SendState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provisional => write!(f, "sending"),
            Self::Confirmed => write!(f, "sent"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_state_from_flags() {
        assert_eq!(
            SendState::from_flags(MessageFlags::SENDING | MessageFlags::OUT),
            SendState::Provisional
        );
        assert_eq!(
            SendState::from_flags(MessageFlags::FAILED),
            SendState::Failed
        );
        assert_eq!(
            SendState::from_flags(MessageFlags::empty()),
            SendState::Confirmed
        );
    }

    #[test]
    fn test_client_only_excludes_server_flags() {
        assert!(!MessageFlags::CLIENT_ONLY.contains(MessageFlags::OUT));
        assert!(MessageFlags::CLIENT_ONLY.contains(MessageFlags::SENDING));
    }
}
