//! Identifiers shared by messages, conversations and albums.

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch.
pub type TimeId = i64;

/// Upper bound (exclusive) of identifiers assigned by the server.
pub const SERVER_MAX_MSG_ID: i64 = 0x3FFF_FFFF;

/// Identifier of a message inside its conversation.
///
/// Negative values are client-synthesized placeholders used while a message
/// is being sent; values in `1..SERVER_MAX_MSG_ID` are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgId(pub i64);

impl MsgId {
    /// Returns the underlying value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Returns true for client-synthesized identifiers.
    #[must_use]
    pub const fn is_local(self) -> bool {
        self.0 < 0
    }

    /// Returns true for identifiers assigned by the server.
    #[must_use]
    pub const fn is_server(self) -> bool {
        self.0 > 0 && self.0 < SERVER_MAX_MSG_ID
    }
}

impl std::fmt::Display for MsgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MsgId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Identifier of a user, group or channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl PeerId {
    /// Returns the underlying value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PeerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier of an album of messages sent together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl From<u64> for GroupId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Message identifier qualified by its conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct FullMsgId {
    pub peer: PeerId,
    pub msg: MsgId,
}

impl FullMsgId {
    /// Creates a qualified identifier.
    #[must_use]
    pub const fn new(peer: PeerId, msg: MsgId) -> Self {
        Self { peer, msg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ranges_are_disjoint() {
        for raw in [-17, -5, -1, 0, 1, 9001, SERVER_MAX_MSG_ID - 1, SERVER_MAX_MSG_ID] {
            let id = MsgId(raw);
            assert!(!(id.is_local() && id.is_server()), "{raw} in both ranges");
        }
    }

    #[test]
    fn test_id_classification() {
        assert!(MsgId(-5).is_local());
        assert!(MsgId(9001).is_server());
        assert!(!MsgId(0).is_server());
        assert!(!MsgId(0).is_local());
        assert!(!MsgId(SERVER_MAX_MSG_ID).is_server());
    }
}
