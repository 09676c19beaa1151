//! Notifications a conversation emits for its observers.

use super::{MsgId, PeerId};

/// Aspect of a peer that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerUpdate {
    /// The list of locally pending outgoing channel messages changed.
    ChannelLocalMessages,
}

/// Something observers of a conversation should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HistoryEvent {
    ItemAdded(MsgId),
    ItemIdChanged { old_id: MsgId, new_id: MsgId },
    ItemRepaintRequested(MsgId),
    ItemViewRefreshRequested(MsgId),
    ChatListEntryInvalidated(MsgId),
    ChatListEntryUpdated,
    DependentMessagesUpdated(MsgId),
    UnreadMentionRemoved(MsgId),
    ItemVanished(MsgId),
    ItemRemoved(MsgId),
    PeerUpdated { peer: PeerId, update: PeerUpdate },
}

impl std::fmt::Display for HistoryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemAdded(id) => write!(f, "added {id}"),
            Self::ItemIdChanged { old_id, new_id } => write!(f, "id changed {old_id} -> {new_id}"),
            Self::ItemRepaintRequested(id) => write!(f, "repaint {id}"),
            Self::ItemViewRefreshRequested(id) => write!(f, "refresh view {id}"),
            Self::ChatListEntryInvalidated(id) => write!(f, "chat list entry invalidated by {id}"),
            Self::ChatListEntryUpdated => write!(f, "chat list entry updated"),
            Self::DependentMessagesUpdated(id) => write!(f, "dependents of {id} updated"),
            Self::UnreadMentionRemoved(id) => write!(f, "unread mention {id} removed"),
            Self::ItemVanished(id) => write!(f, "vanished {id}"),
            Self::ItemRemoved(id) => write!(f, "removed {id}"),
            Self::PeerUpdated { peer, update } => write!(f, "peer {peer} updated: {update:?}"),
        }
    }
}
