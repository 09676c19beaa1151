//! Outcomes of sending a provisional message and how they settle its identity.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{History, MsgId};
use crate::domain::errors::HistoryError;

/// Result of a send round-trip for one provisional message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The server accepted the message under `server_id`.
    Delivered {
        /// Id the message was created with.
        local_id: MsgId,
        /// Id assigned by the server.
        server_id: MsgId,
    },
    /// The server rejected the message or the request was lost.
    Failed {
        /// Id the message was created with.
        local_id: MsgId,
    },
}

impl SendOutcome {
    /// Id of the provisional message this outcome refers to.
    #[must_use]
    pub const fn local_id(&self) -> MsgId {
        match self {
            Self::Delivered { local_id, .. } | Self::Failed { local_id } => *local_id,
        }
    }

    /// Applies the outcome to the message in `history`.
    ///
    /// # Errors
    /// Returns an error if the provisional message is unknown or the
    /// server id is already taken.
    ///
    /// # Panics
    /// Panics if the message is no longer pending send.
    pub fn apply(self, history: &mut History) -> Result<(), HistoryError> {
        debug!(peer = %history.id(), outcome = ?self, "Applying send outcome");
        match self {
            Self::Delivered {
                local_id,
                server_id,
            } => history.set_real_id(local_id, server_id),
            Self::Failed { local_id } => history.send_failed(local_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        ChannelInfo, HistoryEvent, HistoryItem, MessageFlags, Peer, PeerKind, SendState,
    };

    fn pending(history: &History, id: i64) -> HistoryItem {
        HistoryItem::new(
            history.id(),
            MsgId(id),
            MessageFlags::OUT | MessageFlags::SENDING,
            100,
            None,
        )
        .with_text("draft".into())
    }

    #[test]
    fn test_delivered_promotes_id() {
        let mut history = History::new(Peer::user(2_u64, "Bob"));
        history.add_item(pending(&history, -5)).unwrap();
        history.take_events();

        SendOutcome::Delivered {
            local_id: MsgId(-5),
            server_id: MsgId(9001),
        }
        .apply(&mut history)
        .unwrap();

        let item = history.item(MsgId(9001)).unwrap();
        assert_eq!(item.send_state(), SendState::Confirmed);
        assert!(history.item(MsgId(-5)).is_none());
        assert!(history.take_events().contains(&HistoryEvent::ItemIdChanged {
            old_id: MsgId(-5),
            new_id: MsgId(9001),
        }));
    }

    #[test]
    fn test_failed_in_channel_schedules_peer_update() {
        let mut history = History::new(Peer::new(
            5_u64,
            "Channel",
            PeerKind::Channel(ChannelInfo::default()),
        ));
        history.add_item(pending(&history, -17)).unwrap();

        let outcome = SendOutcome::Failed {
            local_id: MsgId(-17),
        };
        assert_eq!(outcome.local_id(), MsgId(-17));
        outcome.apply(&mut history).unwrap();

        assert_eq!(
            history.item(MsgId(-17)).unwrap().send_state(),
            SendState::Failed
        );
        assert_eq!(history.pending_delayed_events().count(), 1);
    }

    #[test]
    fn test_unknown_local_id_is_an_error() {
        let mut history = History::new(Peer::user(2_u64, "Bob"));
        let result = SendOutcome::Failed { local_id: MsgId(-1) }.apply(&mut history);
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_outcome_deserializes_from_json() {
        let outcome: SendOutcome =
            serde_json::from_str(r#"{"outcome":"delivered","local_id":-5,"server_id":9001}"#)
                .unwrap();
        assert_eq!(
            outcome,
            SendOutcome::Delivered {
                local_id: MsgId(-5),
                server_id: MsgId(9001),
            }
        );
    }
}
