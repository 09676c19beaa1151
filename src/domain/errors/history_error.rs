//! Conversation bookkeeping error types.

use thiserror::Error;

use crate::domain::entities::{MsgId, PeerId};

/// Failures looking up or registering messages in a conversation.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HistoryError {
    #[error("message {id} not found")]
    MessageNotFound { id: MsgId },

    #[error("message id {id} is already taken")]
    DuplicateMessage { id: MsgId },

    #[error("message {id} was sent locally but carries a server id")]
    NotProvisional { id: MsgId },

    #[error("message {id} belongs to conversation {actual}, not {expected}")]
    ForeignMessage {
        id: MsgId,
        expected: PeerId,
        actual: PeerId,
    },
}

impl HistoryError {
    /// Returns whether the caller referenced a message the conversation does not hold.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MessageNotFound { .. })
    }
}
