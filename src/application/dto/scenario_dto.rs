//! Scenario files: a conversation, the peers it references and the payloads
//! to feed through it.

use serde::{Deserialize, Serialize};

use super::{WireContentMessage, WireMessage};
use crate::domain::entities::{MsgId, Peer, TimeId};
use crate::domain::services::SendOutcome;

/// Contents of a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDto {
    /// The conversation every message belongs to.
    pub peer: Peer,
    /// Other peers referenced by senders, forwards and bots.
    #[serde(default)]
    pub peers: Vec<Peer>,
    /// Payloads loaded from the server, in order.
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    /// Outgoing messages created locally and still waiting for the server.
    #[serde(default)]
    pub local_echoes: Vec<WireContentMessage>,
    /// Edits to apply after loading, matched by id.
    #[serde(default)]
    pub edits: Vec<WireContentMessage>,
    /// Last incoming message read by the current account.
    #[serde(default)]
    pub inbox_read_till: Option<MsgId>,
    /// Last outgoing message read by the other side.
    #[serde(default)]
    pub outbox_read_till: Option<MsgId>,
    /// Results of sending the local echoes.
    #[serde(default)]
    pub send_outcomes: Vec<SendOutcome>,
    /// Clock used for age limits; the current time when absent.
    #[serde(default)]
    pub now: Option<TimeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scenario() {
        let scenario: ScenarioDto = serde_json::from_str(
            r#"{"peer": {"id": 5, "name": "News", "kind": {"type": "channel", "member": true}}}"#,
        )
        .unwrap();
        assert!(scenario.peer.is_channel());
        assert!(scenario.messages.is_empty());
        assert!(scenario.send_outcomes.is_empty());
        assert_eq!(scenario.now, None);
    }
}
