use std::sync::Arc;

use tracing::{info, warn};

use super::{ApplyEditUseCase, CreateItemUseCase, MessageOrigin};
use crate::application::dto::{ScenarioDto, WireMessage};
use crate::domain::entities::{History, HistorySettings};
use crate::domain::errors::HistoryError;
use crate::domain::ports::PeerDirectory;

/// Builds a conversation from a scenario: read positions, loaded messages,
/// local echoes, then edits.
pub struct LoadScenarioUseCase {
    create_item: CreateItemUseCase,
}

impl LoadScenarioUseCase {
    #[must_use]
    pub fn new(peers: Arc<dyn PeerDirectory>, settings: HistorySettings) -> Self {
        Self {
            create_item: CreateItemUseCase::new(peers, settings),
        }
    }

    /// # Errors
    /// Returns an error if two payloads share an id or a local echo carries
    /// a server id.
    pub fn execute(&self, scenario: &ScenarioDto) -> Result<History, HistoryError> {
        let mut history = History::new(scenario.peer.clone());
        if let Some(id) = scenario.inbox_read_till {
            history.set_inbox_read_till(id);
        }
        if let Some(id) = scenario.outbox_read_till {
            history.set_outbox_read_till(id);
        }

        for message in &scenario.messages {
            self.create_item
                .execute(&mut history, message, MessageOrigin::Loaded)?;
        }
        for echo in &scenario.local_echoes {
            self.create_item.execute(
                &mut history,
                &WireMessage::Message(echo.clone()),
                MessageOrigin::LocalEcho,
            )?;
        }
        for edit in &scenario.edits {
            match ApplyEditUseCase::execute(&mut history, edit) {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    warn!(id = %edit.id, "Skipping edit of unknown message");
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            peer = %history.id(),
            messages = history.len(),
            local = history.local_message_ids().count(),
            "Scenario history built"
        );
        Ok(history)
    }
}
