//! Edits of existing messages.

use tracing::debug;

use crate::application::dto::WireContentMessage;
use crate::application::services::{MediaCheckResult, MediaCheckService, WireMapper};
use crate::domain::entities::{History, ItemEdit, MsgId, TextWithEntities};
use crate::domain::errors::HistoryError;

/// Applies edited payloads to the messages they replace.
pub struct ApplyEditUseCase;

impl ApplyEditUseCase {
    /// Replaces the content of the message with the payload's id.
    ///
    /// Media that can no longer be shown is dropped; the text is kept.
    ///
    /// # Errors
    /// Returns an error if the message is not in `history`.
    pub fn execute(history: &mut History, message: &WireContentMessage) -> Result<MsgId, HistoryError> {
        let checked = message
            .media
            .as_ref()
            .map_or(MediaCheckResult::Good, MediaCheckService::check);
        let media = match checked {
            MediaCheckResult::Good => message.media.as_ref().and_then(WireMapper::media),
            MediaCheckResult::Unsupported
            | MediaCheckResult::Empty
            | MediaCheckResult::HasTimeToLive => None,
        };
        debug!(id = %message.id, checked = %checked, "Applying edit");

        let edit = ItemEdit {
            text: TextWithEntities::with_entities(message.message.clone(), message.entities.clone()),
            media,
            reply_markup: message
                .reply_markup
                .as_ref()
                .and_then(|markup| WireMapper::reply_markup(markup, message.id)),
            edit_date: message.edit_date,
        };
        history.apply_edition(message.id, edit)?;
        Ok(message.id)
    }
}
