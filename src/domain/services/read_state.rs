//! Read state of messages: unread marks, mentions and unread media.

use crate::domain::entities::{
    History, HistoryItem, HistorySettings, MessageFlags, ServiceAction, TimeId,
};

impl HistoryItem {
    /// Returns true while the message has not been read.
    ///
    /// Outgoing messages count as unread until the other side reads them.
    #[must_use]
    pub fn unread(&self, history: &History) -> bool {
        let peer = history.peer();
        if peer.is_self() {
            return false;
        }
        if self.out() {
            if peer.migrate_to().is_some() {
                return false;
            }
            if self.id().is_server() {
                if !history.is_server_side_unread(self) {
                    return false;
                }
                if peer.is_user() {
                    if peer.is_bot() {
                        return false;
                    }
                } else if peer.is_channel() && !peer.is_megagroup() {
                    return false;
                }
            }
            return true;
        }
        if self.id().is_server() {
            return history.is_server_side_unread(self);
        }
        self.flags().contains(MessageFlags::CLIENTSIDE_UNREAD)
    }

    /// Returns true if the delivery state of the message is worth showing.
    #[must_use]
    pub fn need_check(&self, history: &History) -> bool {
        self.out() || (self.id().is_local() && history.peer().is_self())
    }

    /// Returns true if the message mentions the current account.
    #[must_use]
    pub fn mentions_me(&self, settings: &HistorySettings) -> bool {
        if matches!(self.service_action(), Some(ServiceAction::PinMessage { .. }))
            && !settings.notify_about_pinned
        {
            return false;
        }
        self.flags().contains(MessageFlags::MENTIONED)
    }

    /// Returns true for mentions whose media has not been opened.
    #[must_use]
    pub fn is_unread_mention(&self, settings: &HistorySettings) -> bool {
        self.mentions_me(settings) && self.flags().contains(MessageFlags::MEDIA_UNREAD)
    }

    /// Returns true if the unread-media mark is still meaningful at `now`.
    ///
    /// Channel messages older than the read-media period never report it.
    #[must_use]
    pub fn has_unread_media_flag(
        &self,
        history: &History,
        settings: &HistorySettings,
        now: TimeId,
    ) -> bool {
        if history.peer().is_channel() && now - self.date() >= settings.channels_read_media_period {
            return false;
        }
        self.flags().contains(MessageFlags::MEDIA_UNREAD)
    }

    /// Returns true for voice and video messages that were not played yet.
    #[must_use]
    pub fn is_unread_media(&self, history: &History, settings: &HistorySettings, now: TimeId) -> bool {
        if !self.has_unread_media_flag(history, settings, now) {
            return false;
        }
        let Some(media) = self.media() else {
            return false;
        };
        media
            .document()
            .is_some_and(|document| document.is_voice_message() || document.is_video_message())
            && media.webpage().is_none()
    }
}
