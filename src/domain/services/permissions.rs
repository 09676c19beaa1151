//! What the current account may do with a message.
//!
//! Every rule is a pure function of the message, the conversation that owns
//! it and, where limits apply, the explicit [`HistorySettings`] and `now`.

use crate::domain::entities::{
    AdminRights, History, HistoryItem, HistorySettings, ItemKind, MsgId, TimeId,
};
use crate::domain::ports::PeerDirectory;

/// Id of the notice that opens every channel; it cannot be deleted.
const CHANNEL_CREATION_MSG_ID: MsgId = MsgId(1);

impl HistoryItem {
    /// Returns true if the message may be pinned.
    #[must_use]
    pub fn can_pin(&self, history: &History) -> bool {
        if self.id().is_local() || !self.is_content_message() {
            return false;
        }
        history.peer().can_pin_messages()
    }

    /// Returns true if this is the conversation's pinned message.
    #[must_use]
    pub fn is_pinned(&self, history: &History) -> bool {
        history.peer().pinned_message_id() == Some(self.id())
    }

    /// Returns true if the message may be forwarded elsewhere.
    #[must_use]
    pub fn allows_forward(&self) -> bool {
        match self.kind() {
            ItemKind::Content => {
                self.id().is_server()
                    && !self.is_log_entry()
                    && self.media().is_none_or(|media| media.allows_forward())
            }
            ItemKind::Placeholder | ItemKind::Service(_) => false,
        }
    }

    /// Same as [`Self::allows_forward`].
    #[must_use]
    pub fn can_forward(&self) -> bool {
        self.allows_forward()
    }

    /// Returns true if the message may be edited at `now`.
    #[must_use]
    pub fn allows_edit(&self, history: &History, settings: &HistorySettings, now: TimeId) -> bool {
        match self.kind() {
            ItemKind::Content => self.content_allows_edit(history, settings, now),
            ItemKind::Placeholder | ItemKind::Service(_) => false,
        }
    }

    /// Same as [`Self::allows_edit`].
    #[must_use]
    pub fn can_edit(&self, history: &History, settings: &HistorySettings, now: TimeId) -> bool {
        self.allows_edit(history, settings, now)
    }

    fn content_allows_edit(
        &self,
        history: &History,
        settings: &HistorySettings,
        now: TimeId,
    ) -> bool {
        let peer = history.peer();
        let to_myself = peer.is_self();
        let can_pin_in_megagroup = peer.is_megagroup() && peer.can_pin_messages();
        let too_old =
            !to_myself && !can_pin_in_megagroup && now - self.date() >= settings.edit_time_limit;
        if self.id().is_local() || self.is_log_entry() || too_old {
            return false;
        }
        if self.via_bot().is_some() || self.forwarded().is_some() {
            return false;
        }
        if self.media().is_some_and(|media| !media.allows_edit()) {
            return false;
        }
        if to_myself {
            return true;
        }
        if peer.is_channel() {
            if self.is_post() && peer.can_edit_messages() {
                return true;
            }
            if self.out() {
                return if self.is_post() {
                    peer.can_publish()
                } else {
                    peer.can_write()
                };
            }
        }
        self.out()
    }

    /// Returns true if the account may close a poll in this message.
    #[must_use]
    pub fn can_stop_poll(&self, history: &History) -> bool {
        if self.id().is_local() || self.via_bot().is_some() || self.forwarded().is_some() {
            return false;
        }
        let peer = history.peer();
        if peer.is_self() {
            return true;
        }
        if peer.is_channel() {
            if self.is_post() && peer.can_edit_messages() {
                return true;
            }
            if self.out() {
                return if self.is_post() {
                    peer.can_publish()
                } else {
                    peer.can_write()
                };
            }
            return false;
        }
        self.out()
    }

    /// Returns true if the account may delete the message for itself.
    #[must_use]
    pub fn can_delete(&self, history: &History) -> bool {
        if self.is_log_entry() || (!self.id().is_server() && self.is_service()) {
            return false;
        }
        let peer = history.peer();
        if !peer.is_channel() {
            return !self.is_group_migrate();
        }
        if self.id() == CHANNEL_CREATION_MSG_ID {
            return false;
        }
        if peer.can_delete_messages() {
            return true;
        }
        if self.out() && self.is_content_message() {
            return !self.is_post() || peer.can_publish();
        }
        false
    }

    /// Returns true if the message may be deleted for every participant at `now`.
    #[must_use]
    pub fn can_delete_for_everyone(
        &self,
        history: &History,
        settings: &HistorySettings,
        now: TimeId,
    ) -> bool {
        let peer = history.peer();
        let to_myself = peer.is_self();
        let age = now - self.date();
        let too_old = if to_myself {
            false
        } else if peer.is_user() {
            age >= settings.revoke_private_time_limit
        } else {
            age >= settings.revoke_time_limit
        };
        if self.id().is_local() || to_myself || too_old || self.is_post() {
            return false;
        }
        if peer.is_channel() {
            return false;
        }
        // Bots keep every message they receive, revoking is pointless.
        if peer.is_bot() && !peer.is_support() {
            return false;
        }
        if !peer.is_user() {
            if !self.is_content_message() {
                return false;
            }
            if self.media().is_some_and(|media| !media.allows_revoke()) {
                return false;
            }
        }
        if !self.out() {
            if peer.is_chat() {
                return peer.am_creator()
                    || peer.admin_rights().contains(AdminRights::DELETE_MESSAGES);
            }
            if peer.is_user() {
                return settings.revoke_private_inbox;
            }
            return false;
        }
        true
    }

    /// Returns true if a "report" action should be offered.
    #[must_use]
    pub fn suggest_report(&self, history: &History) -> bool {
        if self.out() || self.is_service() || !self.id().is_server() {
            return false;
        }
        let peer = history.peer();
        if peer.is_channel() {
            return true;
        }
        peer.is_bot()
    }

    /// Returns true if "ban the sender" should be offered.
    #[must_use]
    pub fn suggest_ban_report(&self, history: &History, peers: &dyn PeerDirectory) -> bool {
        let peer = history.peer();
        if !peer.is_channel() {
            return false;
        }
        let Some(from) = peers.peer(self.from()).filter(|from| from.is_user()) else {
            return false;
        };
        if !peer.can_restrict_user(&from) {
            return false;
        }
        !self.is_post() && !self.out() && self.is_content_message()
    }

    /// Returns true if "delete everything from this sender" should be offered.
    #[must_use]
    pub fn suggest_delete_all_report(&self, history: &History, peers: &dyn PeerDirectory) -> bool {
        let peer = history.peer();
        if !peer.is_channel() || !peer.can_delete_messages() {
            return false;
        }
        let from_user = peers.peer(self.from()).is_some_and(|from| from.is_user());
        !self.is_post() && !self.out() && from_user && self.is_content_message()
    }

    /// Returns true if the message has a public link.
    #[must_use]
    pub fn has_direct_link(&self, history: &History) -> bool {
        self.id().is_server() && history.peer().is_channel()
    }
}
