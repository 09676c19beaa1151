//! Text summaries of a message for notifications, the chat list and
//! shared-media sections.

use crate::domain::entities::{
    History, HistoryItem, SharedMediaTypes, single_line, truncate_with_ellipsis,
};
use crate::domain::ports::PeerDirectory;

/// Maximum number of characters in a notification before it is cut.
pub const NOTIFICATION_TEXT_LIMIT: usize = 255;

const ALBUM_TEXT: &str = "Album";
const SELF_SENDER_TEXT: &str = "You";

/// Whether the chat-list preview is prefixed with the sender name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawInDialog {
    /// Prefix with the sender where the conversation calls for it.
    #[default]
    Normal,
    /// Never prefix.
    WithoutSender,
}

impl HistoryItem {
    /// Text shown in a desktop notification.
    #[must_use]
    pub fn notification_text(&self) -> String {
        let text = if let Some(media) = self.media() {
            media.notification_text(&self.text().text, self.out())
        } else {
            self.text().text.clone()
        };
        truncate_with_ellipsis(&text, NOTIFICATION_TEXT_LIMIT)
    }

    /// Single-line preview shown in the chat list.
    #[must_use]
    pub fn in_dialogs_text(
        &self,
        history: &History,
        peers: &dyn PeerDirectory,
        way: DrawInDialog,
    ) -> String {
        if self.is_service() {
            return single_line(&self.text().text);
        }
        let plain = if let Some(media) = self.media() {
            if self.group_id().is_some() {
                ALBUM_TEXT.to_string()
            } else {
                media.chat_list_text(&self.text().text, self.out())
            }
        } else {
            single_line(&self.text().text)
        };

        let peer = history.peer();
        let sender = if self.is_post() || self.is_empty() || way == DrawInDialog::WithoutSender {
            None
        } else if !peer.is_user() || self.out() {
            self.display_from(history, peers)
        } else if peer.is_self() && self.forwarded().is_none() {
            self.sender_original(history)
        } else {
            None
        };

        match sender.and_then(|id| peers.peer(id)) {
            Some(sender) if sender.is_self() => format!("{SELF_SENDER_TEXT}: {plain}"),
            Some(sender) => format!("{}: {plain}", sender.short_name()),
            None => plain,
        }
    }

    /// Shared-media sections this message is listed under.
    #[must_use]
    pub fn shared_media_types(&self) -> SharedMediaTypes {
        let mut types = self
            .media()
            .map_or_else(SharedMediaTypes::empty, |media| media.shared_media_types());
        if self.text().has_links() {
            types |= SharedMediaTypes::LINK;
        }
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        ChannelInfo, GroupId, Media, MessageFlags, MsgId, Peer, PeerCache, PeerId, PeerKind,
        TextWithEntities, UserInfo,
    };
    use crate::domain::ports::MockPeerDirectory;

    fn me() -> Peer {
        Peer::new(
            1_u64,
            "Alice Smith",
            PeerKind::User(UserInfo {
                is_self: true,
                ..UserInfo::default()
            }),
        )
    }

    fn peers() -> PeerCache {
        let cache = PeerCache::new();
        cache.insert(me());
        cache.insert(Peer::user(2_u64, "Bob Jones"));
        cache
    }

    fn group() -> History {
        History::new(Peer::new(
            50_u64,
            "Team",
            PeerKind::Channel(ChannelInfo {
                megagroup: true,
                member: true,
                ..ChannelInfo::default()
            }),
        ))
    }

    fn message(history: &History, from: u64, flags: MessageFlags, text: &str) -> HistoryItem {
        HistoryItem::new(history.id(), MsgId(10), flags, 100, Some(PeerId(from)))
            .with_text(text.into())
    }

    #[test]
    fn test_notification_text_is_truncated() {
        let history = group();
        let long = "a".repeat(300);
        let text = message(&history, 2, MessageFlags::empty(), &long).notification_text();
        assert_eq!(text.chars().count(), NOTIFICATION_TEXT_LIMIT + 3);
        assert!(text.ends_with("..."));

        let short = "b".repeat(200);
        assert_eq!(message(&history, 2, MessageFlags::empty(), &short).notification_text(), short);
    }

    #[test]
    fn test_notification_text_with_media_caption() {
        let history = group();
        let item = message(&history, 2, MessageFlags::empty(), "look")
            .with_media(Some(Media::Photo { id: 4 }));
        assert_eq!(item.notification_text(), "Photo, look");
    }

    #[test]
    fn test_in_dialogs_text_prefixes_sender_in_groups() {
        let history = group();
        let peers = peers();
        let incoming = message(&history, 2, MessageFlags::empty(), "hi\nthere");
        assert_eq!(
            incoming.in_dialogs_text(&history, &peers, DrawInDialog::Normal),
            "Bob: hi there"
        );
        assert_eq!(
            incoming.in_dialogs_text(&history, &peers, DrawInDialog::WithoutSender),
            "hi there"
        );

        let own = message(&history, 1, MessageFlags::OUT, "done");
        assert_eq!(
            own.in_dialogs_text(&history, &peers, DrawInDialog::Normal),
            "You: done"
        );
    }

    #[test]
    fn test_in_dialogs_text_in_private_chat() {
        let history = History::new(Peer::user(2_u64, "Bob Jones"));
        let peers = peers();
        let incoming = message(&history, 2, MessageFlags::empty(), "ping");
        assert_eq!(
            incoming.in_dialogs_text(&history, &peers, DrawInDialog::Normal),
            "ping"
        );
    }

    #[test]
    fn test_album_preview() {
        let mut history = group();
        let item = message(&history, 2, MessageFlags::empty(), "")
            .with_media(Some(Media::Photo { id: 1 }));
        history.add_item(item).unwrap();
        history.set_group_id(MsgId(10), GroupId(77)).unwrap();

        let mut peers = MockPeerDirectory::new();
        peers.expect_peer().returning(|_| None);
        let grouped = history.item(MsgId(10)).unwrap();
        assert_eq!(
            grouped.in_dialogs_text(&history, &peers, DrawInDialog::Normal),
            "Album"
        );
    }

    #[test]
    fn test_shared_media_types_include_links() {
        let history = group();
        let mut text = TextWithEntities::plain("see https://example.com");
        text.parse_links();
        let item = message(&history, 2, MessageFlags::empty(), "").with_text(text);
        assert_eq!(item.shared_media_types(), SharedMediaTypes::LINK);
        assert!(
            message(&history, 2, MessageFlags::empty(), "plain")
                .shared_media_types()
                .is_empty()
        );
    }
}
