//! Message creation from wire payloads.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::{
    WireAction, WireContentMessage, WireMedia, WireMessage, WireServiceMessage,
};
use crate::application::services::{
    MediaCheckResult, MediaCheckService, ServiceTextService, WireMapper,
};
use crate::domain::entities::{
    Component, History, HistoryItem, HistorySettings, ItemKind, Media, MessageFlags, MsgId,
    ReplyReference, ServiceAction, Signature, TextWithEntities, ViaBot,
};
use crate::domain::errors::HistoryError;
use crate::domain::ports::PeerDirectory;

/// Where to send users whose client cannot show a message.
pub const UNSUPPORTED_UPDATE_LINK: &str = "https://desktop.telegram.org";

/// How a payload reached the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageOrigin {
    /// Part of a history slice loaded from the server.
    #[default]
    Loaded,
    /// Pushed by the server as a new message.
    Incoming,
    /// Created locally for an outgoing message before the server saw it.
    LocalEcho,
}

/// Builds messages from wire payloads and adds them to their conversation.
pub struct CreateItemUseCase {
    peers: Arc<dyn PeerDirectory>,
    settings: HistorySettings,
}

impl CreateItemUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(peers: Arc<dyn PeerDirectory>, settings: HistorySettings) -> Self {
        Self { peers, settings }
    }

    /// Builds the message for `message` and adds it to `history`.
    ///
    /// # Errors
    /// Returns an error if the id is already taken in `history`, or if a
    /// local echo carries a server id.
    pub fn execute(
        &self,
        history: &mut History,
        message: &WireMessage,
        origin: MessageOrigin,
    ) -> Result<MsgId, HistoryError> {
        if origin == MessageOrigin::LocalEcho && !message.id().is_local() {
            return Err(HistoryError::NotProvisional { id: message.id() });
        }
        let item = self.build(history, message, origin);
        let group_id = match message {
            WireMessage::Message(content) if item.is_content_message() => content.grouped_id,
            _ => None,
        };
        let id = history.add_item(item)?;
        if let Some(group_id) = group_id {
            history.set_group_id(id, group_id)?;
        }
        if origin != MessageOrigin::LocalEcho {
            history.index_as_new_item(id, &self.settings)?;
        }
        Ok(id)
    }

    /// Builds the message for `message` without adding it anywhere.
    ///
    /// # Panics
    /// Panics if a local echo carries a server id.
    #[must_use]
    pub fn build(
        &self,
        history: &History,
        message: &WireMessage,
        origin: MessageOrigin,
    ) -> HistoryItem {
        match message {
            WireMessage::Message(content) => self.build_message(history, content, origin),
            WireMessage::MessageService(service) => self.build_service(history, service),
            WireMessage::MessageEmpty { id } => {
                debug!(id = %id, "Empty payload");
                self.service_item(
                    HistoryItem::new(history.id(), *id, MessageFlags::empty(), 0, None),
                    ServiceAction::Empty,
                )
            }
        }
    }

    fn build_message(
        &self,
        history: &History,
        message: &WireContentMessage,
        origin: MessageOrigin,
    ) -> HistoryItem {
        let checked = message
            .media
            .as_ref()
            .map_or(MediaCheckResult::Good, MediaCheckService::check);

        let mut flags = WireMapper::flags(message.flags);
        if message.reply_markup.is_some() {
            flags.insert(MessageFlags::HAS_REPLY_MARKUP);
        }
        if message.post_author.is_some() {
            flags.insert(MessageFlags::POST_AUTHOR);
        }
        if origin == MessageOrigin::LocalEcho {
            assert!(
                message.id.is_local(),
                "local echo {} must carry a local id",
                message.id
            );
            flags.insert(MessageFlags::OUT | MessageFlags::SENDING);
        }

        let base = HistoryItem::new(history.id(), message.id, flags, message.date, message.from_id);
        let result = match checked {
            MediaCheckResult::Unsupported => Self::unsupported(base, message),
            MediaCheckResult::Empty => self.service_item(base, ServiceAction::Empty),
            MediaCheckResult::HasTimeToLive => {
                let video = matches!(
                    message.media,
                    Some(WireMedia::MessageMediaDocument { .. })
                );
                self.service_item(base, ServiceAction::ExpiredMedia { video })
            }
            MediaCheckResult::Good => {
                let item = Self::content(base, message);
                if item.is_empty() {
                    let empty = HistoryItem::new(
                        history.id(),
                        message.id,
                        flags,
                        message.date,
                        message.from_id,
                    );
                    self.service_item(empty, ServiceAction::Empty)
                } else {
                    item
                }
            }
        };
        info!(
            peer = %history.id(),
            id = %message.id,
            checked = %checked,
            kind = result.kind().label(),
            "Message classified"
        );
        result
    }

    fn content(base: HistoryItem, message: &WireContentMessage) -> HistoryItem {
        let mut item = base
            .with_text(WireMapper::text(&message.message, &message.entities))
            .with_media(message.media.as_ref().and_then(WireMapper::media))
            .with_edit_date(message.edit_date);
        item = Self::with_header(item, message);
        if let Some(header) = &message.fwd_from {
            item.attach(Component::Forwarded(WireMapper::forward(header)));
        }
        if let Some(markup) = message
            .reply_markup
            .as_ref()
            .and_then(|markup| WireMapper::reply_markup(markup, message.id))
        {
            item.attach(Component::ReplyMarkup(markup));
        }
        if let Some(author) = &message.post_author {
            item.attach(Component::Signed(Signature {
                author: author.clone(),
            }));
        }
        item
    }

    fn unsupported(base: HistoryItem, message: &WireContentMessage) -> HistoryItem {
        let mut text = TextWithEntities::plain(format!(
            "This message is not supported by your version of the app. \
             Please update to the latest version or install it from {UNSUPPORTED_UPDATE_LINK}"
        ));
        text.parse_links();
        text.italicize();

        let mut item = base.with_kind(ItemKind::Placeholder).with_text(text);
        item.remove_flags(MessageFlags::POST_AUTHOR);
        item.insert_flags(MessageFlags::LEGACY);
        Self::with_header(item, message)
    }

    fn with_header(mut item: HistoryItem, message: &WireContentMessage) -> HistoryItem {
        if let Some(reply_to) = message.reply_to_msg_id {
            item.attach(Component::Reply(ReplyReference { reply_to }));
        }
        if let Some(bot) = message.via_bot_id {
            item.attach(Component::Via(ViaBot { bot }));
        }
        item
    }

    fn build_service(&self, history: &History, service: &WireServiceMessage) -> HistoryItem {
        let flags = WireMapper::flags(service.flags);
        let base = HistoryItem::new(history.id(), service.id, flags, service.date, service.from_id);

        if let WireAction::MessageActionPhoneCall { reason, duration } = &service.action {
            debug!(id = %service.id, "Phone call built as content message");
            return base.with_media(Some(Media::Call {
                reason: WireMapper::call_reason(*reason),
                duration: *duration,
            }));
        }

        let action = WireMapper::service_action(&service.action, service.reply_to_msg_id);
        let mut item = base;
        if matches!(action, ServiceAction::ChatMigrateTo { .. }) {
            item.insert_flags(MessageFlags::MIGRATION_MARKER);
        }
        if let Some(reply_to) = service.reply_to_msg_id {
            item.attach(Component::Reply(ReplyReference { reply_to }));
        }
        self.service_item(item, action)
    }

    fn service_item(&self, item: HistoryItem, action: ServiceAction) -> HistoryItem {
        let text = ServiceTextService::text(&action, item.from(), self.peers.as_ref());
        item.with_kind(ItemKind::Service(action))
            .with_text(TextWithEntities::plain(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{
        WireDocument, WireFlags, WireForwardHeader, WireMedia, WirePhoto, WireWebPage,
    };
    use crate::domain::entities::{
        CallDiscardReason, ChannelInfo, GroupId, HistoryEvent, Peer, PeerCache, PeerId, PeerKind,
        SendState,
    };

    fn use_case() -> CreateItemUseCase {
        let peers = PeerCache::new();
        peers.insert(Peer::user(2_u64, "Bob"));
        CreateItemUseCase::new(Arc::new(peers), HistorySettings::default())
    }

    fn chat() -> History {
        History::new(Peer::user(2_u64, "Bob"))
    }

    fn text_message(id: i64, text: &str) -> WireContentMessage {
        WireContentMessage::text(MsgId(id), 1_000, text).with_from(PeerId(2))
    }

    #[test]
    fn test_good_payload_builds_content() {
        let history = chat();
        let message = WireMessage::Message(
            text_message(10, "see photo")
                .with_media(WireMedia::MessageMediaPhoto {
                    photo: Some(WirePhoto::Photo { id: 3 }),
                    ttl_seconds: None,
                }),
        );
        let item = use_case().build(&history, &message, MessageOrigin::Loaded);
        assert_eq!(item.kind(), &ItemKind::Content);
        assert_eq!(item.media(), Some(&Media::Photo { id: 3 }));
        assert_eq!(item.text().text, "see photo");
    }

    #[test]
    fn test_photo_without_body_becomes_empty_notice() {
        let history = chat();
        let message = WireMessage::Message(text_message(10, "lost").with_media(
            WireMedia::MessageMediaPhoto {
                photo: None,
                ttl_seconds: None,
            },
        ));
        let item = use_case().build(&history, &message, MessageOrigin::Loaded);
        assert_eq!(item.service_action(), Some(&ServiceAction::Empty));
        assert_eq!(item.text().text, "Empty message");
    }

    #[test]
    fn test_unsupported_payload_builds_placeholder() {
        let history = chat();
        let mut payload = text_message(10, "").with_media(WireMedia::MessageMediaWebPage {
            webpage: WireWebPage::WebPageNotModified,
        });
        payload.post_author = Some("Editor".to_string());
        payload.reply_to_msg_id = Some(MsgId(4));
        let item = use_case().build(&history, &WireMessage::Message(payload), MessageOrigin::Loaded);

        assert_eq!(item.kind(), &ItemKind::Placeholder);
        assert!(item.flags().contains(MessageFlags::LEGACY));
        assert!(!item.flags().contains(MessageFlags::POST_AUTHOR));
        assert!(item.text().has_links());
        assert_eq!(item.reply_to_id(), Some(MsgId(4)));
        assert!(item.media().is_none());
    }

    #[test]
    fn test_ttl_payload_builds_expired_notice() {
        let history = chat();
        let message = WireMessage::Message(text_message(10, "").with_media(
            WireMedia::MessageMediaDocument {
                document: Some(WireDocument::DocumentEmpty { id: 1 }),
                ttl_seconds: Some(30),
            },
        ));
        let item = use_case().build(&history, &message, MessageOrigin::Loaded);
        assert_eq!(
            item.service_action(),
            Some(&ServiceAction::ExpiredMedia { video: true })
        );
        assert_eq!(item.text().text, "Video has expired");
    }

    #[test]
    fn test_unknown_media_without_text_is_routed_to_empty() {
        let history = chat();
        let message = WireMessage::Message(text_message(10, "").with_media(WireMedia::Unknown));
        let item = use_case().build(&history, &message, MessageOrigin::Loaded);
        assert!(item.is_service());

        let with_text =
            WireMessage::Message(text_message(11, "dice!").with_media(WireMedia::Unknown));
        let item = use_case().build(&history, &with_text, MessageOrigin::Loaded);
        assert_eq!(item.kind(), &ItemKind::Content);
        assert!(item.media().is_none());
    }

    #[test]
    fn test_phone_call_service_builds_content() {
        let history = chat();
        let message = WireMessage::MessageService(WireServiceMessage {
            id: MsgId(12),
            flags: WireFlags::default(),
            from_id: Some(PeerId(2)),
            date: 500,
            reply_to_msg_id: None,
            action: WireAction::MessageActionPhoneCall {
                reason: None,
                duration: Some(61),
            },
        });
        let item = use_case().build(&history, &message, MessageOrigin::Loaded);
        assert!(item.is_content_message());
        assert_eq!(
            item.media(),
            Some(&Media::Call {
                reason: CallDiscardReason::Hangup,
                duration: Some(61),
            })
        );
    }

    #[test]
    fn test_migration_notice_is_marked() {
        let history = chat();
        let message = WireMessage::MessageService(WireServiceMessage {
            id: MsgId(13),
            flags: WireFlags::default(),
            from_id: Some(PeerId(2)),
            date: 500,
            reply_to_msg_id: None,
            action: WireAction::MessageActionChatMigrateTo {
                channel_id: PeerId(70),
            },
        });
        let item = use_case().build(&history, &message, MessageOrigin::Loaded);
        assert!(item.is_group_migrate());
    }

    #[test]
    fn test_message_empty_has_zero_date() {
        let history = chat();
        let item = use_case().build(
            &history,
            &WireMessage::MessageEmpty { id: MsgId(14) },
            MessageOrigin::Loaded,
        );
        assert_eq!(item.date(), 0);
        assert_eq!(item.service_action(), Some(&ServiceAction::Empty));
    }

    #[test]
    fn test_local_echo_is_provisional_and_registered() {
        let mut history = chat();
        let message = WireMessage::Message(text_message(-5, "sending"));
        let id = use_case()
            .execute(&mut history, &message, MessageOrigin::LocalEcho)
            .unwrap();
        let item = history.item(id).unwrap();
        assert_eq!(item.send_state(), SendState::Provisional);
        assert!(item.out());
        assert!(history.is_local_registered(MsgId(-5)));
        assert_eq!(history.take_events(), vec![HistoryEvent::ItemAdded(MsgId(-5))]);
    }

    #[test]
    #[should_panic(expected = "must carry a local id")]
    fn test_local_echo_with_server_id_panics() {
        let history = chat();
        let message = WireMessage::Message(text_message(5, "oops"));
        let _ = use_case().build(&history, &message, MessageOrigin::LocalEcho);
    }

    #[test]
    fn test_execute_rejects_local_echo_with_server_id() {
        let mut history = chat();
        let message = WireMessage::Message(text_message(12, "oops"));
        let err = use_case()
            .execute(&mut history, &message, MessageOrigin::LocalEcho)
            .unwrap_err();
        assert_eq!(err, HistoryError::NotProvisional { id: MsgId(12) });
        assert!(history.is_empty());
    }

    #[test]
    fn test_execute_groups_and_indexes() {
        let mut history = History::new(Peer::new(
            60_u64,
            "Group",
            PeerKind::Channel(ChannelInfo {
                megagroup: true,
                ..ChannelInfo::default()
            }),
        ));
        let use_case = use_case();
        for id in [20, 21] {
            let mut payload = text_message(id, "").with_media(WireMedia::MessageMediaPhoto {
                photo: Some(WirePhoto::Photo { id: id.unsigned_abs() }),
                ttl_seconds: None,
            });
            payload.grouped_id = Some(GroupId(9));
            payload.flags.mentioned = id == 21;
            payload.flags.media_unread = id == 21;
            use_case
                .execute(&mut history, &WireMessage::Message(payload), MessageOrigin::Incoming)
                .unwrap();
        }
        assert_eq!(history.group_leader(GroupId(9)), Some(MsgId(21)));
        assert_eq!(history.group_items(GroupId(9)), vec![MsgId(20), MsgId(21)]);
        assert!(history.unread_mentions().contains(&MsgId(21)));
        assert_eq!(
            history.shared_media(crate::domain::entities::SharedMediaTypes::PHOTO),
            vec![MsgId(20), MsgId(21)]
        );
    }

    #[test]
    fn test_forward_header_is_attached() {
        let history = chat();
        let mut payload = text_message(30, "fwd");
        payload.fwd_from = Some(WireForwardHeader {
            from_id: Some(PeerId(2)),
            date: 99,
            ..WireForwardHeader::default()
        });
        let item = use_case().build(&history, &WireMessage::Message(payload), MessageOrigin::Loaded);
        assert_eq!(item.date_original(), 99);
        assert_eq!(item.sender_original(&history), Some(PeerId(2)));
    }
}
