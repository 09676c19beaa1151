//! Conversion of wire payloads into domain values.

use crate::application::dto::{
    WireAction, WireButton, WireCallReason, WireDocument, WireDocumentAttribute, WireFlags,
    WireForwardHeader, WireGeoPoint, WireMedia, WirePhoto, WireReplyMarkup, WireWebPage,
};
use crate::domain::entities::{
    ButtonKind, CallDiscardReason, Document, DocumentKind, ForwardProvenance, GeoPoint,
    HiddenSenderInfo, KeyboardButton, Media, MessageFlags, MsgId, PeerId, ReplyMarkup,
    ReplyMarkupFlags, ServiceAction, TextEntity, TextWithEntities, WebPage,
};

pub struct WireMapper;

impl WireMapper {
    /// Server flags of a payload.
    #[must_use]
    pub fn flags(wire: WireFlags) -> MessageFlags {
        let mut flags = MessageFlags::empty();
        flags.set(MessageFlags::OUT, wire.out);
        flags.set(MessageFlags::MENTIONED, wire.mentioned);
        flags.set(MessageFlags::MEDIA_UNREAD, wire.media_unread);
        flags.set(MessageFlags::SILENT, wire.silent);
        flags.set(MessageFlags::POST, wire.post);
        flags.set(MessageFlags::LEGACY, wire.legacy);
        flags.set(MessageFlags::EDIT_HIDE, wire.edit_hide);
        flags
    }

    #[must_use]
    pub fn text(message: &str, entities: &[TextEntity]) -> TextWithEntities {
        TextWithEntities::with_entities(message, entities.to_vec())
    }

    /// Media of a payload that classified as good.
    ///
    /// Returns `None` for payloads with nothing to show.
    #[must_use]
    pub fn media(media: &WireMedia) -> Option<Media> {
        match media {
            WireMedia::MessageMediaPhoto {
                photo: Some(WirePhoto::Photo { id }),
                ..
            } => Some(Media::Photo { id: *id }),
            WireMedia::MessageMediaDocument {
                document: Some(document),
                ..
            } => Self::document(document).map(Media::Document),
            WireMedia::MessageMediaContact {
                phone_number,
                first_name,
                last_name,
                user_id,
            } => Some(Media::Contact {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                phone: phone_number.clone(),
                user_id: *user_id,
            }),
            WireMedia::MessageMediaGeo { geo } => Self::geo(*geo).map(|point| Media::Location {
                point,
                title: None,
                live_period: None,
            }),
            WireMedia::MessageMediaVenue { geo, title, .. } => {
                Self::geo(*geo).map(|point| Media::Location {
                    point,
                    title: Some(title.clone()),
                    live_period: None,
                })
            }
            WireMedia::MessageMediaGeoLive { geo, period } => {
                Self::geo(*geo).map(|point| Media::Location {
                    point,
                    title: None,
                    live_period: Some(*period),
                })
            }
            WireMedia::MessageMediaWebPage { webpage } => Self::webpage(webpage).map(Media::WebPage),
            WireMedia::MessageMediaGame { game } => Some(Media::Game {
                id: game.id,
                title: game.title.clone(),
            }),
            WireMedia::MessageMediaInvoice {
                title,
                total_amount,
                currency,
            } => Some(Media::Invoice {
                title: title.clone(),
                total_amount: *total_amount,
                currency: currency.clone(),
            }),
            WireMedia::MessageMediaPoll { poll } => Some(Media::Poll {
                id: poll.id,
                question: poll.question.clone(),
                closed: poll.closed,
            }),
            WireMedia::MessageMediaEmpty
            | WireMedia::MessageMediaPhoto { .. }
            | WireMedia::MessageMediaDocument { .. }
            | WireMedia::MessageMediaUnsupported
            | WireMedia::Unknown => None,
        }
    }

    const fn geo(geo: WireGeoPoint) -> Option<GeoPoint> {
        match geo {
            WireGeoPoint::GeoPoint { lat, long } => Some(GeoPoint { lat, lon: long }),
            WireGeoPoint::GeoPointEmpty => None,
        }
    }

    fn webpage(webpage: &WireWebPage) -> Option<WebPage> {
        match webpage {
            WireWebPage::WebPage {
                id,
                url,
                site_name,
                title,
            } => Some(WebPage::Ready {
                id: *id,
                url: url.clone(),
                site_name: site_name.clone(),
                title: title.clone(),
            }),
            WireWebPage::WebPageEmpty { id } => Some(WebPage::Empty { id: *id }),
            WireWebPage::WebPagePending { id } => Some(WebPage::Pending { id: *id }),
            WireWebPage::WebPageNotModified => None,
        }
    }

    /// Builds a document, deriving its flavour from the attributes.
    #[must_use]
    pub fn document(document: &WireDocument) -> Option<Document> {
        let WireDocument::Document {
            id,
            mime_type,
            size,
            attributes,
        } = document
        else {
            return None;
        };
        let mut kind = DocumentKind::File;
        let mut file_name = None;
        let mut duration = None;
        for attribute in attributes {
            match attribute {
                WireDocumentAttribute::DocumentAttributeFilename { file_name: name } => {
                    file_name = Some(name.clone());
                }
                WireDocumentAttribute::DocumentAttributeAudio {
                    voice,
                    duration: seconds,
                    title,
                    performer,
                } => {
                    duration = Some(*seconds);
                    kind = if *voice {
                        DocumentKind::Voice
                    } else {
                        DocumentKind::Audio {
                            title: title.clone(),
                            performer: performer.clone(),
                        }
                    };
                }
                WireDocumentAttribute::DocumentAttributeVideo {
                    round_message,
                    duration: seconds,
                } => {
                    duration = Some(*seconds);
                    if !matches!(kind, DocumentKind::Animation | DocumentKind::Sticker { .. }) {
                        kind = if *round_message {
                            DocumentKind::RoundVideo
                        } else {
                            DocumentKind::Video
                        };
                    }
                }
                WireDocumentAttribute::DocumentAttributeAnimated => {
                    if !matches!(kind, DocumentKind::Sticker { .. }) {
                        kind = DocumentKind::Animation;
                    }
                }
                WireDocumentAttribute::DocumentAttributeSticker { alt } => {
                    kind = DocumentKind::Sticker { alt: alt.clone() };
                }
                WireDocumentAttribute::Unknown => {}
            }
        }
        Some(Document {
            id: *id,
            kind,
            file_name,
            mime_type: mime_type.clone(),
            size: *size,
            duration,
        })
    }

    /// Forward provenance of a payload.
    #[must_use]
    pub fn forward(header: &WireForwardHeader) -> ForwardProvenance {
        let original_sender = header.channel_id.or(header.from_id);
        let hidden_sender = match (&header.from_name, original_sender) {
            (Some(name), None) => Some(HiddenSenderInfo { name: name.clone() }),
            _ => None,
        };
        ForwardProvenance {
            original_sender,
            original_date: header.date,
            original_id: header.channel_post.unwrap_or_default(),
            original_author: header.post_author.clone(),
            hidden_sender,
            saved_from_peer: header.saved_from_peer,
            saved_from_msg_id: header.saved_from_msg_id,
        }
    }

    /// Keyboard of a payload bound to `message_id`.
    ///
    /// A non-selective hide request carries nothing beyond the
    /// has-reply-markup flag and yields `None`.
    #[must_use]
    pub fn reply_markup(markup: &WireReplyMarkup, message_id: MsgId) -> Option<ReplyMarkup> {
        let (flags, rows) = match markup {
            WireReplyMarkup::ReplyKeyboardHide { selective: false } => return None,
            WireReplyMarkup::ReplyKeyboardHide { selective: true } => (
                ReplyMarkupFlags::HIDE | ReplyMarkupFlags::SELECTIVE,
                Vec::new(),
            ),
            WireReplyMarkup::ReplyKeyboardForceReply {
                single_use,
                selective,
            } => {
                let mut flags = ReplyMarkupFlags::FORCE_REPLY;
                flags.set(ReplyMarkupFlags::SINGLE_USE, *single_use);
                flags.set(ReplyMarkupFlags::SELECTIVE, *selective);
                (flags, Vec::new())
            }
            WireReplyMarkup::ReplyKeyboardMarkup {
                resize,
                single_use,
                selective,
                rows,
            } => {
                let mut flags = ReplyMarkupFlags::empty();
                flags.set(ReplyMarkupFlags::RESIZE, *resize);
                flags.set(ReplyMarkupFlags::SINGLE_USE, *single_use);
                flags.set(ReplyMarkupFlags::SELECTIVE, *selective);
                (flags, Self::rows(rows))
            }
            WireReplyMarkup::ReplyInlineMarkup { rows } => {
                (ReplyMarkupFlags::INLINE, Self::rows(rows))
            }
        };
        Some(ReplyMarkup::new(flags, rows, message_id))
    }

    fn rows(rows: &[Vec<WireButton>]) -> Vec<Vec<KeyboardButton>> {
        rows.iter()
            .map(|row| row.iter().map(Self::button).collect())
            .collect()
    }

    fn button(button: &WireButton) -> KeyboardButton {
        let (text, kind) = match button {
            WireButton::KeyboardButton { text } => (text, ButtonKind::Default),
            WireButton::KeyboardButtonUrl { text, url } => {
                (text, ButtonKind::Url { url: url.clone() })
            }
            WireButton::KeyboardButtonCallback { text, data } => (
                text,
                ButtonKind::Callback {
                    data: data.as_bytes().to_vec(),
                },
            ),
            WireButton::KeyboardButtonSwitchInline { text, query } => (
                text,
                ButtonKind::SwitchInline {
                    query: query.clone(),
                },
            ),
            WireButton::KeyboardButtonGame { text } => (text, ButtonKind::Game),
            WireButton::KeyboardButtonBuy { text } => (text, ButtonKind::Buy),
            WireButton::KeyboardButtonRequestPhone { text } => (text, ButtonKind::RequestPhone),
            WireButton::KeyboardButtonRequestGeoLocation { text } => {
                (text, ButtonKind::RequestLocation)
            }
        };
        KeyboardButton {
            text: text.clone(),
            kind,
        }
    }

    #[must_use]
    pub fn call_reason(reason: Option<WireCallReason>) -> CallDiscardReason {
        match reason {
            Some(WireCallReason::PhoneCallDiscardReasonMissed) => CallDiscardReason::Missed,
            Some(WireCallReason::PhoneCallDiscardReasonBusy) => CallDiscardReason::Busy,
            Some(WireCallReason::PhoneCallDiscardReasonDisconnect) => {
                CallDiscardReason::Disconnect
            }
            Some(WireCallReason::PhoneCallDiscardReasonHangup) | None => CallDiscardReason::Hangup,
        }
    }

    /// Service action of a payload; `reply_to` names the pinned message.
    ///
    /// Phone calls are not service actions and map to [`ServiceAction::Unknown`].
    #[must_use]
    pub fn service_action(action: &WireAction, reply_to: Option<MsgId>) -> ServiceAction {
        match action {
            WireAction::MessageActionChatCreate { title, .. } => ServiceAction::ChatCreate {
                title: title.clone(),
            },
            WireAction::MessageActionChannelCreate { title } => ServiceAction::ChannelCreate {
                title: title.clone(),
            },
            WireAction::MessageActionChatEditTitle { title } => ServiceAction::ChatEditTitle {
                title: title.clone(),
            },
            WireAction::MessageActionChatAddUser { users } => ServiceAction::ChatAddUser {
                users: users.clone(),
            },
            WireAction::MessageActionChatDeleteUser { user_id } => {
                ServiceAction::ChatDeleteUser { user: *user_id }
            }
            WireAction::MessageActionChatJoinedByLink => ServiceAction::ChatJoinedByLink,
            WireAction::MessageActionChatMigrateTo { channel_id } => {
                ServiceAction::ChatMigrateTo {
                    channel: *channel_id,
                }
            }
            WireAction::MessageActionChannelMigrateFrom { chat_id } => {
                ServiceAction::ChannelMigrateFrom { chat: *chat_id }
            }
            WireAction::MessageActionPinMessage => ServiceAction::PinMessage {
                pinned: reply_to.unwrap_or_default(),
            },
            WireAction::MessageActionHistoryClear => ServiceAction::HistoryClear,
            WireAction::MessageActionScreenshotTaken => ServiceAction::ScreenshotTaken,
            WireAction::MessageActionCustomAction { message } => ServiceAction::Custom {
                message: message.clone(),
            },
            WireAction::MessageActionPhoneCall { .. } | WireAction::Unknown => {
                ServiceAction::Unknown
            }
        }
    }

    /// Users named by a service action, for name lookups.
    #[must_use]
    pub fn action_users(action: &ServiceAction) -> Vec<PeerId> {
        match action {
            ServiceAction::ChatAddUser { users } => users.clone(),
            ServiceAction::ChatDeleteUser { user } => vec![*user],
            _ => Vec::new(),
        }
    }
}
