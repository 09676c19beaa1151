//! Message payloads as delivered by the server.
//!
//! Objects carry their constructor name in the `_` field, for example
//! `{"_": "messageMediaPhoto", "photo": {"_": "photoEmpty", "id": 4}}`.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{GroupId, MsgId, PeerId, TextEntity, TimeId};

/// Any message constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
pub enum WireMessage {
    /// Ordinary message with text and optional media.
    Message(WireContentMessage),
    /// Conversation event.
    MessageService(WireServiceMessage),
    /// Message the server no longer has.
    MessageEmpty {
        /// Message id.
        id: MsgId,
    },
}

impl WireMessage {
    /// Id carried by any constructor.
    #[must_use]
    pub const fn id(&self) -> MsgId {
        match self {
            Self::Message(message) => message.id,
            Self::MessageService(service) => service.id,
            Self::MessageEmpty { id } => *id,
        }
    }
}

/// Flags shared by content and service messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct WireFlags {
    pub out: bool,
    pub mentioned: bool,
    pub media_unread: bool,
    pub silent: bool,
    pub post: bool,
    pub legacy: bool,
    pub edit_hide: bool,
}

/// `message` constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct WireContentMessage {
    pub id: MsgId,
    #[serde(flatten)]
    pub flags: WireFlags,
    #[serde(default)]
    pub from_id: Option<PeerId>,
    pub date: TimeId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub entities: Vec<TextEntity>,
    #[serde(default)]
    pub media: Option<WireMedia>,
    #[serde(default)]
    pub reply_to_msg_id: Option<MsgId>,
    #[serde(default)]
    pub via_bot_id: Option<PeerId>,
    #[serde(default)]
    pub fwd_from: Option<WireForwardHeader>,
    #[serde(default)]
    pub reply_markup: Option<WireReplyMarkup>,
    #[serde(default)]
    pub post_author: Option<String>,
    #[serde(default)]
    pub grouped_id: Option<GroupId>,
    #[serde(default)]
    pub edit_date: Option<TimeId>,
}

impl WireContentMessage {
    /// Creates a plain text message.
    #[must_use]
    pub fn text(id: MsgId, date: TimeId, message: impl Into<String>) -> Self {
        Self {
            id,
            flags: WireFlags::default(),
            from_id: None,
            date,
            message: message.into(),
            entities: Vec::new(),
            media: None,
            reply_to_msg_id: None,
            via_bot_id: None,
            fwd_from: None,
            reply_markup: None,
            post_author: None,
            grouped_id: None,
            edit_date: None,
        }
    }

    /// Sets the sender.
    #[must_use]
    pub const fn with_from(mut self, from: PeerId) -> Self {
        self.from_id = Some(from);
        self
    }

    /// Sets the flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: WireFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attaches media.
    #[must_use]
    pub fn with_media(mut self, media: WireMedia) -> Self {
        self.media = Some(media);
        self
    }
}

/// `messageService` constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct WireServiceMessage {
    pub id: MsgId,
    #[serde(flatten)]
    pub flags: WireFlags,
    #[serde(default)]
    pub from_id: Option<PeerId>,
    pub date: TimeId,
    #[serde(default)]
    pub reply_to_msg_id: Option<MsgId>,
    pub action: WireAction,
}

/// Origin of a forwarded message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct WireForwardHeader {
    pub from_id: Option<PeerId>,
    pub from_name: Option<String>,
    pub date: TimeId,
    pub channel_id: Option<PeerId>,
    pub channel_post: Option<MsgId>,
    pub post_author: Option<String>,
    pub saved_from_peer: Option<PeerId>,
    pub saved_from_msg_id: Option<MsgId>,
}

/// Media attached to a `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireMedia {
    MessageMediaEmpty,
    MessageMediaContact {
        #[serde(default)]
        phone_number: String,
        #[serde(default)]
        first_name: String,
        #[serde(default)]
        last_name: String,
        #[serde(default)]
        user_id: Option<PeerId>,
    },
    MessageMediaGeo {
        geo: WireGeoPoint,
    },
    MessageMediaVenue {
        geo: WireGeoPoint,
        #[serde(default)]
        title: String,
        #[serde(default)]
        address: String,
    },
    MessageMediaGeoLive {
        geo: WireGeoPoint,
        period: i32,
    },
    MessageMediaPhoto {
        #[serde(default)]
        photo: Option<WirePhoto>,
        #[serde(default)]
        ttl_seconds: Option<i32>,
    },
    MessageMediaDocument {
        #[serde(default)]
        document: Option<WireDocument>,
        #[serde(default)]
        ttl_seconds: Option<i32>,
    },
    MessageMediaWebPage {
        webpage: WireWebPage,
    },
    MessageMediaGame {
        game: WireGame,
    },
    MessageMediaInvoice {
        title: String,
        #[serde(default)]
        total_amount: i64,
        #[serde(default)]
        currency: String,
    },
    MessageMediaPoll {
        poll: WirePoll,
    },
    MessageMediaUnsupported,
    /// Constructor this client does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireGeoPoint {
    GeoPoint { lat: f64, long: f64 },
    GeoPointEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WirePhoto {
    Photo { id: u64 },
    PhotoEmpty { id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireDocument {
    Document {
        id: u64,
        #[serde(default)]
        mime_type: Option<String>,
        #[serde(default)]
        size: u64,
        #[serde(default)]
        attributes: Vec<WireDocumentAttribute>,
    },
    DocumentEmpty {
        id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireDocumentAttribute {
    DocumentAttributeFilename {
        file_name: String,
    },
    DocumentAttributeAudio {
        #[serde(default)]
        voice: bool,
        #[serde(default)]
        duration: i32,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        performer: Option<String>,
    },
    DocumentAttributeVideo {
        #[serde(default)]
        round_message: bool,
        #[serde(default)]
        duration: i32,
    },
    DocumentAttributeAnimated,
    DocumentAttributeSticker {
        #[serde(default)]
        alt: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireWebPage {
    WebPage {
        id: u64,
        url: String,
        #[serde(default)]
        site_name: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
    WebPageEmpty {
        id: u64,
    },
    WebPagePending {
        id: u64,
    },
    WebPageNotModified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct WireGame {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct WirePoll {
    pub id: u64,
    pub question: String,
    #[serde(default)]
    pub closed: bool,
}

/// Event carried by a `messageService`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireAction {
    MessageActionChatCreate {
        title: String,
        #[serde(default)]
        users: Vec<PeerId>,
    },
    MessageActionChannelCreate {
        title: String,
    },
    MessageActionChatEditTitle {
        title: String,
    },
    MessageActionChatAddUser {
        users: Vec<PeerId>,
    },
    MessageActionChatDeleteUser {
        user_id: PeerId,
    },
    MessageActionChatJoinedByLink,
    MessageActionChatMigrateTo {
        channel_id: PeerId,
    },
    MessageActionChannelMigrateFrom {
        chat_id: PeerId,
    },
    MessageActionPinMessage,
    MessageActionHistoryClear,
    MessageActionPhoneCall {
        #[serde(default)]
        reason: Option<WireCallReason>,
        #[serde(default)]
        duration: Option<i32>,
    },
    MessageActionScreenshotTaken,
    MessageActionCustomAction {
        message: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireCallReason {
    PhoneCallDiscardReasonMissed,
    PhoneCallDiscardReasonDisconnect,
    PhoneCallDiscardReasonHangup,
    PhoneCallDiscardReasonBusy,
}

/// Keyboard attached to a `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireReplyMarkup {
    ReplyKeyboardHide {
        #[serde(default)]
        selective: bool,
    },
    ReplyKeyboardForceReply {
        #[serde(default)]
        single_use: bool,
        #[serde(default)]
        selective: bool,
    },
    ReplyKeyboardMarkup {
        #[serde(default)]
        resize: bool,
        #[serde(default)]
        single_use: bool,
        #[serde(default)]
        selective: bool,
        rows: Vec<Vec<WireButton>>,
    },
    ReplyInlineMarkup {
        rows: Vec<Vec<WireButton>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum WireButton {
    KeyboardButton { text: String },
    KeyboardButtonUrl { text: String, url: String },
    KeyboardButtonCallback { text: String, data: String },
    KeyboardButtonSwitchInline { text: String, query: String },
    KeyboardButtonGame { text: String },
    KeyboardButtonBuy { text: String },
    KeyboardButtonRequestPhone { text: String },
    KeyboardButtonRequestGeoLocation { text: String },
}
