//! Attachment payloads carried by messages.

use serde::{Deserialize, Serialize};

use super::PeerId;

bitflags::bitflags! {
    /// Shared-media sections a message is listed under.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SharedMediaTypes: u16 {
        const PHOTO = 1 << 0;
        const VIDEO = 1 << 1;
        const PHOTO_VIDEO = 1 << 2;
        const FILE = 1 << 3;
        const MUSIC_FILE = 1 << 4;
        const LINK = 1 << 5;
        const VOICE_FILE = 1 << 6;
        const ROUND_FILE = 1 << 7;
        const ROUND_VOICE_FILE = 1 << 8;
        const GIF = 1 << 9;
    }
}

/// Flavour of a document attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum DocumentKind {
    File,
    Audio {
        title: Option<String>,
        performer: Option<String>,
    },
    Voice,
    Video,
    RoundVideo,
    Animation,
    Sticker {
        alt: Option<String>,
    },
}

/// Document attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Document {
    pub id: u64,
    pub kind: DocumentKind,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub size: u64,
    pub duration: Option<i32>,
}

impl Document {
    /// Returns true for voice notes.
    #[must_use]
    pub const fn is_voice_message(&self) -> bool {
        matches!(self.kind, DocumentKind::Voice)
    }

    /// Returns true for round video notes.
    #[must_use]
    pub const fn is_video_message(&self) -> bool {
        matches!(self.kind, DocumentKind::RoundVideo)
    }

    /// Returns true for stickers.
    #[must_use]
    pub const fn is_sticker(&self) -> bool {
        matches!(self.kind, DocumentKind::Sticker { .. })
    }
}

/// Point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Link preview state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum WebPage {
    Ready {
        id: u64,
        url: String,
        site_name: Option<String>,
        title: Option<String>,
    },
    Empty {
        id: u64,
    },
    Pending {
        id: u64,
    },
}

/// How a phone call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum CallDiscardReason {
    #[default]
    Hangup,
    Missed,
    Busy,
    Disconnect,
}

/// Attachment payload of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Media {
    Photo {
        id: u64,
    },
    Document(Document),
    Contact {
        first_name: String,
        last_name: String,
        phone: String,
        user_id: Option<PeerId>,
    },
    Location {
        point: GeoPoint,
        title: Option<String>,
        live_period: Option<i32>,
    },
    WebPage(WebPage),
    Game {
        id: u64,
        title: String,
    },
    Invoice {
        title: String,
        total_amount: i64,
        currency: String,
    },
    Poll {
        id: u64,
        question: String,
        closed: bool,
    },
    Call {
        reason: CallDiscardReason,
        duration: Option<i32>,
    },
}

impl Media {
    /// Returns the document, if this is one.
    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        match self {
            Self::Document(document) => Some(document),
            _ => None,
        }
    }

    /// Returns the link preview, if this is one.
    #[must_use]
    pub const fn webpage(&self) -> Option<&WebPage> {
        match self {
            Self::WebPage(page) => Some(page),
            _ => None,
        }
    }

    /// Returns true if a message carrying this media may be deleted for everyone.
    #[must_use]
    pub const fn allows_revoke(&self) -> bool {
        !matches!(self, Self::Call { .. })
    }

    /// Returns true if the message text or media may be edited after sending.
    #[must_use]
    pub const fn allows_edit(&self) -> bool {
        match self {
            Self::Photo { .. } | Self::WebPage(_) => true,
            Self::Document(document) => !document.is_sticker() && !document.is_video_message(),
            _ => false,
        }
    }

    /// Returns true if the message may be forwarded.
    #[must_use]
    pub const fn allows_forward(&self) -> bool {
        !matches!(self, Self::Call { .. })
    }

    /// Returns true for polls that are still accepting votes.
    #[must_use]
    pub const fn is_open_poll(&self) -> bool {
        matches!(self, Self::Poll { closed: false, .. })
    }

    fn label(&self, out: bool) -> String {
        match self {
            Self::Photo { .. } => "Photo".to_string(),
            Self::Document(document) => match &document.kind {
                DocumentKind::Voice => "Voice message".to_string(),
                DocumentKind::RoundVideo => "Video message".to_string(),
                DocumentKind::Video => "Video".to_string(),
                DocumentKind::Animation => "GIF".to_string(),
                DocumentKind::Sticker { alt } => alt
                    .as_deref()
                    .map_or_else(|| "Sticker".to_string(), |alt| format!("{alt} Sticker")),
                DocumentKind::Audio { title, performer } => match (performer, title) {
                    (Some(performer), Some(title)) => format!("{performer} - {title}"),
                    (None, Some(title)) => title.clone(),
                    _ => "Audio file".to_string(),
                },
                DocumentKind::File => document
                    .file_name
                    .clone()
                    .unwrap_or_else(|| "File".to_string()),
            },
            Self::Contact { .. } => "Contact".to_string(),
            Self::Location {
                live_period: Some(_),
                ..
            } => "Live location".to_string(),
            Self::Location {
                title: Some(title), ..
            } => title.clone(),
            Self::Location { .. } => "Location".to_string(),
            Self::WebPage(_) => String::new(),
            Self::Game { title, .. } => format!("\u{1F3AE} {title}"),
            Self::Invoice { title, .. } => title.clone(),
            Self::Poll { question, .. } => format!("\u{1F4CA} {question}"),
            Self::Call { reason, .. } => match (out, reason) {
                (false, CallDiscardReason::Missed | CallDiscardReason::Busy) => {
                    "Missed call".to_string()
                }
                (true, CallDiscardReason::Missed | CallDiscardReason::Busy) => {
                    "Cancelled call".to_string()
                }
                (true, _) => "Outgoing call".to_string(),
                (false, _) => "Incoming call".to_string(),
            },
        }
    }

    /// Text shown in a desktop notification for a message carrying this media.
    #[must_use]
    pub fn notification_text(&self, caption: &str, out: bool) -> String {
        let label = self.label(out);
        match (label.is_empty(), caption.is_empty()) {
            (true, _) => caption.to_string(),
            (false, true) => label,
            (false, false) => format!("{label}, {caption}"),
        }
    }

    /// Single-line text shown in the chat list preview.
    #[must_use]
    pub fn chat_list_text(&self, caption: &str, out: bool) -> String {
        super::text::single_line(&self.notification_text(caption, out))
    }

    /// Shared-media sections this payload belongs to.
    #[must_use]
    pub const fn shared_media_types(&self) -> SharedMediaTypes {
        match self {
            Self::Photo { .. } => SharedMediaTypes::PHOTO.union(SharedMediaTypes::PHOTO_VIDEO),
            Self::Document(document) => match document.kind {
                DocumentKind::Video => {
                    SharedMediaTypes::VIDEO.union(SharedMediaTypes::PHOTO_VIDEO)
                }
                DocumentKind::Voice => {
                    SharedMediaTypes::VOICE_FILE.union(SharedMediaTypes::ROUND_VOICE_FILE)
                }
                DocumentKind::RoundVideo => {
                    SharedMediaTypes::ROUND_FILE.union(SharedMediaTypes::ROUND_VOICE_FILE)
                }
                DocumentKind::Animation => SharedMediaTypes::GIF,
                DocumentKind::Audio { .. } => SharedMediaTypes::MUSIC_FILE,
                DocumentKind::File => SharedMediaTypes::FILE,
                DocumentKind::Sticker { .. } => SharedMediaTypes::empty(),
            },
            Self::WebPage(WebPage::Ready { .. }) => SharedMediaTypes::LINK,
            _ => SharedMediaTypes::empty(),
        }
    }
}
