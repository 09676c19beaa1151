//! Domain entity definitions.

mod components;
mod event;
mod flags;
mod history;
mod ids;
mod item;
mod media;
mod peer;
mod peer_cache;
mod reply_markup;
mod settings;
mod text;

pub use components::{
    Component, ComponentKind, Components, ForwardProvenance, HiddenSenderInfo, LogEntryOriginal,
    ReplyReference, Signature, ViaBot,
};
pub use event::{HistoryEvent, PeerUpdate};
pub use flags::{MessageFlags, SendState};
pub use history::{HISTORY_CLEARED_TEXT, History, ItemEdit};
pub use ids::{FullMsgId, GroupId, MsgId, PeerId, SERVER_MAX_MSG_ID, TimeId};
pub use item::{HistoryItem, ItemKind, ServiceAction};
pub use media::{
    CallDiscardReason, Document, DocumentKind, GeoPoint, Media, SharedMediaTypes, WebPage,
};
pub use peer::{AdminRights, ChannelInfo, ChatInfo, Peer, PeerKind, UserInfo};
pub use peer_cache::PeerCache;
pub use reply_markup::{ButtonCallback, ButtonKind, KeyboardButton, ReplyMarkup, ReplyMarkupFlags};
pub use settings::HistorySettings;
pub use text::{ELLIPSIS, EntityKind, TextEntity, TextWithEntities, single_line, truncate_with_ellipsis};
