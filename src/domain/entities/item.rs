//! The message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Component, ComponentKind, Components, ForwardProvenance, GroupId, HiddenSenderInfo, History,
    LogEntryOriginal, Media, MessageFlags, MsgId, PeerId, ReplyMarkup, ReplyMarkupFlags,
    SendState, TextWithEntities, TimeId,
};
use crate::domain::ports::PeerDirectory;

/// Kind of a conversation event rendered as a centered notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ServiceAction {
    /// Placeholder for a message whose payload was missing.
    Empty,
    /// Self-destructing media whose timer ran out.
    ExpiredMedia { video: bool },
    PinMessage { pinned: MsgId },
    HistoryClear,
    ChatCreate { title: String },
    ChannelCreate { title: String },
    ChatEditTitle { title: String },
    ChatAddUser { users: Vec<PeerId> },
    ChatDeleteUser { user: PeerId },
    ChatJoinedByLink,
    ChatMigrateTo { channel: PeerId },
    ChannelMigrateFrom { chat: PeerId },
    ScreenshotTaken,
    Custom { message: String },
    Unknown,
}

/// Closed set of message variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Ordinary message with text and/or media.
    Content,
    /// Content message standing in for a payload this client cannot show.
    Placeholder,
    /// Notice about something that happened in the conversation.
    Service(ServiceAction),
}

impl ItemKind {
    /// Short label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Placeholder => "placeholder",
            Self::Service(_) => "service",
        }
    }
}

/// A message in a conversation.
///
/// Owned by its [`History`]; holds only the id of that history, of the sender
/// and of any referenced peers.
#[derive(Debug, Clone)]
pub struct HistoryItem {
    id: MsgId,
    history: PeerId,
    from: PeerId,
    flags: MessageFlags,
    date: TimeId,
    edit_date: Option<TimeId>,
    kind: ItemKind,
    text: TextWithEntities,
    media: Option<Media>,
    components: Components,
    group_id: Option<GroupId>,
}

impl HistoryItem {
    /// Creates a content message. A missing sender means the conversation itself.
    #[must_use]
    pub fn new(
        history: PeerId,
        id: MsgId,
        flags: MessageFlags,
        date: TimeId,
        from: Option<PeerId>,
    ) -> Self {
        Self {
            id,
            history,
            from: from.unwrap_or(history),
            flags,
            date,
            edit_date: None,
            kind: ItemKind::Content,
            text: TextWithEntities::default(),
            media: None,
            components: Components::default(),
            group_id: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextWithEntities) -> Self {
        self.text = text;
        self
    }

    #[must_use]
    pub fn with_media(mut self, media: Option<Media>) -> Self {
        self.media = media;
        self
    }

    #[must_use]
    pub const fn with_edit_date(mut self, edit_date: Option<TimeId>) -> Self {
        self.edit_date = edit_date;
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.attach(component);
        self
    }

    #[must_use]
    pub const fn id(&self) -> MsgId {
        self.id
    }

    /// Id of the owning conversation.
    #[must_use]
    pub const fn history_id(&self) -> PeerId {
        self.history
    }

    #[must_use]
    pub const fn from(&self) -> PeerId {
        self.from
    }

    #[must_use]
    pub const fn flags(&self) -> MessageFlags {
        self.flags
    }

    #[must_use]
    pub const fn date(&self) -> TimeId {
        self.date
    }

    /// Creation time as a calendar date.
    #[must_use]
    pub fn date_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.date, 0).unwrap_or_default()
    }

    #[must_use]
    pub const fn edit_date(&self) -> Option<TimeId> {
        self.edit_date
    }

    #[must_use]
    pub const fn kind(&self) -> &ItemKind {
        &self.kind
    }

    #[must_use]
    pub const fn text(&self) -> &TextWithEntities {
        &self.text
    }

    #[must_use]
    pub const fn media(&self) -> Option<&Media> {
        self.media.as_ref()
    }

    #[must_use]
    pub const fn components(&self) -> &Components {
        &self.components
    }

    #[must_use]
    pub const fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    #[must_use]
    pub const fn send_state(&self) -> SendState {
        SendState::from_flags(self.flags)
    }

    #[must_use]
    pub const fn out(&self) -> bool {
        self.flags.contains(MessageFlags::OUT)
    }

    /// Returns true for messages posted on behalf of a channel.
    #[must_use]
    pub const fn is_post(&self) -> bool {
        self.flags.contains(MessageFlags::POST)
    }

    #[must_use]
    pub const fn is_sending(&self) -> bool {
        self.flags.contains(MessageFlags::SENDING)
    }

    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.flags.contains(MessageFlags::FAILED)
    }

    /// Returns true for synthetic entries shown in a channel's admin log.
    #[must_use]
    pub const fn is_log_entry(&self) -> bool {
        self.flags.contains(MessageFlags::ADMIN_LOG_ENTRY)
    }

    /// Returns true for the marker left behind when a group was upgraded.
    #[must_use]
    pub const fn is_group_migrate(&self) -> bool {
        self.flags.contains(MessageFlags::MIGRATION_MARKER)
    }

    #[must_use]
    pub const fn is_service(&self) -> bool {
        matches!(self.kind, ItemKind::Service(_))
    }

    /// Returns true for content and placeholder messages.
    #[must_use]
    pub const fn is_content_message(&self) -> bool {
        matches!(self.kind, ItemKind::Content | ItemKind::Placeholder)
    }

    /// Returns the service action, if this is a service message.
    #[must_use]
    pub const fn service_action(&self) -> Option<&ServiceAction> {
        match &self.kind {
            ItemKind::Service(action) => Some(action),
            _ => None,
        }
    }

    /// Returns true when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.media.is_none()
            && !self.components.has(ComponentKind::LogEntryOriginal)
    }

    /// Attaches an optional component.
    ///
    /// # Panics
    /// Panics if the slot already holds a different value.
    pub fn attach(&mut self, component: Component) {
        self.components.attach(component);
    }

    /// Attaches the original content of an admin-log entry.
    ///
    /// # Panics
    /// Panics unless the message is an admin-log entry.
    pub fn add_log_entry_original(&mut self, label: impl Into<String>, content: TextWithEntities) {
        assert!(
            self.is_log_entry(),
            "log entry original attached to message {} which is not a log entry",
            self.id
        );
        self.attach(Component::LogEntryOriginal(LogEntryOriginal {
            label: label.into(),
            content,
        }));
    }

    /// Keyboard shown under the message, if any.
    #[must_use]
    pub fn inline_reply_markup(&self) -> Option<&ReplyMarkup> {
        self.components
            .reply_markup()
            .filter(|markup| markup.is_inline())
    }

    /// Returns true if this message changes the reply keyboard below the input field.
    #[must_use]
    pub fn defines_reply_keyboard(&self) -> bool {
        match self.components.reply_markup() {
            Some(markup) => !markup.is_inline(),
            None => self.flags.contains(MessageFlags::HAS_REPLY_MARKUP),
        }
    }

    /// Flags of the reply keyboard this message defines.
    ///
    /// # Panics
    /// Panics unless [`Self::defines_reply_keyboard`] holds.
    #[must_use]
    pub fn reply_keyboard_flags(&self) -> ReplyMarkupFlags {
        assert!(
            self.defines_reply_keyboard(),
            "message {} does not define a reply keyboard",
            self.id
        );
        self.components
            .reply_markup()
            .map_or(ReplyMarkupFlags::ZERO, ReplyMarkup::flags)
    }

    #[must_use]
    pub fn reply_to_id(&self) -> Option<MsgId> {
        self.components.reply().map(|reply| reply.reply_to)
    }

    #[must_use]
    pub fn via_bot(&self) -> Option<PeerId> {
        self.components.via().map(|via| via.bot)
    }

    /// Peer shown as the author: the conversation for channel posts.
    #[must_use]
    pub const fn author(&self) -> PeerId {
        if self.is_post() { self.history } else { self.from }
    }

    #[must_use]
    pub fn date_original(&self) -> TimeId {
        self.components
            .forwarded()
            .map_or(self.date, |forwarded| forwarded.original_date)
    }

    #[must_use]
    pub fn id_original(&self) -> MsgId {
        self.components
            .forwarded()
            .map_or(self.id, |forwarded| forwarded.original_id)
    }

    #[must_use]
    pub fn forwarded(&self) -> Option<&ForwardProvenance> {
        self.components.forwarded()
    }

    #[must_use]
    pub fn hidden_forwarded_info(&self) -> Option<&HiddenSenderInfo> {
        self.components
            .forwarded()
            .and_then(|forwarded| forwarded.hidden_sender.as_ref())
    }

    /// Signature of the original post, or of this one.
    #[must_use]
    pub fn author_original(&self) -> Option<&str> {
        if let Some(forwarded) = self.components.forwarded() {
            return forwarded.original_author.as_deref();
        }
        self.components.signed().map(|signed| signed.author.as_str())
    }

    /// Who originally wrote the message.
    ///
    /// `None` for forwards from senders that hid their account.
    #[must_use]
    pub fn sender_original(&self, history: &History) -> Option<PeerId> {
        if let Some(forwarded) = self.components.forwarded() {
            return forwarded.original_sender;
        }
        let peer = history.peer();
        if peer.is_broadcast() {
            Some(peer.id())
        } else {
            Some(self.from)
        }
    }

    /// Original sender if it is a user, otherwise the direct sender.
    #[must_use]
    pub fn from_original(&self, peers: &dyn PeerDirectory) -> PeerId {
        self.components
            .forwarded()
            .and_then(|forwarded| forwarded.original_sender)
            .filter(|sender| peers.peer(*sender).is_some_and(|peer| peer.is_user()))
            .unwrap_or(self.from)
    }

    /// Channel a supergroup message was automatically forwarded from.
    #[must_use]
    pub fn discussion_post_original_sender(
        &self,
        history: &History,
        peers: &dyn PeerDirectory,
    ) -> Option<PeerId> {
        if !history.peer().is_megagroup() {
            return None;
        }
        self.components
            .forwarded()
            .and_then(|forwarded| forwarded.saved_from_peer)
            .filter(|from| peers.peer(*from).is_some_and(|peer| peer.is_channel()))
    }

    #[must_use]
    pub fn is_discussion_post(&self, history: &History, peers: &dyn PeerDirectory) -> bool {
        self.discussion_post_original_sender(history, peers).is_some()
    }

    /// Peer whose name and picture are shown next to the message.
    #[must_use]
    pub fn display_from(&self, history: &History, peers: &dyn PeerDirectory) -> Option<PeerId> {
        if let Some(sender) = self.discussion_post_original_sender(history, peers) {
            Some(sender)
        } else if history.peer().is_self() {
            self.sender_original(history)
        } else {
            Some(self.author())
        }
    }

    /// Bot that produced this message, if any.
    #[must_use]
    pub fn get_message_bot(&self, history: &History, peers: &dyn PeerDirectory) -> Option<PeerId> {
        if let Some(bot) = self.via_bot() {
            return Some(bot);
        }
        let peer = history.peer();
        let candidate = match peers.peer(self.from) {
            Some(from) if from.is_user() => Some(from),
            _ if peer.is_user() => Some(peer.clone()),
            _ => None,
        };
        candidate.filter(|user| user.is_bot()).map(|user| user.id())
    }

    pub(crate) fn set_id(&mut self, id: MsgId) {
        self.id = id;
        if let Some(markup) = self.components.reply_markup_mut()
            && markup.is_inline()
        {
            markup.update_message_id(id);
        }
    }

    pub(crate) fn insert_flags(&mut self, flags: MessageFlags) {
        self.flags.insert(flags);
    }

    pub(crate) fn remove_flags(&mut self, flags: MessageFlags) {
        self.flags.remove(flags);
    }

    pub(crate) fn assign_group_id(&mut self, group_id: GroupId) {
        assert!(
            self.group_id.is_none(),
            "group id of message {} is already set",
            self.id
        );
        self.group_id = Some(group_id);
    }

    pub(crate) fn replace_content(
        &mut self,
        text: TextWithEntities,
        media: Option<Media>,
        markup: Option<ReplyMarkup>,
        edit_date: Option<TimeId>,
    ) {
        self.text = text;
        self.media = media;
        self.components.replace_reply_markup(markup);
        if let Some(edit_date) = edit_date {
            self.edit_date = Some(edit_date);
        }
    }

    pub(crate) fn become_history_cleared(&mut self, text: TextWithEntities) {
        self.kind = ItemKind::Service(ServiceAction::HistoryClear);
        self.flags &= MessageFlags::CLIENT_ONLY;
        self.from = self.history;
        self.text = text;
        self.media = None;
        self.components = Components::default();
    }
}
