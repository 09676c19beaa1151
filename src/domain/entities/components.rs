//! Optional parts a message may carry, at most one of each kind.

use serde::{Deserialize, Serialize};

use super::{MsgId, PeerId, ReplyMarkup, TextWithEntities, TimeId};

/// Message this one replies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyReference {
    /// Target message id.
    pub reply_to: MsgId,
}

/// Name shown for a forward whose original sender hid their account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenSenderInfo {
    /// Display name as provided by the server.
    pub name: String,
}

impl HiddenSenderInfo {
    /// Returns the first word of the name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Where a forwarded message originally came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ForwardProvenance {
    pub original_sender: Option<PeerId>,
    pub original_date: TimeId,
    pub original_id: MsgId,
    pub original_author: Option<String>,
    pub hidden_sender: Option<HiddenSenderInfo>,
    pub saved_from_peer: Option<PeerId>,
    pub saved_from_msg_id: Option<MsgId>,
}

/// Inline bot the message was sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaBot {
    /// The bot user.
    pub bot: PeerId,
}

/// Channel post author signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Author name.
    pub author: String,
}

/// Original content shown in an admin-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct LogEntryOriginal {
    pub label: String,
    pub content: TextWithEntities,
}

/// Component kinds, for presence queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ComponentKind {
    Reply,
    Forwarded,
    Via,
    Signed,
    ReplyMarkup,
    LogEntryOriginal,
}

/// A single component value, used when attaching.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Component {
    Reply(ReplyReference),
    Forwarded(ForwardProvenance),
    Via(ViaBot),
    Signed(Signature),
    ReplyMarkup(ReplyMarkup),
    LogEntryOriginal(LogEntryOriginal),
}

impl Component {
    /// Returns the slot this component occupies.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Reply(_) => ComponentKind::Reply,
            Self::Forwarded(_) => ComponentKind::Forwarded,
            Self::Via(_) => ComponentKind::Via,
            Self::Signed(_) => ComponentKind::Signed,
            Self::ReplyMarkup(_) => ComponentKind::ReplyMarkup,
            Self::LogEntryOriginal(_) => ComponentKind::LogEntryOriginal,
        }
    }
}

/// Fixed set of optional component slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components {
    reply: Option<ReplyReference>,
    forwarded: Option<ForwardProvenance>,
    via: Option<ViaBot>,
    signed: Option<Signature>,
    reply_markup: Option<ReplyMarkup>,
    log_entry_original: Option<LogEntryOriginal>,
}

fn fill<T: PartialEq + std::fmt::Debug>(slot: &mut Option<T>, value: T, kind: ComponentKind) {
    match slot {
        None => *slot = Some(value),
        Some(existing) => assert!(
            *existing == value,
            "component {kind:?} already attached with a different value"
        ),
    }
}

impl Components {
    /// Attaches a component.
    ///
    /// Attaching an equal value to an occupied slot is a no-op.
    ///
    /// # Panics
    /// Panics if the slot already holds a different value.
    pub fn attach(&mut self, component: Component) {
        let kind = component.kind();
        match component {
            Component::Reply(value) => fill(&mut self.reply, value, kind),
            Component::Forwarded(value) => fill(&mut self.forwarded, value, kind),
            Component::Via(value) => fill(&mut self.via, value, kind),
            Component::Signed(value) => fill(&mut self.signed, value, kind),
            Component::ReplyMarkup(value) => fill(&mut self.reply_markup, value, kind),
            Component::LogEntryOriginal(value) => fill(&mut self.log_entry_original, value, kind),
        }
    }

    /// Returns true if the slot for `kind` is occupied.
    #[must_use]
    pub const fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Reply => self.reply.is_some(),
            ComponentKind::Forwarded => self.forwarded.is_some(),
            ComponentKind::Via => self.via.is_some(),
            ComponentKind::Signed => self.signed.is_some(),
            ComponentKind::ReplyMarkup => self.reply_markup.is_some(),
            ComponentKind::LogEntryOriginal => self.log_entry_original.is_some(),
        }
    }

    #[must_use]
    pub const fn reply(&self) -> Option<&ReplyReference> {
        self.reply.as_ref()
    }

    #[must_use]
    pub const fn forwarded(&self) -> Option<&ForwardProvenance> {
        self.forwarded.as_ref()
    }

    #[must_use]
    pub const fn via(&self) -> Option<&ViaBot> {
        self.via.as_ref()
    }

    #[must_use]
    pub const fn signed(&self) -> Option<&Signature> {
        self.signed.as_ref()
    }

    #[must_use]
    pub const fn reply_markup(&self) -> Option<&ReplyMarkup> {
        self.reply_markup.as_ref()
    }

    #[must_use]
    pub const fn log_entry_original(&self) -> Option<&LogEntryOriginal> {
        self.log_entry_original.as_ref()
    }

    pub(crate) fn reply_markup_mut(&mut self) -> Option<&mut ReplyMarkup> {
        self.reply_markup.as_mut()
    }

    /// Replaces the keyboard as part of an edit.
    pub(crate) fn replace_reply_markup(&mut self, markup: Option<ReplyMarkup>) {
        self.reply_markup = markup;
    }
}
