//! Conversation partners: users, basic groups and channels.

use serde::{Deserialize, Serialize};

use super::{MsgId, PeerId};

bitflags::bitflags! {
    /// Administrator rights held by the current account in a group or channel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct AdminRights: u32 {
        const CHANGE_INFO = 1 << 0;
        const POST_MESSAGES = 1 << 1;
        const EDIT_MESSAGES = 1 << 2;
        const DELETE_MESSAGES = 1 << 3;
        const BAN_USERS = 1 << 4;
        const INVITE_USERS = 1 << 5;
        const PIN_MESSAGES = 1 << 7;
        const ADD_ADMINS = 1 << 9;
    }
}

/// User-specific attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct UserInfo {
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub support: bool,
    #[serde(default = "default_true")]
    pub can_pin_messages: bool,
}

/// Basic group attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ChatInfo {
    #[serde(default)]
    pub creator: bool,
    #[serde(default)]
    pub admin_rights: AdminRights,
    #[serde(default)]
    pub migrated_to: Option<PeerId>,
}

/// Channel and supergroup attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ChannelInfo {
    #[serde(default)]
    pub megagroup: bool,
    #[serde(default)]
    pub creator: bool,
    #[serde(default)]
    pub admin_rights: AdminRights,
    #[serde(default)]
    pub member: bool,
    #[serde(default)]
    pub send_restricted: bool,
}

/// What kind of conversation partner a peer is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PeerKind {
    User(UserInfo),
    Chat(ChatInfo),
    Channel(ChannelInfo),
}

/// A user, basic group or channel together with the capabilities the
/// current account has in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    id: PeerId,
    name: String,
    kind: PeerKind,
    #[serde(default)]
    pinned_message_id: Option<MsgId>,
}

fn default_true() -> bool {
    true
}

impl Peer {
    /// Creates a peer.
    #[must_use]
    pub fn new(id: impl Into<PeerId>, name: impl Into<String>, kind: PeerKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            pinned_message_id: None,
        }
    }

    /// Creates an ordinary user.
    #[must_use]
    pub fn user(id: impl Into<PeerId>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            PeerKind::User(UserInfo {
                can_pin_messages: true,
                ..UserInfo::default()
            }),
        )
    }

    /// Sets the pinned message.
    #[must_use]
    pub const fn with_pinned_message(mut self, id: MsgId) -> Self {
        self.pinned_message_id = Some(id);
        self
    }

    /// Returns the peer id.
    #[must_use]
    pub const fn id(&self) -> PeerId {
        self.id
    }

    /// Returns the full display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first word of the name, as used in chat list previews.
    #[must_use]
    pub fn short_name(&self) -> &str {
        match &self.kind {
            PeerKind::User(_) => self.name.split_whitespace().next().unwrap_or(&self.name),
            PeerKind::Chat(_) | PeerKind::Channel(_) => &self.name,
        }
    }

    /// Returns the peer kind.
    #[must_use]
    pub const fn kind(&self) -> &PeerKind {
        &self.kind
    }

    /// Returns the pinned message id.
    #[must_use]
    pub const fn pinned_message_id(&self) -> Option<MsgId> {
        self.pinned_message_id
    }

    /// Updates the pinned message id.
    pub fn set_pinned_message_id(&mut self, id: Option<MsgId>) {
        self.pinned_message_id = id;
    }

    /// Records that a basic group was upgraded to a supergroup.
    pub fn set_migrated_to(&mut self, channel: PeerId) {
        if let PeerKind::Chat(chat) = &mut self.kind {
            chat.migrated_to = Some(channel);
        }
    }

    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.kind, PeerKind::User(_))
    }

    #[must_use]
    pub const fn is_chat(&self) -> bool {
        matches!(self.kind, PeerKind::Chat(_))
    }

    #[must_use]
    pub const fn is_channel(&self) -> bool {
        matches!(self.kind, PeerKind::Channel(_))
    }

    /// Returns true for the current account's own saved-messages chat.
    #[must_use]
    pub const fn is_self(&self) -> bool {
        matches!(&self.kind, PeerKind::User(user) if user.is_self)
    }

    #[must_use]
    pub const fn is_bot(&self) -> bool {
        matches!(&self.kind, PeerKind::User(user) if user.bot)
    }

    #[must_use]
    pub const fn is_support(&self) -> bool {
        matches!(&self.kind, PeerKind::User(user) if user.support)
    }

    #[must_use]
    pub const fn is_megagroup(&self) -> bool {
        matches!(&self.kind, PeerKind::Channel(channel) if channel.megagroup)
    }

    /// Returns true for a broadcast channel (not a supergroup).
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        matches!(&self.kind, PeerKind::Channel(channel) if !channel.megagroup)
    }

    /// Returns the supergroup a basic group was upgraded to.
    #[must_use]
    pub const fn migrate_to(&self) -> Option<PeerId> {
        match &self.kind {
            PeerKind::Chat(chat) => chat.migrated_to,
            _ => None,
        }
    }

    /// Returns true if the current account created this basic group.
    #[must_use]
    pub const fn am_creator(&self) -> bool {
        match &self.kind {
            PeerKind::Chat(ChatInfo { creator, .. })
            | PeerKind::Channel(ChannelInfo { creator, .. }) => *creator,
            PeerKind::User(_) => false,
        }
    }

    /// Returns the admin rights held here.
    #[must_use]
    pub const fn admin_rights(&self) -> AdminRights {
        match &self.kind {
            PeerKind::Chat(chat) => chat.admin_rights,
            PeerKind::Channel(channel) => channel.admin_rights,
            PeerKind::User(_) => AdminRights::empty(),
        }
    }

    fn has_right(&self, right: AdminRights) -> bool {
        self.am_creator() || self.admin_rights().contains(right)
    }

    /// Returns true if messages can be pinned in this conversation.
    #[must_use]
    pub fn can_pin_messages(&self) -> bool {
        match &self.kind {
            PeerKind::User(user) => user.can_pin_messages,
            PeerKind::Chat(_) => self.has_right(AdminRights::PIN_MESSAGES),
            PeerKind::Channel(channel) if channel.megagroup => {
                self.has_right(AdminRights::PIN_MESSAGES)
            }
            PeerKind::Channel(_) => self.has_right(AdminRights::EDIT_MESSAGES),
        }
    }

    /// Returns true if other members' messages can be deleted here.
    #[must_use]
    pub fn can_delete_messages(&self) -> bool {
        match &self.kind {
            PeerKind::User(_) => false,
            PeerKind::Chat(_) | PeerKind::Channel(_) => {
                self.has_right(AdminRights::DELETE_MESSAGES)
            }
        }
    }

    /// Returns true if channel posts by others can be edited.
    #[must_use]
    pub fn can_edit_messages(&self) -> bool {
        self.is_channel() && self.has_right(AdminRights::EDIT_MESSAGES)
    }

    /// Returns true if the account can post to a broadcast channel.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        match &self.kind {
            PeerKind::Channel(channel) if !channel.megagroup => {
                self.has_right(AdminRights::POST_MESSAGES)
            }
            PeerKind::Channel(_) => self.can_write(),
            _ => false,
        }
    }

    /// Returns true if the account can send messages here.
    #[must_use]
    pub fn can_write(&self) -> bool {
        match &self.kind {
            PeerKind::User(_) => true,
            PeerKind::Chat(chat) => chat.migrated_to.is_none(),
            PeerKind::Channel(channel) if channel.megagroup => {
                self.am_creator()
                    || !self.admin_rights().is_empty()
                    || (channel.member && !channel.send_restricted)
            }
            PeerKind::Channel(_) => self.can_publish(),
        }
    }

    /// Returns true if the account can ban or restrict `user` here.
    #[must_use]
    pub fn can_restrict_user(&self, user: &Self) -> bool {
        if !self.is_channel() || !user.is_user() || user.is_self() {
            return false;
        }
        self.has_right(AdminRights::BAN_USERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(megagroup: bool, rights: AdminRights) -> Peer {
        Peer::new(
            10_u64,
            "News",
            PeerKind::Channel(ChannelInfo {
                megagroup,
                admin_rights: rights,
                member: true,
                ..ChannelInfo::default()
            }),
        )
    }

    #[test]
    fn test_short_name_uses_first_word_for_users() {
        let user = Peer::user(1_u64, "Ada Lovelace");
        assert_eq!(user.short_name(), "Ada");
        let group = Peer::new(2_u64, "Rust Club", PeerKind::Chat(ChatInfo::default()));
        assert_eq!(group.short_name(), "Rust Club");
    }

    #[test]
    fn test_broadcast_publish_requires_post_right() {
        assert!(!channel(false, AdminRights::empty()).can_publish());
        assert!(channel(false, AdminRights::POST_MESSAGES).can_publish());
        assert!(channel(false, AdminRights::POST_MESSAGES).can_write());
    }

    #[test]
    fn test_megagroup_member_can_write() {
        let group = channel(true, AdminRights::empty());
        assert!(group.can_write());
        assert!(group.can_publish());
        assert!(!group.can_delete_messages());
    }

    #[test]
    fn test_chat_creator_has_every_right() {
        let chat = Peer::new(
            3_u64,
            "Team",
            PeerKind::Chat(ChatInfo {
                creator: true,
                ..ChatInfo::default()
            }),
        );
        assert!(chat.can_delete_messages());
        assert!(chat.can_pin_messages());
    }

    #[test]
    fn test_restrict_user_requires_ban_right() {
        let member = Peer::user(5_u64, "Bob");
        assert!(!channel(true, AdminRights::empty()).can_restrict_user(&member));
        assert!(channel(true, AdminRights::BAN_USERS).can_restrict_user(&member));
    }

    #[test]
    fn test_migrate_to() {
        let mut chat = Peer::new(3_u64, "Old", PeerKind::Chat(ChatInfo::default()));
        assert!(chat.migrate_to().is_none());
        chat.set_migrated_to(PeerId(99));
        assert_eq!(chat.migrate_to(), Some(PeerId(99)));
        assert!(!chat.can_write());
    }
}
