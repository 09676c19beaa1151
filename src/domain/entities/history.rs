//! A conversation and the messages it owns.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use tracing::{debug, debug_span, info, warn};

use super::{
    GroupId, HistoryEvent, HistoryItem, HistorySettings, Media, MessageFlags, MsgId, Peer, PeerId,
    PeerUpdate, ReplyMarkup, SharedMediaTypes, TextWithEntities, TimeId,
};
use crate::domain::errors::HistoryError;

/// Text of the notice left after the conversation history was cleared.
pub const HISTORY_CLEARED_TEXT: &str = "History was cleared";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct ItemKey(u64);

/// New content applied to an existing message.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct ItemEdit {
    pub text: TextWithEntities,
    pub media: Option<Media>,
    pub reply_markup: Option<ReplyMarkup>,
    pub edit_date: Option<TimeId>,
}

/// A conversation: owns its messages and the indexes over them.
#[derive(Debug)]
pub struct History {
    peer: Peer,
    items: BTreeMap<ItemKey, HistoryItem>,
    next_key: u64,
    ids: HashMap<MsgId, ItemKey>,
    local_messages: BTreeMap<MsgId, ItemKey>,
    groups: HashMap<GroupId, Vec<ItemKey>>,
    unread_mentions: BTreeSet<MsgId>,
    shared_media: BTreeMap<MsgId, SharedMediaTypes>,
    inbox_read_before: MsgId,
    outbox_read_before: MsgId,
    events: VecDeque<HistoryEvent>,
    delayed_events: VecDeque<HistoryEvent>,
}

impl History {
    /// Creates an empty conversation with `peer`.
    #[must_use]
    pub fn new(peer: Peer) -> Self {
        Self {
            peer,
            items: BTreeMap::new(),
            next_key: 0,
            ids: HashMap::new(),
            local_messages: BTreeMap::new(),
            groups: HashMap::new(),
            unread_mentions: BTreeSet::new(),
            shared_media: BTreeMap::new(),
            inbox_read_before: MsgId(1),
            outbox_read_before: MsgId(1),
            events: VecDeque::new(),
            delayed_events: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PeerId {
        self.peer.id()
    }

    #[must_use]
    pub const fn peer(&self) -> &Peer {
        &self.peer
    }

    pub fn peer_mut(&mut self) -> &mut Peer {
        &mut self.peer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Messages in the order they were added.
    pub fn items(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.values()
    }

    #[must_use]
    pub fn item(&self, id: MsgId) -> Option<&HistoryItem> {
        self.ids.get(&id).and_then(|key| self.items.get(key))
    }

    fn key_of(&self, id: MsgId) -> Result<ItemKey, HistoryError> {
        self.ids
            .get(&id)
            .copied()
            .ok_or(HistoryError::MessageNotFound { id })
    }

    fn item_by_key_mut(&mut self, key: ItemKey) -> &mut HistoryItem {
        self.items
            .get_mut(&key)
            .unwrap_or_else(|| panic!("id index points at a removed item {key:?}"))
    }

    fn push_event(&mut self, event: HistoryEvent) {
        self.events.push_back(event);
    }

    /// Takes ownership of a message and registers its identity.
    ///
    /// Provisional ids are also entered into the local-message index.
    ///
    /// # Errors
    /// Returns an error if the message belongs to another conversation or its
    /// id is already taken.
    pub fn add_item(&mut self, item: HistoryItem) -> Result<MsgId, HistoryError> {
        let id = item.id();
        if item.history_id() != self.id() {
            return Err(HistoryError::ForeignMessage {
                id,
                expected: self.id(),
                actual: item.history_id(),
            });
        }
        if self.ids.contains_key(&id) {
            return Err(HistoryError::DuplicateMessage { id });
        }

        let key = ItemKey(self.next_key);
        self.next_key += 1;
        if id.is_local() {
            self.local_messages.insert(id, key);
        }
        self.ids.insert(id, key);
        self.items.insert(key, item);
        debug!(peer = %self.id(), id = %id, local = id.is_local(), "Message registered");
        self.push_event(HistoryEvent::ItemAdded(id));
        Ok(id)
    }

    /// Ids currently in the local-message index.
    pub fn local_message_ids(&self) -> impl Iterator<Item = MsgId> + '_ {
        self.local_messages.keys().copied()
    }

    /// Returns true if `id` is in the local-message index.
    #[must_use]
    pub fn is_local_registered(&self, id: MsgId) -> bool {
        self.local_messages.contains_key(&id)
    }

    /// Marks everything up to and including `id` as read by the current account.
    pub fn set_inbox_read_till(&mut self, id: MsgId) {
        self.inbox_read_before = self.inbox_read_before.max(MsgId(id.0.saturating_add(1)));
    }

    /// Marks everything up to and including `id` as read by the other side.
    pub fn set_outbox_read_till(&mut self, id: MsgId) {
        self.outbox_read_before = self.outbox_read_before.max(MsgId(id.0.saturating_add(1)));
    }

    /// Returns true if the server read position has not passed `item` yet.
    ///
    /// # Panics
    /// Panics if `item` does not have a server id.
    #[must_use]
    pub fn is_server_side_unread(&self, item: &HistoryItem) -> bool {
        assert!(
            item.id().is_server(),
            "server read state queried for provisional message {}",
            item.id()
        );
        if item.out() {
            item.id() >= self.outbox_read_before
        } else {
            item.id() >= self.inbox_read_before
        }
    }

    /// Adds a message to an album.
    ///
    /// # Errors
    /// Returns an error if the message is unknown.
    ///
    /// # Panics
    /// Panics if the message already belongs to an album.
    pub fn set_group_id(&mut self, id: MsgId, group_id: GroupId) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        self.item_by_key_mut(key).assign_group_id(group_id);
        let members = self.groups.entry(group_id).or_default();
        members.push(key);
        members.sort_unstable();
        debug!(id = %id, group = group_id.0, size = members.len(), "Message grouped");
        Ok(())
    }

    /// Album members in display order; the last one is the leader.
    #[must_use]
    pub fn group_items(&self, group_id: GroupId) -> Vec<MsgId> {
        self.groups.get(&group_id).map_or_else(Vec::new, |keys| {
            keys.iter()
                .filter_map(|key| self.items.get(key).map(HistoryItem::id))
                .collect()
        })
    }

    /// Album leader, which carries the caption and the chat-list entry.
    #[must_use]
    pub fn group_leader(&self, group_id: GroupId) -> Option<MsgId> {
        self.groups
            .get(&group_id)
            .and_then(|keys| keys.last())
            .and_then(|key| self.items.get(key))
            .map(HistoryItem::id)
    }

    /// Promotes a provisional message to the id assigned by the server.
    ///
    /// # Errors
    /// Returns an error if no message has `old_id`, or `new_id` is taken.
    ///
    /// # Panics
    /// Panics unless the message is provisional: pending send with a local id.
    pub fn set_real_id(&mut self, old_id: MsgId, new_id: MsgId) -> Result<(), HistoryError> {
        let key = self.key_of(old_id)?;
        if old_id != new_id && self.ids.contains_key(&new_id) {
            return Err(HistoryError::DuplicateMessage { id: new_id });
        }
        let item = self.item_by_key_mut(key);
        assert!(
            item.is_sending(),
            "message {old_id} is not pending send, cannot assign id {new_id}"
        );
        assert!(old_id.is_local(), "message {old_id} already has a server id");

        item.set_id(new_id);
        item.remove_flags(MessageFlags::SENDING);

        self.ids.remove(&old_id);
        self.ids.insert(new_id, key);
        self.local_messages.remove(&old_id);
        if !new_id.is_server() {
            self.local_messages.insert(new_id, key);
        }

        info!(peer = %self.id(), old_id = %old_id, new_id = %new_id, "Message confirmed");
        self.push_event(HistoryEvent::ItemIdChanged { old_id, new_id });
        self.push_event(HistoryEvent::ItemRepaintRequested(new_id));
        Ok(())
    }

    /// Marks a pending message as failed to send.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    ///
    /// # Panics
    /// Panics unless the message is pending send and not already failed.
    pub fn send_failed(&mut self, id: MsgId) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        let item = self.item_by_key_mut(key);
        assert!(item.is_sending(), "message {id} is not pending send");
        assert!(!item.has_failed(), "message {id} already failed");

        item.insert_flags(MessageFlags::FAILED);
        item.remove_flags(MessageFlags::SENDING);

        warn!(peer = %self.id(), id = %id, "Message send failed");
        if self.peer.is_channel() {
            self.delayed_events.push_back(HistoryEvent::PeerUpdated {
                peer: self.id(),
                update: PeerUpdate::ChannelLocalMessages,
            });
        }
        Ok(())
    }

    /// Clears the unread-media mark of a message.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    pub fn mark_media_read(
        &mut self,
        id: MsgId,
        settings: &HistorySettings,
    ) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        let item = self.item_by_key_mut(key);
        item.remove_flags(MessageFlags::MEDIA_UNREAD);
        if item.mentions_me(settings) {
            self.push_event(HistoryEvent::ChatListEntryUpdated);
            if self.unread_mentions.remove(&id) {
                self.push_event(HistoryEvent::UnreadMentionRemoved(id));
            }
        }
        Ok(())
    }

    /// Clears the local unread mark of a provisional incoming message.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    pub fn mark_client_side_as_read(&mut self, id: MsgId) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        self.item_by_key_mut(key)
            .remove_flags(MessageFlags::CLIENTSIDE_UNREAD);
        Ok(())
    }

    /// Indexes a freshly received message: unread mentions and shared media.
    ///
    /// Provisional messages are skipped.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    pub fn index_as_new_item(
        &mut self,
        id: MsgId,
        settings: &HistorySettings,
    ) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        if !id.is_server() {
            return Ok(());
        }
        let span = debug_span!("add_to_unread_mentions", annotation = %id);
        let _guard = span.enter();

        let item = &self.items[&key];
        if item.is_unread_mention(settings) {
            self.unread_mentions.insert(id);
        }
        let types = item.shared_media_types();
        if !types.is_empty() {
            self.shared_media.insert(id, types);
            debug!(id = %id, types = ?types, "Shared media indexed");
        }
        Ok(())
    }

    /// Server ids of messages that mention the current account and are unread.
    #[must_use]
    pub const fn unread_mentions(&self) -> &BTreeSet<MsgId> {
        &self.unread_mentions
    }

    /// Server ids listed under a shared-media section.
    #[must_use]
    pub fn shared_media(&self, types: SharedMediaTypes) -> Vec<MsgId> {
        self.shared_media
            .iter()
            .filter(|(_, indexed)| indexed.intersects(types))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Replaces the content of a message in place after an edit.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    pub fn apply_edition(&mut self, id: MsgId, edit: ItemEdit) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        let item = self.item_by_key_mut(key);
        item.replace_content(edit.text, edit.media, edit.reply_markup, edit.edit_date);
        let now_empty = item.is_empty();
        debug!(id = %id, empty = now_empty, "Edition applied");
        if now_empty {
            self.finish_edition_to_empty(id);
        } else {
            self.finish_edition(id);
        }
        Ok(())
    }

    /// Turns a message into a "history was cleared" notice.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    pub fn apply_edition_to_history_cleared(&mut self, id: MsgId) -> Result<(), HistoryError> {
        let key = self.key_of(id)?;
        self.item_by_key_mut(key)
            .become_history_cleared(TextWithEntities::plain(HISTORY_CLEARED_TEXT));
        self.shared_media.remove(&id);
        self.unread_mentions.remove(&id);
        self.finish_edition(id);
        Ok(())
    }

    fn finish_edition(&mut self, id: MsgId) {
        self.push_event(HistoryEvent::ItemViewRefreshRequested(id));
        self.push_event(HistoryEvent::ChatListEntryInvalidated(id));
        let group_id = self.item(id).and_then(HistoryItem::group_id);
        if let Some(leader) = group_id.and_then(|group| self.group_leader(group))
            && leader != id
        {
            self.push_event(HistoryEvent::ItemViewRefreshRequested(leader));
            self.push_event(HistoryEvent::ChatListEntryInvalidated(leader));
        }
        self.push_event(HistoryEvent::DependentMessagesUpdated(id));
    }

    fn finish_edition_to_empty(&mut self, id: MsgId) {
        self.finish_edition(id);
        self.push_event(HistoryEvent::ItemVanished(id));
    }

    /// Removes a message and every index entry pointing at it.
    ///
    /// # Errors
    /// Returns an error if no message has `id`.
    pub fn destroy_item(&mut self, id: MsgId) -> Result<HistoryItem, HistoryError> {
        let key = self.key_of(id)?;
        self.ids.remove(&id);
        self.local_messages.remove(&id);
        self.unread_mentions.remove(&id);
        self.shared_media.remove(&id);
        let item = self
            .items
            .remove(&key)
            .ok_or(HistoryError::MessageNotFound { id })?;
        if let Some(group_id) = item.group_id()
            && let Some(members) = self.groups.get_mut(&group_id)
        {
            members.retain(|member| *member != key);
            if members.is_empty() {
                self.groups.remove(&group_id);
            }
        }
        if item.is_sending() && self.peer.is_channel() {
            self.delayed_events.push_back(HistoryEvent::PeerUpdated {
                peer: self.id(),
                update: PeerUpdate::ChannelLocalMessages,
            });
        }
        debug!(peer = %self.id(), id = %id, "Message destroyed");
        self.push_event(HistoryEvent::ItemRemoved(id));
        Ok(item)
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        let removed: Vec<MsgId> = self.items.values().map(HistoryItem::id).collect();
        self.items.clear();
        self.ids.clear();
        self.local_messages.clear();
        self.groups.clear();
        self.unread_mentions.clear();
        self.shared_media.clear();
        info!(peer = %self.id(), count = removed.len(), "History cleared");
        for id in removed {
            self.push_event(HistoryEvent::ItemRemoved(id));
        }
    }

    /// Drains the events emitted so far.
    pub fn take_events(&mut self) -> Vec<HistoryEvent> {
        self.events.drain(..).collect()
    }

    /// Events scheduled for delivery on the next flush.
    pub fn pending_delayed_events(&self) -> impl Iterator<Item = &HistoryEvent> {
        self.delayed_events.iter()
    }

    /// Delivers delayed events, returning them.
    pub fn flush_delayed_events(&mut self) -> Vec<HistoryEvent> {
        self.delayed_events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ChannelInfo, PeerKind};

    fn channel_history() -> History {
        History::new(Peer::new(
            100_u64,
            "News",
            PeerKind::Channel(ChannelInfo::default()),
        ))
    }

    fn pending(history: &History, id: i64) -> HistoryItem {
        HistoryItem::new(
            history.id(),
            MsgId(id),
            MessageFlags::OUT | MessageFlags::SENDING,
            1_000,
            Some(PeerId(1)),
        )
        .with_text("hello".into())
    }

    #[test]
    fn test_provisional_item_registers_in_local_index() {
        let mut history = channel_history();
        let item = pending(&history, -5);
        history.add_item(item).unwrap();
        assert!(history.is_local_registered(MsgId(-5)));

        let confirmed = HistoryItem::new(history.id(), MsgId(7), MessageFlags::empty(), 0, None)
            .with_text("x".into());
        history.add_item(confirmed).unwrap();
        assert!(!history.is_local_registered(MsgId(7)));
    }

    #[test]
    fn test_add_item_rejects_duplicates_and_foreign_items() {
        let mut history = channel_history();
        history.add_item(pending(&history, -1)).unwrap();
        assert!(matches!(
            history.add_item(pending(&history, -1)),
            Err(HistoryError::DuplicateMessage { .. })
        ));

        let foreign = HistoryItem::new(PeerId(5), MsgId(3), MessageFlags::empty(), 0, None);
        assert!(matches!(
            history.add_item(foreign),
            Err(HistoryError::ForeignMessage { .. })
        ));
    }

    #[test]
    fn test_confirm_promotes_id() {
        let mut history = channel_history();
        history.add_item(pending(&history, -5)).unwrap();
        history.take_events();

        history.set_real_id(MsgId(-5), MsgId(9001)).unwrap();

        let item = history.item(MsgId(9001)).unwrap();
        assert_eq!(item.id(), MsgId(9001));
        assert!(!item.is_sending());
        assert!(history.item(MsgId(-5)).is_none());
        assert!(!history.is_local_registered(MsgId(-5)));
        assert_eq!(
            history.take_events().first(),
            Some(&HistoryEvent::ItemIdChanged {
                old_id: MsgId(-5),
                new_id: MsgId(9001)
            })
        );
    }

    #[test]
    fn test_confirm_to_another_local_id_stays_indexed() {
        let mut history = channel_history();
        history.add_item(pending(&history, -5)).unwrap();
        history.set_real_id(MsgId(-5), MsgId(-6)).unwrap();
        assert!(history.is_local_registered(MsgId(-6)));
        assert!(!history.is_local_registered(MsgId(-5)));
    }

    #[test]
    fn test_read_till_max_id_saturates() {
        let mut history = channel_history();
        let incoming = HistoryItem::new(history.id(), MsgId(7), MessageFlags::empty(), 0, None)
            .with_text("x".into());
        history.add_item(incoming).unwrap();

        history.set_inbox_read_till(MsgId(i64::MAX));
        history.set_outbox_read_till(MsgId(i64::MAX));

        let item = history.item(MsgId(7)).unwrap();
        assert!(!history.is_server_side_unread(item));
    }

    #[test]
    #[should_panic(expected = "not pending send")]
    fn test_second_confirm_fails_fast() {
        let mut history = channel_history();
        history.add_item(pending(&history, -5)).unwrap();
        history.set_real_id(MsgId(-5), MsgId(9001)).unwrap();
        let _ = history.set_real_id(MsgId(9001), MsgId(9002));
    }

    #[test]
    #[should_panic(expected = "not pending send")]
    fn test_fail_after_confirm_fails_fast() {
        let mut history = channel_history();
        history.add_item(pending(&history, -5)).unwrap();
        history.set_real_id(MsgId(-5), MsgId(9001)).unwrap();
        let _ = history.send_failed(MsgId(9001));
    }

    #[test]
    fn test_send_failed_in_channel_schedules_update() {
        let mut history = channel_history();
        history.add_item(pending(&history, -17)).unwrap();

        history.send_failed(MsgId(-17)).unwrap();

        let item = history.item(MsgId(-17)).unwrap();
        assert_eq!(item.flags() & MessageFlags::CLIENT_ONLY, MessageFlags::FAILED);
        assert!(!item.is_sending());
        assert_eq!(
            history.pending_delayed_events().collect::<Vec<_>>(),
            vec![&HistoryEvent::PeerUpdated {
                peer: PeerId(100),
                update: PeerUpdate::ChannelLocalMessages,
            }]
        );
        assert_eq!(history.flush_delayed_events().len(), 1);
        assert_eq!(history.pending_delayed_events().count(), 0);
    }

    #[test]
    fn test_send_failed_in_private_chat_schedules_nothing() {
        let mut history = History::new(Peer::user(2_u64, "Bob"));
        history.add_item(pending(&history, -3)).unwrap();
        history.send_failed(MsgId(-3)).unwrap();
        assert_eq!(history.pending_delayed_events().count(), 0);
    }

    #[test]
    fn test_unknown_message_is_an_error() {
        let mut history = channel_history();
        assert!(matches!(
            history.send_failed(MsgId(-1)),
            Err(HistoryError::MessageNotFound { .. })
        ));
    }

    #[test]
    fn test_group_leader_is_last_member() {
        let mut history = channel_history();
        for id in [1, 2, 3] {
            let item = HistoryItem::new(history.id(), MsgId(id), MessageFlags::empty(), 0, None)
                .with_media(Some(Media::Photo { id: id as u64 }));
            history.add_item(item).unwrap();
            history.set_group_id(MsgId(id), GroupId(9)).unwrap();
        }
        assert_eq!(history.group_items(GroupId(9)), vec![MsgId(1), MsgId(2), MsgId(3)]);
        assert_eq!(history.group_leader(GroupId(9)), Some(MsgId(3)));

        history.take_events();
        history
            .apply_edition(
                MsgId(1),
                ItemEdit {
                    media: Some(Media::Photo { id: 11 }),
                    ..ItemEdit::default()
                },
            )
            .unwrap();
        assert!(
            history
                .take_events()
                .contains(&HistoryEvent::ItemViewRefreshRequested(MsgId(3)))
        );

        history.destroy_item(MsgId(3)).unwrap();
        assert_eq!(history.group_leader(GroupId(9)), Some(MsgId(2)));
    }

    #[test]
    #[should_panic(expected = "already set")]
    fn test_group_id_set_twice_fails_fast() {
        let mut history = channel_history();
        history.add_item(pending(&history, -1)).unwrap();
        history.set_group_id(MsgId(-1), GroupId(1)).unwrap();
        let _ = history.set_group_id(MsgId(-1), GroupId(2));
    }

    #[test]
    fn test_edit_to_empty_reports_vanished() {
        let mut history = channel_history();
        let item = HistoryItem::new(history.id(), MsgId(4), MessageFlags::empty(), 0, None)
            .with_text("text".into());
        history.add_item(item).unwrap();
        history.take_events();

        history.apply_edition(MsgId(4), ItemEdit::default()).unwrap();

        assert_eq!(
            history.take_events().last(),
            Some(&HistoryEvent::ItemVanished(MsgId(4)))
        );
    }

    #[test]
    fn test_history_cleared_edition() {
        let mut history = channel_history();
        let item = HistoryItem::new(history.id(), MsgId(4), MessageFlags::OUT, 0, Some(PeerId(1)))
            .with_text("text".into());
        history.add_item(item).unwrap();

        history.apply_edition_to_history_cleared(MsgId(4)).unwrap();

        let item = history.item(MsgId(4)).unwrap();
        assert!(item.is_service());
        assert_eq!(item.text().text, HISTORY_CLEARED_TEXT);
        assert!(!item.out());
        assert_eq!(item.from(), history.id());
    }

    #[test]
    fn test_read_positions() {
        let mut history = History::new(Peer::user(2_u64, "Bob"));
        let incoming = HistoryItem::new(history.id(), MsgId(10), MessageFlags::empty(), 0, None);
        assert!(history.is_server_side_unread(&incoming));
        history.set_inbox_read_till(MsgId(10));
        assert!(!history.is_server_side_unread(&incoming));
        history.set_inbox_read_till(MsgId(5));
        assert!(!history.is_server_side_unread(&incoming));
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut history = channel_history();
        history.add_item(pending(&history, -1)).unwrap();
        history.add_item(pending(&history, -2)).unwrap();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.local_message_ids().count(), 0);
    }
}
