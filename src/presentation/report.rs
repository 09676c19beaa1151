//! Plain-text report of a conversation: one line per message.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::domain::entities::{HistoryEvent, HistoryItem, HistorySettings, TimeId};
use crate::domain::{DrawInDialog, History, PeerDirectory};

/// Renders messages together with the rules evaluated for them.
pub struct ReportRenderer<'a> {
    peers: &'a dyn PeerDirectory,
    settings: &'a HistorySettings,
    now: TimeId,
    draw: DrawInDialog,
    timestamp_format: &'a str,
}

impl<'a> ReportRenderer<'a> {
    #[must_use]
    pub const fn new(
        peers: &'a dyn PeerDirectory,
        settings: &'a HistorySettings,
        now: TimeId,
        timestamp_format: &'a str,
    ) -> Self {
        Self {
            peers,
            settings,
            now,
            draw: DrawInDialog::Normal,
            timestamp_format,
        }
    }

    #[must_use]
    pub const fn with_draw(mut self, draw: DrawInDialog) -> Self {
        self.draw = draw;
        self
    }

    /// Renders every message of `history` in insertion order, under a header line.
    #[must_use]
    pub fn render(&self, history: &History) -> Vec<String> {
        let mut lines = Vec::with_capacity(history.len() + 1);
        lines.push(format!(
            "# {} ({}) messages={} unread_mentions={}",
            history.peer().name(),
            history.id(),
            history.len(),
            history.unread_mentions().len()
        ));
        lines.extend(history.items().map(|item| self.render_item(history, item)));
        lines
    }

    /// Renders one message.
    #[must_use]
    pub fn render_item(&self, history: &History, item: &HistoryItem) -> String {
        let mut line = format!(
            "{:>10} {} {:<11} {:<7}",
            item.id(),
            self.timestamp(item.date_time()),
            item.kind().label(),
            item.send_state()
        );

        let mut marks = Vec::new();
        if item.unread(history) {
            marks.push("unread");
        }
        if item.is_unread_mention(self.settings) {
            marks.push("mention");
        }
        if item.is_unread_media(history, self.settings, self.now) {
            marks.push("media");
        }
        if !marks.is_empty() {
            let _ = write!(line, " <{}>", marks.join(","));
        }

        let permissions = self.permissions(history, item);
        let _ = write!(line, " [{}]", permissions.join(","));
        let _ = write!(
            line,
            " {:?} | {:?}",
            item.notification_text(),
            item.in_dialogs_text(history, self.peers, self.draw)
        );
        line
    }

    fn permissions(&self, history: &History, item: &HistoryItem) -> Vec<&'static str> {
        let checks = [
            ("pin", item.can_pin(history)),
            ("edit", item.can_edit(history, self.settings, self.now)),
            ("fwd", item.can_forward()),
            ("del", item.can_delete(history)),
            (
                "revoke",
                item.can_delete_for_everyone(history, self.settings, self.now),
            ),
            ("stop", item.can_stop_poll(history)),
            ("report", item.suggest_report(history)),
            ("ban", item.suggest_ban_report(history, self.peers)),
            ("purge", item.suggest_delete_all_report(history, self.peers)),
            ("link", item.has_direct_link(history)),
        ];
        checks
            .into_iter()
            .filter_map(|(name, allowed)| allowed.then_some(name))
            .collect()
    }

    fn timestamp(&self, date: DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(self.timestamp_format)).is_err() {
            return date.timestamp().to_string();
        }
        out
    }
}

/// Renders conversation events, one per line.
#[must_use]
pub fn render_events(events: &[HistoryEvent]) -> Vec<String> {
    events.iter().map(|event| format!("event: {event}")).collect()
}
