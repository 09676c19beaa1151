//! Rich text with inline entities.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker appended to text cut down to a character budget.
pub const ELLIPSIS: &str = "...";

/// Inline formatting or link kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EntityKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Pre,
    Url,
    TextUrl { url: String },
    Email,
    Mention,
    MentionName { user_id: u64 },
    Hashtag,
    BotCommand,
}

impl EntityKind {
    /// Returns true for entities that point somewhere outside the chat.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self, Self::Url | Self::TextUrl { .. } | Self::Email)
    }
}

/// A single entity spanning `length` characters from `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TextEntity {
    #[serde(flatten)]
    pub kind: EntityKind,
    pub offset: usize,
    pub length: usize,
}

impl TextEntity {
    /// Creates an entity.
    #[must_use]
    pub const fn new(kind: EntityKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }
}

/// Message body text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextWithEntities {
    /// Plain text.
    pub text: String,
    /// Formatting spans, in character offsets.
    #[serde(default)]
    pub entities: Vec<TextEntity>,
}

impl TextWithEntities {
    /// Creates text without entities.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: Vec::new(),
        }
    }

    /// Creates text with the given entities.
    #[must_use]
    pub fn with_entities(text: impl Into<String>, entities: Vec<TextEntity>) -> Self {
        Self {
            text: text.into(),
            entities,
        }
    }

    /// Returns true when there is no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts an italic span covering the whole text before other entities.
    pub fn italicize(&mut self) {
        let length = self.char_len();
        self.entities
            .insert(0, TextEntity::new(EntityKind::Italic, 0, length));
    }

    /// Detects bare URLs and adds `Url` entities for them.
    pub fn parse_links(&mut self) {
        static URL_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"https?://\S+").expect("Invalid regex"));

        let mut found = Vec::new();
        for m in URL_RE.find_iter(&self.text) {
            let link = m.as_str().trim_end_matches(['.', ',', ')', '!', '?']);
            let offset = self.text[..m.start()].chars().count();
            let exists = self
                .entities
                .iter()
                .any(|e| e.kind.is_link() && e.offset == offset);
            if !exists {
                found.push(TextEntity::new(EntityKind::Url, offset, link.chars().count()));
            }
        }
        self.entities.extend(found);
    }

    /// Returns true if any entity is a link.
    #[must_use]
    pub fn has_links(&self) -> bool {
        self.entities.iter().any(|e| e.kind.is_link())
    }
}

impl From<&str> for TextWithEntities {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

/// Cuts `text` to `limit` characters, appending [`ELLIPSIS`] when anything was dropped.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((byte_end, _)) => format!("{}{ELLIPSIS}", &text[..byte_end]),
    }
}

/// Collapses whitespace runs (including newlines) to single spaces.
#[must_use]
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        let text = "a".repeat(200);
        assert_eq!(truncate_with_ellipsis(&text, 255), text);
    }

    #[test]
    fn test_truncate_exact_limit_is_unchanged() {
        let text = "b".repeat(255);
        assert_eq!(truncate_with_ellipsis(&text, 255), text);
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "c".repeat(300);
        let result = truncate_with_ellipsis(&text, 255);
        assert_eq!(result.chars().count(), 258);
        assert!(result.ends_with(ELLIPSIS));
        assert!(result.starts_with(&"c".repeat(255)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(truncate_with_ellipsis(&text, 4), "éééé...");
    }

    #[test]
    fn test_italicize_covers_whole_text() {
        let mut text = TextWithEntities::plain("héllo");
        text.italicize();
        assert_eq!(text.entities[0], TextEntity::new(EntityKind::Italic, 0, 5));
    }

    #[test]
    fn test_parse_links() {
        let mut text = TextWithEntities::plain("get it from https://example.org.");
        text.parse_links();
        assert!(text.has_links());
        assert_eq!(text.entities[0].offset, 12);
        assert_eq!(text.entities[0].length, 19);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("one\ntwo   three"), "one two three");
    }
}
