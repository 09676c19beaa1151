//! Bot keyboards attached to messages.

use serde::{Deserialize, Serialize};

use super::MsgId;

bitflags::bitflags! {
    /// Keyboard markup options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ReplyMarkupFlags: u32 {
        const RESIZE = 1 << 0;
        const SINGLE_USE = 1 << 1;
        const SELECTIVE = 1 << 2;
        const FORCE_REPLY = 1 << 16;
        const HIDE = 1 << 17;
        const INLINE = 1 << 18;
        const ZERO = 1 << 19;
    }
}

/// What pressing a keyboard button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ButtonKind {
    Default,
    Url { url: String },
    Callback { data: Vec<u8> },
    SwitchInline { query: String },
    Game,
    Buy,
    RequestPhone,
    RequestLocation,
}

/// One keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct KeyboardButton {
    pub text: String,
    pub kind: ButtonKind,
}

/// Callback request a pressed inline button sends to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ButtonCallback<'a> {
    pub message_id: MsgId,
    pub data: &'a [u8],
}

/// Keyboard markup of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMarkup {
    flags: ReplyMarkupFlags,
    rows: Vec<Vec<KeyboardButton>>,
    message_id: MsgId,
}

impl ReplyMarkup {
    /// Creates markup bound to the message with `message_id`.
    #[must_use]
    pub fn new(flags: ReplyMarkupFlags, rows: Vec<Vec<KeyboardButton>>, message_id: MsgId) -> Self {
        Self {
            flags,
            rows,
            message_id,
        }
    }

    #[must_use]
    pub const fn flags(&self) -> ReplyMarkupFlags {
        self.flags
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<KeyboardButton>] {
        &self.rows
    }

    /// Returns true for keyboards shown under the message itself.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.flags.contains(ReplyMarkupFlags::INLINE)
    }

    /// Message the button callbacks are addressed to.
    #[must_use]
    pub const fn message_id(&self) -> MsgId {
        self.message_id
    }

    /// Rebinds button callbacks after the message id changed.
    pub fn update_message_id(&mut self, message_id: MsgId) {
        self.message_id = message_id;
    }

    /// Returns the callback a button at (`row`, `column`) would send.
    #[must_use]
    pub fn callback(&self, row: usize, column: usize) -> Option<ButtonCallback<'_>> {
        match &self.rows.get(row)?.get(column)?.kind {
            ButtonKind::Callback { data } => Some(ButtonCallback {
                message_id: self.message_id,
                data,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_follows_message_id() {
        let mut markup = ReplyMarkup::new(
            ReplyMarkupFlags::INLINE,
            vec![vec![KeyboardButton {
                text: "Vote".to_string(),
                kind: ButtonKind::Callback {
                    data: b"up".to_vec(),
                },
            }]],
            MsgId(-5),
        );
        assert_eq!(markup.callback(0, 0).map(|c| c.message_id), Some(MsgId(-5)));

        markup.update_message_id(MsgId(9001));
        let callback = markup.callback(0, 0).expect("callback button");
        assert_eq!(callback.message_id, MsgId(9001));
        assert_eq!(callback.data, b"up");
        assert!(markup.callback(1, 0).is_none());
    }
}
