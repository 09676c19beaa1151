//! Domain rules evaluated over messages and their conversations.

mod permissions;
mod read_state;
mod reconciliation;
mod summary;

pub use reconciliation::SendOutcome;
pub use summary::{DrawInDialog, NOTIFICATION_TEXT_LIMIT};
