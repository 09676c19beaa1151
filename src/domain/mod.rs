//! Domain layer: messages, conversations, the rules over them and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Permission, read-state and summary rules.
pub mod services;

pub use entities::{History, HistoryItem, HistorySettings, MsgId, Peer, PeerId};
pub use errors::HistoryError;
pub use ports::PeerDirectory;
pub use services::{DrawInDialog, SendOutcome};
