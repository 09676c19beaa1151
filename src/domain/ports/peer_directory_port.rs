//! Peer lookup port.

use crate::domain::entities::{Peer, PeerId};

/// Resolves peer ids referenced by messages.
#[cfg_attr(test, mockall::automock)]
pub trait PeerDirectory: Send + Sync {
    /// Returns the peer with the given id, if known.
    fn peer(&self, id: PeerId) -> Option<Peer>;
}
