use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Peer, PeerId};
use crate::domain::ports::PeerDirectory;

/// Shared peer lookup table filled from wire payloads.
#[derive(Debug, Clone)]
pub struct PeerCache {
    inner: Arc<RwLock<PeerCacheInner>>,
}

#[derive(Debug, Default)]
struct PeerCacheInner {
    peers: HashMap<PeerId, Peer>,
}

impl PeerCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PeerCacheInner::default())),
        }
    }

    pub fn insert(&self, peer: Peer) {
        self.inner.write().peers.insert(peer.id(), peer);
    }

    pub fn extend(&self, peers: impl IntoIterator<Item = Peer>) {
        let mut inner = self.inner.write();
        for peer in peers {
            inner.peers.insert(peer.id(), peer);
        }
    }

    #[must_use]
    pub fn get(&self, id: PeerId) -> Option<Peer> {
        self.inner.read().peers.get(&id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: PeerId) -> bool {
        self.inner.read().peers.contains_key(&id)
    }

    pub fn remove(&self, id: PeerId) {
        self.inner.write().peers.remove(&id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PeerCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerDirectory for PeerCache {
    fn peer(&self, id: PeerId) -> Option<Peer> {
        self.get(id)
    }
}
