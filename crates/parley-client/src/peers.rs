//! Id-keyed peer collections.
//!
//! The roster and the typing set have the same shape: a set of peers keyed by
//! id that remembers insertion order so names can be listed in the order
//! people arrived. Rooms hold a handful of users, so lookups scan.

use parley_proto::Peer;

/// Insertion-ordered set of peers, keyed by [`Peer::id`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerSet {
    peers: Vec<Peer>,
}

/// Users in the current room, excluding the local user.
pub type Roster = PeerSet;

/// Users currently typing in the current room, excluding the local user.
pub type TypingSet = PeerSet;

impl PeerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer. Returns `false` (and keeps the existing entry) if a peer
    /// with the same id is already present.
    pub fn insert(&mut self, peer: Peer) -> bool {
        if self.contains(&peer.id) {
            return false;
        }
        self.peers.push(peer);
        true
    }

    /// Remove the peer with this id, if present.
    pub fn remove(&mut self, id: &str) -> Option<Peer> {
        let index = self.peers.iter().position(|p| p.id == id)?;
        Some(self.peers.remove(index))
    }

    /// Whether a peer with this id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.peers.iter().any(|p| p.id == id)
    }

    /// Replace the contents, dropping duplicate ids.
    pub fn replace(&mut self, peers: impl IntoIterator<Item = Peer>) {
        self.peers.clear();
        for peer in peers {
            self.insert(peer);
        }
    }

    /// Remove everyone.
    pub fn clear(&mut self) {
        self.peers.clear();
    }

    /// Peers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    /// Display names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.peers.iter().map(|p| p.name.clone()).collect()
    }

    /// Peers as a slice.
    pub fn as_slice(&self) -> &[Peer] {
        &self.peers
    }

    /// Number of peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
