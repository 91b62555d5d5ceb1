//! Server-to-client events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DisplayTime, TypingStatus};

/// Server-assigned room identifier (a UUID string on the reference server).
pub type RoomId = String;

/// Server-assigned peer identifier.
pub type PeerId = String;

/// Another participant, as described by the server.
///
/// `id` is the identity. Two peers may share a `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    /// Stable peer identifier
    pub id: PeerId,
    /// Display name
    pub name: String,
}

impl Peer {
    /// Create a peer.
    pub fn new(id: impl Into<PeerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Room listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier used by `join`
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Number of users currently in the room
    #[serde(rename = "connectedClients")]
    pub connected_count: u32,
    /// Room capacity
    #[serde(rename = "maxClients")]
    pub max_count: u32,
}

/// A chat message as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Server message id, if the server sent one
    pub id: Option<String>,
    /// Author
    pub sender: Peer,
    /// Message text
    pub body: String,
    /// Creation instant (UTC)
    pub created_at: DateTime<Utc>,
    /// `HH:MM` / `HH:MM:SS` rendering of `created_at`
    pub time: DisplayTime,
}

/// Error codes the server reports in `error` frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerErrorCode {
    /// Display name already in use in the room
    NameTaken,
    /// Display name rejected by the server
    InvalidName,
    /// Room command sent without having joined a room
    NotJoined,
    /// Message body rejected by the server
    InvalidMessageBody,
    /// Code this client does not know
    Other(String),
}

impl ServerErrorCode {
    /// Map a wire code to a known variant.
    pub fn from_code(code: &str) -> Self {
        match code {
            "name-taken" => Self::NameTaken,
            "invalid-name" => Self::InvalidName,
            "not-joined" => Self::NotJoined,
            "invalid-message-body" => Self::InvalidMessageBody,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Wire code for this error.
    pub fn as_code(&self) -> &str {
        match self {
            Self::NameTaken => "name-taken",
            Self::InvalidName => "invalid-name",
            Self::NotJoined => "not-joined",
            Self::InvalidMessageBody => "invalid-message-body",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ServerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Full room listing. Replaces any previous listing.
    RoomsUpdated {
        /// Rooms in server order
        rooms: Vec<Room>,
    },

    /// The local user entered a room.
    Joined {
        /// The local user as the server sees them, when provided
        me: Option<Peer>,
        /// Other users in the room (may still include the local user)
        peers: Vec<Peer>,
        /// Users currently typing
        typing: Vec<Peer>,
        /// Room history, oldest first
        history: Vec<ChatMessage>,
    },

    /// Another user entered the current room.
    PeerJoined {
        /// The new peer
        peer: Peer,
    },

    /// A user left the current room.
    PeerLeft {
        /// The departing peer (name carried so it can be shown even if unknown)
        peer: Peer,
    },

    /// A message was posted to the current room (including the local user's
    /// own, echoed back).
    MessagePosted(ChatMessage),

    /// A peer started or stopped typing.
    PeerTypingChanged {
        /// The peer
        peer: Peer,
        /// `true` on start, `false` on stop
        started: bool,
    },

    /// The server rejected a request.
    ServerError {
        /// Reported error
        code: ServerErrorCode,
    },

    /// Frame with a `type` this client does not understand.
    Unrecognized {
        /// The unknown `type` value
        kind: String,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRooms {
    pub rooms: Vec<Room>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireJoined {
    #[serde(default)]
    pub user: Option<Peer>,
    pub others: Vec<Peer>,
    #[serde(default)]
    pub typing: Vec<Peer>,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub user: Peer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePosted {
    pub message: WireMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub user: Peer,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<WireMessage> for ChatMessage {
    fn from(wire: WireMessage) -> Self {
        Self {
            id: wire.id,
            sender: wire.user,
            body: wire.body,
            time: DisplayTime::from_utc(wire.created_at),
            created_at: wire.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTyping {
    pub status: TypingStatus,
    pub user: Peer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_server_error_codes_round_trip() {
        for code in ["name-taken", "invalid-name", "not-joined", "invalid-message-body"] {
            assert_eq!(ServerErrorCode::from_code(code).as_code(), code);
        }
    }

    #[test]
    fn unknown_server_error_code_is_preserved() {
        let code = ServerErrorCode::from_code("room-full");
        assert_eq!(code, ServerErrorCode::Other("room-full".into()));
        assert_eq!(code.to_string(), "room-full");
    }
}
