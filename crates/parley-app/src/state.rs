//! Observable session state.
//!
//! [`SessionSnapshot`] is the view model handed to renderers. It is a plain
//! owned copy of what the client knows, so a renderer can hold on to it for
//! as long as it likes without blocking the runtime.

use parley_client::{
    ChatEvent, Client, ConnectionState, Peer, PeerId, Room, RoomId, ServerErrorCode,
    SessionIdentity, SessionPhase,
};

/// Immutable copy of session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Session lifecycle phase
    pub phase: SessionPhase,
    /// Connection lifecycle state
    pub connection: ConnectionState,
    /// Local user, while logged in
    pub identity: Option<SessionIdentity>,
    /// Server-assigned id of the local user, once known
    pub self_id: Option<PeerId>,
    /// Room list in server order
    pub rooms: Vec<Room>,
    /// Room currently joined
    pub room: Option<RoomId>,
    /// Other users in the room, in arrival order
    pub roster: Vec<Peer>,
    /// Other users currently typing
    pub typing: Vec<Peer>,
    /// Names of `typing`, for display
    pub typing_names: Vec<String>,
    /// Room transcript, oldest first
    pub transcript: Vec<ChatEvent>,
    /// Most recent server-reported error
    pub last_error: Option<ServerErrorCode>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::from_client(&Client::new())
    }
}

impl SessionSnapshot {
    /// Copy the observable state out of a client.
    pub fn from_client(client: &Client) -> Self {
        Self {
            phase: client.phase(),
            connection: client.connection(),
            identity: client.identity().cloned(),
            self_id: client.self_id().map(str::to_string),
            rooms: client.rooms().to_vec(),
            room: client.room().map(str::to_string),
            roster: client.roster().as_slice().to_vec(),
            typing: client.typing().as_slice().to_vec(),
            typing_names: client.typing().names(),
            transcript: client.transcript().events().to_vec(),
            last_error: client.last_error().cloned(),
        }
    }

    /// Whether frames can currently be sent.
    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    /// Display name of the local user, if logged in.
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.display_name.as_str())
    }
}
