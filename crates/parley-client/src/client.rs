//! Session state machine.
//!
//! The `Client` owns everything the local user can see: identity, room list,
//! current room, roster, typing set, transcript and draft. It is driven by
//! user intents and by decoded server frames, and it answers with commands to
//! send. Connection lifecycle is observed, never owned: the caller reports it
//! through [`ClientEvent::ConnectionChanged`].

use parley_core::ConnectionState;
use parley_proto::{
    ChatMessage, Command, InboundEvent, Peer, PeerId, Room, RoomId, ServerErrorCode, decode,
};

use crate::{
    ChatEvent, PeerSet, SessionIdentity, SessionPhase, Transcript, TypingEdge,
    error::ClientError,
    event::{ClientAction, ClientEvent},
    transcript::{entered_room_text, peer_joined_text, peer_left_text},
    typing::typing_edge,
};

/// Chat session state machine.
///
/// # Invariants
///
/// - `room` is `Some` exactly when the phase is [`SessionPhase::InRoom`], or
///   while a dropped connection is being re-established from that phase.
/// - Outside a room (`room` is `None`) the roster, typing set and transcript
///   are empty.
/// - The local user is never in the roster or the typing set. Once the
///   server has assigned an id, only that id identifies the local user;
///   before that the display name does.
/// - A failed operation leaves every field unchanged.
#[derive(Debug, Clone)]
pub struct Client {
    phase: SessionPhase,
    identity: Option<SessionIdentity>,
    /// Server-assigned id of the local user, learned from `joined`
    self_id: Option<PeerId>,
    connection: ConnectionState,
    rooms: Vec<Room>,
    /// Room the server confirmed we are in
    room: Option<RoomId>,
    /// Room the user last asked for; rejoined after a reconnect
    selected: Option<RoomId>,
    roster: PeerSet,
    typing: PeerSet,
    transcript: Transcript,
    draft: String,
    last_error: Option<ServerErrorCode>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a logged-out client.
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::LoggedOut,
            identity: None,
            self_id: None,
            connection: ConnectionState::Disconnected,
            rooms: Vec::new(),
            room: None,
            selected: None,
            roster: PeerSet::new(),
            typing: PeerSet::new(),
            transcript: Transcript::new(),
            draft: String::new(),
            last_error: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Local identity. `None` while logged out.
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    /// Server-assigned id of the local user, once known.
    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref()
    }

    /// Last connection state reported by the caller.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Room list, in server order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room the server confirmed we are in.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Room the user last asked to be in.
    pub fn selected_room(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Other users in the current room.
    pub fn roster(&self) -> &PeerSet {
        &self.roster
    }

    /// Other users currently typing in the current room.
    pub fn typing(&self) -> &PeerSet {
        &self.typing
    }

    /// Current room transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current draft.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Most recent error reported by the server.
    pub fn last_error(&self) -> Option<&ServerErrorCode> {
        self.last_error.as_ref()
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` if `Join` or `Post` arrive while the
    ///   connection is not open
    /// - `ClientError::InvalidTransition` if the event is not valid in the
    ///   current phase
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Login { name } => self.handle_login(name),
            ClientEvent::Logout => self.handle_logout(),
            ClientEvent::Join { room } => self.handle_join(room),
            ClientEvent::Leave => self.handle_leave(),
            ClientEvent::Post { body } => self.handle_post(body),
            ClientEvent::InputChanged { value } => Ok(self.handle_input_changed(value)),
            ClientEvent::JoinFailed { room } => Ok(self.handle_join_failed(&room)),
            ClientEvent::ConnectionChanged { state } => Ok(self.handle_connection_changed(state)),
            ClientEvent::FrameReceived(bytes) => Ok(self.handle_frame(&bytes)),
        }
    }

    fn handle_login(&mut self, name: String) -> Result<Vec<ClientAction>, ClientError> {
        if self.phase.is_logged_in() {
            return Err(self.invalid("login"));
        }

        self.phase =
            if self.connection.is_open() { SessionPhase::Lobby } else { SessionPhase::Connecting };
        let message = format!("logged in as {name}");
        self.identity = Some(SessionIdentity::new(name));

        Ok(vec![ClientAction::Connect, ClientAction::info(message)])
    }

    fn handle_logout(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        if !self.phase.is_logged_in() {
            return Err(self.invalid("logout"));
        }

        let connection = self.connection;
        *self = Self::new();
        self.connection = connection;

        Ok(vec![ClientAction::Disconnect, ClientAction::info("logged out")])
    }

    fn handle_join(&mut self, room: RoomId) -> Result<Vec<ClientAction>, ClientError> {
        if !self.phase.is_logged_in() {
            return Err(self.invalid("join"));
        }
        if !self.connection.is_open() {
            return Err(ClientError::NotConnected { operation: "join" });
        }

        self.selected = Some(room.clone());
        Ok(vec![self.join_command(room)])
    }

    fn handle_join_failed(&mut self, room: &str) -> Vec<ClientAction> {
        if self.selected.as_deref() != Some(room) {
            return Vec::new();
        }

        // The server never saw the request; fall back to the confirmed room.
        self.selected.clone_from(&self.room);
        vec![ClientAction::debug(format!("join {room} was not sent; not rejoining it"))]
    }

    fn handle_leave(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        if self.room.is_none() && self.selected.is_none() {
            return Err(self.invalid("leave"));
        }

        self.clear_room();

        if self.connection.is_open() {
            self.phase = SessionPhase::Lobby;
            Ok(vec![ClientAction::Send(Command::Leave)])
        } else {
            Ok(vec![ClientAction::debug("left room while disconnected; nothing sent")])
        }
    }

    fn handle_post(&mut self, body: String) -> Result<Vec<ClientAction>, ClientError> {
        if !self.connection.is_open() {
            return Err(ClientError::NotConnected { operation: "post" });
        }
        if self.phase != SessionPhase::InRoom {
            return Err(self.invalid("post"));
        }

        let sender = self.display_name().to_string();
        self.draft.clear();

        Ok(vec![
            ClientAction::Send(Command::TypingStop),
            ClientAction::Send(Command::Post { sender, body }),
        ])
    }

    fn handle_input_changed(&mut self, value: String) -> Vec<ClientAction> {
        let edge = typing_edge(&self.draft, &value);
        self.draft = value;

        if self.phase != SessionPhase::InRoom || !self.connection.is_open() {
            return Vec::new();
        }

        match edge {
            Some(TypingEdge::Started) => vec![ClientAction::Send(Command::TypingStart)],
            Some(TypingEdge::Stopped) => vec![ClientAction::Send(Command::TypingStop)],
            None => Vec::new(),
        }
    }

    fn handle_connection_changed(&mut self, state: ConnectionState) -> Vec<ClientAction> {
        let was_open = self.connection.is_open();
        self.connection = state;

        if !self.phase.is_logged_in() || was_open == state.is_open() {
            return Vec::new();
        }

        if state.is_open() {
            // The lobby shows no room until the rejoin is confirmed.
            self.phase = SessionPhase::Lobby;
            self.clear_room_view();

            return match self.selected.clone() {
                Some(room) => {
                    let message = format!("connection open; rejoining {room}");
                    vec![ClientAction::info(message), self.join_command(room)]
                },
                None => vec![ClientAction::info("connection open")],
            };
        }

        // Nobody is reliably typing across a gap. Everything else is kept
        // until the rejoin replaces it.
        self.phase = SessionPhase::Connecting;
        self.typing.clear();
        vec![ClientAction::info(format!("connection lost ({state:?})"))]
    }

    fn handle_frame(&mut self, bytes: &[u8]) -> Vec<ClientAction> {
        let event = match decode(bytes) {
            Ok(event) => event,
            Err(e) => return vec![ClientAction::warn(format!("discarding frame: {e}"))],
        };

        if !self.phase.is_logged_in() {
            return vec![ClientAction::debug(format!("discarding {event:?} while logged out"))];
        }

        match event {
            InboundEvent::RoomsUpdated { rooms } => {
                self.rooms = rooms;
                Vec::new()
            },
            InboundEvent::Joined { me, peers, typing, history } => {
                self.apply_joined(me, peers, typing, history)
            },
            InboundEvent::ServerError { code } => self.apply_server_error(code),
            InboundEvent::Unrecognized { kind } => {
                vec![ClientAction::debug(format!("ignoring unrecognized frame type {kind:?}"))]
            },
            room_event if self.phase != SessionPhase::InRoom => {
                vec![ClientAction::debug(format!("discarding {room_event:?} outside a room"))]
            },
            InboundEvent::PeerJoined { peer } => self.apply_peer_joined(peer),
            InboundEvent::PeerLeft { peer } => self.apply_peer_left(peer),
            InboundEvent::PeerTypingChanged { peer, started } => {
                self.apply_typing(peer, started);
                Vec::new()
            },
            InboundEvent::MessagePosted(message) => {
                self.transcript.push(message.into());
                Vec::new()
            },
        }
    }

    fn apply_joined(
        &mut self,
        me: Option<Peer>,
        peers: Vec<Peer>,
        typing: Vec<Peer>,
        history: Vec<ChatMessage>,
    ) -> Vec<ClientAction> {
        let Some(room) = self.selected.clone() else {
            return vec![ClientAction::warn("discarding joined with no room selected")];
        };

        if let Some(me) = me {
            self.self_id = Some(me.id);
        }

        let peers: Vec<Peer> = peers.into_iter().filter(|p| !self.is_self(p)).collect();
        let typing: Vec<Peer> = typing.into_iter().filter(|p| !self.is_self(p)).collect();

        self.roster.replace(peers);
        self.typing.replace(typing);
        self.transcript.clear();
        for message in history {
            self.transcript.push(message.into());
        }
        self.transcript.push(ChatEvent::info(entered_room_text(&self.roster.names())));
        self.draft.clear();

        self.room = Some(room.clone());
        self.phase = SessionPhase::InRoom;
        self.last_error = None;

        vec![ClientAction::info(format!("joined {room} with {} peers", self.roster.len()))]
    }

    fn apply_peer_joined(&mut self, peer: Peer) -> Vec<ClientAction> {
        if self.is_self(&peer) {
            return Vec::new();
        }

        self.transcript.push(ChatEvent::info(peer_joined_text(&peer.name)));
        self.roster.insert(peer);
        Vec::new()
    }

    fn apply_peer_left(&mut self, peer: Peer) -> Vec<ClientAction> {
        if self.is_self(&peer) {
            return Vec::new();
        }

        self.roster.remove(&peer.id);
        self.typing.remove(&peer.id);
        self.transcript.push(ChatEvent::info(peer_left_text(&peer.name)));
        Vec::new()
    }

    fn apply_typing(&mut self, peer: Peer, started: bool) {
        if self.is_self(&peer) {
            return;
        }

        if started {
            self.typing.insert(peer);
        } else {
            self.typing.remove(&peer.id);
        }
    }

    fn apply_server_error(&mut self, code: ServerErrorCode) -> Vec<ClientAction> {
        // A rejected name means the pending join failed: do not retry it on
        // reconnect.
        if matches!(code, ServerErrorCode::NameTaken | ServerErrorCode::InvalidName) {
            self.selected.clone_from(&self.room);
            if self.room.is_none() {
                self.clear_room_view();
            }
        }

        let message = format!("server rejected request: {code}");
        self.last_error = Some(code);
        vec![ClientAction::warn(message)]
    }

    fn join_command(&self, room: RoomId) -> ClientAction {
        ClientAction::Send(Command::Join { username: self.display_name().to_string(), room })
    }

    fn clear_room(&mut self) {
        self.clear_room_view();
        self.selected = None;
        self.draft.clear();
    }

    /// Forget what the current room looked like, keeping the selection.
    fn clear_room_view(&mut self) {
        self.room = None;
        self.roster.clear();
        self.typing.clear();
        self.transcript.clear();
    }

    fn display_name(&self) -> &str {
        self.identity.as_ref().map_or("", |i| i.display_name.as_str())
    }

    /// Names are only a fallback: another user may share ours.
    fn is_self(&self, peer: &Peer) -> bool {
        match &self.self_id {
            Some(id) => *id == peer.id,
            None => self.identity.as_ref().is_some_and(|i| i.display_name == peer.name),
        }
    }

    fn invalid(&self, operation: &'static str) -> ClientError {
        ClientError::InvalidTransition { phase: self.phase, operation }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn frame(json: &str) -> ClientEvent {
        ClientEvent::FrameReceived(Bytes::copy_from_slice(json.as_bytes()))
    }

    fn sent(actions: &[ClientAction]) -> Vec<Command> {
        actions
            .iter()
            .filter_map(|a| match a {
                ClientAction::Send(command) => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    fn open(state: ConnectionState) -> ClientEvent {
        ClientEvent::ConnectionChanged { state }
    }

    /// Logged in as Alice with the connection open.
    fn lobby() -> Client {
        let mut client = Client::new();
        client.handle(ClientEvent::Login { name: "Alice".into() }).unwrap();
        client.handle(open(ConnectionState::Open)).unwrap();
        client
    }

    /// In room `r1` with Bob.
    fn in_room() -> Client {
        let mut client = lobby();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client
            .handle(frame(r#"{"type":"joined","payload":{"others":[{"id":"2","name":"Bob"}],"messages":[]}}"#))
            .unwrap();
        client
    }

    #[test]
    fn login_requests_connection() {
        let mut client = Client::new();
        let actions = client.handle(ClientEvent::Login { name: "Alice".into() }).unwrap();

        assert_eq!(actions[0], ClientAction::Connect);
        assert_eq!(client.phase(), SessionPhase::Connecting);
        assert_eq!(client.identity(), Some(&SessionIdentity::new("Alice")));
    }

    #[test]
    fn double_login_is_invalid() {
        let mut client = lobby();
        let err = client.handle(ClientEvent::Login { name: "Eve".into() }).unwrap_err();
        assert!(matches!(err, ClientError::InvalidTransition { operation: "login", .. }));
        assert_eq!(client.identity(), Some(&SessionIdentity::new("Alice")));
    }

    #[test]
    fn open_moves_to_lobby() {
        let client = lobby();
        assert_eq!(client.phase(), SessionPhase::Lobby);
    }

    #[test]
    fn join_sends_username_and_room() {
        let mut client = lobby();
        let actions = client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        assert_eq!(sent(&actions), [Command::Join { username: "Alice".into(), room: "r1".into() }]);

        // Still in the lobby until the server confirms.
        assert_eq!(client.phase(), SessionPhase::Lobby);
    }

    #[test]
    fn join_while_disconnected_fails() {
        let mut client = Client::new();
        client.handle(ClientEvent::Login { name: "Alice".into() }).unwrap();

        let err = client.handle(ClientEvent::Join { room: "r1".into() }).unwrap_err();
        assert_eq!(err, ClientError::NotConnected { operation: "join" });
        assert_eq!(client.selected_room(), None);
    }

    #[test]
    fn joined_builds_roster_and_welcome() {
        let client = in_room();

        assert_eq!(client.phase(), SessionPhase::InRoom);
        assert_eq!(client.room(), Some("r1"));
        assert_eq!(client.roster().names(), ["Bob"]);
        assert_eq!(client.transcript().events(), [ChatEvent::info(
            "You have entered the room. There is 1 user in the chatroom: Bob"
        )]);
    }

    #[test]
    fn joined_filters_self_by_name_and_id() {
        let mut client = lobby();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client
            .handle(frame(
                r#"{"type":"joined","payload":{
                    "user":{"id":"7","name":"Alice"},
                    "others":[{"id":"7","name":"Alice"},{"id":"2","name":"Bob"}],
                    "typing":[{"id":"7","name":"Alice"}],
                    "messages":[]}}"#,
            ))
            .unwrap();

        assert_eq!(client.self_id(), Some("7"));
        assert_eq!(client.roster().names(), ["Bob"]);
        assert!(client.typing().is_empty());
    }

    #[test]
    fn namesake_with_other_id_is_a_peer() {
        let mut client = lobby();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client
            .handle(frame(r#"{"type":"joined","payload":{"user":{"id":"1","name":"Alice"},"others":[],"messages":[]}}"#))
            .unwrap();

        client
            .handle(frame(r#"{"type":"user-joined","payload":{"user":{"id":"9","name":"Alice"}}}"#))
            .unwrap();
        client
            .handle(frame(r#"{"type":"user-typing","payload":{"status":"started","user":{"id":"9","name":"Alice"}}}"#))
            .unwrap();

        let ids: Vec<_> = client.roster().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["9"]);
        assert_eq!(client.typing().len(), 1);
        assert_eq!(
            client.transcript().events().last(),
            Some(&ChatEvent::info("Alice has joined the chatroom!"))
        );

        // Our own id is still filtered.
        client
            .handle(frame(r#"{"type":"user-joined","payload":{"user":{"id":"1","name":"Alice"}}}"#))
            .unwrap();
        assert_eq!(client.roster().len(), 1);
    }

    #[test]
    fn joined_resets_draft_so_first_keystroke_is_an_edge() {
        let mut client = lobby();
        client.handle(ClientEvent::InputChanged { value: "typed in lobby".into() }).unwrap();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client
            .handle(frame(r#"{"type":"joined","payload":{"others":[],"messages":[]}}"#))
            .unwrap();
        assert_eq!(client.draft(), "");

        let actions = client.handle(ClientEvent::InputChanged { value: "h".into() }).unwrap();
        assert_eq!(sent(&actions), [Command::TypingStart]);
    }

    #[test]
    fn joined_replays_history_before_welcome() {
        let mut client = lobby();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client
            .handle(frame(
                r#"{"type":"joined","payload":{"others":[],"messages":[
                    {"createdAt":"2021-01-01T08:00:00Z","user":{"id":"2","name":"Bob"},"body":"first"}
                ]}}"#,
            ))
            .unwrap();

        let events = client.transcript().events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], ChatEvent::Message { body, .. } if body == "first"));
        assert_eq!(
            events[1],
            ChatEvent::info("You have entered the room. There are 0 users in the chatroom.")
        );
    }

    #[test]
    fn peer_joined_and_left_update_roster_and_transcript() {
        let mut client = in_room();
        client
            .handle(frame(r#"{"type":"user-joined","payload":{"user":{"id":"3","name":"Carol"}}}"#))
            .unwrap();
        assert_eq!(client.roster().names(), ["Bob", "Carol"]);

        client
            .handle(frame(r#"{"type":"user-left","payload":{"user":{"id":"2","name":"Bob"}}}"#))
            .unwrap();
        assert_eq!(client.roster().names(), ["Carol"]);

        let texts: Vec<_> = client
            .transcript()
            .events()
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Info { text } => Some(text.as_str()),
                ChatEvent::Message { .. } => None,
            })
            .skip(1)
            .collect();
        assert_eq!(texts, ["Carol has joined the chatroom!", "Bob left the chatroom."]);
    }

    #[test]
    fn absent_peer_leaving_still_announces() {
        let mut client = in_room();
        client
            .handle(frame(r#"{"type":"user-typing","payload":{"status":"started","user":{"id":"2","name":"Bob"}}}"#))
            .unwrap();
        client
            .handle(frame(r#"{"type":"user-left","payload":{"user":{"id":"9","name":"Zed"}}}"#))
            .unwrap();

        assert_eq!(client.roster().names(), ["Bob"]);
        assert_eq!(client.typing().names(), ["Bob"]);
        assert_eq!(
            client.transcript().events().last(),
            Some(&ChatEvent::info("Zed left the chatroom."))
        );
    }

    #[test]
    fn leaving_peer_is_removed_from_typing() {
        let mut client = in_room();
        client
            .handle(frame(r#"{"type":"user-typing","payload":{"status":"started","user":{"id":"2","name":"Bob"}}}"#))
            .unwrap();
        client
            .handle(frame(r#"{"type":"user-left","payload":{"user":{"id":"2","name":"Bob"}}}"#))
            .unwrap();
        assert!(client.typing().is_empty());
    }

    #[test]
    fn typing_changes_are_idempotent() {
        let mut client = in_room();
        let start = r#"{"type":"user-typing","payload":{"status":"started","user":{"id":"2","name":"Bob"}}}"#;
        let stop = r#"{"type":"user-typing","payload":{"status":"stopped","user":{"id":"2","name":"Bob"}}}"#;

        client.handle(frame(start)).unwrap();
        client.handle(frame(start)).unwrap();
        assert_eq!(client.typing().len(), 1);

        client.handle(frame(stop)).unwrap();
        client.handle(frame(stop)).unwrap();
        assert!(client.typing().is_empty());
    }

    #[test]
    fn self_typing_is_ignored() {
        let mut client = in_room();
        client
            .handle(frame(r#"{"type":"user-typing","payload":{"status":"started","user":{"id":"1","name":"Alice"}}}"#))
            .unwrap();
        assert!(client.typing().is_empty());
    }

    #[test]
    fn posted_messages_append_without_dedup() {
        let mut client = in_room();
        let posted = r#"{"type":"user-posted","payload":{"message":{"createdAt":"2021-01-01T10:11:12Z","user":{"id":"2","name":"Bob"},"body":"hi"}}}"#;
        client.handle(frame(posted)).unwrap();
        client.handle(frame(posted)).unwrap();

        let messages: Vec<_> = client
            .transcript()
            .events()
            .iter()
            .filter(|e| matches!(e, ChatEvent::Message { .. }))
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(
            matches!(messages[0], ChatEvent::Message { time, sender_name, .. } if time.short == "10:11" && sender_name == "Bob")
        );
    }

    #[test]
    fn post_emits_typing_stop_then_post() {
        let mut client = in_room();
        client.handle(ClientEvent::InputChanged { value: "hello".into() }).unwrap();

        let actions = client.handle(ClientEvent::Post { body: "hello".into() }).unwrap();
        assert_eq!(sent(&actions), [Command::TypingStop, Command::Post {
            sender: "Alice".into(),
            body: "hello".into()
        }]);
        assert_eq!(client.draft(), "");

        // The next keystroke is a fresh edge.
        let actions = client.handle(ClientEvent::InputChanged { value: "a".into() }).unwrap();
        assert_eq!(sent(&actions), [Command::TypingStart]);
    }

    #[test]
    fn post_while_disconnected_is_not_connected() {
        let mut client = in_room();
        client.handle(open(ConnectionState::Disconnected)).unwrap();
        let before = client.transcript().clone();

        let err = client.handle(ClientEvent::Post { body: "hi".into() }).unwrap_err();
        assert_eq!(err, ClientError::NotConnected { operation: "post" });
        assert_eq!(client.transcript(), &before);
    }

    #[test]
    fn post_from_lobby_is_invalid() {
        let mut client = lobby();
        let err = client.handle(ClientEvent::Post { body: "hi".into() }).unwrap_err();
        assert!(matches!(err, ClientError::InvalidTransition { phase: SessionPhase::Lobby, .. }));
    }

    #[test]
    fn input_changes_emit_only_on_edges() {
        let mut client = in_room();
        let mut commands = Vec::new();
        for value in ["h", "he", "hel", "he", "", "", "x"] {
            let actions = client.handle(ClientEvent::InputChanged { value: value.into() }).unwrap();
            commands.extend(sent(&actions));
        }
        assert_eq!(commands, [Command::TypingStart, Command::TypingStop, Command::TypingStart]);
    }

    #[test]
    fn input_outside_room_is_silent() {
        let mut client = lobby();
        let actions = client.handle(ClientEvent::InputChanged { value: "h".into() }).unwrap();
        assert!(actions.is_empty());
        assert_eq!(client.draft(), "h");
    }

    #[test]
    fn leave_clears_room_state() {
        let mut client = in_room();
        let actions = client.handle(ClientEvent::Leave).unwrap();

        assert_eq!(sent(&actions), [Command::Leave]);
        assert_eq!(client.phase(), SessionPhase::Lobby);
        assert_eq!(client.room(), None);
        assert!(client.roster().is_empty());
        assert!(client.transcript().is_empty());
    }

    #[test]
    fn leave_from_lobby_is_invalid() {
        let mut client = lobby();
        let err = client.handle(ClientEvent::Leave).unwrap_err();
        assert!(matches!(err, ClientError::InvalidTransition { operation: "leave", .. }));
    }

    #[test]
    fn leave_while_disconnected_sends_nothing() {
        let mut client = in_room();
        client.handle(open(ConnectionState::Disconnected)).unwrap();

        let actions = client.handle(ClientEvent::Leave).unwrap();
        assert!(sent(&actions).is_empty());
        assert_eq!(client.selected_room(), None);

        // Reconnecting does not rejoin.
        let actions = client.handle(open(ConnectionState::Open)).unwrap();
        assert!(sent(&actions).is_empty());
    }

    #[test]
    fn reconnect_rejoins_selected_room() {
        let mut client = in_room();
        client.handle(open(ConnectionState::Disconnected)).unwrap();
        assert_eq!(client.phase(), SessionPhase::Connecting);

        client.handle(open(ConnectionState::Connecting)).unwrap();
        let actions = client.handle(open(ConnectionState::Open)).unwrap();

        assert_eq!(client.phase(), SessionPhase::Lobby);
        assert_eq!(sent(&actions), [Command::Join { username: "Alice".into(), room: "r1".into() }]);
        assert_eq!(client.selected_room(), Some("r1"));
        assert_eq!(client.room(), None);
        assert!(client.roster().is_empty());
        assert!(client.transcript().is_empty());
    }

    #[test]
    fn rejected_rejoin_leaves_no_stale_room() {
        let mut client = in_room();
        client.handle(open(ConnectionState::Disconnected)).unwrap();
        client.handle(open(ConnectionState::Open)).unwrap();
        client.handle(frame(r#"{"type":"error","payload":{"code":"name-taken"}}"#)).unwrap();

        assert_eq!(client.phase(), SessionPhase::Lobby);
        assert_eq!(client.selected_room(), None);
        assert!(client.roster().is_empty());
        assert!(client.typing().is_empty());
        assert!(client.transcript().is_empty());

        // Nothing to rejoin on the next reconnect.
        client.handle(open(ConnectionState::Disconnected)).unwrap();
        let actions = client.handle(open(ConnectionState::Open)).unwrap();
        assert!(sent(&actions).is_empty());
    }

    #[test]
    fn unsent_join_is_not_rejoined() {
        let mut client = lobby();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client.handle(ClientEvent::JoinFailed { room: "r1".into() }).unwrap();
        assert_eq!(client.selected_room(), None);

        client.handle(open(ConnectionState::Disconnected)).unwrap();
        let actions = client.handle(open(ConnectionState::Open)).unwrap();
        assert!(sent(&actions).is_empty());
    }

    #[test]
    fn unsent_switch_keeps_current_room() {
        let mut client = in_room();
        client.handle(ClientEvent::Join { room: "r2".into() }).unwrap();
        client.handle(ClientEvent::JoinFailed { room: "r2".into() }).unwrap();

        assert_eq!(client.selected_room(), Some("r1"));
        assert_eq!(client.room(), Some("r1"));
        assert_eq!(client.roster().names(), ["Bob"]);
    }

    #[test]
    fn stale_join_failure_is_ignored() {
        let mut client = in_room();
        let actions = client.handle(ClientEvent::JoinFailed { room: "r9".into() }).unwrap();
        assert!(actions.is_empty());
        assert_eq!(client.selected_room(), Some("r1"));
    }

    #[test]
    fn room_events_in_lobby_are_discarded() {
        let mut client = lobby();
        let actions = client
            .handle(frame(r#"{"type":"user-joined","payload":{"user":{"id":"3","name":"Carol"}}}"#))
            .unwrap();

        assert!(matches!(&actions[..], [ClientAction::Log { .. }]));
        assert!(client.roster().is_empty());
        assert!(client.transcript().is_empty());
    }

    #[test]
    fn rooms_are_replaced_in_server_order() {
        let mut client = lobby();
        client
            .handle(frame(r#"{"type":"rooms","payload":{"rooms":[{"id":"a","name":"A","connectedClients":0,"maxClients":5}]}}"#))
            .unwrap();
        client
            .handle(frame(r#"{"type":"rooms","payload":{"rooms":[
                {"id":"z","name":"Z","connectedClients":1,"maxClients":5},
                {"id":"b","name":"B","connectedClients":2,"maxClients":5}]}}"#))
            .unwrap();

        let ids: Vec<_> = client.rooms().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["z", "b"]);
    }

    #[test]
    fn malformed_and_unknown_frames_leave_state_alone() {
        let mut client = in_room();
        let before = client.clone();

        let actions = client.handle(frame("{not json")).unwrap();
        assert!(matches!(&actions[..], [ClientAction::Log { level: crate::LogLevel::Warn, .. }]));

        let actions = client.handle(frame(r#"{"type":"reaction","payload":{}}"#)).unwrap();
        assert!(matches!(&actions[..], [ClientAction::Log { level: crate::LogLevel::Debug, .. }]));

        assert_eq!(client.transcript(), before.transcript());
        assert_eq!(client.roster(), before.roster());
        assert_eq!(client.phase(), before.phase());
    }

    #[test]
    fn name_taken_is_recorded_and_not_retried() {
        let mut client = lobby();
        client.handle(ClientEvent::Join { room: "r1".into() }).unwrap();
        client.handle(frame(r#"{"type":"error","payload":{"code":"name-taken"}}"#)).unwrap();

        assert_eq!(client.last_error(), Some(&ServerErrorCode::NameTaken));
        assert_eq!(client.selected_room(), None);
    }

    #[test]
    fn logout_resets_everything() {
        let mut client = in_room();
        let actions = client.handle(ClientEvent::Logout).unwrap();

        assert_eq!(actions[0], ClientAction::Disconnect);
        assert_eq!(client.phase(), SessionPhase::LoggedOut);
        assert_eq!(client.identity(), None);
        assert!(client.rooms().is_empty());
        assert!(client.roster().is_empty());
        assert!(client.transcript().is_empty());
        assert_eq!(client.room(), None);
    }

    #[test]
    fn frames_after_logout_are_ignored() {
        let mut client = in_room();
        client.handle(ClientEvent::Logout).unwrap();
        client
            .handle(frame(r#"{"type":"rooms","payload":{"rooms":[{"id":"a","name":"A","connectedClients":0,"maxClients":5}]}}"#))
            .unwrap();
        assert!(client.rooms().is_empty());
    }
}
