//! Plain-text rendering.

use parley_app::SessionSnapshot;
use parley_client::{ChatEvent, ConnectionState, Room, ServerErrorCode, SessionPhase};

/// One transcript line.
pub fn event_line(event: &ChatEvent) -> String {
    match event {
        ChatEvent::Message { time, sender_name, body, .. } => {
            format!("[{}] {sender_name}: {body}", time.short)
        },
        ChatEvent::Info { text } => format!("* {text}"),
    }
}

/// Room listing, one room per line.
pub fn rooms_lines(rooms: &[Room]) -> Vec<String> {
    if rooms.is_empty() {
        return vec!["no rooms".to_string()];
    }

    rooms
        .iter()
        .map(|r| format!("{} ({}/{})  id: {}", r.name, r.connected_count, r.max_count, r.id))
        .collect()
}

/// Who is in the room, and who is typing.
pub fn who_line(snapshot: &SessionSnapshot) -> String {
    if snapshot.room.is_none() {
        return "not in a room".to_string();
    }

    let mut names: Vec<&str> = snapshot.display_name().into_iter().collect();
    names.extend(snapshot.roster.iter().map(|p| p.name.as_str()));
    let mut line = format!("in room: {}", names.join(", "));

    if !snapshot.typing_names.is_empty() {
        line.push_str(&format!(" (typing: {})", snapshot.typing_names.join(", ")));
    }
    line
}

/// Status line for a phase/connection pair.
pub fn status_line(phase: SessionPhase, connection: ConnectionState) -> String {
    let phase = match phase {
        SessionPhase::LoggedOut => "logged out",
        SessionPhase::Connecting => "connecting",
        SessionPhase::Lobby => "in lobby",
        SessionPhase::InRoom => "in room",
    };
    format!("-- {phase} ({connection:?})")
}

/// Message shown for a server-reported error.
pub fn error_line(code: &ServerErrorCode) -> String {
    let detail = match code {
        ServerErrorCode::NameTaken => "that name is already taken in this room",
        ServerErrorCode::InvalidName => "that name is not allowed",
        ServerErrorCode::NotJoined => "join a room first",
        ServerErrorCode::InvalidMessageBody => "message rejected",
        ServerErrorCode::Other(_) => "request rejected",
    };
    format!("!! {detail} ({code})")
}

/// Tracks what has already been printed, so each snapshot only yields what
/// is new.
#[derive(Debug, Default)]
pub struct Printer {
    transcript: Vec<ChatEvent>,
    status: Option<(SessionPhase, ConnectionState)>,
    last_error: Option<ServerErrorCode>,
}

impl Printer {
    /// Create a printer that has printed nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines to print for `snapshot`.
    pub fn update(&mut self, snapshot: &SessionSnapshot) -> Vec<String> {
        let mut lines = Vec::new();

        let status = (snapshot.phase, snapshot.connection);
        if self.status != Some(status) {
            self.status = Some(status);
            lines.push(status_line(status.0, status.1));
        }

        // A replaced transcript (join or leave) is printed from the start.
        let fresh = if snapshot.transcript.starts_with(&self.transcript) {
            &snapshot.transcript[self.transcript.len()..]
        } else {
            &snapshot.transcript[..]
        };
        lines.extend(fresh.iter().map(event_line));
        self.transcript.clone_from(&snapshot.transcript);

        if snapshot.last_error != self.last_error {
            if let Some(code) = &snapshot.last_error {
                lines.push(error_line(code));
            }
            self.last_error.clone_from(&snapshot.last_error);
        }

        lines
    }
}
