//! Room transcript.

use parley_proto::{ChatMessage, DisplayTime, PeerId};

/// One line of the room transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A chat message
    Message {
        /// Creation time, rendered in UTC
        time: DisplayTime,
        /// Author id
        sender_id: PeerId,
        /// Author display name at the time of posting
        sender_name: String,
        /// Message text
        body: String,
    },

    /// A notice generated by the client (joins, leaves, room entry)
    Info {
        /// Notice text
        text: String,
    },
}

impl ChatEvent {
    /// Create an info notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self::Info { text: text.into() }
    }
}

impl From<ChatMessage> for ChatEvent {
    fn from(message: ChatMessage) -> Self {
        Self::Message {
            time: message.time,
            sender_id: message.sender.id,
            sender_name: message.sender.name,
            body: message.body,
        }
    }
}

/// Append-only log for the current room.
///
/// Cleared on every join and leave. The client never reorders or deduplicates
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    events: Vec<ChatEvent>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn push(&mut self, event: ChatEvent) {
        self.events.push(event);
    }

    /// Remove every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events, oldest first.
    pub fn events(&self) -> &[ChatEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Notice appended after entering a room, listing who else is there.
pub fn entered_room_text(names: &[String]) -> String {
    match names {
        [] => "You have entered the room. There are 0 users in the chatroom.".to_string(),
        [only] => format!("You have entered the room. There is 1 user in the chatroom: {only}"),
        _ => format!(
            "You have entered the room. There are {} users in the chatroom: {}",
            names.len(),
            names.join(", ")
        ),
    }
}

pub(crate) fn peer_joined_text(name: &str) -> String {
    format!("{name} has joined the chatroom!")
}

pub(crate) fn peer_left_text(name: &str) -> String {
    format!("{name} left the chatroom.")
}
