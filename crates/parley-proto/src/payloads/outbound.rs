//! Client-to-server commands.

use serde::{Deserialize, Serialize};

use crate::RoomId;

/// Commands the client sends to the server.
///
/// One command always encodes to exactly one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter a room (also switches rooms when already in one).
    Join {
        /// Display name of the local user
        username: String,
        /// Room to enter
        room: RoomId,
    },

    /// Leave the current room and return to the lobby.
    Leave,

    /// Post a chat message to the current room.
    Post {
        /// Display name of the local user
        sender: String,
        /// Message text
        body: String,
    },

    /// The local user started typing.
    TypingStart,

    /// The local user cleared their draft or sent it.
    TypingStop,
}

impl Command {
    /// Wire `type` discriminator for this command.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave => "leave",
            Self::Post { .. } => "post",
            Self::TypingStart | Self::TypingStop => "typing",
        }
    }

    pub(crate) fn to_wire(&self) -> WireCommand<'_> {
        match self {
            Self::Join { username, room } => {
                WireCommand::Join { username: username.as_str(), room: room.as_str() }
            },
            Self::Leave => WireCommand::Leave {},
            Self::Post { sender, body } => {
                WireCommand::Post { sender: sender.as_str(), message: body.as_str() }
            },
            Self::TypingStart => WireCommand::Typing(TypingStatus::Started),
            Self::TypingStop => WireCommand::Typing(TypingStatus::Stopped),
        }
    }
}

/// Typing indicator status, shared by the outbound `typing` frame and the
/// inbound `user-typing` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingStatus {
    /// Typing began
    Started,
    /// Typing ended
    Stopped,
}

/// Wire representation of [`Command`].
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub(crate) enum WireCommand<'a> {
    Join { username: &'a str, room: &'a str },
    Leave {},
    Post { sender: &'a str, message: &'a str },
    Typing(TypingStatus),
}
