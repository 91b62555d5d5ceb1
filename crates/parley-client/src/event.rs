//! Client events and actions.

use bytes::Bytes;
use parley_core::ConnectionState;
use parley_proto::{Command, RoomId};

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Receiving frames from the transport
/// - Reporting connection lifecycle changes
/// - Forwarding user intents (login, join, post, typing, etc.)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// User picked a display name.
    Login {
        /// Display name
        name: String,
    },

    /// User ended the session.
    Logout,

    /// User wants to enter (or switch to) a room.
    Join {
        /// Room to enter
        room: RoomId,
    },

    /// User wants to return to the lobby.
    Leave,

    /// User sent a message.
    Post {
        /// Message text
        body: String,
    },

    /// The draft in the input box changed.
    InputChanged {
        /// Full draft after the change
        value: String,
    },

    /// A `Join` was accepted but its frame never reached the transport.
    JoinFailed {
        /// Room whose join was not sent
        room: RoomId,
    },

    /// The connection lifecycle changed.
    ConnectionChanged {
        /// New state
        state: ConnectionState,
    },

    /// Frame received from the server.
    FrameReceived(Bytes),
}

/// Severity of a [`ClientAction::Log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Routine detail
    Debug,
    /// Notable state change
    Info,
    /// Something was discarded or rejected
    Warn,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Encode and send this command.
    Send(Command),

    /// The session wants a connection.
    Connect,

    /// The session no longer wants a connection. Must suppress any pending
    /// reconnect before closing.
    Disconnect,

    /// Log message for debugging.
    Log {
        /// Severity
        level: LogLevel,
        /// Log message
        message: String,
    },
}

impl ClientAction {
    pub(crate) fn debug(message: impl Into<String>) -> Self {
        Self::Log { level: LogLevel::Debug, message: message.into() }
    }

    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self::Log { level: LogLevel::Info, message: message.into() }
    }

    pub(crate) fn warn(message: impl Into<String>) -> Self {
        Self::Log { level: LogLevel::Warn, message: message.into() }
    }
}
