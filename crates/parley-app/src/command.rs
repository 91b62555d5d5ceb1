//! Requests sent from [`crate::Session`] handles to the runtime.

use parley_client::{ClientEvent, RoomId};
use tokio::sync::oneshot;

use crate::SessionError;

/// User intent, as queued in the runtime's mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    Login { name: String },
    Logout,
    Join { room: RoomId },
    Leave,
    Post { body: String },
    InputChanged { value: String },
}

impl Request {
    /// Operation name used in errors and logs.
    pub(crate) const fn operation(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Join { .. } => "join",
            Self::Leave => "leave",
            Self::Post { .. } => "post",
            Self::InputChanged { .. } => "input_changed",
        }
    }

    pub(crate) fn into_event(self) -> ClientEvent {
        match self {
            Self::Login { name } => ClientEvent::Login { name },
            Self::Logout => ClientEvent::Logout,
            Self::Join { room } => ClientEvent::Join { room },
            Self::Leave => ClientEvent::Leave,
            Self::Post { body } => ClientEvent::Post { body },
            Self::InputChanged { value } => ClientEvent::InputChanged { value },
        }
    }
}

/// A request plus the channel its outcome is reported on.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Result<(), SessionError>>,
}
