//! Facade error types.
//!
//! Transport and decode failures are recovered inside the runtime (retry or
//! discard). Only the errors below reach a [`crate::Session`] caller.

use parley_client::{ClientError, SessionPhase};
use thiserror::Error;

/// Errors returned by [`crate::Session`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation needs an open connection. Show the user; the session keeps
    /// reconnecting in the background.
    #[error("cannot {operation}: not connected")]
    NotConnected {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Operation is not valid in the current phase. Indicates a UI bug;
    /// session state is unchanged.
    #[error("invalid transition: cannot {operation} while {phase:?}")]
    InvalidTransition {
        /// Phase when the operation was attempted
        phase: SessionPhase,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// The runtime task has exited.
    #[error("session runtime has stopped")]
    RuntimeStopped,
}

impl From<ClientError> for SessionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotConnected { operation } => Self::NotConnected { operation },
            ClientError::InvalidTransition { phase, operation } => {
                Self::InvalidTransition { phase, operation }
            },
        }
    }
}
