//! Client error types.

use thiserror::Error;

use crate::SessionPhase;

/// Errors returned by [`crate::Client::handle`].
///
/// Both variants leave the client's state exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Operation needs an open connection.
    #[error("cannot {operation}: not connected")]
    NotConnected {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Operation is not valid in the current phase.
    #[error("invalid transition: cannot {operation} while {phase:?}")]
    InvalidTransition {
        /// Phase when the operation was attempted
        phase: SessionPhase,
        /// Operation that was attempted
        operation: &'static str,
    },
}
