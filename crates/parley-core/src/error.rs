//! Error types for the transport layer.
//!
//! Transport errors are never fatal to a session. They are reported to the
//! [`crate::Reconnector`], which decides whether and when to try again.

use thiserror::Error;

/// Errors surfaced by [`crate::Transport`] implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Operation requires an open connection.
    #[error("transport is not connected")]
    NotConnected,

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Established connection failed while reading or writing.
    #[error("stream error: {0}")]
    Stream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause() {
        let err = TransportError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
        assert_eq!(TransportError::NotConnected.to_string(), "transport is not connected");
    }
}
