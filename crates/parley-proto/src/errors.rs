//! Codec error types.
//!
//! Encoding and decoding fail for different reasons and are handled by
//! different layers, so they get separate types. A decode failure is always
//! scoped to a single frame: the caller logs it and keeps going.

use thiserror::Error;

/// Result alias for encoding operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while producing outbound frames.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Command could not be serialized.
    #[error("failed to encode {command} frame: {source}")]
    Encode {
        /// Wire type of the command being encoded
        command: &'static str,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while decoding inbound frames.
///
/// An unknown frame `type` is deliberately NOT an error. See
/// [`crate::InboundEvent::Unrecognized`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Bytes are not a frame, or a known frame type carries the wrong payload.
    #[error("malformed frame: {reason}")]
    Malformed {
        /// What the parser rejected
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed { reason: reason.into() }
    }
}
