//! Frame encoding and decoding.
//!
//! A frame is one JSON object:
//!
//! ```text
//! { "type": "<kind>", "payload": <kind-specific value> }
//! ```
//!
//! Decoding happens in two steps. The envelope is parsed first so the `type`
//! can be inspected without committing to a payload shape; the payload is
//! then parsed only for types this client knows. Anything that fails either
//! step is [`DecodeError::Malformed`] and affects only that frame.

use bytes::Bytes;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Command, DecodeError, InboundEvent, ServerErrorCode, TypingStatus,
    errors::{ProtocolError, Result},
    payloads::inbound::{WireError, WireJoined, WirePosted, WireRooms, WireTyping, WireUser},
};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// Encode one command as one frame.
///
/// # Errors
///
/// - `ProtocolError::Encode` if serialization fails
pub fn encode(command: &Command) -> Result<Bytes> {
    serde_json::to_vec(&command.to_wire())
        .map(Bytes::from)
        .map_err(|source| ProtocolError::Encode { command: command.kind(), source })
}

/// Decode one inbound frame.
///
/// # Errors
///
/// - `DecodeError::Malformed` if the bytes are not a JSON envelope, or a known
///   frame type carries a payload of the wrong shape
pub fn decode(bytes: &[u8]) -> std::result::Result<InboundEvent, DecodeError> {
    let Envelope { kind, payload } =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::malformed(e.to_string()))?;

    let event = match kind.as_str() {
        "rooms" => {
            let WireRooms { rooms } = parse_payload(&kind, payload)?;
            InboundEvent::RoomsUpdated { rooms }
        },
        "joined" => {
            let joined: WireJoined = parse_payload(&kind, payload)?;
            InboundEvent::Joined {
                me: joined.user,
                peers: joined.others,
                typing: joined.typing,
                history: joined.messages.into_iter().map(Into::into).collect(),
            }
        },
        "user-joined" => {
            let WireUser { user } = parse_payload(&kind, payload)?;
            InboundEvent::PeerJoined { peer: user }
        },
        "user-left" => {
            let WireUser { user } = parse_payload(&kind, payload)?;
            InboundEvent::PeerLeft { peer: user }
        },
        "posted" | "user-posted" => {
            let WirePosted { message } = parse_payload(&kind, payload)?;
            InboundEvent::MessagePosted(message.into())
        },
        "user-typing" => {
            let WireTyping { status, user } = parse_payload(&kind, payload)?;
            InboundEvent::PeerTypingChanged { peer: user, started: status == TypingStatus::Started }
        },
        "error" => {
            let WireError { code } = parse_payload(&kind, payload)?;
            InboundEvent::ServerError { code: ServerErrorCode::from_code(&code) }
        },
        _ => InboundEvent::Unrecognized { kind },
    };

    Ok(event)
}

fn parse_payload<T: DeserializeOwned>(
    kind: &str,
    payload: Value,
) -> std::result::Result<T, DecodeError> {
    serde_json::from_value(payload)
        .map_err(|e| DecodeError::malformed(format!("invalid {kind} payload: {e}")))
}
