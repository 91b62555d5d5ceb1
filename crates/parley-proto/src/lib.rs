//! Parley wire protocol.
//!
//! Every frame exchanged with the chat server is a JSON record with a `type`
//! discriminator and a `payload` whose shape depends on the type. This crate
//! owns both directions of that mapping:
//!
//! - [`encode`] turns an outbound [`Command`] into exactly one frame.
//! - [`decode`] turns one inbound frame into a typed [`InboundEvent`].
//!
//! The codec is stateless. Unknown frame types decode to
//! [`InboundEvent::Unrecognized`] rather than failing, so a server that grows
//! new message types never breaks older clients.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod frame;
pub mod payloads;
pub mod time;

pub use errors::{DecodeError, ProtocolError};
pub use frame::{decode, encode};
pub use payloads::{
    ChatMessage, Command, InboundEvent, Peer, PeerId, Room, RoomId, ServerErrorCode, TypingStatus,
};
pub use time::DisplayTime;
