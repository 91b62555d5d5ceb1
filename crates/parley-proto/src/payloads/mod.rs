//! Typed frame payloads.
//!
//! The server speaks JSON with camelCase field names and kebab-case frame
//! types. The public types in this module use Rust naming; the wire shapes
//! live next to them as crate-private serde structs so protocol quirks (the
//! `post` frame calling its body `message`, `user-posted` and `posted` sharing
//! a shape) stay out of the session logic.

pub mod inbound;
pub mod outbound;

pub use inbound::{ChatMessage, InboundEvent, Peer, PeerId, Room, RoomId, ServerErrorCode};
pub use outbound::{Command, TypingStatus};
