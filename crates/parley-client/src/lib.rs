//! Client
//!
//! Action-based chat session state machine for the Parley protocol. Tracks
//! the local identity, the room list, membership of the current room, the
//! peer roster, who is typing and the room transcript.
//!
//! # Architecture
//!
//! The client follows the same Sans-IO and Action-Based patterns as
//! [`parley_core`]. It receives events ([`ClientEvent`]), processes them
//! through pure state machine logic, and returns actions ([`ClientAction`]) for
//! the caller to execute. The client never logs directly; diagnostics come out
//! as [`ClientAction::Log`].
//!
//! # Components
//!
//! - [`Client`]: Session state machine
//! - [`ClientEvent`]: Events fed into the client
//! - [`ClientAction`]: Actions produced by the client
//! - [`PeerSet`]: Id-keyed, insertion-ordered peer collection used for the
//!   roster and the typing set
//! - [`Transcript`]: Current room's chat log
//!
//! # Transport (optional)
//!
//! With the `websocket` feature enabled, this crate also provides
//! [`websocket::WsTransport`], the production [`parley_core::Transport`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
mod event;
mod peers;
mod state;
mod transcript;
mod typing;

#[cfg(feature = "websocket")]
pub mod websocket;

pub use client::Client;
pub use error::ClientError;
pub use event::{ClientAction, ClientEvent, LogLevel};
pub use parley_core::ConnectionState;
pub use parley_proto::{Peer, PeerId, Room, RoomId, ServerErrorCode};
pub use peers::{PeerSet, Roster, TypingSet};
pub use state::{SessionIdentity, SessionPhase};
pub use transcript::{ChatEvent, Transcript, entered_room_text};
pub use typing::{TypingEdge, typing_edge};
