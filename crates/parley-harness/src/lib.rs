//! Deterministic simulation harness for Parley session testing.
//!
//! In-memory implementations of the [`parley_core::Environment`] and
//! [`parley_core::Transport`] traits, so the production
//! [`parley_app::Runtime`] runs unchanged against a scripted server under
//! tokio's paused clock.
//!
//! # Simulation
//!
//! [`SimTransport`] is the session's end of the connection. Its paired
//! [`SimRemote`] plays the server: it accepts or refuses connection
//! attempts, delivers frames, drops connections and records everything the
//! session sent. The [`frames`] module builds server frames in wire format.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks on [`parley_app::SessionSnapshot`]. Invariants verify WHAT must be
//! true after every step, not specific scenarios. Use
//! [`InvariantRegistry::standard()`] for the common session invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod frames;
pub mod invariants;
pub mod sim_env;
pub mod sim_transport;
pub mod wait;

pub use invariants::{
    Invariant, InvariantRegistry, InvariantResult, LoggedOutIsEmpty, NoRoomNoView,
    RoomMatchesPhase, SelfNotInRoster, SelfNotTyping, Violation,
};
pub use sim_env::SimEnv;
pub use sim_transport::{SimRemote, SimTransport};
pub use wait::{WaitTimeout, wait_for};
