//! Core
//!
//! Connection plumbing shared by every Parley session: the transport
//! contract, the reconnection state machine and the time abstraction.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O. The [`Reconnector`] takes lifecycle
//! notifications and returns [`ReconnectAction`]s for the caller to execute;
//! the [`Transport`] trait describes what the caller executes them against.
//! Time is reached only through [`Environment`], so a simulated clock can
//! replace the system one in tests.
//!
//! # Components
//!
//! - [`Reconnector`]: Exponential-backoff reconnection controller
//! - [`Transport`]: Message-oriented duplex connection with an event stream
//! - [`Environment`]: Clock and sleep provider
//! - [`TransportError`]: Failures surfaced by transports

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod reconnect;
pub mod transport;

pub use env::{Environment, SystemEnv};
pub use error::TransportError;
pub use reconnect::{
    ConnectionState, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY, ReconnectAction, ReconnectConfig,
    Reconnector, TimerId,
};
pub use transport::{Transport, TransportEvent};
