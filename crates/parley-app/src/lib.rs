//! Application layer for Parley
//!
//! The public face of a chat session. A [`Session`] handle forwards user
//! intents to a single [`Runtime`] task that owns the transport, the
//! reconnection controller and the session state machine, and publishes an
//! immutable [`SessionSnapshot`] after every change.
//!
//! # Components
//!
//! - [`Session`]: Cloneable handle for issuing intents and reading state
//! - [`Runtime`]: Single-owner event loop driving transport, reconnector and
//!   client
//! - [`SessionSnapshot`]: Read-only view of session state for rendering
//! - [`SessionConfig`]: Server URL, backoff and mailbox sizing
//! - [`SessionError`]: The only errors that cross the facade

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod config;
mod error;
mod runtime;
mod session;
mod state;

pub use config::{DEFAULT_REQUEST_BUFFER, DEFAULT_URL, SessionConfig};
pub use error::SessionError;
pub use runtime::Runtime;
pub use session::Session;
pub use state::SessionSnapshot;
