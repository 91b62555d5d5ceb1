//! Transport contract.
//!
//! A transport is a message-oriented duplex connection to one chat server
//! URL. It reports everything that happens to it through a single ordered
//! event stream ([`Transport::next_event`]) instead of per-kind callbacks, so
//! the owner handles lifecycle changes and inbound frames in one place and in
//! delivery order.
//!
//! Transports never retry. Deciding when to reconnect is the job of
//! [`crate::Reconnector`].

use std::future::Future;

use bytes::Bytes;

use crate::error::TransportError;

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection attempt succeeded.
    Opened,

    /// The connection ended (or an attempt failed). Always the last event of
    /// an attempt.
    Closed {
        /// Human-readable cause
        reason: String,
    },

    /// The connection reported an error. A `Closed` follows once the
    /// connection has been torn down.
    Error {
        /// Human-readable cause
        message: String,
    },

    /// One inbound frame.
    Message(Bytes),
}

/// Message-oriented duplex connection.
///
/// # Invariants
///
/// - At most one attempt is live at a time. `open` abandons any previous
///   attempt, and events from an abandoned attempt are never returned.
/// - Every attempt that produced `Opened` eventually produces `Closed`.
/// - `next_event` is cancel safe: dropping the future loses no event.
pub trait Transport: Send + 'static {
    /// Start a connection attempt. The outcome arrives as `Opened` or
    /// `Error`/`Closed`.
    ///
    /// # Errors
    ///
    /// - `TransportError::Connection` if the attempt cannot even be started
    ///   (for example an unparseable URL)
    fn open(&mut self, url: &str) -> Result<(), TransportError>;

    /// Send one frame.
    ///
    /// # Errors
    ///
    /// - `TransportError::NotConnected` if the connection is not open
    /// - `TransportError::Stream` if the connection failed while sending
    fn send(&mut self, frame: Bytes) -> Result<(), TransportError>;

    /// Close the connection. A no-op when nothing is open.
    fn close(&mut self);

    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Wait for the next event.
    ///
    /// Returns `None` when the transport can never produce another event. A
    /// transport that was never opened pends forever.
    fn next_event(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;
}
