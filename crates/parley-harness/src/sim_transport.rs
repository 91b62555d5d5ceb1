//! Simulated transport.
//!
//! [`SimTransport`] implements [`Transport`] over in-memory channels so the
//! same [`parley_app::Runtime`] code runs in production and simulation. The
//! paired [`SimRemote`] plays the server side.
//!
//! Each `open` starts a fresh attempt with its own event channel. Replacing
//! the channel drops whatever the previous attempt had queued, so stale
//! events never reach the session.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use parley_core::{Transport, TransportError, TransportEvent};
use tokio::sync::mpsc;

/// State shared between the transport and its remote.
#[derive(Debug)]
struct Shared {
    accepting: bool,
    greeting: Vec<Bytes>,
    /// Current attempt is connected
    connected: bool,
    /// Sends fail although the connection looks open
    send_failing: bool,
    events: Option<mpsc::UnboundedSender<TransportEvent>>,
    sent: Vec<Bytes>,
    opened_urls: Vec<String>,
    client_closes: usize,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            accepting: true,
            greeting: Vec::new(),
            connected: false,
            send_failing: false,
            events: None,
            sent: Vec::new(),
            opened_urls: Vec::new(),
            client_closes: 0,
        }
    }
}

impl Shared {
    fn push(&self, event: TransportEvent) {
        if let Some(events) = &self.events {
            // Receiver gone means the attempt was abandoned.
            let _ = events.send(event);
        }
    }

    /// End the current attempt with `Closed`.
    fn end_attempt(&mut self, reason: &str) {
        self.push(TransportEvent::Closed { reason: reason.to_string() });
        self.connected = false;
        self.events = None;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session end of a simulated connection.
#[derive(Debug)]
pub struct SimTransport {
    shared: Arc<Mutex<Shared>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    open: bool,
}

impl SimTransport {
    /// Create a transport and the remote that controls it.
    ///
    /// The remote accepts connections until told otherwise.
    pub fn pair() -> (Self, SimRemote) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let remote = SimRemote { shared: Arc::clone(&shared) };
        (Self { shared, events: None, open: false }, remote)
    }
}

impl Transport for SimTransport {
    fn open(&mut self, url: &str) -> Result<(), TransportError> {
        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            return Err(TransportError::Connection(format!("invalid url {url:?}")));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(rx);
        self.open = false;

        let mut shared = lock(&self.shared);
        shared.opened_urls.push(url.to_string());
        shared.events = Some(tx);

        if shared.accepting {
            shared.connected = true;
            shared.push(TransportEvent::Opened);
            for frame in shared.greeting.clone() {
                shared.push(TransportEvent::Message(frame));
            }
        } else {
            shared.connected = false;
            shared.push(TransportEvent::Error { message: "connection refused".to_string() });
            shared.end_attempt("connect failed");
        }

        tracing::trace!(%url, accepted = shared.connected, "sim transport opened");
        Ok(())
    }

    fn send(&mut self, frame: Bytes) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }

        let mut shared = lock(&self.shared);
        if !shared.connected || shared.send_failing {
            return Err(TransportError::Stream("connection lost".to_string()));
        }
        shared.sent.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;

        let mut shared = lock(&self.shared);
        if shared.connected {
            shared.client_closes += 1;
            shared.end_attempt("closed by client");
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        loop {
            let Some(events) = self.events.as_mut() else {
                return std::future::pending().await;
            };

            match events.recv().await {
                Some(event) => {
                    match &event {
                        TransportEvent::Opened => self.open = lock(&self.shared).connected,
                        TransportEvent::Closed { .. } => self.open = false,
                        TransportEvent::Error { .. } | TransportEvent::Message(_) => {},
                    }
                    return Some(event);
                },
                // Attempt finished; wait for the next `open`.
                None => self.events = None,
            }
        }
    }
}

/// Server end of a simulated connection.
///
/// Cheap to clone; all clones control the same transport.
#[derive(Debug, Clone)]
pub struct SimRemote {
    shared: Arc<Mutex<Shared>>,
}

impl SimRemote {
    /// Accept (`true`) or refuse (`false`) future connection attempts.
    pub fn set_accepting(&self, accepting: bool) {
        lock(&self.shared).accepting = accepting;
    }

    /// Frames delivered right after every accepted open, such as a room
    /// list.
    pub fn set_greeting(&self, frames: impl IntoIterator<Item = String>) {
        lock(&self.shared).greeting = frames.into_iter().map(Bytes::from).collect();
    }

    /// Deliver one frame to the session.
    ///
    /// Returns `false` (and drops the frame) when nothing is connected.
    pub fn deliver(&self, frame: impl Into<String>) -> bool {
        let shared = lock(&self.shared);
        if !shared.connected {
            return false;
        }
        shared.push(TransportEvent::Message(Bytes::from(frame.into())));
        true
    }

    /// Make every send fail (`true`) without closing the connection, as when
    /// the socket died but no close has been observed yet.
    pub fn set_send_failing(&self, failing: bool) {
        lock(&self.shared).send_failing = failing;
    }

    /// Close the connection from the server side.
    pub fn drop_connection(&self, reason: &str) {
        let mut shared = lock(&self.shared);
        if shared.connected {
            shared.end_attempt(reason);
        }
    }

    /// Fail the connection with an error, followed by `Closed`.
    pub fn fail_connection(&self, message: &str) {
        let mut shared = lock(&self.shared);
        if shared.connected {
            shared.push(TransportEvent::Error { message: message.to_string() });
            shared.end_attempt("connection failed");
        }
    }

    /// Whether a connection is currently established.
    pub fn is_connected(&self) -> bool {
        lock(&self.shared).connected
    }

    /// Every frame the session has sent, in order.
    pub fn sent(&self) -> Vec<Bytes> {
        lock(&self.shared).sent.clone()
    }

    /// Sent frames parsed as JSON. Frames that are not JSON are skipped.
    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        lock(&self.shared).sent.iter().filter_map(|f| serde_json::from_slice(f).ok()).collect()
    }

    /// Take and clear the sent frames, parsed as JSON.
    pub fn take_sent_json(&self) -> Vec<serde_json::Value> {
        let sent = std::mem::take(&mut lock(&self.shared).sent);
        sent.iter().filter_map(|f| serde_json::from_slice(f).ok()).collect()
    }

    /// Number of connection attempts made.
    pub fn open_count(&self) -> usize {
        lock(&self.shared).opened_urls.len()
    }

    /// URL of every connection attempt, in order.
    pub fn opened_urls(&self) -> Vec<String> {
        lock(&self.shared).opened_urls.clone()
    }

    /// Number of connections closed by the session.
    pub fn client_closes(&self) -> usize {
        lock(&self.shared).client_closes
    }
}
