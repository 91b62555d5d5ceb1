//! WebSocket transport for the client.
//!
//! Provides [`WsTransport`], which carries frames over a WebSocket
//! connection. This is a thin layer that just sends and receives frames;
//! protocol logic remains in the Sans-IO [`crate::Client`] and retry logic in
//! [`parley_core::Reconnector`].
//!
//! Each `open` spawns one connection task. The task bridges an outgoing
//! channel to the socket sink and the socket stream to an event channel.
//! Closing drops the outgoing sender, which makes the task send a close frame
//! and report `Closed`.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use parley_core::{Transport, TransportError, TransportEvent};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Message, client::IntoClientRequest, handshake::client::Request},
};

/// Production [`Transport`] over `tokio-tungstenite`.
///
/// Must be opened from within a tokio runtime.
#[derive(Debug, Default)]
pub struct WsTransport {
    outgoing: Option<mpsc::UnboundedSender<Bytes>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    task: Option<JoinHandle<()>>,
    open: bool,
}

impl WsTransport {
    /// Create an unopened transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn abandon_attempt(&mut self) {
        self.outgoing = None;
        self.events = None;
        self.open = false;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Transport for WsTransport {
    fn open(&mut self, url: &str) -> Result<(), TransportError> {
        self.abandon_attempt();

        let request = url
            .into_client_request()
            .map_err(|e| TransportError::Connection(format!("invalid url {url:?}: {e}")))?;

        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tracing::debug!(%url, "opening websocket");
        self.task = Some(tokio::spawn(run_connection(request, outgoing_rx, events_tx)));
        self.outgoing = Some(outgoing_tx);
        self.events = Some(events_rx);

        Ok(())
    }

    fn send(&mut self, frame: Bytes) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }

        let outgoing = self.outgoing.as_ref().ok_or(TransportError::NotConnected)?;
        outgoing
            .send(frame)
            .map_err(|_| TransportError::Stream("connection task has ended".to_string()))
    }

    fn close(&mut self) {
        // Keep the event channel so the task's final `Closed` is delivered.
        self.outgoing = None;
        self.open = false;
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
                        TransportEvent::Opened => self.open = self.outgoing.is_some(),
                        TransportEvent::Closed { .. } => self.open = false,
                        TransportEvent::Error { .. } | TransportEvent::Message(_) => {},
                    }
                    return Some(event);
                },
                // Attempt finished; wait for the next `open`.
                None => {
                    self.events = None;
                    self.task = None;
                },
            }
        }
    }
}

/// Run one connection attempt, bridging channels and the socket.
async fn run_connection(
    request: Request,
    mut outgoing: mpsc::UnboundedReceiver<Bytes>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let ws = match connect_async(request).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            let _ = events.send(TransportEvent::Error { message: e.to_string() });
            let _ = events.send(TransportEvent::Closed { reason: "connect failed".to_string() });
            return;
        },
    };

    if events.send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut sink, mut stream) = ws.split();

    let reason = loop {
        tokio::select! {
            frame = outgoing.recv() => match frame {
                Some(bytes) => {
                    if let Err(e) = sink.send(to_message(bytes)).await {
                        let _ = events.send(TransportEvent::Error { message: e.to_string() });
                        break format!("send failed: {e}");
                    }
                },
                None => {
                    if let Err(e) = sink.send(Message::Close(None)).await {
                        tracing::debug!(error = %e, "close frame not sent");
                    }
                    break "closed by client".to_string();
                },
            },
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let bytes = Bytes::copy_from_slice(text.as_bytes());
                    if events.send(TransportEvent::Message(bytes)).is_err() {
                        break "transport dropped".to_string();
                    }
                },
                Some(Ok(Message::Binary(data))) => {
                    if events.send(TransportEvent::Message(data)).is_err() {
                        break "transport dropped".to_string();
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    break frame.map_or_else(
                        || "closed by server".to_string(),
                        |f| format!("closed by server: {} {}", u16::from(f.code), f.reason.as_str()),
                    );
                },
                // Ping/pong are answered by tungstenite.
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    let _ = events.send(TransportEvent::Error { message: e.to_string() });
                    break format!("read failed: {e}");
                },
                None => break "connection ended".to_string(),
            },
        }
    };

    tracing::debug!(%reason, "websocket closed");
    let _ = events.send(TransportEvent::Closed { reason });
}

fn to_message(bytes: Bytes) -> Message {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => Message::text(text),
        Err(_) => Message::Binary(bytes),
    }
}
