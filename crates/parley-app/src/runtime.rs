//! Single-owner event loop for a chat session.
//!
//! The Runtime owns everything mutable in a session and serializes all
//! activity through one `select!` loop:
//! - [`Client`]: session state machine
//! - [`Reconnector`]: connection lifecycle and backoff
//! - [`Transport`]: the live connection
//!
//! User requests, transport events and reconnect timers are handled one at a
//! time, in arrival order. After each one the observable state is published
//! to the snapshot channel.

use std::{future::Future, pin::Pin};

use parley_client::{Client, ClientAction, ClientEvent, LogLevel};
use parley_core::{
    Environment, ReconnectAction, Reconnector, TimerId, Transport, TransportEvent,
};
use parley_proto::{Command, encode};
use tokio::sync::{mpsc, watch};

use crate::{
    SessionConfig, SessionError, SessionSnapshot,
    command::{Envelope, Request},
};

/// An armed reconnect timer.
struct PendingTimer {
    id: TimerId,
    sleep: Pin<Box<dyn Future<Output = ()> + Send>>,
}

/// Event loop that drives one chat session.
///
/// Created together with its [`crate::Session`] handle by
/// [`crate::Session::new`]. Runs until every handle has been dropped.
///
/// # Type Parameters
///
/// - `T`: Connection to the chat server
/// - `E`: Clock and timers
pub struct Runtime<T, E>
where
    T: Transport,
    E: Environment,
{
    transport: T,
    env: E,
    config: SessionConfig,
    reconnector: Reconnector,
    client: Client,
    timer: Option<PendingTimer>,
    requests: mpsc::Receiver<Envelope>,
    snapshots: watch::Sender<SessionSnapshot>,
    /// False once `next_event` has reported that no more events will come,
    /// until the next `open`
    transport_live: bool,
}

impl<T, E> Runtime<T, E>
where
    T: Transport,
    E: Environment,
{
    pub(crate) fn new(
        transport: T,
        env: E,
        config: SessionConfig,
        requests: mpsc::Receiver<Envelope>,
        snapshots: watch::Sender<SessionSnapshot>,
    ) -> Self {
        let reconnector = Reconnector::new(config.reconnect);
        Self {
            transport,
            env,
            config,
            reconnector,
            client: Client::new(),
            timer: None,
            requests,
            snapshots,
            transport_live: true,
        }
    }

    /// Run the event loop.
    ///
    /// Returns once every [`crate::Session`] handle has been dropped, after
    /// closing the connection.
    pub async fn run(mut self) {
        tracing::debug!(url = %self.config.url, "session runtime started");

        loop {
            tokio::select! {
                envelope = self.requests.recv() => match envelope {
                    Some(envelope) => self.handle_request(envelope),
                    None => break,
                },
                event = self.transport.next_event(), if self.transport_live => {
                    self.handle_transport_event(event);
                },
                timer = wait_timer(&mut self.timer) => self.handle_timer(timer),
            }
        }

        self.shutdown();
    }

    fn handle_request(&mut self, envelope: Envelope) {
        let Envelope { request, reply } = envelope;
        let operation = request.operation();
        tracing::debug!(operation, "handling request");

        let result = self.apply_request(request);
        self.publish();

        // The caller may have stopped waiting; the request still took effect.
        let _ = reply.send(result);
    }

    fn apply_request(&mut self, request: Request) -> Result<(), SessionError> {
        let operation = request.operation();
        let join = match &request {
            Request::Join { room } => Some(room.clone()),
            _ => None,
        };
        let actions = self.client.handle(request.into_event())?;

        if self.execute(actions) {
            return Ok(());
        }

        // A join the server never saw must not be replayed on reconnect.
        if let Some(room) = join {
            let actions = self.handle_client_event(ClientEvent::JoinFailed { room });
            self.execute(actions);
        }
        Err(SessionError::NotConnected { operation })
    }

    fn handle_transport_event(&mut self, event: Option<TransportEvent>) {
        let Some(event) = event else {
            tracing::debug!("transport event stream ended");
            self.transport_live = false;
            return;
        };

        let actions = match event {
            TransportEvent::Opened => {
                tracing::info!(url = %self.config.url, "connected");
                let reconnect = self.reconnector.on_open();
                self.apply_reconnect(reconnect)
            },
            TransportEvent::Closed { reason } => {
                tracing::info!(%reason, "connection closed");
                let reconnect = self.reconnector.on_close();
                self.apply_reconnect(reconnect)
            },
            TransportEvent::Error { message } => {
                tracing::warn!(%message, "transport error");
                let reconnect = self.reconnector.on_error();
                self.apply_reconnect(reconnect)
            },
            TransportEvent::Message(frame) => {
                tracing::trace!(len = frame.len(), "frame received");
                self.handle_client_event(ClientEvent::FrameReceived(frame))
            },
        };

        self.execute(actions);
        self.publish();
    }

    fn handle_timer(&mut self, timer: TimerId) {
        self.timer = None;
        tracing::debug!(timer = timer.get(), "reconnect timer fired");

        let reconnect = self.reconnector.on_timer_fired(timer);
        let actions = self.apply_reconnect(reconnect);
        self.execute(actions);
        self.publish();
    }

    /// Execute client actions, including any they cascade into.
    ///
    /// Returns `false` if a frame could not be sent.
    fn execute(&mut self, initial_actions: Vec<ClientAction>) -> bool {
        let mut all_sent = true;
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    ClientAction::Send(command) => all_sent &= self.send(&command),
                    ClientAction::Connect => {
                        let reconnect = self.reconnector.connect();
                        pending_actions.extend(self.apply_reconnect(reconnect));
                    },
                    ClientAction::Disconnect => {
                        let reconnect = self.reconnector.disconnect();
                        pending_actions.extend(self.apply_reconnect(reconnect));
                    },
                    ClientAction::Log { level, message } => log(level, &message),
                }
            }
        }

        all_sent
    }

    /// Execute reconnect actions, then bring the client's view of the
    /// connection up to date.
    ///
    /// Returns the client actions the state change produced.
    fn apply_reconnect(&mut self, initial_actions: Vec<ReconnectAction>) -> Vec<ClientAction> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    ReconnectAction::Open => {
                        self.transport_live = true;
                        if let Err(e) = self.transport.open(&self.config.url) {
                            tracing::warn!(url = %self.config.url, error = %e, "connection attempt failed to start");
                            pending_actions.extend(self.reconnector.on_close());
                        }
                    },
                    ReconnectAction::Close => self.transport.close(),
                    ReconnectAction::ScheduleReconnect { delay, timer } => {
                        tracing::info!(
                            ?delay,
                            attempt = self.reconnector.attempts() + 1,
                            "reconnecting after delay"
                        );
                        let env = self.env.clone();
                        self.timer = Some(PendingTimer {
                            id: timer,
                            sleep: Box::pin(async move { env.sleep(delay).await }),
                        });
                    },
                    ReconnectAction::CancelReconnect => self.timer = None,
                }
            }
        }

        let state = self.reconnector.state();
        if self.client.connection() == state {
            return Vec::new();
        }
        self.handle_client_event(ClientEvent::ConnectionChanged { state })
    }

    /// Feed an event the client cannot reject.
    fn handle_client_event(&mut self, event: ClientEvent) -> Vec<ClientAction> {
        match self.client.handle(event) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(error = %e, "client rejected internal event");
                Vec::new()
            },
        }
    }

    /// Encode and send one command. Returns `false` on failure.
    fn send(&mut self, command: &Command) -> bool {
        let frame = match encode(command) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode command");
                return false;
            },
        };

        match self.transport.send(frame) {
            Ok(()) => {
                tracing::trace!(kind = command.kind(), "frame sent");
                true
            },
            Err(e) => {
                tracing::warn!(kind = command.kind(), error = %e, "failed to send frame");
                false
            },
        }
    }

    fn publish(&self) {
        let client = &self.client;
        self.snapshots.send_if_modified(|current| {
            let next = SessionSnapshot::from_client(client);
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn shutdown(&mut self) {
        tracing::debug!("all session handles dropped; shutting down");

        let reconnect = self.reconnector.disconnect();
        let actions = self.apply_reconnect(reconnect);
        self.execute(actions);
        self.transport.close();
        self.publish();
    }
}

/// Wait for the armed timer, or forever when none is armed.
///
/// The sleep lives in `timer`, so dropping this future does not restart it.
async fn wait_timer(timer: &mut Option<PendingTimer>) -> TimerId {
    match timer {
        Some(pending) => {
            (&mut pending.sleep).await;
            pending.id
        },
        None => std::future::pending().await,
    }
}

fn log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "parley_client", "{message}"),
        LogLevel::Info => tracing::info!(target: "parley_client", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "parley_client", "{message}"),
    }
}
