//! Session facade.

use parley_client::RoomId;
use parley_core::{Environment, Transport};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::{
    Runtime, SessionConfig, SessionError, SessionSnapshot,
    command::{Envelope, Request},
};

/// Handle to a running chat session.
///
/// Cheap to clone. Every operation is forwarded to the session's
/// [`Runtime`] and completes once the runtime has applied it, so a snapshot
/// read after an `Ok` already reflects the change.
#[derive(Debug, Clone)]
pub struct Session {
    requests: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl Session {
    /// Create a session handle and the runtime that serves it.
    ///
    /// Nothing happens until the runtime is driven with [`Runtime::run`].
    pub fn new<T, E>(transport: T, env: E, config: SessionConfig) -> (Self, Runtime<T, E>)
    where
        T: Transport,
        E: Environment,
    {
        let (requests_tx, requests_rx) = mpsc::channel(config.request_buffer.max(1));
        let (snapshots_tx, snapshots_rx) = watch::channel(SessionSnapshot::default());

        let runtime = Runtime::new(transport, env, config, requests_rx, snapshots_tx);
        (Self { requests: requests_tx, snapshots: snapshots_rx }, runtime)
    }

    /// Create a session and spawn its runtime on the current tokio runtime.
    pub fn spawn<T, E>(transport: T, env: E, config: SessionConfig) -> (Self, JoinHandle<()>)
    where
        T: Transport,
        E: Environment,
    {
        let (session, runtime) = Self::new(transport, env, config);
        (session, tokio::spawn(runtime.run()))
    }

    /// Log in and start connecting.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidTransition` if already logged in
    pub async fn login(&self, name: impl Into<String>) -> Result<(), SessionError> {
        self.request(Request::Login { name: name.into() }).await
    }

    /// Log out, drop the connection and clear all session state.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidTransition` if not logged in
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.request(Request::Logout).await
    }

    /// Ask to join `room`. Completion is observed as the snapshot entering
    /// the room.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidTransition` if not logged in
    /// - `SessionError::NotConnected` if the connection is not open
    pub async fn join(&self, room: impl Into<RoomId>) -> Result<(), SessionError> {
        self.request(Request::Join { room: room.into() }).await
    }

    /// Leave the current room, or abandon a pending join.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidTransition` if neither in nor joining a room
    pub async fn leave(&self) -> Result<(), SessionError> {
        self.request(Request::Leave).await
    }

    /// Post a message to the current room.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotConnected` if the connection is not open
    /// - `SessionError::InvalidTransition` if not in a room
    pub async fn post(&self, body: impl Into<String>) -> Result<(), SessionError> {
        self.request(Request::Post { body: body.into() }).await
    }

    /// Report the current contents of the message input.
    ///
    /// Typing notifications are sent on empty/non-empty edges while in a
    /// room.
    pub async fn input_changed(&self, value: impl Into<String>) -> Result<(), SessionError> {
        self.request(Request::InputChanged { value: value.into() }).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    async fn request(&self, request: Request) -> Result<(), SessionError> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(Envelope { request, reply })
            .await
            .map_err(|_| SessionError::RuntimeStopped)?;

        outcome.await.map_err(|_| SessionError::RuntimeStopped)?
    }
}
