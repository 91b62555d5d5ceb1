//! Reconnection state machine.
//!
//! Keeps a session's connection alive across drops. The controller is told
//! about lifecycle changes (`on_open`, `on_close`, `on_error`) and about the
//! session's intent (`connect`, `disconnect`), and returns actions for the
//! driver to execute. The driver owns the actual transport and the actual
//! timer; the controller owns the decision and the timer identity.
//!
//! # State Machine
//!
//! ```text
//!                  connect / timer
//! ┌──────────────┐ ─────────────> ┌────────────┐   on_open   ┌──────┐
//! │ Disconnected │                │ Connecting │ ──────────> │ Open │
//! └──────────────┘ <───────────── └────────────┘             └──────┘
//!        ↑            on_close          │ on_error / disconnect  │
//!        │                              ↓                        │
//!        │    on_close            ┌─────────┐  on_error /        │
//!        └─────────────────────── │ Closing │ <──────────────────┘
//!                                 └─────────┘  disconnect
//! ```
//!
//! # Backoff
//!
//! The first retry after a drop waits [`ReconnectConfig::initial_delay`]. Each
//! scheduled retry doubles the stored delay; the applied delay is capped at
//! [`ReconnectConfig::max_delay`]. A successful open resets the stored delay.

use std::time::Duration;

/// Delay before the first reconnect attempt after a drop.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(250);

/// Upper bound on any single reconnect delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Connection lifecycle as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No connection and no attempt in flight
    Disconnected,
    /// Attempt in flight
    Connecting,
    /// Connected
    Open,
    /// Close requested, waiting for the transport to confirm
    Closing,
}

impl ConnectionState {
    /// Whether frames can be sent.
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Handle for one scheduled reconnect.
///
/// Issued by the controller in [`ReconnectAction::ScheduleReconnect`] and
/// handed back through [`Reconnector::on_timer_fired`]. A handle that does not
/// match the currently pending timer is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw handle value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Actions returned by the reconnection controller.
///
/// The driver executes these in order:
/// - `Open`: start a transport connection attempt
/// - `Close`: close the transport
/// - `ScheduleReconnect`: arm a timer; report it via `on_timer_fired`
/// - `CancelReconnect`: disarm the pending timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconnectAction {
    /// Start a connection attempt
    Open,

    /// Close the transport
    Close,

    /// Arm a reconnect timer
    ScheduleReconnect {
        /// How long to wait
        delay: Duration,
        /// Identity to report when the timer fires
        timer: TimerId,
    },

    /// Disarm the pending reconnect timer
    CancelReconnect,
}

/// Backoff configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Delay before the first retry, and after every successful open
    pub initial_delay: Duration,
    /// Cap on any applied delay
    pub max_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self { initial_delay: DEFAULT_INITIAL_DELAY, max_delay: DEFAULT_MAX_DELAY }
    }
}

/// Reconnection controller.
///
/// Pure state machine: no I/O, no clock. Every method returns the actions the
/// driver must perform.
#[derive(Debug, Clone)]
pub struct Reconnector {
    config: ReconnectConfig,
    state: ConnectionState,
    /// Whether the session wants a connection. Cleared by `disconnect`.
    wants_connection: bool,
    /// Uncapped delay for the next scheduled retry
    next_delay: Duration,
    pending: Option<TimerId>,
    next_timer: u64,
    /// Retries since the last successful open
    attempts: u32,
}

impl Default for Reconnector {
    fn default() -> Self {
        Self::new(ReconnectConfig::default())
    }
}

impl Reconnector {
    /// Create a controller in [`ConnectionState::Disconnected`] with no
    /// connection intent.
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            wants_connection: false,
            next_delay: config.initial_delay,
            pending: None,
            next_timer: 0,
            attempts: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the session currently wants to be connected.
    pub fn wants_connection(&self) -> bool {
        self.wants_connection
    }

    /// Uncapped delay that the next scheduled retry will be based on.
    pub fn next_delay(&self) -> Duration {
        self.next_delay
    }

    /// Currently armed timer, if any.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    /// Retries fired since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Backoff configuration.
    pub fn config(&self) -> &ReconnectConfig {
        &self.config
    }

    /// The session wants a connection.
    ///
    /// Opens immediately when disconnected with no retry pending. Otherwise
    /// the current attempt, open connection or armed timer already serves the
    /// intent.
    pub fn connect(&mut self) -> Vec<ReconnectAction> {
        self.wants_connection = true;

        if self.state == ConnectionState::Disconnected && self.pending.is_none() {
            self.state = ConnectionState::Connecting;
            return vec![ReconnectAction::Open];
        }

        Vec::new()
    }

    /// The session no longer wants a connection.
    ///
    /// Detaches retry-on-close, disarms a pending timer and closes whatever is
    /// open or in flight. Nothing reconnects until the next `connect`.
    pub fn disconnect(&mut self) -> Vec<ReconnectAction> {
        self.wants_connection = false;

        let mut actions = Vec::new();
        if self.pending.take().is_some() {
            actions.push(ReconnectAction::CancelReconnect);
        }

        if matches!(self.state, ConnectionState::Open | ConnectionState::Connecting) {
            self.state = ConnectionState::Closing;
            actions.push(ReconnectAction::Close);
        }

        actions
    }

    /// The transport reported a successful open.
    pub fn on_open(&mut self) -> Vec<ReconnectAction> {
        self.next_delay = self.config.initial_delay;
        self.attempts = 0;

        let mut actions = Vec::new();
        if self.pending.take().is_some() {
            actions.push(ReconnectAction::CancelReconnect);
        }

        if self.wants_connection {
            self.state = ConnectionState::Open;
        } else {
            // Attempt completed after the session gave up on it.
            self.state = ConnectionState::Closing;
            actions.push(ReconnectAction::Close);
        }

        actions
    }

    /// The transport reported that the connection ended or the attempt
    /// failed.
    ///
    /// Schedules a retry when the session still wants a connection and none
    /// is armed yet.
    pub fn on_close(&mut self) -> Vec<ReconnectAction> {
        self.state = ConnectionState::Disconnected;

        if !self.wants_connection || self.pending.is_some() {
            return Vec::new();
        }

        let delay = self.next_delay.min(self.config.max_delay);
        self.next_delay = self.next_delay.saturating_add(self.next_delay);

        let timer = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        self.pending = Some(timer);

        vec![ReconnectAction::ScheduleReconnect { delay, timer }]
    }

    /// The transport reported an error.
    ///
    /// Forces the connection closed. The retry is scheduled by the `on_close`
    /// that follows.
    pub fn on_error(&mut self) -> Vec<ReconnectAction> {
        match self.state {
            ConnectionState::Open | ConnectionState::Connecting => {
                self.state = ConnectionState::Closing;
                vec![ReconnectAction::Close]
            },
            ConnectionState::Disconnected | ConnectionState::Closing => Vec::new(),
        }
    }

    /// A timer armed by `ScheduleReconnect` fired.
    ///
    /// Opens only if `timer` is the one currently armed, the session still
    /// wants a connection, and nothing is open or in flight. Anything else is
    /// a stale timer and a no-op.
    pub fn on_timer_fired(&mut self, timer: TimerId) -> Vec<ReconnectAction> {
        if self.pending != Some(timer) {
            return Vec::new();
        }
        self.pending = None;

        if !self.wants_connection || self.state != ConnectionState::Disconnected {
            return Vec::new();
        }

        self.state = ConnectionState::Connecting;
        self.attempts = self.attempts.saturating_add(1);
        vec![ReconnectAction::Open]
    }
}
