//! Session phase and identity.

/// Where the session is in its lifecycle.
///
/// ```text
/// LoggedOut ──login──> Connecting ──open──> Lobby ──joined──> InRoom
///     ↑                    ↑  │                ↑                │
///     └──────logout────────┼──┴────────────────┴────leave───────┤
///                          └──────────────connection lost───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No identity
    LoggedOut,
    /// Identity chosen, waiting for the connection to open
    Connecting,
    /// Connected, not in a room
    Lobby,
    /// Connected and joined to a room
    InRoom,
}

impl SessionPhase {
    /// Whether an identity exists.
    pub fn is_logged_in(self) -> bool {
        self != Self::LoggedOut
    }
}

/// The local user.
///
/// Created at login and immutable until logout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionIdentity {
    /// Name shown to other users
    pub display_name: String,
}

impl SessionIdentity {
    /// Create an identity.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self { display_name: display_name.into() }
    }
}
