//! Session configuration.

use parley_core::ReconnectConfig;

/// Server the reference deployment listens on.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8080/ws/";

/// Requests that may queue up before `Session` calls start waiting.
pub const DEFAULT_REQUEST_BUFFER: usize = 64;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// WebSocket URL of the chat server
    pub url: String,
    /// Reconnect backoff
    pub reconnect: ReconnectConfig,
    /// Capacity of the request mailbox (minimum 1)
    pub request_buffer: usize,
}

impl SessionConfig {
    /// Default configuration pointed at `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            reconnect: ReconnectConfig::default(),
            request_buffer: DEFAULT_REQUEST_BUFFER,
        }
    }
}
