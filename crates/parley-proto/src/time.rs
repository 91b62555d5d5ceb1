//! Display timestamps for chat messages.
//!
//! Message instants arrive as RFC 3339 strings. Rendering uses the hour,
//! minute and second of the UTC instant so two clients in different time
//! zones show the same label for the same message.

use chrono::{DateTime, Timelike, Utc};

use crate::DecodeError;

/// Zero-padded `HH:MM` / `HH:MM:SS` pair derived from a UTC instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayTime {
    /// `HH:MM`
    pub short: String,
    /// `HH:MM:SS`
    pub full: String,
}

impl DisplayTime {
    /// Render a UTC instant.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let (hour, minute, second) = (instant.hour(), instant.minute(), instant.second());
        Self {
            short: format!("{hour:02}:{minute:02}"),
            full: format!("{hour:02}:{minute:02}:{second:02}"),
        }
    }

    /// Parse an RFC 3339 timestamp (any offset) and render it in UTC.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let instant = DateTime::parse_from_rfc3339(text)
            .map_err(|e| DecodeError::malformed(format!("invalid timestamp {text:?}: {e}")))?;
        Ok(Self::from_utc(instant.with_timezone(&Utc)))
    }
}
