//! Typed line parsing.

use thiserror::Error;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/join <room-id>`
    Join(String),
    /// `/leave`
    Leave,
    /// `/rooms`: list rooms
    Rooms,
    /// `/who`: list people in the room
    Who,
    /// `/quit`
    Quit,
    /// Any other non-empty line: post it
    Post(String),
    /// Blank line
    Empty,
}

/// Why a line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Slash command that does not exist.
    #[error("unknown command /{0} (try /join, /leave, /rooms, /who, /quit)")]
    UnknownCommand(String),

    /// Command is missing its argument.
    #[error("usage: {0}")]
    MissingArgument(&'static str),
}

/// Parse one line of input.
///
/// A line starting with `//` posts the rest with a single leading `/`.
pub fn parse(line: &str) -> Result<Input, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(Input::Empty);
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(Input::Post(line.to_string()));
    };

    if command.starts_with('/') {
        return Ok(Input::Post(command.to_string()));
    }

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match name {
        "join" => argument
            .map(|room| Input::Join(room.to_string()))
            .ok_or(InputError::MissingArgument("/join <room-id>")),
        "leave" => Ok(Input::Leave),
        "rooms" => Ok(Input::Rooms),
        "who" => Ok(Input::Who),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
