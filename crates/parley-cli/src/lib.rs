//! Parley terminal client.
//!
//! A line-oriented frontend over [`parley_app::Session`]: lines typed on
//! stdin become session intents, and published snapshots are rendered as
//! plain text on stdout.
//!
//! # Components
//!
//! - [`input`]: Parsing of typed lines into commands
//! - [`render`]: Text rendering of snapshots and transcript lines
//! - [`repl`]: The read/print loop tying both to a running session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod render;
pub mod repl;
