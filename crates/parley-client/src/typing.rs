//! Typing indicator edge detection.
//!
//! The local user's typing status is derived from the draft, not from a
//! timer: it starts when the draft goes from empty to non-empty and stops when
//! it goes back to empty. Keystrokes in between produce nothing.

/// Typing status change implied by a draft change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingEdge {
    /// Draft became non-empty
    Started,
    /// Draft became empty
    Stopped,
}

/// Compare two consecutive drafts.
///
/// Returns `None` when both are empty or both are non-empty.
pub fn typing_edge(previous: &str, current: &str) -> Option<TypingEdge> {
    match (previous.is_empty(), current.is_empty()) {
        (true, false) => Some(TypingEdge::Started),
        (false, true) => Some(TypingEdge::Stopped),
        _ => None,
    }
}
