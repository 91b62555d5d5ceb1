//! Standard session invariants.

use parley_app::SessionSnapshot;
use parley_client::{Peer, SessionPhase};

use super::{Invariant, InvariantResult, Violation};

/// By id once assigned, by display name before.
fn is_self(state: &SessionSnapshot, peer: &Peer) -> bool {
    match &state.self_id {
        Some(id) => *id == peer.id,
        None => state.display_name() == Some(peer.name.as_str()),
    }
}

/// The local user never appears in the roster.
pub struct SelfNotInRoster;

impl Invariant for SelfNotInRoster {
    fn name(&self) -> &'static str {
        "self_not_in_roster"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match state.roster.iter().find(|peer| is_self(state, peer)) {
            Some(peer) => Err(Violation {
                invariant: self.name(),
                message: format!("local user {:?} listed in roster", peer.name),
            }),
            None => Ok(()),
        }
    }
}

/// The local user never appears in the typing set, and the typing names
/// match the typing set.
pub struct SelfNotTyping;

impl Invariant for SelfNotTyping {
    fn name(&self) -> &'static str {
        "self_not_typing"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if let Some(peer) = state.typing.iter().find(|peer| is_self(state, peer)) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("local user {:?} shown as typing", peer.name),
            });
        }

        let names: Vec<&str> = state.typing.iter().map(|p| p.name.as_str()).collect();
        if names != state.typing_names {
            return Err(Violation {
                invariant: self.name(),
                message: format!("typing names {:?} do not match set {names:?}", state.typing_names),
            });
        }

        Ok(())
    }
}

/// A room is held only while in it, or while reconnecting to rejoin it.
pub struct RoomMatchesPhase;

impl Invariant for RoomMatchesPhase {
    fn name(&self) -> &'static str {
        "room_matches_phase"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let ok = match state.phase {
            SessionPhase::InRoom => state.room.is_some(),
            SessionPhase::Connecting => true,
            SessionPhase::LoggedOut | SessionPhase::Lobby => state.room.is_none(),
        };

        if ok {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!("room {:?} while {:?}", state.room, state.phase),
            })
        }
    }
}

/// Without a room there is nobody to list and nothing to show.
pub struct NoRoomNoView;

impl Invariant for NoRoomNoView {
    fn name(&self) -> &'static str {
        "no_room_no_view"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.room.is_some() {
            return Ok(());
        }

        let leftovers = [
            ("roster", !state.roster.is_empty()),
            ("typing", !state.typing.is_empty()),
            ("transcript", !state.transcript.is_empty()),
        ];

        match leftovers.iter().find(|(_, present)| *present) {
            Some((field, _)) => Err(Violation {
                invariant: self.name(),
                message: format!("{field} shown while {:?} without a room", state.phase),
            }),
            None => Ok(()),
        }
    }
}

/// Logged out means no identity, room, people or transcript.
pub struct LoggedOutIsEmpty;

impl Invariant for LoggedOutIsEmpty {
    fn name(&self) -> &'static str {
        "logged_out_is_empty"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.phase != SessionPhase::LoggedOut {
            return Ok(());
        }

        let leftovers = [
            ("identity", state.identity.is_some()),
            ("self id", state.self_id.is_some()),
            ("room", state.room.is_some()),
            ("roster", !state.roster.is_empty()),
            ("typing", !state.typing.is_empty()),
            ("transcript", !state.transcript.is_empty()),
        ];

        match leftovers.iter().find(|(_, present)| *present) {
            Some((field, _)) => Err(Violation {
                invariant: self.name(),
                message: format!("{field} retained after logout"),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_client::{ChatEvent, SessionIdentity};

    use super::*;

    fn in_room() -> SessionSnapshot {
        SessionSnapshot {
            phase: SessionPhase::InRoom,
            identity: Some(SessionIdentity::new("Alice")),
            self_id: Some("u1".into()),
            room: Some("r1".into()),
            roster: vec![Peer::new("u2", "Bob")],
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn consistent_snapshot_passes_standard_checks() {
        assert!(crate::InvariantRegistry::standard().check_all(&in_room()).is_ok());
        assert!(crate::InvariantRegistry::standard().check_all(&SessionSnapshot::default()).is_ok());
    }

    #[test]
    fn self_by_id_in_roster_is_violation() {
        let mut state = in_room();
        state.roster.push(Peer::new("u1", "Alice"));
        assert_eq!(SelfNotInRoster.check(&state).unwrap_err().invariant, "self_not_in_roster");
    }

    #[test]
    fn namesake_counts_as_self_only_before_id_is_known() {
        let mut state = in_room();
        state.roster.push(Peer::new("u9", "Alice"));
        assert!(SelfNotInRoster.check(&state).is_ok());

        state.self_id = None;
        assert!(SelfNotInRoster.check(&state).is_err());
    }

    #[test]
    fn lobby_with_previous_roster_is_violation() {
        let mut state = in_room();
        state.phase = SessionPhase::Lobby;
        state.room = None;
        assert_eq!(
            NoRoomNoView.check(&state).unwrap_err().to_string(),
            "no_room_no_view: roster shown while Lobby without a room"
        );

        state.roster.clear();
        assert!(NoRoomNoView.check(&state).is_ok());
    }

    #[test]
    fn typing_names_must_follow_set() {
        let mut state = in_room();
        state.typing.push(Peer::new("u2", "Bob"));
        assert!(SelfNotTyping.check(&state).is_err());

        state.typing_names.push("Bob".into());
        assert!(SelfNotTyping.check(&state).is_ok());
    }

    #[test]
    fn room_in_lobby_is_violation() {
        let mut state = in_room();
        state.phase = SessionPhase::Lobby;
        assert!(RoomMatchesPhase.check(&state).is_err());

        state.phase = SessionPhase::Connecting;
        assert!(RoomMatchesPhase.check(&state).is_ok());
    }

    #[test]
    fn transcript_after_logout_is_violation() {
        let state = SessionSnapshot {
            transcript: vec![ChatEvent::info("left over")],
            ..SessionSnapshot::default()
        };
        assert_eq!(
            LoggedOutIsEmpty.check(&state).unwrap_err().to_string(),
            "logged_out_is_empty: transcript retained after logout"
        );
    }
}
